//! Coherent noise kernels.
//!
//! Both kernels hash an integer lattice point together with a seed and
//! interpolate the eight corner values of the cell containing the sample.
//! Gradient noise dots a per-corner gradient vector with the offset from the
//! corner; value noise uses a per-corner scalar directly.

mod gradient;
mod value;
mod vectors;

pub use gradient::{gradient_coherent_noise_3d, gradient_noise_3d};
pub use value::{value_coherent_noise_3d, value_noise_3d};
pub use vectors::RANDOM_VECTORS;

use crate::math::{lattice_floor, s_curve3, s_curve5};

/// Multiplier for the x lattice index in the hash.
pub const NOISE_X: i32 = 1619;
/// Multiplier for the y lattice index in the hash.
pub const NOISE_Y: i32 = 31337;
/// Multiplier for the z lattice index in the hash.
pub const NOISE_Z: i32 = 6971;
/// Multiplier for the seed in the hash.
pub const NOISE_SEED: i32 = 1013;
/// Right shift folded back into the gradient hash.
pub const NOISE_SHIFT: u32 = 8;

/// Interpolation curve applied to the position inside a lattice cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Quality {
    /// Raw fractional position. Visible creases at cell boundaries.
    Fast,
    /// Third-order S-curve.
    #[default]
    Standard,
    /// Fifth-order S-curve, continuous in the second derivative.
    Best,
}

impl Quality {
    /// Maps a fractional cell position in `[0, 1]` through this quality's curve.
    #[inline]
    #[must_use]
    pub fn apply(self, a: f64) -> f64 {
        match self {
            Self::Fast => a,
            Self::Standard => s_curve3(a),
            Self::Best => s_curve5(a),
        }
    }
}

/// Lower corner of the lattice cell containing a point, plus the per-axis
/// interpolation weights for that point.
#[derive(Debug, Clone, Copy)]
struct LatticeCell {
    x0: i32,
    y0: i32,
    z0: i32,
    xs: f64,
    ys: f64,
    zs: f64,
}

impl LatticeCell {
    #[inline]
    fn locate(x: f64, y: f64, z: f64, quality: Quality) -> Self {
        let x0 = lattice_floor(x);
        let y0 = lattice_floor(y);
        let z0 = lattice_floor(z);
        Self {
            x0,
            y0,
            z0,
            xs: quality.apply(x - f64::from(x0)),
            ys: quality.apply(y - f64::from(y0)),
            zs: quality.apply(z - f64::from(z0)),
        }
    }
}

/// Raw lattice hash shared by both kernels.
#[inline]
fn lattice_hash(ix: i32, iy: i32, iz: i32, seed: i32) -> i32 {
    NOISE_X
        .wrapping_mul(ix)
        .wrapping_add(NOISE_Y.wrapping_mul(iy))
        .wrapping_add(NOISE_Z.wrapping_mul(iz))
        .wrapping_add(NOISE_SEED.wrapping_mul(seed))
}
