//! Value coherent noise.

// Noise code uses mathematical single-letter variables (x, y, z)
#![allow(clippy::many_single_char_names)]

use crate::math::linear_interp;

use super::{LatticeCell, Quality, lattice_hash};

/// Integer scramble of a lattice point, in `[0, 2^31)`.
#[inline]
fn int_value_noise_3d(x: i32, y: i32, z: i32, seed: i32) -> i32 {
    let mut n = lattice_hash(x, y, z, seed) & 0x7fff_ffff;
    n ^= n >> 13;
    n.wrapping_mul(
        n.wrapping_mul(n)
            .wrapping_mul(60493)
            .wrapping_add(19_990_303),
    )
    .wrapping_add(1_376_312_589)
        & 0x7fff_ffff
}

/// Pseudo-random value in `(-1, 1]` for an integer lattice point.
#[inline]
#[must_use]
pub fn value_noise_3d(x: i32, y: i32, z: i32, seed: i32) -> f64 {
    1.0 - f64::from(int_value_noise_3d(x, y, z, seed)) / 1_073_741_824.0
}

/// Value coherent noise at `(x, y, z)`, in `[-1, 1]`.
#[must_use]
pub fn value_coherent_noise_3d(x: f64, y: f64, z: f64, seed: i32, quality: Quality) -> f64 {
    let LatticeCell {
        x0,
        y0,
        z0,
        xs,
        ys,
        zs,
    } = LatticeCell::locate(x, y, z, quality);
    let (x1, y1, z1) = (x0.wrapping_add(1), y0.wrapping_add(1), z0.wrapping_add(1));

    let corner = |ix, iy, iz| value_noise_3d(ix, iy, iz, seed);

    let ix0 = linear_interp(corner(x0, y0, z0), corner(x1, y0, z0), xs);
    let ix1 = linear_interp(corner(x0, y1, z0), corner(x1, y1, z0), xs);
    let iy0 = linear_interp(ix0, ix1, ys);

    let ix0 = linear_interp(corner(x0, y0, z1), corner(x1, y0, z1), xs);
    let ix1 = linear_interp(corner(x0, y1, z1), corner(x1, y1, z1), xs);
    let iy1 = linear_interp(ix0, ix1, ys);

    linear_interp(iy0, iy1, zs)
}
