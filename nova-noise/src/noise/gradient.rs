//! Gradient (Perlin-style) coherent noise.

// Noise code uses mathematical single-letter variables (x, y, z)
#![allow(clippy::many_single_char_names)]

use crate::math::linear_interp;

use super::{LatticeCell, NOISE_SHIFT, Quality, RANDOM_VECTORS, lattice_hash};

/// Scale applied to the gradient dot product so output stays roughly in `[-1, 1]`.
const GRADIENT_SCALE: f64 = 2.12;

/// Gradient noise contribution of one lattice corner.
///
/// `(fx, fy, fz)` is the sample point and `(ix, iy, iz)` the corner. The
/// result is zero when the sample sits exactly on the corner.
#[inline]
#[must_use]
pub fn gradient_noise_3d(fx: f64, fy: f64, fz: f64, ix: i32, iy: i32, iz: i32, seed: i32) -> f64 {
    let mut vector_index = lattice_hash(ix, iy, iz, seed);
    vector_index ^= vector_index >> NOISE_SHIFT;
    vector_index &= 0xff;

    let [xv_gradient, yv_gradient, zv_gradient] = RANDOM_VECTORS[vector_index as usize];

    let xv_point = fx - f64::from(ix);
    let yv_point = fy - f64::from(iy);
    let zv_point = fz - f64::from(iz);

    (xv_gradient * xv_point + yv_gradient * yv_point + zv_gradient * zv_point) * GRADIENT_SCALE
}

/// Gradient coherent noise at `(x, y, z)`.
///
/// Interpolates the eight corner contributions of the surrounding lattice
/// cell, along x first, then y, then z.
#[must_use]
pub fn gradient_coherent_noise_3d(x: f64, y: f64, z: f64, seed: i32, quality: Quality) -> f64 {
    let LatticeCell {
        x0,
        y0,
        z0,
        xs,
        ys,
        zs,
    } = LatticeCell::locate(x, y, z, quality);
    let (x1, y1, z1) = (x0.wrapping_add(1), y0.wrapping_add(1), z0.wrapping_add(1));

    let corner = |ix, iy, iz| gradient_noise_3d(x, y, z, ix, iy, iz, seed);

    let ix0 = linear_interp(corner(x0, y0, z0), corner(x1, y0, z0), xs);
    let ix1 = linear_interp(corner(x0, y1, z0), corner(x1, y1, z0), xs);
    let iy0 = linear_interp(ix0, ix1, ys);

    let ix0 = linear_interp(corner(x0, y0, z1), corner(x1, y0, z1), xs);
    let ix1 = linear_interp(corner(x0, y1, z1), corner(x1, y1, z1), xs);
    let iy1 = linear_interp(ix0, ix1, ys);

    linear_interp(iy0, iy1, zs)
}
