//! Interpolation and curve kernels shared by the noise kernels and modules.
//!
//! Everything here is pure arithmetic. The operation order is fixed so that
//! results stay bit-identical across platforms.

/// Lower and upper magnitude of the range that lattice coordinates are folded into.
pub const INT32_RANGE: f64 = 1_073_741_824.0;

/// Cubic interpolation between `n1` and `n2`, using `n0` and `n3` as the outer
/// neighbours that shape the tangent at each end.
#[inline]
#[must_use]
pub fn cubic_interp(n0: f64, n1: f64, n2: f64, n3: f64, a: f64) -> f64 {
    let p = (n3 - n2) - (n0 - n1);
    let q = (n0 - n1) - p;
    let r = n2 - n0;
    p * a * a * a + q * a * a + r * a + n1
}

/// Linear interpolation between `n0` and `n1`.
#[inline]
#[must_use]
pub fn linear_interp(n0: f64, n1: f64, a: f64) -> f64 {
    (1.0 - a) * n0 + a * n1
}

/// Third-order S-curve: `3a² - 2a³`.
#[inline]
#[must_use]
pub fn s_curve3(a: f64) -> f64 {
    a * a * (3.0 - 2.0 * a)
}

/// Fifth-order S-curve: `6a⁵ - 15a⁴ + 10a³`.
#[inline]
#[must_use]
pub fn s_curve5(a: f64) -> f64 {
    let a3 = a * a * a;
    let a4 = a3 * a;
    let a5 = a4 * a;
    (6.0 * a5) - (15.0 * a4) + (10.0 * a3)
}

/// Folds a coordinate into `[-2^30, 2^30]`.
///
/// Lattice indices are computed in 32-bit integers, so coordinates outside
/// this range are wrapped rather than allowed to saturate.
#[inline]
#[must_use]
pub fn clamp_to_32_bits(n: f64) -> f64 {
    if n >= INT32_RANGE {
        2.0 * (n % INT32_RANGE) - INT32_RANGE
    } else if n <= -INT32_RANGE {
        2.0 * (n % INT32_RANGE) + INT32_RANGE
    } else {
        n
    }
}

/// Lattice cell index for a coordinate.
///
/// Positive values truncate, everything else truncates after subtracting one.
/// This floors every non-integral value; at exact non-positive integers the
/// cell below is chosen, which the interpolation makes indistinguishable.
#[inline]
#[must_use]
pub fn lattice_floor(value: f64) -> i32 {
    if value > 0.0 {
        value as i32
    } else {
        (value - 1.0) as i32
    }
}
