//! Source modules: noise computed from the input point alone.

use crate::error::ModuleError;
use crate::graph::Sources;
use crate::math::lattice_floor;
use crate::noise::{Quality, gradient_coherent_noise_3d, value_noise_3d};
use crate::point::Point3D;

use super::ModuleImpl;

/// Largest octave count a fractal source accepts.
pub const MAX_OCTAVE_COUNT: usize = 30;

fn check_octave_count(octave_count: usize) -> Result<(), ModuleError> {
    if (1..=MAX_OCTAVE_COUNT).contains(&octave_count) {
        Ok(())
    } else {
        Err(ModuleError::invalid_parameter(format!(
            "octave count {octave_count} is outside [1, {MAX_OCTAVE_COUNT}]"
        )))
    }
}

/// Yields the lattice-clamped sample point of each octave.
///
/// The point is scaled by `frequency` for the first octave and by
/// `lacunarity` for each one after it.
fn octave_points(
    point: Point3D,
    frequency: f64,
    lacunarity: f64,
    octave_count: usize,
) -> impl Iterator<Item = (usize, Point3D)> {
    let mut point = point * frequency;
    (0..octave_count).map(move |octave| {
        let clamped = point.clamp_to_32_bits();
        point *= lacunarity;
        (octave, clamped)
    })
}

#[inline]
fn octave_signal(point: Point3D, seed: i32, quality: Quality) -> f64 {
    gradient_coherent_noise_3d(point.x, point.y, point.z, seed, quality)
}

/// Fractal sum of gradient noise octaves.
#[derive(Debug, Clone, PartialEq)]
pub struct Perlin {
    frequency: f64,
    lacunarity: f64,
    persistence: f64,
    octave_count: usize,
    seed: i32,
    quality: Quality,
}

impl Perlin {
    /// Default frequency of the first octave.
    pub const DEFAULT_FREQUENCY: f64 = 1.0;
    /// Default frequency multiplier between octaves.
    pub const DEFAULT_LACUNARITY: f64 = 2.0;
    /// Default amplitude multiplier between octaves.
    pub const DEFAULT_PERSISTENCE: f64 = 0.5;
    /// Default number of octaves.
    pub const DEFAULT_OCTAVE_COUNT: usize = 6;
    /// Default seed.
    pub const DEFAULT_SEED: i32 = 0;

    /// Creates a Perlin source with default parameters.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            frequency: Self::DEFAULT_FREQUENCY,
            lacunarity: Self::DEFAULT_LACUNARITY,
            persistence: Self::DEFAULT_PERSISTENCE,
            octave_count: Self::DEFAULT_OCTAVE_COUNT,
            seed: Self::DEFAULT_SEED,
            quality: Quality::Standard,
        }
    }

    /// Creates a distortion source for [`Turbulence`](super::Turbulence).
    pub(crate) const fn distortion(seed: i32, octave_count: usize) -> Self {
        let mut perlin = Self::new();
        perlin.seed = seed;
        perlin.octave_count = octave_count;
        perlin
    }

    /// Frequency of the first octave.
    #[must_use]
    pub const fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Sets the frequency of the first octave.
    pub const fn set_frequency(&mut self, frequency: f64) {
        self.frequency = frequency;
    }

    /// Frequency multiplier between octaves.
    #[must_use]
    pub const fn lacunarity(&self) -> f64 {
        self.lacunarity
    }

    /// Sets the frequency multiplier between octaves.
    pub const fn set_lacunarity(&mut self, lacunarity: f64) {
        self.lacunarity = lacunarity;
    }

    /// Amplitude multiplier between octaves.
    #[must_use]
    pub const fn persistence(&self) -> f64 {
        self.persistence
    }

    /// Sets the amplitude multiplier between octaves.
    pub const fn set_persistence(&mut self, persistence: f64) {
        self.persistence = persistence;
    }

    /// Number of octaves.
    #[must_use]
    pub const fn octave_count(&self) -> usize {
        self.octave_count
    }

    /// Sets the number of octaves. Must lie in `[1, MAX_OCTAVE_COUNT]`; the
    /// previous value is kept otherwise.
    pub fn set_octave_count(&mut self, octave_count: usize) -> Result<(), ModuleError> {
        check_octave_count(octave_count)?;
        self.octave_count = octave_count;
        Ok(())
    }

    /// Seed of the first octave; octave `i` uses `seed + i`.
    #[must_use]
    pub const fn seed(&self) -> i32 {
        self.seed
    }

    /// Sets the seed.
    pub const fn set_seed(&mut self, seed: i32) {
        self.seed = seed;
    }

    /// Interpolation quality.
    #[must_use]
    pub const fn quality(&self) -> Quality {
        self.quality
    }

    /// Sets the interpolation quality.
    pub const fn set_quality(&mut self, quality: Quality) {
        self.quality = quality;
    }

    /// Computes the noise value at `point`.
    #[must_use]
    pub fn sample(&self, point: Point3D) -> f64 {
        let mut value = 0.0;
        let mut persistence = 1.0;
        for (octave, point) in octave_points(point, self.frequency, self.lacunarity, self.octave_count)
        {
            let seed = self.seed.wrapping_add(octave as i32);
            value += octave_signal(point, seed, self.quality) * persistence;
            persistence *= self.persistence;
        }
        value
    }
}

impl Default for Perlin {
    fn default() -> Self {
        Self::new()
    }
}

/// Fractal noise where every octave is folded by its absolute value, giving
/// puffy, cloud-like shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct Billow {
    frequency: f64,
    lacunarity: f64,
    persistence: f64,
    octave_count: usize,
    seed: i32,
    quality: Quality,
}

impl Billow {
    /// Default frequency of the first octave.
    pub const DEFAULT_FREQUENCY: f64 = 1.0;
    /// Default frequency multiplier between octaves.
    pub const DEFAULT_LACUNARITY: f64 = 2.0;
    /// Default amplitude multiplier between octaves.
    pub const DEFAULT_PERSISTENCE: f64 = 0.5;
    /// Default number of octaves.
    pub const DEFAULT_OCTAVE_COUNT: usize = 6;
    /// Default seed.
    pub const DEFAULT_SEED: i32 = 0;

    /// Creates a Billow source with default parameters.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            frequency: Self::DEFAULT_FREQUENCY,
            lacunarity: Self::DEFAULT_LACUNARITY,
            persistence: Self::DEFAULT_PERSISTENCE,
            octave_count: Self::DEFAULT_OCTAVE_COUNT,
            seed: Self::DEFAULT_SEED,
            quality: Quality::Standard,
        }
    }

    /// Frequency of the first octave.
    #[must_use]
    pub const fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Sets the frequency of the first octave.
    pub const fn set_frequency(&mut self, frequency: f64) {
        self.frequency = frequency;
    }

    /// Frequency multiplier between octaves.
    #[must_use]
    pub const fn lacunarity(&self) -> f64 {
        self.lacunarity
    }

    /// Sets the frequency multiplier between octaves.
    pub const fn set_lacunarity(&mut self, lacunarity: f64) {
        self.lacunarity = lacunarity;
    }

    /// Amplitude multiplier between octaves.
    #[must_use]
    pub const fn persistence(&self) -> f64 {
        self.persistence
    }

    /// Sets the amplitude multiplier between octaves.
    pub const fn set_persistence(&mut self, persistence: f64) {
        self.persistence = persistence;
    }

    /// Number of octaves.
    #[must_use]
    pub const fn octave_count(&self) -> usize {
        self.octave_count
    }

    /// Sets the number of octaves, keeping the previous value on error.
    pub fn set_octave_count(&mut self, octave_count: usize) -> Result<(), ModuleError> {
        check_octave_count(octave_count)?;
        self.octave_count = octave_count;
        Ok(())
    }

    /// Seed of the first octave.
    #[must_use]
    pub const fn seed(&self) -> i32 {
        self.seed
    }

    /// Sets the seed.
    pub const fn set_seed(&mut self, seed: i32) {
        self.seed = seed;
    }

    /// Interpolation quality.
    #[must_use]
    pub const fn quality(&self) -> Quality {
        self.quality
    }

    /// Sets the interpolation quality.
    pub const fn set_quality(&mut self, quality: Quality) {
        self.quality = quality;
    }

    /// Computes the noise value at `point`.
    #[must_use]
    pub fn sample(&self, point: Point3D) -> f64 {
        let mut value = 0.0;
        let mut persistence = 1.0;
        for (octave, point) in octave_points(point, self.frequency, self.lacunarity, self.octave_count)
        {
            let seed = self.seed.wrapping_add(octave as i32);
            let signal = 2.0 * octave_signal(point, seed, self.quality).abs() - 1.0;
            value += signal * persistence;
            persistence *= self.persistence;
        }
        value + 0.5
    }
}

impl Default for Billow {
    fn default() -> Self {
        Self::new()
    }
}

/// Ridged multifractal noise.
///
/// Each octave is inverted and squared so that zero crossings become sharp
/// ridges, and is weighted by the previous octave so detail gathers along
/// the ridges.
#[derive(Debug, Clone, PartialEq)]
pub struct RidgedMulti {
    frequency: f64,
    lacunarity: f64,
    octave_count: usize,
    seed: i32,
    quality: Quality,
    spectral_weights: [f64; MAX_OCTAVE_COUNT],
}

impl RidgedMulti {
    /// Default frequency of the first octave.
    pub const DEFAULT_FREQUENCY: f64 = 1.0;
    /// Default frequency multiplier between octaves.
    pub const DEFAULT_LACUNARITY: f64 = 2.0;
    /// Default number of octaves.
    pub const DEFAULT_OCTAVE_COUNT: usize = 6;
    /// Default seed.
    pub const DEFAULT_SEED: i32 = 0;

    const OFFSET: f64 = 1.0;
    const GAIN: f64 = 2.0;

    /// Creates a ridged multifractal source with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frequency: Self::DEFAULT_FREQUENCY,
            lacunarity: Self::DEFAULT_LACUNARITY,
            octave_count: Self::DEFAULT_OCTAVE_COUNT,
            seed: Self::DEFAULT_SEED,
            quality: Quality::Standard,
            spectral_weights: Self::spectral_weights(Self::DEFAULT_LACUNARITY),
        }
    }

    /// `lacunarity^-i` for every octave `i`.
    fn spectral_weights(lacunarity: f64) -> [f64; MAX_OCTAVE_COUNT] {
        let mut weights = [0.0; MAX_OCTAVE_COUNT];
        let mut frequency: f64 = 1.0;
        for weight in &mut weights {
            *weight = frequency.recip();
            frequency *= lacunarity;
        }
        weights
    }

    /// Frequency of the first octave.
    #[must_use]
    pub const fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Sets the frequency of the first octave.
    pub const fn set_frequency(&mut self, frequency: f64) {
        self.frequency = frequency;
    }

    /// Frequency multiplier between octaves.
    #[must_use]
    pub const fn lacunarity(&self) -> f64 {
        self.lacunarity
    }

    /// Sets the frequency multiplier between octaves and recomputes the
    /// per-octave spectral weights.
    pub fn set_lacunarity(&mut self, lacunarity: f64) {
        self.lacunarity = lacunarity;
        self.spectral_weights = Self::spectral_weights(lacunarity);
        tracing::trace!(lacunarity, "recomputed ridged spectral weights");
    }

    /// Number of octaves.
    #[must_use]
    pub const fn octave_count(&self) -> usize {
        self.octave_count
    }

    /// Sets the number of octaves, keeping the previous value on error.
    pub fn set_octave_count(&mut self, octave_count: usize) -> Result<(), ModuleError> {
        check_octave_count(octave_count)?;
        self.octave_count = octave_count;
        Ok(())
    }

    /// Seed of the first octave.
    #[must_use]
    pub const fn seed(&self) -> i32 {
        self.seed
    }

    /// Sets the seed.
    pub const fn set_seed(&mut self, seed: i32) {
        self.seed = seed;
    }

    /// Interpolation quality.
    #[must_use]
    pub const fn quality(&self) -> Quality {
        self.quality
    }

    /// Sets the interpolation quality.
    pub const fn set_quality(&mut self, quality: Quality) {
        self.quality = quality;
    }

    /// Computes the noise value at `point`.
    #[must_use]
    pub fn sample(&self, point: Point3D) -> f64 {
        let mut value = 0.0;
        let mut weight = 1.0;
        for (octave, point) in octave_points(point, self.frequency, self.lacunarity, self.octave_count)
        {
            let seed = self.seed.wrapping_add(octave as i32) & 0x7fff_ffff;
            let mut signal = Self::OFFSET - octave_signal(point, seed, self.quality).abs();
            signal *= signal;
            signal *= weight;
            weight = (signal * Self::GAIN).clamp(0.0, 1.0);
            value += signal * self.spectral_weights[octave];
        }
        value * 1.25 - 1.0
    }
}

impl Default for RidgedMulti {
    fn default() -> Self {
        Self::new()
    }
}

/// Cellular noise.
///
/// Space is divided around randomly displaced seed points, one per unit
/// cell. Every point takes a constant value from its nearest seed point,
/// optionally plus the distance to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Voronoi {
    displacement: f64,
    enable_distance: bool,
    frequency: f64,
    seed: i32,
}

impl Voronoi {
    /// Default scale of the per-cell value.
    pub const DEFAULT_DISPLACEMENT: f64 = 1.0;
    /// Default frequency of the seed points.
    pub const DEFAULT_FREQUENCY: f64 = 1.0;
    /// Default seed.
    pub const DEFAULT_SEED: i32 = 0;

    /// Creates a Voronoi source with default parameters.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            displacement: Self::DEFAULT_DISPLACEMENT,
            enable_distance: false,
            frequency: Self::DEFAULT_FREQUENCY,
            seed: Self::DEFAULT_SEED,
        }
    }

    /// Scale of the per-cell value.
    #[must_use]
    pub const fn displacement(&self) -> f64 {
        self.displacement
    }

    /// Sets the scale of the per-cell value.
    pub const fn set_displacement(&mut self, displacement: f64) {
        self.displacement = displacement;
    }

    /// Whether the distance to the nearest seed point is added to the output.
    #[must_use]
    pub const fn distance_enabled(&self) -> bool {
        self.enable_distance
    }

    /// Enables or disables adding the distance to the nearest seed point.
    pub const fn enable_distance(&mut self, enable: bool) {
        self.enable_distance = enable;
    }

    /// Frequency of the seed points.
    #[must_use]
    pub const fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Sets the frequency of the seed points.
    pub const fn set_frequency(&mut self, frequency: f64) {
        self.frequency = frequency;
    }

    /// Seed.
    #[must_use]
    pub const fn seed(&self) -> i32 {
        self.seed
    }

    /// Sets the seed.
    pub const fn set_seed(&mut self, seed: i32) {
        self.seed = seed;
    }

    /// Computes the noise value at `point`.
    #[must_use]
    pub fn sample(&self, point: Point3D) -> f64 {
        let point = point * self.frequency;
        let x_int = lattice_floor(point.x);
        let y_int = lattice_floor(point.y);
        let z_int = lattice_floor(point.z);

        let mut min_dist = f64::MAX;
        let mut candidate = Point3D::ZERO;

        for dz in -2..=2 {
            let z_cur = z_int.wrapping_add(dz);
            for dy in -2..=2 {
                let y_cur = y_int.wrapping_add(dy);
                for dx in -2..=2 {
                    let x_cur = x_int.wrapping_add(dx);
                    let feature = Point3D::new(
                        f64::from(x_cur) + value_noise_3d(x_cur, y_cur, z_cur, self.seed),
                        f64::from(y_cur)
                            + value_noise_3d(x_cur, y_cur, z_cur, self.seed.wrapping_add(1)),
                        f64::from(z_cur)
                            + value_noise_3d(x_cur, y_cur, z_cur, self.seed.wrapping_add(2)),
                    );
                    let dist = (feature - point).magnitude_squared();
                    if dist < min_dist {
                        min_dist = dist;
                        candidate = feature;
                    }
                }
            }
        }

        let value = if self.enable_distance {
            min_dist.sqrt()
        } else {
            0.0
        };
        value
            + self.displacement
                * value_noise_3d(
                    candidate.x.floor() as i32,
                    candidate.y.floor() as i32,
                    candidate.z.floor() as i32,
                    self.seed,
                )
    }
}

impl Default for Voronoi {
    fn default() -> Self {
        Self::new()
    }
}

/// Unit cubes alternating between `1` and `-1`. Mostly useful for debugging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Checkerboard;

impl Checkerboard {
    /// Computes the pattern value at `point`.
    #[must_use]
    pub fn sample(&self, point: Point3D) -> f64 {
        let point = point.clamp_to_32_bits();
        let ix = point.x.floor() as i32;
        let iy = point.y.floor() as i32;
        let iz = point.z.floor() as i32;
        if ((ix & 1) ^ (iy & 1) ^ (iz & 1)) == 0 {
            1.0
        } else {
            -1.0
        }
    }
}

/// Maps a radial distance onto concentric bands: `1` on every unit shell,
/// `-1` halfway between shells.
#[inline]
fn concentric_bands(distance: f64) -> f64 {
    let smaller = distance - distance.floor();
    let larger = 1.0 - smaller;
    1.0 - smaller.min(larger) * 4.0
}

/// Concentric cylinders centred on the y axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Cylinders {
    frequency: f64,
}

impl Cylinders {
    /// Default number of cylinders per unit radius.
    pub const DEFAULT_FREQUENCY: f64 = 1.0;

    /// Creates a cylinders source with default parameters.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            frequency: Self::DEFAULT_FREQUENCY,
        }
    }

    /// Number of cylinders per unit radius.
    #[must_use]
    pub const fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Sets the number of cylinders per unit radius.
    pub const fn set_frequency(&mut self, frequency: f64) {
        self.frequency = frequency;
    }

    /// Computes the pattern value at `point`; `y` is ignored.
    #[must_use]
    pub fn sample(&self, point: Point3D) -> f64 {
        let x = point.x * self.frequency;
        let z = point.z * self.frequency;
        concentric_bands((x * x + z * z).sqrt())
    }
}

impl Default for Cylinders {
    fn default() -> Self {
        Self::new()
    }
}

/// Concentric spheres centred on the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Spheres {
    frequency: f64,
}

impl Spheres {
    /// Default number of spheres per unit radius.
    pub const DEFAULT_FREQUENCY: f64 = 1.0;

    /// Creates a spheres source with default parameters.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            frequency: Self::DEFAULT_FREQUENCY,
        }
    }

    /// Number of spheres per unit radius.
    #[must_use]
    pub const fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Sets the number of spheres per unit radius.
    pub const fn set_frequency(&mut self, frequency: f64) {
        self.frequency = frequency;
    }

    /// Computes the pattern value at `point`.
    #[must_use]
    pub fn sample(&self, point: Point3D) -> f64 {
        concentric_bands((point * self.frequency).magnitude())
    }
}

impl Default for Spheres {
    fn default() -> Self {
        Self::new()
    }
}

/// A constant value, whatever the input point.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Const {
    value: f64,
}

impl Const {
    /// Creates a constant source.
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Self { value }
    }

    /// The constant value.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Sets the constant value.
    pub const fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    /// Returns the constant value.
    #[must_use]
    pub const fn sample(&self, _point: Point3D) -> f64 {
        self.value
    }
}

macro_rules! impl_source_module {
    ($($kind:ident),* $(,)?) => {
        $(
            impl ModuleImpl for $kind {
                fn evaluate(&self, _sources: &Sources<'_>, point: Point3D) -> Result<f64, ModuleError> {
                    Ok(self.sample(point))
                }
            }
        )*
    };
}

impl_source_module!(Perlin, Billow, RidgedMulti, Voronoi, Checkerboard, Cylinders, Spheres, Const);

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> impl Iterator<Item = Point3D> {
        (0..8).flat_map(|i| {
            (0..8).flat_map(move |j| {
                (0..4).map(move |k| {
                    Point3D::new(
                        f64::from(i) * 0.37 - 1.3,
                        f64::from(j) * 0.53 - 2.1,
                        f64::from(k) * 0.71 + 0.05,
                    )
                })
            })
        })
    }

    #[test]
    fn test_octave_count_bounds() {
        let mut perlin = Perlin::new();
        assert!(matches!(
            perlin.set_octave_count(0),
            Err(ModuleError::InvalidParameter(_))
        ));
        assert!(perlin.set_octave_count(MAX_OCTAVE_COUNT + 1).is_err());
        assert_eq!(perlin.octave_count(), Perlin::DEFAULT_OCTAVE_COUNT);

        assert!(perlin.set_octave_count(MAX_OCTAVE_COUNT).is_ok());
        assert_eq!(perlin.octave_count(), MAX_OCTAVE_COUNT);

        let mut ridged = RidgedMulti::new();
        assert!(ridged.set_octave_count(31).is_err());
        assert_eq!(ridged.octave_count(), RidgedMulti::DEFAULT_OCTAVE_COUNT);

        let mut billow = Billow::new();
        assert!(billow.set_octave_count(1).is_ok());
        assert_eq!(billow.octave_count(), 1);
    }

    #[test]
    fn test_perlin_single_octave_is_kernel() {
        let mut perlin = Perlin::new();
        perlin.set_octave_count(1).expect("valid octave count");
        perlin.set_seed(9);
        perlin.set_frequency(0.5);

        let p = Point3D::new(1.7, -0.4, 2.2);
        let expected = gradient_coherent_noise_3d(0.85, -0.2, 1.1, 9, Quality::Standard);
        assert_eq!(perlin.sample(p).to_bits(), expected.to_bits());
    }

    #[test]
    fn test_billow_single_octave() {
        let mut billow = Billow::new();
        billow.set_octave_count(1).expect("valid octave count");

        let p = Point3D::new(0.3, 0.7, -1.9);
        let signal = gradient_coherent_noise_3d(p.x, p.y, p.z, 0, Quality::Standard);
        let expected = 2.0 * signal.abs() - 1.0 + 0.5;
        assert!((billow.sample(p) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_ridged_single_octave() {
        let mut ridged = RidgedMulti::new();
        ridged.set_octave_count(1).expect("valid octave count");

        let p = Point3D::new(0.3, 0.7, -1.9);
        let signal = gradient_coherent_noise_3d(p.x, p.y, p.z, 0, Quality::Standard);
        let ridge = (1.0 - signal.abs()) * (1.0 - signal.abs());
        assert!((ridged.sample(p) - (ridge * 1.25 - 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_ridged_spectral_weights_follow_lacunarity() {
        let mut ridged = RidgedMulti::new();
        ridged.set_lacunarity(3.0);
        assert!((ridged.spectral_weights[0] - 1.0).abs() < 1e-12);
        assert!((ridged.spectral_weights[2] - 1.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_fractal_sources_deterministic() {
        let perlin = Perlin::new();
        let billow = Billow::new();
        let ridged = RidgedMulti::new();
        for p in grid() {
            assert_eq!(perlin.sample(p).to_bits(), perlin.clone().sample(p).to_bits());
            assert_eq!(billow.sample(p).to_bits(), billow.clone().sample(p).to_bits());
            assert_eq!(ridged.sample(p).to_bits(), ridged.clone().sample(p).to_bits());
        }
    }

    #[test]
    fn test_extreme_coordinates_are_finite() {
        let perlin = Perlin::new();
        let p = Point3D::new(3.0e12, -7.5e15, 1.0e10);
        assert!(perlin.sample(p).is_finite());
    }

    #[test]
    fn test_checkerboard() {
        let board = Checkerboard;
        assert_eq!(board.sample(Point3D::new(0.5, 0.5, 0.5)), 1.0);
        assert_eq!(board.sample(Point3D::new(1.5, 0.5, 0.5)), -1.0);
        assert_eq!(board.sample(Point3D::new(1.5, 1.5, 0.5)), 1.0);
        assert_eq!(board.sample(Point3D::new(-0.5, 0.5, 0.5)), -1.0);
        assert_eq!(board.sample(Point3D::new(-0.5, -0.5, -0.5)), -1.0);
    }

    #[test]
    fn test_cylinders_and_spheres() {
        let cylinders = Cylinders::new();
        assert!((cylinders.sample(Point3D::new(1.0, 5.0, 0.0)) - 1.0).abs() < 1e-12);
        assert!((cylinders.sample(Point3D::new(0.0, -3.0, 1.5)) + 1.0).abs() < 1e-12);

        let spheres = Spheres::new();
        assert!((spheres.sample(Point3D::new(0.0, 2.0, 0.0)) - 1.0).abs() < 1e-12);
        assert!((spheres.sample(Point3D::new(0.0, 0.0, 0.5)) + 1.0).abs() < 1e-12);

        for p in grid() {
            assert!((-1.0..=1.0).contains(&cylinders.sample(p)));
            assert!((-1.0..=1.0).contains(&spheres.sample(p)));
        }
    }

    #[test]
    fn test_frequency_scales_bands() {
        let mut spheres = Spheres::new();
        spheres.set_frequency(2.0);
        assert!((spheres.sample(Point3D::new(0.5, 0.0, 0.0)) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_voronoi_range_and_cells() {
        let voronoi = Voronoi::new();
        for p in grid() {
            let v = voronoi.sample(p);
            assert!((-1.0..=1.0).contains(&v), "Value out of range: {v}");
        }

        // Nearby points usually share a cell and therefore a value
        let a = voronoi.sample(Point3D::new(0.25, 0.25, 0.25));
        let b = voronoi.sample(Point3D::new(0.250_001, 0.25, 0.25));
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_voronoi_distance_adds_non_negative_term() {
        let mut voronoi = Voronoi::new();
        let p = Point3D::new(0.8, -1.3, 2.4);
        let base = voronoi.sample(p);
        voronoi.enable_distance(true);
        assert!(voronoi.sample(p) >= base);
    }

    #[test]
    fn test_const() {
        let c = Const::new(-4.5);
        assert_eq!(c.sample(Point3D::new(1.0, 2.0, 3.0)), -4.5);
        assert_eq!(Const::default().value(), 0.0);
    }
}
