//! Single-source modules that reshape the source's output or move the point
//! it is sampled at.

use crate::error::ModuleError;
use crate::graph::Sources;
use crate::point::Point3D;

use super::ModuleImpl;
use super::source::Perlin;

/// Absolute value of the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Abs;

impl ModuleImpl for Abs {
    fn evaluate(&self, sources: &Sources<'_>, point: Point3D) -> Result<f64, ModuleError> {
        Ok(sources.evaluate(0, point)?.abs())
    }
}

/// Negated source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Invert;

impl ModuleImpl for Invert {
    fn evaluate(&self, sources: &Sources<'_>, point: Point3D) -> Result<f64, ModuleError> {
        Ok(-sources.evaluate(0, point)?)
    }
}

/// Clamps the source into `[lower_bound, upper_bound]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Clamp {
    lower_bound: f64,
    upper_bound: f64,
}

impl Clamp {
    /// Default lower bound.
    pub const DEFAULT_LOWER_BOUND: f64 = -1.0;
    /// Default upper bound.
    pub const DEFAULT_UPPER_BOUND: f64 = 1.0;

    /// Creates a clamp with the default `[-1, 1]` bounds.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lower_bound: Self::DEFAULT_LOWER_BOUND,
            upper_bound: Self::DEFAULT_UPPER_BOUND,
        }
    }

    /// Lower bound.
    #[must_use]
    pub const fn lower_bound(&self) -> f64 {
        self.lower_bound
    }

    /// Upper bound.
    #[must_use]
    pub const fn upper_bound(&self) -> f64 {
        self.upper_bound
    }

    /// Sets both bounds. Fails unless `lower < upper`, leaving the bounds
    /// unchanged.
    pub fn set_bounds(&mut self, lower: f64, upper: f64) -> Result<(), ModuleError> {
        // NaN fails the comparison
        if lower < upper {
            self.lower_bound = lower;
            self.upper_bound = upper;
            Ok(())
        } else {
            Err(ModuleError::invalid_parameter(format!(
                "clamp lower bound {lower} must be below upper bound {upper}"
            )))
        }
    }

    /// Sets the lower bound, keeping the upper one.
    pub fn set_lower_bound(&mut self, lower: f64) -> Result<(), ModuleError> {
        self.set_bounds(lower, self.upper_bound)
    }

    /// Sets the upper bound, keeping the lower one.
    pub fn set_upper_bound(&mut self, upper: f64) -> Result<(), ModuleError> {
        self.set_bounds(self.lower_bound, upper)
    }
}

impl Default for Clamp {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleImpl for Clamp {
    fn evaluate(&self, sources: &Sources<'_>, point: Point3D) -> Result<f64, ModuleError> {
        Ok(sources
            .evaluate(0, point)?
            .clamp(self.lower_bound, self.upper_bound))
    }
}

/// Remaps the source through a power curve.
///
/// The source is assumed to lie in `[-1, 1]`; it is moved to `[0, 1]`, raised
/// to `exponent`, and moved back.
#[derive(Debug, Clone, PartialEq)]
pub struct Exponent {
    exponent: f64,
}

impl Exponent {
    /// Default exponent, which leaves values in `[-1, 1]` unchanged.
    pub const DEFAULT_EXPONENT: f64 = 1.0;

    /// Creates an exponent modifier.
    #[must_use]
    pub const fn new(exponent: f64) -> Self {
        Self { exponent }
    }

    /// The exponent.
    #[must_use]
    pub const fn exponent(&self) -> f64 {
        self.exponent
    }

    /// Sets the exponent.
    pub const fn set_exponent(&mut self, exponent: f64) {
        self.exponent = exponent;
    }
}

impl Default for Exponent {
    fn default() -> Self {
        Self::new(Self::DEFAULT_EXPONENT)
    }
}

impl ModuleImpl for Exponent {
    fn evaluate(&self, sources: &Sources<'_>, point: Point3D) -> Result<f64, ModuleError> {
        let value = sources.evaluate(0, point)?;
        Ok(((value + 1.0) / 2.0).abs().powf(self.exponent) * 2.0 - 1.0)
    }
}

/// `source * scale + bias`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleBias {
    scale: f64,
    bias: f64,
}

impl ScaleBias {
    /// Default scale.
    pub const DEFAULT_SCALE: f64 = 1.0;
    /// Default bias.
    pub const DEFAULT_BIAS: f64 = 0.0;

    /// Creates an identity scale/bias.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            scale: Self::DEFAULT_SCALE,
            bias: Self::DEFAULT_BIAS,
        }
    }

    /// Multiplier applied to the source.
    #[must_use]
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    /// Sets the multiplier applied to the source.
    pub const fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    /// Offset added after scaling.
    #[must_use]
    pub const fn bias(&self) -> f64 {
        self.bias
    }

    /// Sets the offset added after scaling.
    pub const fn set_bias(&mut self, bias: f64) {
        self.bias = bias;
    }
}

impl Default for ScaleBias {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleImpl for ScaleBias {
    fn evaluate(&self, sources: &Sources<'_>, point: Point3D) -> Result<f64, ModuleError> {
        Ok(sources.evaluate(0, point)? * self.scale + self.bias)
    }
}

/// Samples the source at a translated point.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TranslatePoint {
    translation: Point3D,
}

impl TranslatePoint {
    /// Creates a translation by `(x, y, z)`.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            translation: Point3D::new(x, y, z),
        }
    }

    /// Offset added to every input point.
    #[must_use]
    pub const fn translation(&self) -> Point3D {
        self.translation
    }

    /// Sets the offset on every axis.
    pub const fn set_translation(&mut self, x: f64, y: f64, z: f64) {
        self.translation = Point3D::new(x, y, z);
    }

    /// Sets the x offset.
    pub const fn set_x_translation(&mut self, x: f64) {
        self.translation.x = x;
    }

    /// Sets the y offset.
    pub const fn set_y_translation(&mut self, y: f64) {
        self.translation.y = y;
    }

    /// Sets the z offset.
    pub const fn set_z_translation(&mut self, z: f64) {
        self.translation.z = z;
    }
}

impl ModuleImpl for TranslatePoint {
    fn evaluate(&self, sources: &Sources<'_>, point: Point3D) -> Result<f64, ModuleError> {
        sources.evaluate(0, point + self.translation)
    }
}

/// Samples the source at a point rotated around the origin.
///
/// Angles are in degrees. The rotation matrix is rebuilt whenever an angle
/// changes.
#[derive(Debug, Clone, PartialEq)]
pub struct RotatePoint {
    x_angle: f64,
    y_angle: f64,
    z_angle: f64,
    matrix: [[f64; 3]; 3],
}

impl RotatePoint {
    /// Creates a rotation from three angles in degrees.
    #[must_use]
    pub fn new(x_angle: f64, y_angle: f64, z_angle: f64) -> Self {
        Self {
            x_angle,
            y_angle,
            z_angle,
            matrix: Self::rotation_matrix(x_angle, y_angle, z_angle),
        }
    }

    fn rotation_matrix(x_angle: f64, y_angle: f64, z_angle: f64) -> [[f64; 3]; 3] {
        let (x_sin, x_cos) = x_angle.to_radians().sin_cos();
        let (y_sin, y_cos) = y_angle.to_radians().sin_cos();
        let (z_sin, z_cos) = z_angle.to_radians().sin_cos();
        [
            [
                y_sin * x_sin * z_sin + y_cos * z_cos,
                x_cos * z_sin,
                y_sin * z_cos - y_cos * x_sin * z_sin,
            ],
            [
                y_sin * x_sin * z_cos - y_cos * z_sin,
                x_cos * z_cos,
                -y_cos * x_sin * z_cos - y_sin * z_sin,
            ],
            [-y_sin * x_cos, x_sin, y_cos * x_cos],
        ]
    }

    fn rebuild(&mut self) {
        self.matrix = Self::rotation_matrix(self.x_angle, self.y_angle, self.z_angle);
        tracing::trace!(
            x = self.x_angle,
            y = self.y_angle,
            z = self.z_angle,
            "rebuilt rotation matrix"
        );
    }

    /// Rotation around the x axis, in degrees.
    #[must_use]
    pub const fn x_angle(&self) -> f64 {
        self.x_angle
    }

    /// Rotation around the y axis, in degrees.
    #[must_use]
    pub const fn y_angle(&self) -> f64 {
        self.y_angle
    }

    /// Rotation around the z axis, in degrees.
    #[must_use]
    pub const fn z_angle(&self) -> f64 {
        self.z_angle
    }

    /// Sets all three angles, in degrees.
    pub fn set_angles(&mut self, x_angle: f64, y_angle: f64, z_angle: f64) {
        self.x_angle = x_angle;
        self.y_angle = y_angle;
        self.z_angle = z_angle;
        self.rebuild();
    }

    /// Sets the rotation around the x axis, in degrees.
    pub fn set_x_angle(&mut self, x_angle: f64) {
        self.x_angle = x_angle;
        self.rebuild();
    }

    /// Sets the rotation around the y axis, in degrees.
    pub fn set_y_angle(&mut self, y_angle: f64) {
        self.y_angle = y_angle;
        self.rebuild();
    }

    /// Sets the rotation around the z axis, in degrees.
    pub fn set_z_angle(&mut self, z_angle: f64) {
        self.z_angle = z_angle;
        self.rebuild();
    }

    fn rotate(&self, point: Point3D) -> Point3D {
        let [r0, r1, r2] = &self.matrix;
        Point3D::new(
            r0[0] * point.x + r0[1] * point.y + r0[2] * point.z,
            r1[0] * point.x + r1[1] * point.y + r1[2] * point.z,
            r2[0] * point.x + r2[1] * point.y + r2[2] * point.z,
        )
    }
}

impl Default for RotatePoint {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

impl ModuleImpl for RotatePoint {
    fn evaluate(&self, sources: &Sources<'_>, point: Point3D) -> Result<f64, ModuleError> {
        sources.evaluate(0, self.rotate(point))
    }
}

/// Per-axis offsets that decorrelate the three distortion sources.
const DISTORT_OFFSETS: [Point3D; 3] = [
    Point3D::new(12414.0 / 65536.0, 65124.0 / 65536.0, 931_337.0 / 65536.0),
    Point3D::new(26519.0 / 65536.0, 18128.0 / 65536.0, 60493.0 / 65536.0),
    Point3D::new(53820.0 / 65536.0, 11213.0 / 65536.0, 44845.0 / 65536.0),
];

/// Samples the source at a point jittered by three internal Perlin sources,
/// one per axis.
///
/// The distortion sources are owned by the module and are not graph nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Turbulence {
    power: f64,
    distort: [Perlin; 3],
}

impl Turbulence {
    /// Default frequency of the distortion sources.
    pub const DEFAULT_FREQUENCY: f64 = Perlin::DEFAULT_FREQUENCY;
    /// Default distortion scale.
    pub const DEFAULT_POWER: f64 = 1.0;
    /// Default octave count of the distortion sources.
    pub const DEFAULT_ROUGHNESS: usize = 3;
    /// Default seed of the first distortion source.
    pub const DEFAULT_SEED: i32 = Perlin::DEFAULT_SEED;

    /// Creates a turbulence modifier with default parameters.
    #[must_use]
    pub fn new() -> Self {
        let seed = Self::DEFAULT_SEED;
        Self {
            power: Self::DEFAULT_POWER,
            distort: [
                Perlin::distortion(seed, Self::DEFAULT_ROUGHNESS),
                Perlin::distortion(seed.wrapping_add(1), Self::DEFAULT_ROUGHNESS),
                Perlin::distortion(seed.wrapping_add(2), Self::DEFAULT_ROUGHNESS),
            ],
        }
    }

    /// Scale of the coordinate distortion.
    #[must_use]
    pub const fn power(&self) -> f64 {
        self.power
    }

    /// Sets the scale of the coordinate distortion.
    pub const fn set_power(&mut self, power: f64) {
        self.power = power;
    }

    /// Frequency of the distortion sources.
    #[must_use]
    pub const fn frequency(&self) -> f64 {
        self.distort[0].frequency()
    }

    /// Sets the frequency of the distortion sources.
    pub fn set_frequency(&mut self, frequency: f64) {
        for perlin in &mut self.distort {
            perlin.set_frequency(frequency);
        }
    }

    /// Seed of the x distortion source; y and z use the next two seeds.
    #[must_use]
    pub const fn seed(&self) -> i32 {
        self.distort[0].seed()
    }

    /// Sets the seed of the distortion sources.
    pub fn set_seed(&mut self, seed: i32) {
        for (offset, perlin) in (0_i32..).zip(&mut self.distort) {
            perlin.set_seed(seed.wrapping_add(offset));
        }
    }

    /// Octave count of the distortion sources.
    #[must_use]
    pub const fn roughness(&self) -> usize {
        self.distort[0].octave_count()
    }

    /// Sets the octave count of the distortion sources. Must lie in
    /// `[1, MAX_OCTAVE_COUNT]`.
    pub fn set_roughness(&mut self, roughness: usize) -> Result<(), ModuleError> {
        // Validate on a copy so a failure leaves every source untouched
        let mut distort = self.distort.clone();
        for perlin in &mut distort {
            perlin.set_octave_count(roughness)?;
        }
        self.distort = distort;
        Ok(())
    }

    fn distort(&self, point: Point3D) -> Point3D {
        let [dx, dy, dz] = &self.distort;
        Point3D::new(
            point.x + dx.sample(point + DISTORT_OFFSETS[0]) * self.power,
            point.y + dy.sample(point + DISTORT_OFFSETS[1]) * self.power,
            point.z + dz.sample(point + DISTORT_OFFSETS[2]) * self.power,
        )
    }
}

impl Default for Turbulence {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleImpl for Turbulence {
    fn evaluate(&self, sources: &Sources<'_>, point: Point3D) -> Result<f64, ModuleError> {
        sources.evaluate(0, self.distort(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NoiseGraph;
    use crate::module::{Const, Module};

    fn over_const(value: f64, modifier: impl Into<Module>) -> f64 {
        let mut graph = NoiseGraph::new();
        let source = graph.add(Const::new(value));
        let id = graph
            .add_with_sources(modifier, &[source])
            .expect("valid wiring");
        graph.evaluate(id, 0.3, -0.2, 0.9).expect("evaluation")
    }

    #[test]
    fn test_abs_and_invert() {
        assert_eq!(over_const(-0.75, Abs), 0.75);
        assert_eq!(over_const(0.75, Abs), 0.75);
        assert_eq!(over_const(0.25, Invert), -0.25);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(over_const(3.0, Clamp::new()), 1.0);
        assert_eq!(over_const(-3.0, Clamp::new()), -1.0);
        assert_eq!(over_const(0.5, Clamp::new()), 0.5);

        let mut clamp = Clamp::new();
        clamp.set_bounds(0.0, 0.25).expect("valid bounds");
        assert_eq!(over_const(0.5, clamp), 0.25);
    }

    #[test]
    fn test_clamp_rejects_inverted_bounds() {
        let mut clamp = Clamp::new();
        assert!(matches!(
            clamp.set_bounds(1.0, 0.0),
            Err(ModuleError::InvalidParameter(_))
        ));
        assert!(clamp.set_bounds(0.5, 0.5).is_err());
        assert!(clamp.set_upper_bound(-2.0).is_err());
        assert!(clamp.set_bounds(f64::NAN, 1.0).is_err());
        assert_eq!(clamp.lower_bound(), -1.0);
        assert_eq!(clamp.upper_bound(), 1.0);

        clamp.set_lower_bound(-0.5).expect("valid bound");
        assert_eq!(clamp.lower_bound(), -0.5);
    }

    #[test]
    fn test_exponent() {
        assert!((over_const(0.3, Exponent::default()) - 0.3).abs() < 1e-12);
        // 0 maps to 0.5, squared is 0.25, back to -0.5
        assert!((over_const(0.0, Exponent::new(2.0)) + 0.5).abs() < 1e-12);
        assert!((over_const(1.0, Exponent::new(3.0)) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_scale_bias() {
        let mut scale_bias = ScaleBias::new();
        scale_bias.set_scale(2.0);
        scale_bias.set_bias(-0.5);
        assert_eq!(over_const(0.75, scale_bias), 1.0);
        assert_eq!(over_const(0.75, ScaleBias::default()), 0.75);
    }

    #[test]
    fn test_translate_point_moves_sample() {
        let mut graph = NoiseGraph::new();
        let perlin = graph.add(Perlin::new());
        let translate = graph
            .add_with_sources(TranslatePoint::new(1.0, -2.0, 0.5), &[perlin])
            .expect("valid wiring");

        let shifted = graph.evaluate(translate, 0.1, 0.2, 0.3).expect("evaluation");
        let direct = graph.evaluate(perlin, 1.1, -1.8, 0.8).expect("evaluation");
        assert_eq!(shifted.to_bits(), direct.to_bits());
    }

    #[test]
    fn test_rotation_matrix() {
        let identity = RotatePoint::default();
        let p = Point3D::new(0.25, -1.5, 2.0);
        assert_eq!(identity.rotate(p), p);

        // A quarter turn around y sends +z to +x
        let quarter = RotatePoint::new(0.0, 90.0, 0.0);
        let rotated = quarter.rotate(Point3D::new(0.0, 0.0, 1.0));
        assert!((rotated - Point3D::new(1.0, 0.0, 0.0)).magnitude() < 1e-12);

        let mut rotate = RotatePoint::default();
        rotate.set_y_angle(90.0);
        assert_eq!(rotate, quarter);
    }

    #[test]
    fn test_rotation_preserves_length() {
        let rotate = RotatePoint::new(31.0, -47.0, 112.0);
        let p = Point3D::new(1.5, -0.25, 3.0);
        assert!((rotate.rotate(p).magnitude() - p.magnitude()).abs() < 1e-12);
    }

    #[test]
    fn test_turbulence_parameters() {
        let mut turbulence = Turbulence::new();
        assert_eq!(turbulence.roughness(), Turbulence::DEFAULT_ROUGHNESS);
        assert!(turbulence.set_roughness(0).is_err());
        assert_eq!(turbulence.roughness(), Turbulence::DEFAULT_ROUGHNESS);

        turbulence.set_seed(7);
        assert_eq!(turbulence.seed(), 7);
        assert_eq!(turbulence.distort[2].seed(), 9);

        turbulence.set_frequency(4.0);
        assert!(turbulence.distort.iter().all(|p| p.frequency() == 4.0));
    }

    #[test]
    fn test_turbulence_zero_power_is_identity() {
        let mut turbulence = Turbulence::new();
        turbulence.set_power(0.0);
        let p = Point3D::new(0.4, 1.2, -3.3);
        assert_eq!(turbulence.distort(p), p);
    }
}
