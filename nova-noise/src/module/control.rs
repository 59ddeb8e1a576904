//! Modifiers that remap the source's output through a table of control points.

use std::mem;

use crate::error::ModuleError;
use crate::graph::Sources;
use crate::math::{cubic_interp, linear_interp};
use crate::point::Point3D;

use super::ModuleImpl;

/// A mapping from a source value to an output value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlPoint {
    /// Source value.
    pub input: f64,
    /// Output value at `input`.
    pub output: f64,
}

impl ControlPoint {
    /// Creates a control point.
    #[must_use]
    pub const fn new(input: f64, output: f64) -> Self {
        Self { input, output }
    }
}

/// Index of the first key strictly above `value`, if any.
fn bracket(keys: impl IntoIterator<Item = f64>, value: f64) -> Option<usize> {
    keys.into_iter().position(|key| value < key)
}

/// Index at which `key` keeps `keys` sorted, or an error if `key` is NaN or
/// already present.
fn insertion_index(
    keys: impl Iterator<Item = f64> + Clone,
    key: f64,
) -> Result<usize, ModuleError> {
    if key.is_nan() {
        return Err(ModuleError::invalid_parameter("control point key is NaN"));
    }
    if keys.clone().any(|existing| existing == key) {
        return Err(ModuleError::invalid_parameter(format!(
            "control point key {key} is already defined"
        )));
    }
    Ok(keys.take_while(|&existing| existing < key).count())
}

/// Remaps the source through a cubic spline defined by control points.
///
/// At least four control points are needed. Values below the first control
/// point map to its output.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Curve {
    control_points: Vec<ControlPoint>,
}

impl Curve {
    /// Minimum number of control points for evaluation.
    pub const MIN_CONTROL_POINTS: usize = 4;

    /// Creates a curve with no control points.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            control_points: Vec::new(),
        }
    }

    /// Control points sorted by input.
    #[must_use]
    pub fn control_points(&self) -> &[ControlPoint] {
        &self.control_points
    }

    /// Adds a control point. Fails if `input` is NaN or already used.
    pub fn add_control_point(&mut self, input: f64, output: f64) -> Result<(), ModuleError> {
        let index = insertion_index(self.control_points.iter().map(|p| p.input), input)?;
        self.control_points
            .insert(index, ControlPoint::new(input, output));
        Ok(())
    }

    /// Removes every control point.
    pub fn clear_control_points(&mut self) {
        self.control_points.clear();
    }

    /// Maps `value` through the spline.
    pub fn map(&self, value: f64) -> Result<f64, ModuleError> {
        let points = &self.control_points;
        let count = points.len();
        if count < Self::MIN_CONTROL_POINTS {
            return Err(ModuleError::PointsNeeded {
                available: count,
                required: Self::MIN_CONTROL_POINTS,
            });
        }

        let pos = bracket(points.iter().map(|p| p.input), value).ok_or(
            ModuleError::PointsNeeded {
                available: count,
                required: count + 1,
            },
        )?;

        let i0 = pos.saturating_sub(2);
        let i1 = pos.saturating_sub(1);
        let i2 = pos;
        let i3 = (pos + 1).min(count - 1);

        if i1 == i2 {
            return Ok(points[i1].output);
        }

        let alpha = (value - points[i1].input) / (points[i2].input - points[i1].input);
        Ok(cubic_interp(
            points[i0].output,
            points[i1].output,
            points[i2].output,
            points[i3].output,
            alpha,
        ))
    }
}

impl ModuleImpl for Curve {
    fn evaluate(&self, sources: &Sources<'_>, point: Point3D) -> Result<f64, ModuleError> {
        self.map(sources.evaluate(0, point)?)
    }
}

/// Remaps the source into terraces.
///
/// Between two adjacent control points the output rises slowly, then steeply;
/// inverted terraces rise steeply first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Terrace {
    control_points: Vec<f64>,
    invert_terraces: bool,
}

impl Terrace {
    /// Minimum number of control points for evaluation.
    pub const MIN_CONTROL_POINTS: usize = 2;

    /// Creates a terrace with no control points.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            control_points: Vec::new(),
            invert_terraces: false,
        }
    }

    /// Control points in ascending order.
    #[must_use]
    pub fn control_points(&self) -> &[f64] {
        &self.control_points
    }

    /// Whether the terrace curves are inverted.
    #[must_use]
    pub const fn invert_terraces(&self) -> bool {
        self.invert_terraces
    }

    /// Inverts the terrace curves.
    pub const fn set_invert_terraces(&mut self, invert: bool) {
        self.invert_terraces = invert;
    }

    /// Adds a control point. Fails if `value` is NaN or already present.
    pub fn add_control_point(&mut self, value: f64) -> Result<(), ModuleError> {
        let index = insertion_index(self.control_points.iter().copied(), value)?;
        self.control_points.insert(index, value);
        Ok(())
    }

    /// Removes every control point.
    pub fn clear_control_points(&mut self) {
        self.control_points.clear();
    }

    /// Replaces the control points with `count` evenly spaced values from -1
    /// to 1 inclusive. `count` must be at least 2; the table is left as is
    /// otherwise.
    pub fn make_control_points(&mut self, count: usize) -> Result<(), ModuleError> {
        if count < Self::MIN_CONTROL_POINTS {
            return Err(ModuleError::invalid_parameter(format!(
                "terrace needs at least {} control points, got {count}",
                Self::MIN_CONTROL_POINTS
            )));
        }
        let last = (count - 1) as f64;
        self.control_points = (0..count)
            .map(|i| 2.0 * i as f64 / last - 1.0)
            .collect();
        tracing::debug!(count, "rebuilt terrace control points");
        Ok(())
    }

    /// Maps `value` onto the terraces.
    pub fn map(&self, value: f64) -> Result<f64, ModuleError> {
        let points = &self.control_points;
        let count = points.len();
        if count < Self::MIN_CONTROL_POINTS {
            return Err(ModuleError::PointsNeeded {
                available: count,
                required: Self::MIN_CONTROL_POINTS,
            });
        }

        let pos = bracket(points.iter().copied(), value).ok_or(ModuleError::PointsNeeded {
            available: count,
            required: count + 1,
        })?;

        let i0 = pos.saturating_sub(1);
        let i1 = pos;
        if i0 == i1 {
            return Ok(points[i1]);
        }

        let mut v0 = points[i0];
        let mut v1 = points[i1];
        let mut alpha = (value - v0) / (v1 - v0);
        if self.invert_terraces {
            alpha = 1.0 - alpha;
            mem::swap(&mut v0, &mut v1);
        }
        alpha *= alpha;
        Ok(linear_interp(v0, v1, alpha))
    }
}

impl ModuleImpl for Terrace {
    fn evaluate(&self, sources: &Sources<'_>, point: Point3D) -> Result<f64, ModuleError> {
        self.map(sources.evaluate(0, point)?)
    }
}
