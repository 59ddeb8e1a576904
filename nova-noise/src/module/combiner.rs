//! Modules that merge the output of two to four sources.

use crate::error::ModuleError;
use crate::graph::Sources;
use crate::math::{linear_interp, s_curve3};
use crate::point::Point3D;

use super::ModuleImpl;

macro_rules! binary_combiner {
    ($(#[$meta:meta])* $name:ident, |$a:ident, $b:ident| $body:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub struct $name;

        impl ModuleImpl for $name {
            fn evaluate(&self, sources: &Sources<'_>, point: Point3D) -> Result<f64, ModuleError> {
                let $a = sources.evaluate(0, point)?;
                let $b = sources.evaluate(1, point)?;
                Ok($body)
            }
        }
    };
}

binary_combiner!(
    /// Sum of two sources.
    Add, |a, b| a + b
);
binary_combiner!(
    /// Product of two sources.
    Multiply, |a, b| a * b
);
binary_combiner!(
    /// Smaller of two sources.
    Min, |a, b| a.min(b)
);
binary_combiner!(
    /// Larger of two sources.
    Max, |a, b| a.max(b)
);
binary_combiner!(
    /// Source 0 raised to the power of source 1.
    Power, |a, b| a.powf(b)
);

/// Linear blend of sources 0 and 1, weighted by the control source.
///
/// A control value of -1 yields source 0, 1 yields source 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Blend;

impl Blend {
    /// Slot of the control source.
    pub const CONTROL_SLOT: usize = 2;
}

impl ModuleImpl for Blend {
    fn evaluate(&self, sources: &Sources<'_>, point: Point3D) -> Result<f64, ModuleError> {
        let v0 = sources.evaluate(0, point)?;
        let v1 = sources.evaluate(1, point)?;
        let alpha = (sources.evaluate(Self::CONTROL_SLOT, point)? + 1.0) / 2.0;
        Ok(linear_interp(v0, v1, alpha))
    }
}

/// Chooses source 1 where the control source lies in `[lower, upper]` and
/// source 0 elsewhere.
///
/// With a non-zero edge falloff the switch is smoothed over
/// `bound ± edge_falloff` at both bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    lower_bound: f64,
    upper_bound: f64,
    edge_falloff: f64,
}

impl Select {
    /// Slot of the control source.
    pub const CONTROL_SLOT: usize = 2;
    /// Default lower bound of the selection band.
    pub const DEFAULT_LOWER_BOUND: f64 = -1.0;
    /// Default upper bound of the selection band.
    pub const DEFAULT_UPPER_BOUND: f64 = 1.0;
    /// Default edge falloff.
    pub const DEFAULT_EDGE_FALLOFF: f64 = 0.0;

    /// Creates a selector with the default `[-1, 1]` band and a hard edge.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lower_bound: Self::DEFAULT_LOWER_BOUND,
            upper_bound: Self::DEFAULT_UPPER_BOUND,
            edge_falloff: Self::DEFAULT_EDGE_FALLOFF,
        }
    }

    /// Lower bound of the selection band.
    #[must_use]
    pub const fn lower_bound(&self) -> f64 {
        self.lower_bound
    }

    /// Upper bound of the selection band.
    #[must_use]
    pub const fn upper_bound(&self) -> f64 {
        self.upper_bound
    }

    /// Width of the smoothed region on each side of a bound.
    #[must_use]
    pub const fn edge_falloff(&self) -> f64 {
        self.edge_falloff
    }

    /// Sets the selection band. Fails unless `lower < upper`.
    ///
    /// The edge falloff is re-capped to half the new band width.
    pub fn set_bounds(&mut self, lower: f64, upper: f64) -> Result<(), ModuleError> {
        if lower < upper {
            self.lower_bound = lower;
            self.upper_bound = upper;
            self.set_edge_falloff(self.edge_falloff);
            Ok(())
        } else {
            Err(ModuleError::invalid_parameter(format!(
                "select upper bound {upper} must be above lower bound {lower}"
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

    /// Sets the edge falloff, capped at half the band width.
    pub fn set_edge_falloff(&mut self, edge_falloff: f64) {
        let half_width = (self.upper_bound - self.lower_bound) / 2.0;
        self.edge_falloff = edge_falloff.min(half_width);
    }

    fn smooth(
        sources: &Sources<'_>,
        point: Point3D,
        from: usize,
        to: usize,
        control: f64,
        lower_curve: f64,
        upper_curve: f64,
    ) -> Result<f64, ModuleError> {
        let alpha = s_curve3((control - lower_curve) / (upper_curve - lower_curve));
        Ok(linear_interp(
            sources.evaluate(from, point)?,
            sources.evaluate(to, point)?,
            alpha,
        ))
    }
}

impl Default for Select {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleImpl for Select {
    fn evaluate(&self, sources: &Sources<'_>, point: Point3D) -> Result<f64, ModuleError> {
        let control = sources.evaluate(Self::CONTROL_SLOT, point)?;
        let (lower, upper, falloff) = (self.lower_bound, self.upper_bound, self.edge_falloff);

        if falloff > 0.0 {
            if control < lower - falloff {
                sources.evaluate(0, point)
            } else if control < lower + falloff {
                Self::smooth(sources, point, 0, 1, control, lower - falloff, lower + falloff)
            } else if control < upper - falloff {
                sources.evaluate(1, point)
            } else if control < upper + falloff {
                Self::smooth(sources, point, 1, 0, control, upper - falloff, upper + falloff)
            } else {
                sources.evaluate(0, point)
            }
        } else if (lower..=upper).contains(&control) {
            sources.evaluate(1, point)
        } else {
            sources.evaluate(0, point)
        }
    }
}

/// A displacement axis of [`Displace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// The x axis.
    X,
    /// The y axis.
    Y,
    /// The z axis.
    Z,
}

impl Axis {
    /// The [`Displace`] slot holding the displacement for this axis.
    #[must_use]
    pub const fn slot(self) -> usize {
        match self {
            Self::X => 1,
            Self::Y => 2,
            Self::Z => 3,
        }
    }
}

/// Samples source 0 at the input point offset by the outputs of the three
/// displacement sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Displace;

impl Displace {
    /// Slot of the displaced source.
    pub const SOURCE_SLOT: usize = 0;
}

impl ModuleImpl for Displace {
    fn evaluate(&self, sources: &Sources<'_>, point: Point3D) -> Result<f64, ModuleError> {
        let offset = Point3D::new(
            sources.evaluate(Axis::X.slot(), point)?,
            sources.evaluate(Axis::Y.slot(), point)?,
            sources.evaluate(Axis::Z.slot(), point)?,
        );
        sources.evaluate(Self::SOURCE_SLOT, point + offset)
    }
}
