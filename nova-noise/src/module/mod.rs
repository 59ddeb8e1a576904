//! Module kinds and the evaluation contract they share.
//!
//! A module maps a 3D point to a scalar. Source modules compute noise from
//! the point alone, modifiers transform one source, and combiners merge two to
//! four sources. Sources are wired through [`NoiseGraph`](crate::NoiseGraph);
//! a module itself only stores its parameters.

use enum_dispatch::enum_dispatch;

use crate::error::ModuleError;
use crate::graph::Sources;
use crate::point::Point3D;

mod combiner;
mod control;
mod modifier;
mod source;

pub use combiner::{Add, Axis, Blend, Displace, Max, Min, Multiply, Power, Select};
pub use control::{ControlPoint, Curve, Terrace};
pub use modifier::{Abs, Clamp, Exponent, Invert, RotatePoint, ScaleBias, TranslatePoint, Turbulence};
pub use source::{
    Billow, Checkerboard, Const, Cylinders, MAX_OCTAVE_COUNT, Perlin, RidgedMulti, Spheres, Voronoi,
};

/// The evaluation contract every module kind implements.
#[enum_dispatch]
pub trait ModuleImpl {
    /// Computes the output value at `point`.
    ///
    /// `sources` resolves this module's wired source slots; source kinds
    /// never touch it.
    fn evaluate(&self, sources: &Sources<'_>, point: Point3D) -> Result<f64, ModuleError>;
}

/// Every module kind, as stored in a [`NoiseGraph`](crate::NoiseGraph).
#[enum_dispatch(ModuleImpl)]
#[derive(Debug, Clone)]
pub enum Module {
    /// Fractal gradient noise.
    Perlin(Perlin),
    /// Fractal noise with folded octaves.
    Billow(Billow),
    /// Ridged multifractal noise.
    RidgedMulti(RidgedMulti),
    /// Cellular noise.
    Voronoi(Voronoi),
    /// Alternating unit cubes.
    Checkerboard(Checkerboard),
    /// Concentric cylinders around the y axis.
    Cylinders(Cylinders),
    /// Concentric spheres around the origin.
    Spheres(Spheres),
    /// A constant value.
    Const(Const),
    /// Absolute value of the source.
    Abs(Abs),
    /// Source clamped into a range.
    Clamp(Clamp),
    /// Source remapped through a cubic spline.
    Curve(Curve),
    /// Source remapped through a power curve.
    Exponent(Exponent),
    /// Negated source.
    Invert(Invert),
    /// Source scaled and offset.
    ScaleBias(ScaleBias),
    /// Source remapped into terraces.
    Terrace(Terrace),
    /// Source sampled at a rotated point.
    RotatePoint(RotatePoint),
    /// Source sampled at a translated point.
    TranslatePoint(TranslatePoint),
    /// Source sampled at a randomly perturbed point.
    Turbulence(Turbulence),
    /// Sum of two sources.
    Add(Add),
    /// Product of two sources.
    Multiply(Multiply),
    /// Minimum of two sources.
    Min(Min),
    /// Maximum of two sources.
    Max(Max),
    /// First source raised to the power of the second.
    Power(Power),
    /// Two sources blended by a control source.
    Blend(Blend),
    /// One of two sources, chosen by a control source.
    Select(Select),
    /// Source sampled at a point displaced by three other sources.
    Displace(Displace),
}

/// Static information about a module kind, and typed access from [`Module`].
pub trait ModuleKind: Into<Module> {
    /// Human-readable kind name.
    const NAME: &'static str;
    /// Number of source slots.
    const ARITY: usize;

    /// Borrows the kind out of a module, if it matches.
    fn from_module(module: &Module) -> Option<&Self>;

    /// Mutably borrows the kind out of a module, if it matches.
    fn from_module_mut(module: &mut Module) -> Option<&mut Self>;
}

macro_rules! module_kinds {
    ($($kind:ident => $arity:literal),* $(,)?) => {
        $(
            impl ModuleKind for $kind {
                const NAME: &'static str = stringify!($kind);
                const ARITY: usize = $arity;

                fn from_module(module: &Module) -> Option<&Self> {
                    match module {
                        Module::$kind(inner) => Some(inner),
                        _ => None,
                    }
                }

                fn from_module_mut(module: &mut Module) -> Option<&mut Self> {
                    match module {
                        Module::$kind(inner) => Some(inner),
                        _ => None,
                    }
                }
            }
        )*

        impl Module {
            /// Number of source slots this module needs before it can be evaluated.
            #[must_use]
            pub const fn arity(&self) -> usize {
                match self {
                    $(Self::$kind(_) => $arity,)*
                }
            }

            /// The kind name, e.g. `"Perlin"`.
            #[must_use]
            pub const fn kind_name(&self) -> &'static str {
                match self {
                    $(Self::$kind(_) => stringify!($kind),)*
                }
            }
        }
    };
}

module_kinds! {
    Perlin => 0,
    Billow => 0,
    RidgedMulti => 0,
    Voronoi => 0,
    Checkerboard => 0,
    Cylinders => 0,
    Spheres => 0,
    Const => 0,
    Abs => 1,
    Clamp => 1,
    Curve => 1,
    Exponent => 1,
    Invert => 1,
    ScaleBias => 1,
    Terrace => 1,
    RotatePoint => 1,
    TranslatePoint => 1,
    Turbulence => 1,
    Add => 2,
    Multiply => 2,
    Min => 2,
    Max => 2,
    Power => 2,
    Blend => 3,
    Select => 3,
    Displace => 4,
}
