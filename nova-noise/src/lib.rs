//! # Nova Noise
//!
//! Coherent noise built from a graph of small modules.
//!
//! Source modules (Perlin, Billow, `RidgedMulti`, Voronoi and a few
//! patterns) produce values from a point in 3D space. Modifiers reshape one
//! source, combiners merge several. Modules live in a [`NoiseGraph`] and are
//! wired together through source slots; evaluating the root module pulls
//! values through the whole graph.
//!
//! ```
//! use nova_noise::{Abs, Add, Billow, NoiseGraph, Perlin};
//!
//! let mut graph = NoiseGraph::new();
//! let hills = graph.add(Perlin::new());
//! let clouds = graph.add(Billow::new());
//! let folded = graph.add_with_sources(Abs, &[clouds])?;
//! let terrain = graph.add_with_sources(Add, &[hills, folded])?;
//!
//! let height = graph.evaluate(terrain, 1.25, 0.0, -3.5)?;
//! assert!(height.is_finite());
//! # Ok::<(), nova_noise::ModuleError>(())
//! ```
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    clippy::unwrap_used
)]
#![allow(
    clippy::single_call_fn,
    clippy::multiple_inherent_impl,
    clippy::shadow_unrelated,
    clippy::missing_errors_doc,
    clippy::needless_pass_by_value
)]

pub mod error;
pub mod graph;
pub mod math;
pub mod module;
pub mod noise;
pub mod point;

pub use error::ModuleError;
pub use graph::{ModuleId, NoiseGraph, Sampler, Sources};
pub use module::{
    Abs, Add, Axis, Billow, Blend, Checkerboard, Clamp, Const, ControlPoint, Curve, Cylinders,
    Displace, Exponent, Invert, MAX_OCTAVE_COUNT, Max, Min, Module, ModuleImpl, ModuleKind,
    Multiply, Perlin, Power, RidgedMulti, RotatePoint, ScaleBias, Select, Spheres, Terrace,
    TranslatePoint, Turbulence, Voronoi,
};
pub use noise::{
    Quality, gradient_coherent_noise_3d, gradient_noise_3d, value_coherent_noise_3d,
    value_noise_3d,
};
pub use point::Point3D;
