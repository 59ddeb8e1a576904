//! Error types for module wiring, configuration and evaluation.

use thiserror::Error;

use crate::graph::ModuleId;

/// Errors reported by graph and module operations.
///
/// Every error is returned to the immediate caller. Evaluation errors propagate
/// unchanged through every parent module up to the root.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModuleError {
    /// A module was evaluated while one of its source slots was empty.
    #[error("module {module} has no source in slot {slot}")]
    MissingSource {
        /// The module with the empty slot.
        module: ModuleId,
        /// The first empty slot.
        slot: usize,
    },

    /// A slot index outside `[0, arity)` was used.
    #[error("slot {index} is out of range for module {module} with {arity} sources")]
    InvalidIndex {
        /// The module that was addressed.
        module: ModuleId,
        /// The rejected index.
        index: usize,
        /// Number of source slots the module has.
        arity: usize,
    },

    /// A setter received a value that violates its precondition.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// An interpolating modifier lacks the control points it needs.
    ///
    /// Also returned when the sampled value lies at or above the last control
    /// point, as there is then no point bracketing it from above.
    #[error("control points needed: {available} available, {required} required")]
    PointsNeeded {
        /// Control points currently defined.
        available: usize,
        /// Control points the operation needs.
        required: usize,
    },

    /// The handle was not issued by this graph.
    #[error("unknown module {0}")]
    UnknownModule(ModuleId),

    /// Typed access asked for a different module kind than the one stored.
    #[error("module {module} is a {found}, not a {expected}")]
    WrongKind {
        /// The module that was addressed.
        module: ModuleId,
        /// Kind that was requested.
        expected: &'static str,
        /// Kind that is stored.
        found: &'static str,
    },

    /// Wiring `input` into `module` would let evaluation reach `module` again.
    #[error("wiring {input} into module {module} would create a cycle")]
    GraphCycle {
        /// The module whose slot was being set.
        module: ModuleId,
        /// The rejected source, which `module` already feeds.
        input: ModuleId,
    },
}

impl ModuleError {
    pub(crate) fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }
}
