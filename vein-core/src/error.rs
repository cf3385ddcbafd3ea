//! Error types for vein-core.

use thiserror::Error;

/// Errors raised while building or advancing a simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("boundary needs at least 3 vertices, got {vertices}")]
    InvalidBoundary { vertices: usize },

    #[error("boundary polygon has zero area")]
    DegenerateBoundary,

    #[error(
        "sampling gave up after {attempts} attempts: placed {accepted} of {requested} attractors"
    )]
    DegenerateSampling {
        requested: usize,
        accepted: usize,
        attempts: u64,
    },

    #[error("vein network has no nodes")]
    EmptyNetwork,

    #[error("invalid setting `{name}`: {reason}")]
    InvalidSetting {
        name: &'static str,
        reason: &'static str,
    },
}

pub type Result<T, E = SimulationError> = std::result::Result<T, E>;
