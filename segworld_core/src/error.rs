// segworld_core/src/error.rs

use thiserror::Error;

/// Every failure the core library can surface.
///
/// Collisions, step limits and cutoffs are *not* errors; they end a run normally
/// and are recorded as a [`Termination`](crate::simulation::Termination).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    /// A controller name that does not map onto any
    /// [`ControllerKind`](crate::control::ControllerKind).
    #[error("controller of type '{0}' not supported")]
    UnsupportedController(String),

    /// An option failed validation when the simulator was constructed.
    #[error("invalid configuration for '{field}': {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// `run_single_simulation` was called with no slot left in the history arena.
    #[error(
        "history horizon exhausted: counter {counter} has no room left in a horizon of {horizon}"
    )]
    HorizonExhausted { counter: usize, horizon: usize },

    /// The random start-pose sampler never found a pose outside the collision threshold.
    #[error("could not find a collision-free start pose after {attempts} attempts")]
    NoCollisionFreeStart { attempts: usize },
}

impl SimError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        SimError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}
