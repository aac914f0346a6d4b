use thiserror::Error;

use sdof_core::{BackboneError, ForceError};

/// Errors that can abort a Newmark integration run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: &'static str },

    #[error("effective mass {mass} is too close to zero")]
    NonPositiveEffectiveMass { mass: f64 },

    #[error("gravity preload {preload} exceeds backbone capacity {capacity}")]
    GravityExceedsCapacity { preload: f64, capacity: f64 },

    #[error(
        "equilibrium iteration failed to converge at step {step} \
         after {iterations} iterations (residual {residual})"
    )]
    NonConvergence {
        step: usize,
        iterations: usize,
        residual: f64,
    },

    #[error(transparent)]
    Backbone(#[from] BackboneError),

    #[error(transparent)]
    Force(#[from] ForceError),
}
