//! Simulation error types
//!
//! Nothing here is a normal gameplay outcome: caught players, knockouts and
//! timer expiry are all handled by state transitions. These errors mean the
//! simulation was driven incorrectly or configured into a corner.

use thiserror::Error;

/// Errors produced by the simulation and its configuration layer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// An entity was asked to enter a state its transition table forbids.
    /// The entity keeps its previous state.
    #[error("invalid {entity} transition: {from} -> {to}")]
    InvalidTransition {
        entity: &'static str,
        from: String,
        to: String,
    },

    /// No power dot placement clears the player, so a batch cannot be laid out.
    #[error("no valid power dot among {dots} dots after {attempts} attempts")]
    DegenerateDotBatch { dots: usize, attempts: u32 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("replay failed: {0}")]
    Replay(String),
}

impl SimError {
    pub(crate) fn transition<S: std::fmt::Debug>(entity: &'static str, from: S, to: S) -> Self {
        SimError::InvalidTransition {
            entity,
            from: format!("{from:?}"),
            to: format!("{to:?}"),
        }
    }
}

pub type SimResult<T> = Result<T, SimError>;
