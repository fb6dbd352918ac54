//! Error types for the scene engine

use super::types::{Category, ObjectRef};

/// Errors surfaced by scene construction, spawning, and stepping.
///
/// Geometric queries never fail; a query with no collidable objects yields
/// the documented sentinel instead.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Malformed or inconsistent scene configuration. Fatal at load time.
    #[error("invalid scene configuration: {reason}")]
    Configuration { reason: String },

    /// An action was supplied for an unknown object, or for an object
    /// whose kinematic model cannot interpret it. Fatal to that `step`
    /// call; the scene is left unchanged.
    #[error("invalid action for {target}: {reason}")]
    InvalidAction { target: ObjectRef, reason: String },

    /// Rejection sampling failed to place an object within the configured
    /// attempt bound. Recoverable by reseeding or retrying at scene level.
    #[error("spawn sampling exhausted after {attempts} attempts placing {category} object {index}")]
    SpawnExhaustion {
        category: Category,
        index: usize,
        attempts: u32,
    },
}

impl SimError {
    pub(crate) fn config(reason: impl Into<String>) -> Self {
        SimError::Configuration {
            reason: reason.into(),
        }
    }

    pub(crate) fn action(target: ObjectRef, reason: impl Into<String>) -> Self {
        SimError::InvalidAction {
            target,
            reason: reason.into(),
        }
    }
}
