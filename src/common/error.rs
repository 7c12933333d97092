//! Error types for chain_lattice

use thiserror::Error;

use crate::common::types::StateId;

/// Main error type for the planning environment
#[derive(Error, Debug)]
pub enum PlanningError {
    /// State id beyond the current table size
    #[error("State {id} is out of range (table size {size})")]
    StateOutOfRange { id: StateId, size: usize },

    /// An operation needs a collaborator that was never supplied
    #[error("Missing collaborator: {0} was never configured")]
    MissingCollaborator(&'static str),

    /// Capability not provided by this environment
    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),

    /// Start or goal requested before both were registered
    #[error("Start and goal states must both be set before planning")]
    StartGoalUnset,

    /// Joint configuration that cannot be used (wrong dimension, unplaceable)
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Planning episode aborted by a supervisor
    #[error("Planning episode cancelled")]
    Cancelled,

    /// Search finished without reaching the goal
    #[error("Planning failed: {0}")]
    PlanningFailed(String),

    /// Configuration file could not be parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for PlanningError {
    fn from(e: toml::de::Error) -> Self {
        PlanningError::Config(e.to_string())
    }
}

/// Result type alias for planning operations
pub type PlanningResult<T> = Result<T, PlanningError>;
