//! Error types for the simulator

use qkern_core::QuantumError;
use qkern_state::StateError;
use thiserror::Error;

/// Result type for simulator operations
pub type Result<T> = std::result::Result<T, SimulatorError>;

/// Errors that can occur during simulation
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SimulatorError {
    /// The circuit or an operation in it is malformed
    #[error(transparent)]
    Circuit(#[from] QuantumError),

    /// The state engine rejected an operation
    #[error(transparent)]
    State(#[from] StateError),

    /// Fewer parameter values than the circuit declares
    #[error("circuit expects {expected} parameter values, got {actual}")]
    ParameterCountMismatch { expected: usize, actual: usize },

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// No shot of a sampling run succeeded
    #[error("all {shots} shots failed, first error: {first}")]
    AllShotsFailed {
        shots: usize,
        first: Box<SimulatorError>,
    },
}

impl SimulatorError {
    /// Whether the error only invalidates the current shot
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SimulatorError::State(e) if e.is_recoverable())
    }

    /// Whether the error must abort the whole call
    pub fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }
}
