//! Error types for circuit construction
//!
//! Every variant here is raised while a circuit is being built. Nothing is
//! deferred to execution: a [`Circuit`](crate::Circuit) that exists is
//! structurally valid.

use crate::QubitId;
use thiserror::Error;

/// Errors that can occur while building a quantum circuit
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantumError {
    /// A qubit index is outside the register it was taken from
    #[error("Invalid qubit index {index}: register has only {size} qubits")]
    InvalidQubitIndex { index: usize, size: usize },

    /// The same qubit is referenced twice by one operation
    #[error("Duplicate reference to qubit {0} in one operation")]
    DuplicateQubitReference(QubitId),

    /// Gate applied to the wrong number of target qubits
    #[error("Gate '{gate}' requires {expected} target qubits, but {actual} were provided")]
    InvalidQubitCount {
        gate: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Gate given the wrong number of angle parameters
    #[error("Gate '{gate}' takes {expected} parameters, but {actual} were provided")]
    InvalidParameterCount {
        gate: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Only single-target gates can carry controls
    #[error("Gate '{0}' cannot be controlled: controlled operations take exactly one target")]
    NotControllable(&'static str),

    /// Controlled operation without any control qubit
    #[error("Controlled operation on '{0}' needs at least one control qubit")]
    MissingControls(&'static str),

    /// Register allocation of zero qubits
    #[error("Register must contain at least one qubit")]
    EmptyRegister,

    /// Branch on a bit that was never measured in the enclosing scope
    #[error("Measured bit b{0} is not visible here: measure before branching on it")]
    UnknownMeasuredBit(usize),
}

impl QuantumError {
    /// Create an invalid qubit index error
    pub fn invalid_qubit(index: usize, size: usize) -> Self {
        Self::InvalidQubitIndex { index, size }
    }

    /// Create an invalid qubit count error
    pub fn invalid_qubit_count(gate: &'static str, expected: usize, actual: usize) -> Self {
        Self::InvalidQubitCount {
            gate,
            expected,
            actual,
        }
    }

    /// Create an invalid parameter count error
    pub fn invalid_parameter_count(gate: &'static str, expected: usize, actual: usize) -> Self {
        Self::InvalidParameterCount {
            gate,
            expected,
            actual,
        }
    }
}
