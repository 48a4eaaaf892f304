//! Error types for state vector operations

use thiserror::Error;

/// Errors that can occur during state vector operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateError {
    /// Invalid qubit index
    #[error("Invalid qubit index {index} for {num_qubits}-qubit state")]
    InvalidQubitIndex { index: usize, num_qubits: usize },

    /// The same qubit was passed twice to a multi-qubit kernel
    #[error("Qubit {qubit} appears more than once in one operation")]
    RepeatedQubit { qubit: usize },

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Register larger than the engine accepts
    #[error("Cannot allocate {requested} qubits: the state vector engine supports at most {max}")]
    TooManyQubits { requested: usize, max: usize },

    /// The observed outcome has (numerically) zero probability
    #[error("Degenerate measurement on qubit {qubit}: outcome probability {probability:e} cannot be renormalized")]
    DegenerateMeasurement { qubit: usize, probability: f64 },

    /// Norm drifted away from 1 after a unitary step
    #[error("State norm drifted to {norm} (tolerance {tolerance:e})")]
    NormalizationDrift { norm: f64, tolerance: f64 },

    /// Expectation value came out with a non-vanishing imaginary part
    #[error("Observable is not Hermitian: expectation has imaginary part {imaginary:e} (tolerance {tolerance:e})")]
    NonHermitianObservable { imaginary: f64, tolerance: f64 },
}

impl StateError {
    /// Whether the error only invalidates the current shot
    ///
    /// A degenerate measurement depends on the random outcome of one run;
    /// every other variant is a property of the circuit or the input.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, StateError::DegenerateMeasurement { .. })
    }

    /// Whether the error must abort the whole computation
    pub fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }
}

/// Result type for state vector operations
pub type Result<T> = std::result::Result<T, StateError>;
