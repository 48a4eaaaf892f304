//! Unitary generation for every [`GateKind`]

use crate::matrices::{self, Matrix2, Matrix4};
use qkern_core::{GateKind, QuantumError};

/// The unitary of a gate with its parameters bound
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateMatrix {
    /// One-target gate
    Single(Matrix2),
    /// Two-target gate
    Two(Matrix4),
}

impl GateMatrix {
    /// Number of target qubits the matrix acts on
    pub const fn num_targets(&self) -> usize {
        match self {
            GateMatrix::Single(_) => 1,
            GateMatrix::Two(_) => 2,
        }
    }

    /// The 2x2 matrix, if this is a single-target gate
    pub fn as_single(&self) -> Option<&Matrix2> {
        match self {
            GateMatrix::Single(m) => Some(m),
            GateMatrix::Two(_) => None,
        }
    }
}

/// Build the unitary of `kind` from concrete angles
///
/// # Errors
/// `InvalidParameterCount` if `params` does not match the kind's arity
///
/// # Example
/// ```
/// use qkern_core::GateKind;
/// use qkern_gates::{matrices, unitary, GateMatrix};
///
/// let h = unitary(GateKind::H, &[]).unwrap();
/// assert_eq!(h, GateMatrix::Single(matrices::HADAMARD));
///
/// assert!(unitary(GateKind::Ry, &[]).is_err());
/// ```
pub fn unitary(kind: GateKind, params: &[f64]) -> Result<GateMatrix, QuantumError> {
    if params.len() != kind.num_params() {
        return Err(QuantumError::invalid_parameter_count(
            kind.name(),
            kind.num_params(),
            params.len(),
        ));
    }

    let single = match (kind, params) {
        (GateKind::Swap, _) => return Ok(GateMatrix::Two(matrices::SWAP)),
        (GateKind::H, _) => matrices::HADAMARD,
        (GateKind::X, _) => matrices::PAULI_X,
        (GateKind::Y, _) => matrices::PAULI_Y,
        (GateKind::Z, _) => matrices::PAULI_Z,
        (GateKind::S, _) => matrices::S_GATE,
        (GateKind::Sdg, _) => matrices::S_DAGGER,
        (GateKind::T, _) => matrices::T_GATE,
        (GateKind::Tdg, _) => matrices::T_DAGGER,
        (GateKind::Rx, &[theta]) => matrices::rotation_x(theta),
        (GateKind::Ry, &[theta]) => matrices::rotation_y(theta),
        (GateKind::Rz, &[theta]) => matrices::rotation_z(theta),
        (GateKind::R1, &[lambda]) => matrices::phase(lambda),
        (GateKind::U3, &[theta, phi, lambda]) => matrices::u3(theta, phi, lambda),
        // arity was checked above
        (kind, params) => {
            return Err(QuantumError::invalid_parameter_count(
                kind.name(),
                kind.num_params(),
                params.len(),
            ))
        }
    };
    Ok(GateMatrix::Single(single))
}
