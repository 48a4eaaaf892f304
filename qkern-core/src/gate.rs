//! The closed set of gate kinds a circuit may contain
//!
//! Gates are plain enum tags. Their unitary matrices are generated by
//! `qkern-gates` as pure functions of the bound parameters, so a circuit
//! stays a declarative value that renderers and other consumers can walk
//! without touching numerics.

use std::fmt;

/// Gate kinds supported by the builder and the simulator
///
/// # Example
/// ```
/// use qkern_core::GateKind;
///
/// assert_eq!(GateKind::H.name(), "h");
/// assert_eq!(GateKind::Rx.num_params(), 1);
/// assert_eq!(GateKind::Swap.num_targets(), 2);
/// assert!(GateKind::X.is_self_inverse());
/// assert!(!GateKind::T.is_self_inverse());
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum GateKind {
    /// Hadamard
    H,
    /// Pauli X (NOT)
    X,
    /// Pauli Y
    Y,
    /// Pauli Z
    Z,
    /// Phase gate √Z
    S,
    /// Adjoint of S
    Sdg,
    /// π/8 gate √S
    T,
    /// Adjoint of T
    Tdg,
    /// Rotation about X by θ
    Rx,
    /// Rotation about Y by θ
    Ry,
    /// Rotation about Z by θ
    Rz,
    /// Phase shift diag(1, e^{iλ})
    R1,
    /// Generic single-qubit rotation U3(θ, φ, λ)
    U3,
    /// Swap two qubits
    Swap,
}

impl GateKind {
    /// Every gate kind, in declaration order
    pub const ALL: [GateKind; 14] = [
        GateKind::H,
        GateKind::X,
        GateKind::Y,
        GateKind::Z,
        GateKind::S,
        GateKind::Sdg,
        GateKind::T,
        GateKind::Tdg,
        GateKind::Rx,
        GateKind::Ry,
        GateKind::Rz,
        GateKind::R1,
        GateKind::U3,
        GateKind::Swap,
    ];

    /// Lower-case mnemonic used by renderers and log output
    pub const fn name(&self) -> &'static str {
        match self {
            GateKind::H => "h",
            GateKind::X => "x",
            GateKind::Y => "y",
            GateKind::Z => "z",
            GateKind::S => "s",
            GateKind::Sdg => "sdg",
            GateKind::T => "t",
            GateKind::Tdg => "tdg",
            GateKind::Rx => "rx",
            GateKind::Ry => "ry",
            GateKind::Rz => "rz",
            GateKind::R1 => "r1",
            GateKind::U3 => "u3",
            GateKind::Swap => "swap",
        }
    }

    /// Number of target qubits
    pub const fn num_targets(&self) -> usize {
        match self {
            GateKind::Swap => 2,
            _ => 1,
        }
    }

    /// Number of angle parameters
    pub const fn num_params(&self) -> usize {
        match self {
            GateKind::Rx | GateKind::Ry | GateKind::Rz | GateKind::R1 => 1,
            GateKind::U3 => 3,
            _ => 0,
        }
    }

    /// Whether applying the gate twice is the identity
    ///
    /// Only meaningful for the parameter-free kinds; rotations are never
    /// reported as self-inverse.
    pub const fn is_self_inverse(&self) -> bool {
        matches!(
            self,
            GateKind::H | GateKind::X | GateKind::Y | GateKind::Z | GateKind::Swap
        )
    }

    /// Whether the unitary is diagonal in the computational basis
    pub const fn is_diagonal(&self) -> bool {
        matches!(
            self,
            GateKind::Z
                | GateKind::S
                | GateKind::Sdg
                | GateKind::T
                | GateKind::Tdg
                | GateKind::Rz
                | GateKind::R1
        )
    }

    /// Whether the kind may appear as the target of a controlled operation
    pub const fn is_controllable(&self) -> bool {
        self.num_targets() == 1
    }

    /// Human-readable description
    pub fn description(&self) -> String {
        format!(
            "{}-qubit gate '{}' with {} parameter(s)",
            self.num_targets(),
            self.name(),
            self.num_params()
        )
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
