//! Circuit operations
//!
//! An [`Operation`] is one of four variants: a plain gate, a controlled
//! gate, a single-qubit measurement, or a classical branch on a previously
//! measured bit. Operations are validated when they are constructed and are
//! immutable afterwards.

use crate::{Angle, GateKind, QuantumError, QubitId, Result};
use smallvec::SmallVec;
use std::fmt;

/// Identifier of a measured classical bit
///
/// Bits are numbered in the order their `Measure` operations were appended
/// to the circuit, across all branch arms.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct BitId(usize);

impl BitId {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the bit in the circuit's bit table
    #[inline]
    pub const fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for BitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b{}", self.0)
    }
}

/// Handle returned by a measurement, usable as a branch condition
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct MeasuredBit {
    id: BitId,
    qubit: QubitId,
}

impl MeasuredBit {
    pub(crate) const fn new(id: BitId, qubit: QubitId) -> Self {
        Self { id, qubit }
    }

    /// The classical bit this handle refers to
    #[inline]
    pub const fn id(&self) -> BitId {
        self.id
    }

    /// The qubit that was measured
    #[inline]
    pub const fn qubit(&self) -> QubitId {
        self.qubit
    }
}

/// Qubit lists are short; keep them inline
pub type QubitList = SmallVec<[QubitId; 4]>;

/// Angle lists hold at most three entries (U3)
pub type AngleList = SmallVec<[Angle; 3]>;

/// A single step of a circuit
#[derive(Clone, Debug, PartialEq)]
pub enum Operation {
    /// Uncontrolled gate on one or two targets
    Gate {
        kind: GateKind,
        targets: QubitList,
        params: AngleList,
    },
    /// Gate on one target, applied only where every control is |1⟩
    Controlled {
        kind: GateKind,
        controls: QubitList,
        target: QubitId,
        params: AngleList,
    },
    /// Z-basis measurement of one qubit into a classical bit
    Measure { qubit: QubitId, bit: BitId },
    /// Classical branch on an already measured bit
    Branch {
        bit: BitId,
        then_ops: Vec<Operation>,
        else_ops: Vec<Operation>,
    },
}

fn check_bounds(qubit: QubitId, num_qubits: usize) -> Result<()> {
    if qubit.index() >= num_qubits {
        return Err(QuantumError::invalid_qubit(qubit.index(), num_qubits));
    }
    Ok(())
}

fn check_params(kind: GateKind, params: &[Angle]) -> Result<()> {
    if params.len() != kind.num_params() {
        return Err(QuantumError::invalid_parameter_count(
            kind.name(),
            kind.num_params(),
            params.len(),
        ));
    }
    Ok(())
}

fn check_distinct(qubits: &[QubitId]) -> Result<()> {
    for i in 0..qubits.len() {
        for j in (i + 1)..qubits.len() {
            if qubits[i] == qubits[j] {
                return Err(QuantumError::DuplicateQubitReference(qubits[i]));
            }
        }
    }
    Ok(())
}

impl Operation {
    /// Create a validated gate operation
    ///
    /// # Errors
    /// - `InvalidQubitCount` / `InvalidParameterCount` on arity mismatch
    /// - `InvalidQubitIndex` if a target is outside `num_qubits`
    /// - `DuplicateQubitReference` if a target repeats
    pub fn gate(
        kind: GateKind,
        targets: &[QubitId],
        params: &[Angle],
        num_qubits: usize,
    ) -> Result<Self> {
        if targets.len() != kind.num_targets() {
            return Err(QuantumError::invalid_qubit_count(
                kind.name(),
                kind.num_targets(),
                targets.len(),
            ));
        }
        check_params(kind, params)?;
        for &q in targets {
            check_bounds(q, num_qubits)?;
        }
        check_distinct(targets)?;

        Ok(Operation::Gate {
            kind,
            targets: SmallVec::from_slice(targets),
            params: SmallVec::from_slice(params),
        })
    }

    /// Create a validated controlled operation
    ///
    /// # Errors
    /// - `NotControllable` if `kind` has more than one target
    /// - `MissingControls` if `controls` is empty
    /// - `InvalidQubitIndex` if any qubit is outside `num_qubits`
    /// - `DuplicateQubitReference` if a qubit is both control and target,
    ///   or appears twice among the controls
    pub fn controlled(
        kind: GateKind,
        controls: &[QubitId],
        target: QubitId,
        params: &[Angle],
        num_qubits: usize,
    ) -> Result<Self> {
        if !kind.is_controllable() {
            return Err(QuantumError::NotControllable(kind.name()));
        }
        if controls.is_empty() {
            return Err(QuantumError::MissingControls(kind.name()));
        }
        check_params(kind, params)?;
        for &q in controls.iter().chain(std::iter::once(&target)) {
            check_bounds(q, num_qubits)?;
        }
        if controls.contains(&target) {
            return Err(QuantumError::DuplicateQubitReference(target));
        }
        check_distinct(controls)?;

        Ok(Operation::Controlled {
            kind,
            controls: SmallVec::from_slice(controls),
            target,
            params: SmallVec::from_slice(params),
        })
    }

    /// Short name for display and logging
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Gate { kind, .. } | Operation::Controlled { kind, .. } => kind.name(),
            Operation::Measure { .. } => "mz",
            Operation::Branch { .. } => "if",
        }
    }

    /// Whether the operation is a unitary gate
    pub fn is_unitary(&self) -> bool {
        matches!(self, Operation::Gate { .. } | Operation::Controlled { .. })
    }

    /// All qubits the operation touches, including those inside branch arms
    pub fn qubits(&self) -> QubitList {
        match self {
            Operation::Gate { targets, .. } => targets.clone(),
            Operation::Controlled {
                controls, target, ..
            } => {
                let mut qs = controls.clone();
                qs.push(*target);
                qs
            }
            Operation::Measure { qubit, .. } => smallvec::smallvec![*qubit],
            Operation::Branch {
                then_ops, else_ops, ..
            } => {
                let mut qs = QubitList::new();
                for op in then_ops.iter().chain(else_ops) {
                    for q in op.qubits() {
                        if !qs.contains(&q) {
                            qs.push(q);
                        }
                    }
                }
                qs
            }
        }
    }

    /// Angle parameters of a gate (empty for measurements and branches)
    pub fn params(&self) -> &[Angle] {
        match self {
            Operation::Gate { params, .. } | Operation::Controlled { params, .. } => params,
            _ => &[],
        }
    }

    /// Number of gate operations, counting branch arms recursively
    pub fn gate_count(&self) -> usize {
        match self {
            Operation::Gate { .. } | Operation::Controlled { .. } => 1,
            Operation::Measure { .. } => 0,
            Operation::Branch {
                then_ops, else_ops, ..
            } => then_ops
                .iter()
                .chain(else_ops)
                .map(Operation::gate_count)
                .sum(),
        }
    }

    /// Whether the operation is, or contains, a measurement
    pub fn has_measurement(&self) -> bool {
        match self {
            Operation::Measure { .. } => true,
            Operation::Branch {
                then_ops, else_ops, ..
            } => then_ops
                .iter()
                .chain(else_ops)
                .any(Operation::has_measurement),
            _ => false,
        }
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Gate {
                kind,
                targets,
                params,
            } => {
                write!(f, "{}", kind)?;
                if !params.is_empty() {
                    write!(f, "(")?;
                    write_list(f, params)?;
                    write!(f, ")")?;
                }
                write!(f, " ")?;
                write_list(f, targets)
            }
            Operation::Controlled {
                kind,
                controls,
                target,
                params,
            } => {
                write!(f, "{}.ctrl", kind)?;
                if !params.is_empty() {
                    write!(f, "(")?;
                    write_list(f, params)?;
                    write!(f, ")")?;
                }
                write!(f, " [")?;
                write_list(f, controls)?;
                write!(f, "] {}", target)
            }
            Operation::Measure { qubit, bit } => write!(f, "mz {} -> {}", qubit, bit),
            Operation::Branch {
                bit,
                then_ops,
                else_ops,
            } => write!(
                f,
                "if {} {{ {} ops }} else {{ {} ops }}",
                bit,
                then_ops.len(),
                else_ops.len()
            ),
        }
    }
}
