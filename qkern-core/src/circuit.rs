//! Quantum circuit representation

use crate::operation::{BitId, Operation};
use crate::QubitId;
use std::fmt;

/// Bookkeeping for one measured classical bit
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitInfo {
    /// Qubit the bit was read from
    pub qubit: QubitId,
    /// Optional user label (`aux = mz(ancilla)` in kernel code)
    pub label: Option<String>,
}

/// A built quantum circuit
///
/// Produced by [`CircuitBuilder::build`](crate::CircuitBuilder::build).
/// A circuit is an immutable value: executing it never changes it, and it
/// can be shared by reference between threads running independent shots.
///
/// # Example
/// ```
/// use qkern_core::CircuitBuilder;
///
/// let mut builder = CircuitBuilder::new();
/// let q = builder.allocate(2).unwrap();
/// builder.h(q.qubit(0).unwrap()).unwrap();
/// builder.cx(q.qubit(0).unwrap(), q.qubit(1).unwrap()).unwrap();
/// builder.measure_all(&q).unwrap();
///
/// let circuit = builder.build();
/// assert_eq!(circuit.num_qubits(), 2);
/// assert_eq!(circuit.len(), 4);
/// assert_eq!(circuit.num_bits(), 2);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Circuit {
    num_qubits: usize,
    num_params: usize,
    operations: Vec<Operation>,
    bits: Vec<BitInfo>,
}

impl Circuit {
    pub(crate) fn from_parts(
        num_qubits: usize,
        num_params: usize,
        operations: Vec<Operation>,
        bits: Vec<BitInfo>,
    ) -> Self {
        Self {
            num_qubits,
            num_params,
            operations,
            bits,
        }
    }

    /// Number of qubits in the register
    #[inline]
    pub const fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of late-bound parameters the circuit expects
    #[inline]
    pub const fn num_parameters(&self) -> usize {
        self.num_params
    }

    /// Number of classical bits declared by measurements (all branch arms)
    #[inline]
    pub fn num_bits(&self) -> usize {
        self.bits.len()
    }

    /// Number of top-level operations
    #[inline]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Whether the circuit has no operations
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Iterate over the top-level operations
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter()
    }

    /// Top-level operations as a slice
    pub fn as_slice(&self) -> &[Operation] {
        &self.operations
    }

    /// Get a specific top-level operation
    pub fn get_operation(&self, index: usize) -> Option<&Operation> {
        self.operations.get(index)
    }

    /// Metadata of every measured bit, indexed by [`BitId::index`]
    pub fn bits(&self) -> &[BitInfo] {
        &self.bits
    }

    /// Metadata of a measured bit
    pub fn bit(&self, bit: BitId) -> Option<&BitInfo> {
        self.bits.get(bit.index())
    }

    /// Label of a measured bit, if one was given
    pub fn bit_label(&self, bit: BitId) -> Option<&str> {
        self.bit(bit).and_then(|info| info.label.as_deref())
    }

    /// Whether any operation measures a qubit
    pub fn has_measurements(&self) -> bool {
        self.operations.iter().any(Operation::has_measurement)
    }

    /// Total number of gates, counting both arms of every branch
    pub fn gate_count(&self) -> usize {
        self.operations.iter().map(Operation::gate_count).sum()
    }

    /// Circuit depth: the longest chain of operations sharing a qubit
    ///
    /// A branch counts as one layer on every qubit it touches.
    pub fn depth(&self) -> usize {
        let mut layers = vec![0usize; self.num_qubits];
        for op in &self.operations {
            let qubits = op.qubits();
            let Some(level) = qubits.iter().map(|q| layers[q.index()]).max() else {
                continue;
            };
            for q in qubits {
                layers[q.index()] = level + 1;
            }
        }
        layers.into_iter().max().unwrap_or(0)
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Circuit({} qubits, {} parameters, {} operations)",
            self.num_qubits,
            self.num_params,
            self.len()
        )?;
        for (i, op) in self.operations.iter().enumerate() {
            writeln!(f, "  {}: {}", i, op)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{CircuitBuilder, GateKind};

    #[test]
    fn test_empty_circuit() {
        let mut builder = CircuitBuilder::new();
        builder.allocate(3).unwrap();
        let circuit = builder.build();

        assert_eq!(circuit.num_qubits(), 3);
        assert!(circuit.is_empty());
        assert_eq!(circuit.depth(), 0);
        assert!(!circuit.has_measurements());
    }

    #[test]
    fn test_depth_tracks_parallel_layers() {
        let mut builder = CircuitBuilder::new();
        let q = builder.allocate(3).unwrap();
        let [a, b, c] = [q.qubit(0).unwrap(), q.qubit(1).unwrap(), q.qubit(2).unwrap()];

        builder.h(a).unwrap();
        builder.h(b).unwrap();
        builder.h(c).unwrap();

        builder.cx(a, b).unwrap();
        builder.cx(b, c).unwrap();
        let circuit = builder.build();

        assert_eq!(circuit.len(), 5);
        assert_eq!(circuit.depth(), 3);
        assert_eq!(circuit.gate_count(), 5);
    }

    #[test]
    fn test_bit_labels() {
        let mut builder = CircuitBuilder::new();
        let anc = builder.qubit();
        let bit = builder.measure_named(anc, "aux").unwrap();
        let circuit = builder.build();

        assert_eq!(circuit.num_bits(), 1);
        assert_eq!(circuit.bit_label(bit.id()), Some("aux"));
        assert_eq!(circuit.bit(bit.id()).unwrap().qubit, anc);
        assert!(circuit.has_measurements());
    }

    #[test]
    fn test_display_lists_operations() {
        let mut builder = CircuitBuilder::new();
        let q = builder.qubit();
        builder.gate(GateKind::H, &[q], &[]).unwrap();
        let display = builder.build().to_string();

        assert!(display.contains("1 qubits"));
        assert!(display.contains("0: h q0"));
    }
}
