//! Qubit addressing: single qubit identifiers and register windows

use crate::{QuantumError, Result};
use std::fmt;
use std::ops::Range;

/// Type-safe identifier for a qubit
///
/// The index is global to the circuit: qubit `q` is bit `q` of an
/// amplitude index.
///
/// # Example
/// ```
/// use qkern_core::QubitId;
///
/// let q0 = QubitId::new(0);
/// let q1 = QubitId::new(1);
/// assert!(q0 < q1);
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct QubitId(usize);

impl QubitId {
    /// Create a new qubit identifier
    #[inline]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    /// Get the underlying index
    #[inline]
    pub const fn index(&self) -> usize {
        self.0
    }

    /// Bit mask selecting this qubit in an amplitude index
    #[inline]
    pub const fn mask(&self) -> usize {
        1 << self.0
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<usize> for QubitId {
    #[inline]
    fn from(id: usize) -> Self {
        Self::new(id)
    }
}

impl From<QubitId> for usize {
    #[inline]
    fn from(qid: QubitId) -> Self {
        qid.index()
    }
}

/// A contiguous window of qubits handed out by
/// [`CircuitBuilder::allocate`](crate::CircuitBuilder::allocate)
///
/// Registers are plain handles: copying one does not allocate anything.
/// Indexing is relative to the start of the window and bounds-checked.
///
/// # Example
/// ```
/// use qkern_core::CircuitBuilder;
///
/// let mut builder = CircuitBuilder::new();
/// let data = builder.allocate(3).unwrap();
/// let ancilla = builder.qubit();
///
/// assert_eq!(data.len(), 3);
/// assert_eq!(ancilla.index(), 3);
/// assert!(data.qubit(3).is_err());
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Register {
    offset: usize,
    len: usize,
}

impl Register {
    pub(crate) const fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    /// Number of qubits in the register
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Registers are never empty once allocated; views may be
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Global index of the first qubit
    #[inline]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Get the `i`-th qubit of the register
    ///
    /// # Errors
    /// `InvalidQubitIndex` if `i >= len()`
    pub fn qubit(&self, i: usize) -> Result<QubitId> {
        if i >= self.len {
            return Err(QuantumError::invalid_qubit(i, self.len));
        }
        Ok(QubitId::new(self.offset + i))
    }

    /// The first `count` qubits as a new view
    pub fn front(&self, count: usize) -> Result<Register> {
        if count > self.len {
            return Err(QuantumError::invalid_qubit(count, self.len));
        }
        Ok(Register::new(self.offset, count))
    }

    /// The last qubit of the register
    pub fn back(&self) -> QubitId {
        // len >= 1 for every allocated register; views built through
        // `front(0)`/`slice` can be empty, in which case this points at offset
        QubitId::new(self.offset + self.len.saturating_sub(1))
    }

    /// A sub-range of the register as a new view
    pub fn slice(&self, range: Range<usize>) -> Result<Register> {
        if range.start > range.end {
            return Err(QuantumError::invalid_qubit(range.start, range.end));
        }
        if range.end > self.len {
            return Err(QuantumError::invalid_qubit(range.end, self.len));
        }
        Ok(Register::new(self.offset + range.start, range.end - range.start))
    }

    /// Iterate over the qubits in register order
    pub fn iter(&self) -> impl Iterator<Item = QubitId> + '_ {
        (self.offset..self.offset + self.len).map(QubitId::new)
    }

    /// Collect the qubits into a vector
    pub fn to_vec(&self) -> Vec<QubitId> {
        self.iter().collect()
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q[{}..{}]", self.offset, self.offset + self.len)
    }
}
