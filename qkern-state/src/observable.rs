//! Pauli operators and weighted Pauli products
//!
//! A [`PauliTerm`] is `c · P_{q0} ⊗ P_{q1} ⊗ …` with a complex coefficient.
//! Identity factors are never stored; a term without factors is a constant.

use crate::dense_state::DenseState;
use crate::error::{Result, StateError};
use num_complex::Complex64;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Single-qubit Pauli operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Pauli {
    /// Identity operator
    I,
    /// Pauli X (bit flip)
    X,
    /// Pauli Y (bit flip with phase)
    Y,
    /// Pauli Z (phase flip)
    Z,
}

impl Pauli {
    /// Character representation
    pub fn to_char(self) -> char {
        match self {
            Pauli::I => 'I',
            Pauli::X => 'X',
            Pauli::Y => 'Y',
            Pauli::Z => 'Z',
        }
    }

    /// Whether this Pauli is diagonal (I or Z)
    pub fn is_diagonal(self) -> bool {
        matches!(self, Pauli::I | Pauli::Z)
    }

    /// Product `self · other` as `(phase, pauli)`
    ///
    /// ```
    /// use qkern_state::Pauli;
    /// use num_complex::Complex64;
    ///
    /// // X·Y = iZ
    /// assert_eq!(Pauli::X.product(Pauli::Y), (Complex64::new(0.0, 1.0), Pauli::Z));
    /// ```
    pub fn product(self, other: Pauli) -> (Complex64, Pauli) {
        let one = Complex64::new(1.0, 0.0);
        let i = Complex64::new(0.0, 1.0);
        match (self, other) {
            (Pauli::I, p) | (p, Pauli::I) => (one, p),
            (a, b) if a == b => (one, Pauli::I),
            (Pauli::X, Pauli::Y) => (i, Pauli::Z),
            (Pauli::Y, Pauli::X) => (-i, Pauli::Z),
            (Pauli::Y, Pauli::Z) => (i, Pauli::X),
            (Pauli::Z, Pauli::Y) => (-i, Pauli::X),
            (Pauli::Z, Pauli::X) => (i, Pauli::Y),
            (Pauli::X, Pauli::Z) => (-i, Pauli::Y),
            // all pairs are covered above
            (_, p) => (one, p),
        }
    }
}

impl fmt::Display for Pauli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A weighted tensor product of Pauli operators
///
/// Factors are kept sorted by qubit with at most one factor per qubit.
///
/// # Example
/// ```
/// use qkern_state::{Pauli, PauliTerm};
///
/// let zz = PauliTerm::new(-2.1433, [(0, Pauli::Z), (1, Pauli::Z)]);
/// assert_eq!(zz.to_string(), "-2.1433 Z0 Z1");
/// assert_eq!(zz.weight(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PauliTerm {
    coefficient: Complex64,
    factors: Vec<(usize, Pauli)>,
}

impl PauliTerm {
    /// Build a term from a real coefficient and Pauli factors
    ///
    /// Factors are multiplied left to right, so repeated qubits combine by
    /// the Pauli algebra and may leave a complex phase on the coefficient.
    pub fn new(coefficient: f64, factors: impl IntoIterator<Item = (usize, Pauli)>) -> Self {
        let mut term = Self::constant(coefficient);
        for (qubit, pauli) in factors {
            term.multiply_factor(qubit, pauli);
        }
        term
    }

    /// A constant (identity) term
    pub fn constant(coefficient: f64) -> Self {
        Self {
            coefficient: Complex64::new(coefficient, 0.0),
            factors: Vec::new(),
        }
    }

    /// The coefficient
    #[inline]
    pub fn coefficient(&self) -> Complex64 {
        self.coefficient
    }

    /// Non-identity factors sorted by qubit
    #[inline]
    pub fn factors(&self) -> &[(usize, Pauli)] {
        &self.factors
    }

    /// Number of non-identity factors
    #[inline]
    pub fn weight(&self) -> usize {
        self.factors.len()
    }

    /// Whether the term is a constant
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.factors.is_empty()
    }

    /// Whether every factor is diagonal in the Z basis
    pub fn is_diagonal(&self) -> bool {
        self.factors.iter().all(|(_, p)| p.is_diagonal())
    }

    /// Number of qubits needed to hold the term
    pub fn min_qubits(&self) -> usize {
        self.factors.last().map_or(0, |(q, _)| q + 1)
    }

    /// Whether two terms act with the same Paulis on the same qubits
    pub fn same_support(&self, other: &PauliTerm) -> bool {
        self.factors == other.factors
    }

    pub(crate) fn scale(&mut self, factor: Complex64) {
        self.coefficient *= factor;
    }

    pub(crate) fn add_coefficient(&mut self, delta: Complex64) {
        self.coefficient += delta;
    }

    fn multiply_factor(&mut self, qubit: usize, pauli: Pauli) {
        match self.factors.binary_search_by_key(&qubit, |&(q, _)| q) {
            Ok(pos) => {
                let (phase, merged) = self.factors[pos].1.product(pauli);
                self.coefficient *= phase;
                if merged == Pauli::I {
                    self.factors.remove(pos);
                } else {
                    self.factors[pos].1 = merged;
                }
            }
            Err(pos) => {
                if pauli != Pauli::I {
                    self.factors.insert(pos, (qubit, pauli));
                }
            }
        }
    }

    /// Operator product `self · other`
    pub fn product(&self, other: &PauliTerm) -> PauliTerm {
        let mut out = self.clone();
        out.coefficient *= other.coefficient;
        for &(qubit, pauli) in &other.factors {
            out.multiply_factor(qubit, pauli);
        }
        out
    }

    fn masks(&self) -> (usize, usize, u32) {
        let mut flip = 0usize;
        let mut sign = 0usize;
        let mut num_y = 0u32;
        for &(q, p) in &self.factors {
            let bit = 1usize << q;
            match p {
                Pauli::I => {}
                Pauli::X => flip |= bit,
                Pauli::Y => {
                    flip |= bit;
                    sign |= bit;
                    num_y += 1;
                }
                Pauli::Z => sign |= bit,
            }
        }
        (flip, sign, num_y)
    }

    /// `P|ψ⟩` for the bare Pauli product (coefficient not applied)
    ///
    /// # Errors
    /// `InvalidQubitIndex` if a factor lies outside the state
    pub fn apply_to(&self, state: &DenseState) -> Result<DenseState> {
        if let Some(&(q, _)) = self.factors.last() {
            if q >= state.num_qubits() {
                return Err(StateError::InvalidQubitIndex {
                    index: q,
                    num_qubits: state.num_qubits(),
                });
            }
        }

        // Y|b⟩ = i(-1)^b |1-b⟩, Z|b⟩ = (-1)^b |b⟩
        let (flip, sign, num_y) = self.masks();
        let global = Complex64::new(0.0, 1.0).powu(num_y);
        let mut out = state.clone();
        let target = out.amplitudes_mut();
        for (i, &amp) in state.amplitudes().iter().enumerate() {
            let phase = if (i & sign).count_ones() % 2 == 1 {
                -global
            } else {
                global
            };
            target[i ^ flip] = amp * phase;
        }
        Ok(out)
    }

    /// `⟨ψ|P|ψ⟩` for the bare Pauli product
    pub fn pauli_expectation(&self, state: &DenseState) -> Result<Complex64> {
        if self.is_identity() {
            return Ok(Complex64::new(state.norm_sqr(), 0.0));
        }
        let applied = self.apply_to(state)?;
        state.inner_product(&applied)
    }

    /// Eigenvalue (±1) of a diagonal term on a basis state, without the coefficient
    pub fn parity(&self, basis_state: usize) -> f64 {
        let (_, sign, _) = self.masks();
        if (basis_state & sign).count_ones() % 2 == 1 {
            -1.0
        } else {
            1.0
        }
    }
}

pub(crate) fn write_coefficient(f: &mut fmt::Formatter<'_>, c: Complex64, leading: bool) -> fmt::Result {
    if c.im == 0.0 {
        match (leading, c.re < 0.0) {
            (true, _) => write!(f, "{}", c.re),
            (false, true) => write!(f, " - {}", -c.re),
            (false, false) => write!(f, " + {}", c.re),
        }
    } else {
        if !leading {
            write!(f, " + ")?;
        }
        write!(f, "({}{:+}i)", c.re, c.im)
    }
}

impl fmt::Display for PauliTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_coefficient(f, self.coefficient, true)?;
        for (q, p) in &self.factors {
            write!(f, " {}{}", p, q)?;
        }
        Ok(())
    }
}
