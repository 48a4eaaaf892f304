//! Spin Hamiltonians as sums of Pauli terms
//!
//! Hamiltonians are built with ordinary arithmetic on the [`spin`]
//! constructors:
//!
//! ```
//! use qkern_state::spin::{x, y, z};
//!
//! let h = 5.907 - 2.1433 * x(0) * x(1) - 2.1433 * y(0) * y(1) + 0.21829 * z(0)
//!     - 6.125 * z(1);
//! assert_eq!(h.term_count(), 5);
//! assert_eq!(h.num_qubits(), 2);
//! ```
//!
//! Addition concatenates terms and never merges them; call
//! [`Hamiltonian::simplified`] to combine like terms.

use crate::dense_state::DenseState;
use crate::error::{Result, StateError};
use crate::observable::{write_coefficient, Pauli, PauliTerm};
use num_complex::Complex64;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Coefficients with magnitude at or below this are dropped by `simplified`
const ZERO_COEFFICIENT: f64 = 1e-15;

/// A weighted sum of Pauli products
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Hamiltonian {
    terms: Vec<PauliTerm>,
}

/// Single-qubit spin operators
pub mod spin {
    use super::Hamiltonian;
    use crate::observable::{Pauli, PauliTerm};

    fn single(qubit: usize, pauli: Pauli) -> Hamiltonian {
        Hamiltonian::from_terms([PauliTerm::new(1.0, [(qubit, pauli)])])
    }

    /// Identity on `qubit`
    pub fn i(qubit: usize) -> Hamiltonian {
        single(qubit, Pauli::I)
    }

    /// Pauli X on `qubit`
    pub fn x(qubit: usize) -> Hamiltonian {
        single(qubit, Pauli::X)
    }

    /// Pauli Y on `qubit`
    pub fn y(qubit: usize) -> Hamiltonian {
        single(qubit, Pauli::Y)
    }

    /// Pauli Z on `qubit`
    pub fn z(qubit: usize) -> Hamiltonian {
        single(qubit, Pauli::Z)
    }
}

impl Hamiltonian {
    /// An empty (zero) Hamiltonian
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from explicit terms, kept in order
    pub fn from_terms(terms: impl IntoIterator<Item = PauliTerm>) -> Self {
        Self {
            terms: terms.into_iter().collect(),
        }
    }

    /// A constant multiple of the identity
    pub fn constant(value: f64) -> Self {
        Self::from_terms([PauliTerm::constant(value)])
    }

    /// Append one term
    pub fn push(&mut self, term: PauliTerm) {
        self.terms.push(term);
    }

    /// The terms in insertion order
    #[inline]
    pub fn terms(&self) -> &[PauliTerm] {
        &self.terms
    }

    /// Number of terms
    #[inline]
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Whether there are no terms
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Coefficient of each term, in order
    pub fn coefficients(&self) -> Vec<Complex64> {
        self.terms.iter().map(PauliTerm::coefficient).collect()
    }

    /// Number of qubits spanned by the operator
    pub fn num_qubits(&self) -> usize {
        self.terms
            .iter()
            .map(PauliTerm::min_qubits)
            .max()
            .unwrap_or(0)
    }

    /// Sum of the identity coefficients
    pub fn constant_part(&self) -> Complex64 {
        self.terms
            .iter()
            .filter(|t| t.is_identity())
            .map(PauliTerm::coefficient)
            .sum()
    }

    /// Whether every coefficient is real
    pub fn is_hermitian(&self) -> bool {
        self.terms.iter().all(|t| t.coefficient().im == 0.0)
    }

    /// Combine like terms and drop zero coefficients
    ///
    /// Terms keep the position of their first occurrence.
    pub fn simplified(&self) -> Self {
        let mut merged: Vec<PauliTerm> = Vec::with_capacity(self.terms.len());
        for term in &self.terms {
            match merged.iter_mut().find(|m| m.same_support(term)) {
                Some(existing) => existing.add_coefficient(term.coefficient()),
                None => merged.push(term.clone()),
            }
        }
        merged.retain(|t| t.coefficient().norm() > ZERO_COEFFICIENT);
        Self { terms: merged }
    }

    /// `⟨P_k⟩` for every term, without coefficients
    ///
    /// # Errors
    /// `InvalidQubitIndex` if a term acts outside the state
    pub fn term_expectations(&self, state: &DenseState) -> Result<Vec<Complex64>> {
        self.terms
            .iter()
            .map(|t| t.pauli_expectation(state))
            .collect()
    }

    /// `⟨ψ|H|ψ⟩ = Σ_k c_k ⟨ψ|P_k|ψ⟩`
    ///
    /// # Errors
    /// - `InvalidQubitIndex` if a term acts outside the state
    /// - `NonHermitianObservable` if the imaginary part exceeds `tolerance`
    ///
    /// # Example
    /// ```
    /// use qkern_state::{spin::z, DenseState};
    ///
    /// let state = DenseState::new(2).unwrap();
    /// let h = 0.5 * z(0) + 2.0 * z(1) + 1.0;
    /// assert!((h.expectation(&state, 1e-9).unwrap() - 3.5).abs() < 1e-12);
    /// ```
    pub fn expectation(&self, state: &DenseState, tolerance: f64) -> Result<f64> {
        let values = self.term_expectations(state)?;
        self.combine(&values, tolerance)
    }

    /// Weight per-term Pauli expectations by the coefficients and sum
    ///
    /// `values[k]` is `⟨P_k⟩` for the k-th term, measured or computed exactly.
    ///
    /// # Errors
    /// - `DimensionMismatch` unless there is one value per term
    /// - `NonHermitianObservable` if the imaginary part exceeds `tolerance`
    pub fn combine(&self, values: &[Complex64], tolerance: f64) -> Result<f64> {
        if values.len() != self.terms.len() {
            return Err(StateError::DimensionMismatch {
                expected: self.terms.len(),
                actual: values.len(),
            });
        }
        let total: Complex64 = self
            .terms
            .iter()
            .zip(values)
            .map(|(t, v)| t.coefficient() * v)
            .sum();
        if total.im.abs() > tolerance {
            return Err(StateError::NonHermitianObservable {
                imaginary: total.im,
                tolerance,
            });
        }
        Ok(total.re)
    }

    fn scale(mut self, factor: Complex64) -> Self {
        for term in &mut self.terms {
            term.scale(factor);
        }
        self
    }
}

impl From<PauliTerm> for Hamiltonian {
    fn from(term: PauliTerm) -> Self {
        Self::from_terms([term])
    }
}

impl FromIterator<PauliTerm> for Hamiltonian {
    fn from_iter<I: IntoIterator<Item = PauliTerm>>(iter: I) -> Self {
        Self::from_terms(iter)
    }
}

impl Sum for Hamiltonian {
    fn sum<I: Iterator<Item = Hamiltonian>>(iter: I) -> Self {
        iter.fold(Hamiltonian::new(), |acc, h| acc + h)
    }
}

impl<'a> IntoIterator for &'a Hamiltonian {
    type Item = &'a PauliTerm;
    type IntoIter = std::slice::Iter<'a, PauliTerm>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.iter()
    }
}

impl Add for Hamiltonian {
    type Output = Hamiltonian;

    fn add(mut self, rhs: Hamiltonian) -> Hamiltonian {
        self.terms.extend(rhs.terms);
        self
    }
}

impl Add<f64> for Hamiltonian {
    type Output = Hamiltonian;

    fn add(self, rhs: f64) -> Hamiltonian {
        self + Hamiltonian::constant(rhs)
    }
}

impl Add<Hamiltonian> for f64 {
    type Output = Hamiltonian;

    fn add(self, rhs: Hamiltonian) -> Hamiltonian {
        Hamiltonian::constant(self) + rhs
    }
}

impl AddAssign for Hamiltonian {
    fn add_assign(&mut self, rhs: Hamiltonian) {
        self.terms.extend(rhs.terms);
    }
}

impl AddAssign<f64> for Hamiltonian {
    fn add_assign(&mut self, rhs: f64) {
        self.terms.push(PauliTerm::constant(rhs));
    }
}

impl Neg for Hamiltonian {
    type Output = Hamiltonian;

    fn neg(self) -> Hamiltonian {
        self.scale(Complex64::new(-1.0, 0.0))
    }
}

impl Sub for Hamiltonian {
    type Output = Hamiltonian;

    fn sub(self, rhs: Hamiltonian) -> Hamiltonian {
        self + (-rhs)
    }
}

impl Sub<f64> for Hamiltonian {
    type Output = Hamiltonian;

    fn sub(self, rhs: f64) -> Hamiltonian {
        self + Hamiltonian::constant(-rhs)
    }
}

impl Sub<Hamiltonian> for f64 {
    type Output = Hamiltonian;

    fn sub(self, rhs: Hamiltonian) -> Hamiltonian {
        Hamiltonian::constant(self) + (-rhs)
    }
}

impl SubAssign for Hamiltonian {
    fn sub_assign(&mut self, rhs: Hamiltonian) {
        self.terms.extend((-rhs).terms);
    }
}

impl SubAssign<f64> for Hamiltonian {
    fn sub_assign(&mut self, rhs: f64) {
        self.terms.push(PauliTerm::constant(-rhs));
    }
}

impl Mul<f64> for Hamiltonian {
    type Output = Hamiltonian;

    fn mul(self, rhs: f64) -> Hamiltonian {
        self.scale(Complex64::new(rhs, 0.0))
    }
}

impl Mul<Hamiltonian> for f64 {
    type Output = Hamiltonian;

    fn mul(self, rhs: Hamiltonian) -> Hamiltonian {
        rhs * self
    }
}

impl MulAssign<f64> for Hamiltonian {
    fn mul_assign(&mut self, rhs: f64) {
        for term in &mut self.terms {
            term.scale(Complex64::new(rhs, 0.0));
        }
    }
}

/// Operator product; distributes over both sums
impl Mul for Hamiltonian {
    type Output = Hamiltonian;

    fn mul(self, rhs: Hamiltonian) -> Hamiltonian {
        let mut terms = Vec::with_capacity(self.terms.len() * rhs.terms.len());
        for a in &self.terms {
            for b in &rhs.terms {
                terms.push(a.product(b));
            }
        }
        Hamiltonian { terms }
    }
}

impl fmt::Display for Hamiltonian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        for (k, term) in self.terms.iter().enumerate() {
            write_coefficient(f, term.coefficient(), k == 0)?;
            for (q, p) in term.factors() {
                write!(f, " {}{}", p, q)?;
            }
        }
        Ok(())
    }
}

impl Pauli {
    /// This Pauli on `qubit` as a one-term Hamiltonian
    pub fn on(self, qubit: usize) -> Hamiltonian {
        Hamiltonian::from_terms([PauliTerm::new(1.0, [(qubit, self)])])
    }
}

#[cfg(test)]
mod tests {
    use super::spin::{i, x, y, z};
    use super::*;
    use approx::assert_relative_eq;

    fn deuteron() -> Hamiltonian {
        5.907 - 2.1433 * x(0) * x(1) - 2.1433 * y(0) * y(1) + 0.21829 * z(0) - 6.125 * z(1)
    }

    #[test]
    fn test_addition_keeps_terms_separate() {
        let h = z(0) + z(0);
        assert_eq!(h.term_count(), 2);
        let s = h.simplified();
        assert_eq!(s.term_count(), 1);
        assert_eq!(s.coefficients(), vec![Complex64::new(2.0, 0.0)]);
    }

    #[test]
    fn test_simplified_drops_cancelled_terms() {
        let h = x(0) * x(1) + z(2) - x(0) * x(1);
        let s = h.simplified();
        assert_eq!(s.term_count(), 1);
        assert_eq!(s.terms()[0].factors(), &[(2, Pauli::Z)]);
    }

    #[test]
    fn test_product_uses_pauli_algebra() {
        let h = x(0) * y(0);
        assert_eq!(h.term_count(), 1);
        assert_eq!(h.terms()[0].factors(), &[(0, Pauli::Z)]);
        assert_eq!(h.coefficients()[0], Complex64::new(0.0, 1.0));
        assert!(!h.is_hermitian());
    }

    #[test]
    fn test_product_distributes() {
        let h = (x(0) + z(1)) * (x(0) + 2.0);
        // X0·X0 + 2 X0 + Z1 X0 + 2 Z1
        assert_eq!(h.term_count(), 4);
        assert!(h.terms()[0].is_identity());
        assert_eq!(h.constant_part(), Complex64::new(1.0, 0.0));
    }

    #[test]
    fn test_identity_constructor() {
        let h = 3.0 * i(4);
        assert_eq!(h.constant_part(), Complex64::new(3.0, 0.0));
        assert_eq!(h.num_qubits(), 0);
    }

    #[test]
    fn test_scalar_forms() {
        let mut h = z(0);
        h += 1.0;
        h -= 0.5;
        h *= 2.0;
        assert_eq!(h.simplified().constant_part(), Complex64::new(1.0, 0.0));
        assert_eq!((1.0 - z(0)).coefficients()[1], Complex64::new(-1.0, 0.0));
    }

    #[test]
    fn test_add_assign_appends_in_order() {
        let mut h = 0.5 * z(0) + x(1) + y(0) + y(0) * y(1) + x(0) * y(1) * z(2);
        assert_eq!(h.term_count(), 5);
        for q in 0..2 {
            h += -2.0 * z(q) * z(q + 1);
        }
        assert_eq!(h.term_count(), 7);
        assert_eq!(h.terms()[3].factors(), &[(0, Pauli::Y), (1, Pauli::Y)]);
        assert_eq!(h.terms()[5].factors(), &[(0, Pauli::Z), (1, Pauli::Z)]);
        assert_eq!(h.terms()[6].factors(), &[(1, Pauli::Z), (2, Pauli::Z)]);
        assert_eq!(h.coefficients()[6], Complex64::new(-2.0, 0.0));

        // an equal-support term is appended, not merged
        h += 3.0 * x(1);
        assert_eq!(h.term_count(), 8);
        assert_eq!(h.simplified().term_count(), 7);
    }

    #[test]
    fn test_display() {
        let h = 2.0 * z(0) * z(1) - 0.5 * x(2) + 1.0;
        assert_eq!(h.to_string(), "2 Z0 Z1 - 0.5 X2 + 1");
        assert_eq!(Hamiltonian::new().to_string(), "0");
    }

    #[test]
    fn test_deuteron_shape() {
        let h = deuteron();
        assert_eq!(h.term_count(), 5);
        assert_eq!(h.num_qubits(), 2);
        assert!(h.is_hermitian());
        assert_relative_eq!(h.constant_part().re, 5.907);
    }

    #[test]
    fn test_expectation_on_basis_state() {
        // |01⟩ in little-endian: qubit 0 set
        let one = Complex64::new(1.0, 0.0);
        let zero = Complex64::new(0.0, 0.0);
        let state = DenseState::from_amplitudes(2, &[zero, one, zero, zero]).unwrap();
        let e = deuteron().expectation(&state, 1e-9).unwrap();
        // XX and YY vanish; Z0 = -1, Z1 = +1
        assert_relative_eq!(e, 5.907 - 0.21829 - 6.125, epsilon = 1e-12);
    }

    #[test]
    fn test_non_hermitian_rejected() {
        let state = DenseState::new(1).unwrap();
        let h = x(0) * y(0);
        assert!(matches!(
            h.expectation(&state, 1e-9),
            Err(StateError::NonHermitianObservable { .. })
        ));
    }

    #[test]
    fn test_sum_and_collect() {
        let h: Hamiltonian = (0..3).map(z).sum();
        assert_eq!(h.term_count(), 3);
        let collected: Hamiltonian = h.terms().iter().cloned().collect();
        assert_eq!(collected, h);
        assert_eq!(Pauli::Z.on(1), z(1));
    }
}
