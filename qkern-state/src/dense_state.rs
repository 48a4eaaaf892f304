//! Dense state vector
//!
//! Amplitude index bit `q` is the state of qubit `q` (little-endian), so
//! `|q1 q0⟩ = |10⟩` lives at index 2.

use crate::error::{Result, StateError};
use crate::kernels::{self, Matrix2x2, Matrix4x4};
use num_complex::Complex64;
use std::fmt;

/// Largest register the engine will allocate (16 GiB of amplitudes)
pub const MAX_QUBITS: usize = 30;

/// Kernels switch to rayon from this many qubits on, unless overridden
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 14;

/// Dense quantum state of `n` qubits held as `2^n` complex amplitudes
///
/// # Example
///
/// ```
/// use qkern_state::DenseState;
/// use num_complex::Complex64;
///
/// let mut state = DenseState::new(2).unwrap();
///
/// let h = Complex64::new(std::f64::consts::FRAC_1_SQRT_2, 0.0);
/// state.apply_single_qubit_gate(&[[h, h], [h, -h]], 0).unwrap();
///
/// assert_eq!(state.num_qubits(), 2);
/// assert!(state.is_normalized(1e-10));
/// assert!((state.probability_of_one(0).unwrap() - 0.5).abs() < 1e-12);
/// ```
#[derive(Clone, PartialEq)]
pub struct DenseState {
    amplitudes: Vec<Complex64>,
    num_qubits: usize,
    parallel_threshold: usize,
}

impl DenseState {
    /// Create a new state initialized to |0...0⟩
    ///
    /// # Errors
    /// `TooManyQubits` above [`MAX_QUBITS`], checked before allocating
    pub fn new(num_qubits: usize) -> Result<Self> {
        check_size(num_qubits)?;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 1 << num_qubits];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Ok(Self {
            amplitudes,
            num_qubits,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        })
    }

    /// Create a state from raw amplitudes
    ///
    /// The amplitudes are taken as given; call [`normalize`](Self::normalize)
    /// if they are not already unit-norm.
    ///
    /// # Errors
    /// `DimensionMismatch` unless `amplitudes.len() == 2^num_qubits`
    pub fn from_amplitudes(num_qubits: usize, amplitudes: &[Complex64]) -> Result<Self> {
        check_size(num_qubits)?;
        let expected = 1usize << num_qubits;
        if amplitudes.len() != expected {
            return Err(StateError::DimensionMismatch {
                expected,
                actual: amplitudes.len(),
            });
        }
        Ok(Self {
            amplitudes: amplitudes.to_vec(),
            num_qubits,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        })
    }

    /// Set the qubit count from which kernels run on the rayon pool
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Number of qubits
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// State dimension (2^num_qubits)
    #[inline]
    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    /// All amplitudes
    #[inline]
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Amplitude of one basis state
    pub fn amplitude(&self, basis_state: usize) -> Option<Complex64> {
        self.amplitudes.get(basis_state).copied()
    }

    #[inline]
    pub(crate) fn amplitudes_mut(&mut self) -> &mut [Complex64] {
        &mut self.amplitudes
    }

    /// Whether kernels on this state run on the rayon pool
    #[inline]
    pub fn is_parallel(&self) -> bool {
        self.num_qubits >= self.parallel_threshold
    }

    /// Squared norm Σ|a_i|²
    pub fn norm_sqr(&self) -> f64 {
        kernels::sum_probabilities(&self.amplitudes, self.is_parallel(), |_| true)
    }

    /// Euclidean norm
    pub fn norm(&self) -> f64 {
        self.norm_sqr().sqrt()
    }

    /// Whether |norm - 1| <= epsilon
    pub fn is_normalized(&self, epsilon: f64) -> bool {
        (self.norm() - 1.0).abs() <= epsilon
    }

    /// Verify the norm, failing with `NormalizationDrift` beyond `tolerance`
    pub fn check_normalized(&self, tolerance: f64) -> Result<()> {
        let norm = self.norm();
        if (norm - 1.0).abs() > tolerance {
            return Err(StateError::NormalizationDrift { norm, tolerance });
        }
        Ok(())
    }

    /// Rescale to unit norm; a zero vector is left unchanged
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            let parallel = self.is_parallel();
            kernels::scale_filtered(&mut self.amplitudes, 1.0 / norm, parallel, |_| true);
        }
    }

    /// Reset to |0...0⟩
    pub fn reset(&mut self) {
        self.amplitudes.fill(Complex64::new(0.0, 0.0));
        self.amplitudes[0] = Complex64::new(1.0, 0.0);
    }

    /// Probability of one basis state
    pub fn probability(&self, basis_state: usize) -> Option<f64> {
        self.amplitude(basis_state).map(|a| a.norm_sqr())
    }

    /// Probabilities of all basis states
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Probability that measuring `qubit` yields 1
    pub fn probability_of_one(&self, qubit: usize) -> Result<f64> {
        self.check_qubit(qubit)?;
        let mask = 1usize << qubit;
        Ok(kernels::sum_probabilities(
            &self.amplitudes,
            self.is_parallel(),
            |i| i & mask != 0,
        ))
    }

    /// Apply a single-qubit gate
    ///
    /// # Errors
    /// `InvalidQubitIndex` if `qubit` is outside the register
    pub fn apply_single_qubit_gate(&mut self, matrix: &Matrix2x2, qubit: usize) -> Result<()> {
        self.check_qubit(qubit)?;
        let parallel = self.is_parallel();
        kernels::apply_single_qubit(&mut self.amplitudes, matrix, qubit, parallel);
        Ok(())
    }

    /// Apply a two-qubit gate; matrix rows are indexed by `bit(first) << 1 | bit(second)`
    ///
    /// # Errors
    /// `InvalidQubitIndex` or `RepeatedQubit`
    pub fn apply_two_qubit_gate(
        &mut self,
        matrix: &Matrix4x4,
        first: usize,
        second: usize,
    ) -> Result<()> {
        self.check_qubit(first)?;
        self.check_qubit(second)?;
        if first == second {
            return Err(StateError::RepeatedQubit { qubit: first });
        }
        let parallel = self.is_parallel();
        kernels::apply_two_qubit(&mut self.amplitudes, matrix, first, second, parallel);
        Ok(())
    }

    /// Apply a single-qubit gate to `target` where every control qubit is |1⟩
    ///
    /// # Example
    /// ```
    /// use qkern_state::DenseState;
    /// use num_complex::Complex64;
    ///
    /// let (zero, one) = (Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0));
    /// let x = [[zero, one], [one, zero]];
    ///
    /// let mut state = DenseState::new(3).unwrap();
    /// state.apply_single_qubit_gate(&x, 0).unwrap();
    /// state.apply_single_qubit_gate(&x, 1).unwrap();
    /// state.apply_controlled_gate(&x, &[0, 1], 2).unwrap();
    /// assert_eq!(state.amplitude(0b111), Some(one));
    /// ```
    ///
    /// # Errors
    /// `InvalidQubitIndex` or `RepeatedQubit`
    pub fn apply_controlled_gate(
        &mut self,
        matrix: &Matrix2x2,
        controls: &[usize],
        target: usize,
    ) -> Result<()> {
        self.check_qubit(target)?;
        let mut control_mask = 0usize;
        for &c in controls {
            self.check_qubit(c)?;
            let bit = 1usize << c;
            if c == target || control_mask & bit != 0 {
                return Err(StateError::RepeatedQubit { qubit: c });
            }
            control_mask |= bit;
        }
        let parallel = self.is_parallel();
        kernels::apply_controlled(&mut self.amplitudes, matrix, control_mask, target, parallel);
        Ok(())
    }

    /// Inner product ⟨self|other⟩
    ///
    /// # Errors
    /// `DimensionMismatch` if the states differ in size
    pub fn inner_product(&self, other: &DenseState) -> Result<Complex64> {
        if self.dimension() != other.dimension() {
            return Err(StateError::DimensionMismatch {
                expected: self.dimension(),
                actual: other.dimension(),
            });
        }
        Ok(kernels::inner_product(
            &self.amplitudes,
            &other.amplitudes,
            self.is_parallel(),
        ))
    }

    /// Fidelity |⟨self|other⟩|²
    pub fn fidelity(&self, other: &DenseState) -> Result<f64> {
        Ok(self.inner_product(other)?.norm_sqr())
    }

    #[inline]
    pub(crate) fn check_qubit(&self, qubit: usize) -> Result<()> {
        if qubit >= self.num_qubits {
            return Err(StateError::InvalidQubitIndex {
                index: qubit,
                num_qubits: self.num_qubits,
            });
        }
        Ok(())
    }
}

fn check_size(num_qubits: usize) -> Result<()> {
    if num_qubits > MAX_QUBITS {
        return Err(StateError::TooManyQubits {
            requested: num_qubits,
            max: MAX_QUBITS,
        });
    }
    Ok(())
}

impl fmt::Debug for DenseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DenseState")
            .field("num_qubits", &self.num_qubits)
            .field("dimension", &self.dimension())
            .field("norm", &self.norm())
            .finish()
    }
}

impl fmt::Display for DenseState {
    /// Lists the non-negligible amplitudes as `|bits⟩: amplitude`,
    /// most significant qubit first
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, amp) in self.amplitudes.iter().enumerate() {
            if amp.norm_sqr() < 1e-12 {
                continue;
            }
            writeln!(
                f,
                "|{:0width$b}⟩: {:.6}{:+.6}i",
                i,
                amp.re,
                amp.im,
                width = self.num_qubits.max(1)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ZERO: Complex64 = Complex64::new(0.0, 0.0);
    const ONE: Complex64 = Complex64::new(1.0, 0.0);
    const X: Matrix2x2 = [[ZERO, ONE], [ONE, ZERO]];

    fn hadamard() -> Matrix2x2 {
        let h = Complex64::new(std::f64::consts::FRAC_1_SQRT_2, 0.0);
        [[h, h], [h, -h]]
    }

    #[test]
    fn test_initial_state() {
        let state = DenseState::new(3).unwrap();
        assert_eq!(state.dimension(), 8);
        assert_eq!(state.amplitude(0), Some(ONE));
        assert!(state.is_normalized(1e-12));
    }

    #[test]
    fn test_too_many_qubits() {
        assert_eq!(
            DenseState::new(MAX_QUBITS + 1).unwrap_err(),
            StateError::TooManyQubits {
                requested: MAX_QUBITS + 1,
                max: MAX_QUBITS
            }
        );
    }

    #[test]
    fn test_from_amplitudes_checks_dimension() {
        let err = DenseState::from_amplitudes(2, &[ONE, ZERO]).unwrap_err();
        assert_eq!(
            err,
            StateError::DimensionMismatch {
                expected: 4,
                actual: 2
            }
        );
    }

    #[test]
    fn test_invalid_qubit() {
        let mut state = DenseState::new(2).unwrap();
        assert_eq!(
            state.apply_single_qubit_gate(&X, 2).unwrap_err(),
            StateError::InvalidQubitIndex {
                index: 2,
                num_qubits: 2
            }
        );
        assert_eq!(
            state.apply_controlled_gate(&X, &[1], 1).unwrap_err(),
            StateError::RepeatedQubit { qubit: 1 }
        );
    }

    #[test]
    fn test_bell_state_amplitudes() {
        let mut state = DenseState::new(2).unwrap();
        state.apply_single_qubit_gate(&hadamard(), 0).unwrap();
        state.apply_controlled_gate(&X, &[0], 1).unwrap();

        let expected = std::f64::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(state.amplitudes()[0].re, expected, epsilon = 1e-12);
        assert_relative_eq!(state.amplitudes()[3].re, expected, epsilon = 1e-12);
        assert_relative_eq!(state.probability(1).unwrap(), 0.0);
    }

    #[test]
    fn test_normalization_drift_is_reported() {
        let state = DenseState::from_amplitudes(1, &[ONE, ONE]).unwrap();
        assert!(matches!(
            state.check_normalized(1e-9),
            Err(StateError::NormalizationDrift { .. })
        ));

        let mut state = state;
        state.normalize();
        assert!(state.check_normalized(1e-9).is_ok());
    }

    #[test]
    fn test_tolerance_applies_to_norm_not_its_square() {
        // ‖ψ‖² = 1.1, ‖ψ‖ ≈ 1.0488
        let amp = Complex64::new(1.1f64.sqrt(), 0.0);
        let state = DenseState::from_amplitudes(1, &[amp, ZERO]).unwrap();
        assert!(state.check_normalized(0.06).is_ok());
        assert!(state.check_normalized(0.04).is_err());
    }

    #[test]
    fn test_parallel_threshold_gives_same_state() {
        let mut seq = DenseState::new(6).unwrap().with_parallel_threshold(usize::MAX);
        let mut par = DenseState::new(6).unwrap().with_parallel_threshold(0);
        assert!(par.is_parallel());

        for q in 0..6 {
            seq.apply_single_qubit_gate(&hadamard(), q).unwrap();
            par.apply_single_qubit_gate(&hadamard(), q).unwrap();
        }
        seq.apply_controlled_gate(&X, &[0, 3], 5).unwrap();
        par.apply_controlled_gate(&X, &[0, 3], 5).unwrap();

        assert_eq!(seq.amplitudes(), par.amplitudes());
    }

    #[test]
    fn test_display_lists_support() {
        let mut state = DenseState::new(2).unwrap();
        state.apply_single_qubit_gate(&X, 1).unwrap();
        assert_eq!(state.to_string(), "|10⟩: 1.000000+0.000000i\n");
    }
}
