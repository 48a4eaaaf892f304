//! Z-basis measurement with state collapse

use crate::dense_state::DenseState;
use crate::error::{Result, StateError};
use crate::kernels;
use rand::Rng;

/// Probabilities at or below this cannot be renormalized
pub const DEGENERATE_PROBABILITY: f64 = 1e-30;

/// Outcome of measuring one qubit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QubitMeasurement {
    /// The measured qubit
    pub qubit: usize,
    /// Observed value (`true` = |1⟩)
    pub outcome: bool,
    /// Probability the outcome had before collapse
    pub probability: f64,
}

impl QubitMeasurement {
    /// The outcome as a `'0'`/`'1'` character
    pub fn as_char(&self) -> char {
        if self.outcome {
            '1'
        } else {
            '0'
        }
    }
}

impl DenseState {
    /// Measure `qubit` in the Z basis and collapse the state
    ///
    /// The outcome is 1 with probability `p1 = Σ|a_i|²` over indices with
    /// bit `qubit` set. Inconsistent amplitudes are zeroed and the rest are
    /// divided by `sqrt(p_outcome)`.
    ///
    /// # Errors
    /// - `InvalidQubitIndex` if `qubit` is outside the register
    /// - `DegenerateMeasurement` if the drawn outcome has numerically zero
    ///   probability; the state is left untouched
    ///
    /// # Example
    /// ```
    /// use qkern_state::DenseState;
    /// use rand::rngs::StdRng;
    /// use rand::SeedableRng;
    ///
    /// let mut rng = StdRng::seed_from_u64(7);
    /// let mut state = DenseState::new(1).unwrap();
    /// let m = state.measure_qubit(0, &mut rng).unwrap();
    /// assert!(!m.outcome);
    /// assert_eq!(m.probability, 1.0);
    /// ```
    pub fn measure_qubit<R: Rng + ?Sized>(
        &mut self,
        qubit: usize,
        rng: &mut R,
    ) -> Result<QubitMeasurement> {
        let (p0, p1) = self.outcome_probabilities(qubit)?;
        let outcome = rng.gen::<f64>() < p1;
        let probability = if outcome { p1 } else { p0 };
        self.collapse(qubit, outcome, probability)?;
        Ok(QubitMeasurement {
            qubit,
            outcome,
            probability,
        })
    }

    /// Project `qubit` onto `outcome`, given that outcome's probability
    pub(crate) fn collapse(&mut self, qubit: usize, outcome: bool, probability: f64) -> Result<()> {
        if probability <= DEGENERATE_PROBABILITY {
            return Err(StateError::DegenerateMeasurement { qubit, probability });
        }
        let mask = 1usize << qubit;
        let factor = 1.0 / probability.sqrt();
        let parallel = self.is_parallel();
        kernels::scale_filtered(self.amplitudes_mut(), factor, parallel, |i| {
            (i & mask != 0) == outcome
        });
        Ok(())
    }

    /// Force `qubit` into `outcome` (post-selection)
    ///
    /// # Errors
    /// `DegenerateMeasurement` if the requested outcome has zero probability
    pub fn post_select(&mut self, qubit: usize, outcome: bool) -> Result<()> {
        let (p0, p1) = self.outcome_probabilities(qubit)?;
        let probability = if outcome { p1 } else { p0 };
        self.collapse(qubit, outcome, probability)
    }

    /// `(p0, p1)` for measuring `qubit`, each summed independently
    pub fn outcome_probabilities(&self, qubit: usize) -> Result<(f64, f64)> {
        self.check_qubit(qubit)?;
        let mask = 1usize << qubit;
        let parallel = self.is_parallel();
        let p0 = kernels::sum_probabilities(self.amplitudes(), parallel, |i| i & mask == 0);
        let p1 = kernels::sum_probabilities(self.amplitudes(), parallel, |i| i & mask != 0);
        Ok((p0, p1))
    }
}
