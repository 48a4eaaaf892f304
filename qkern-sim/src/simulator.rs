//! Core simulator implementation

use ahash::AHashMap;
use num_complex::Complex64;
use parking_lot::Mutex;
use qkern_core::Circuit;
use qkern_state::{Hamiltonian, StateError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::{
    config::SimulatorConfig,
    error::{Result, SimulatorError},
    executor::{ExecutionState, Executor},
    result::{ObserveResult, SampleResult, TermExpectation},
    statistics::ExecutionStatistics,
};

/// State-vector circuit simulator
///
/// Every call starts from a fresh |0…0⟩ register; the circuit is only read.
///
/// # Example
///
/// ```
/// use qkern_core::CircuitBuilder;
/// use qkern_sim::{Simulator, SimulatorConfig};
///
/// let mut builder = CircuitBuilder::new();
/// let q = builder.allocate(2).unwrap();
/// builder.h(q.qubit(0).unwrap()).unwrap();
/// builder.cx(q.qubit(0).unwrap(), q.qubit(1).unwrap()).unwrap();
/// builder.measure_all(&q).unwrap();
/// let circuit = builder.build();
///
/// let simulator = Simulator::new(SimulatorConfig::default().with_seed(7)).unwrap();
/// let counts = simulator.sample(&circuit, &[], 1000).unwrap();
/// assert_eq!(counts.count("00") + counts.count("11"), 1000);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    config: SimulatorConfig,
}

/// Per-worker histogram; remembers the first shot index of each outcome
#[derive(Default)]
struct Histogram {
    entries: AHashMap<String, (usize, usize)>,
}

impl Histogram {
    fn record(&mut self, bits: String, shot: usize) {
        let entry = self.entries.entry(bits).or_insert((0, shot));
        entry.0 += 1;
        entry.1 = entry.1.min(shot);
    }

    fn merge(mut self, other: Histogram) -> Histogram {
        if self.entries.len() < other.entries.len() {
            return other.merge(self);
        }
        for (bits, (count, first)) in other.entries {
            let entry = self.entries.entry(bits).or_insert((0, first));
            entry.0 += count;
            entry.1 = entry.1.min(first);
        }
        self
    }

    fn into_result(self) -> SampleResult {
        let mut entries: Vec<_> = self.entries.into_iter().collect();
        entries.sort_by_key(|(_, (_, first))| *first);
        SampleResult::from_counts(entries.into_iter().map(|(bits, (count, _))| (bits, count)))
    }
}

/// Outcome of a batch of shots
struct ShotBatch {
    counts: SampleResult,
    failed: usize,
    parallel: bool,
}

impl Simulator {
    /// Create a simulator with the given configuration
    ///
    /// # Errors
    /// `InvalidConfig` if the configuration does not validate
    pub fn new(config: SimulatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the simulator configuration
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    fn master_rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Execute the circuit once and return the final execution state
    ///
    /// Explicit measurements collapse the state as they run; no implicit
    /// final measurement is added.
    pub fn run<'c>(&self, circuit: &'c Circuit, params: &[f64]) -> Result<ExecutionState<'c>> {
        let executor = Executor::new(circuit, params, &self.config)?;
        debug!(
            num_qubits = circuit.num_qubits(),
            operations = circuit.len(),
            "running circuit"
        );
        executor.execute(&mut self.master_rng())
    }

    /// Sample the circuit `shots` times
    ///
    /// Each shot is an independent execution from |0…0⟩ whose measured bits
    /// form one bitstring in measurement order. Without any measurement in
    /// the circuit every qubit is measured at the end. Shots failing with a
    /// recoverable error are counted in [`SampleResult::failed_shots`].
    ///
    /// # Errors
    /// - `ParameterCountMismatch` if `params` is too short
    /// - `InvalidConfig` if `shots` is zero
    /// - any fatal error raised by a shot
    /// - `AllShotsFailed` if no shot succeeded
    pub fn sample(&self, circuit: &Circuit, params: &[f64], shots: usize) -> Result<SampleResult> {
        let start = Instant::now();
        let executor = Executor::new(circuit, params, &self.config)?;
        info!(num_qubits = circuit.num_qubits(), shots, "sampling circuit");

        let batch = self.run_shots(shots, &mut self.master_rng(), |rng| executor.shot(rng))?;
        let elapsed = start.elapsed();
        debug!(
            outcomes = batch.counts.len(),
            failed = batch.failed,
            ?elapsed,
            "sampling finished"
        );

        let mut counts = batch.counts.with_failed_shots(batch.failed);
        if self.config.collect_statistics {
            counts = counts.with_statistics(ExecutionStatistics {
                total_time: elapsed,
                shots,
                failed_shots: batch.failed,
                parallel: batch.parallel,
                threads: rayon::current_num_threads(),
                num_qubits: circuit.num_qubits(),
                gates_per_shot: circuit.gate_count(),
            });
        }
        Ok(counts)
    }

    /// Sample with the configured default shot count
    pub fn sample_configured(&self, circuit: &Circuit, params: &[f64]) -> Result<SampleResult> {
        self.sample(circuit, params, self.config.shots)
    }

    /// Exact expectation value of `hamiltonian` on the circuit's final state
    ///
    /// # Errors
    /// - `ParameterCountMismatch` if `params` is too short
    /// - `InvalidQubitIndex` if a term acts beyond the register
    /// - `NonHermitianObservable` if the result is not real within tolerance
    pub fn observe(
        &self,
        circuit: &Circuit,
        hamiltonian: &Hamiltonian,
        params: &[f64],
    ) -> Result<ObserveResult> {
        check_support(circuit, hamiltonian)?;
        let exec = self.run(circuit, params)?;
        let values = hamiltonian.term_expectations(exec.state())?;
        let expectation = hamiltonian.combine(&values, self.config.hermitian_tolerance)?;
        debug!(terms = hamiltonian.term_count(), expectation, "observed");

        let terms = hamiltonian
            .terms()
            .iter()
            .zip(values)
            .map(|(term, value)| TermExpectation {
                term: term.clone(),
                value: value.re,
            })
            .collect();
        Ok(ObserveResult::new(expectation, terms, None))
    }

    /// Estimate `⟨hamiltonian⟩` from `shots` measurements per term
    ///
    /// Each non-identity term rotates its X and Y factors into the Z basis,
    /// measures its qubits and averages the parity. Identity terms are
    /// exact.
    pub fn observe_sampled(
        &self,
        circuit: &Circuit,
        hamiltonian: &Hamiltonian,
        params: &[f64],
        shots: usize,
    ) -> Result<ObserveResult> {
        check_support(circuit, hamiltonian)?;
        let executor = Executor::new(circuit, params, &self.config)?;
        let mut rng = self.master_rng();
        info!(terms = hamiltonian.term_count(), shots, "estimating expectation by sampling");

        let mut terms = Vec::with_capacity(hamiltonian.term_count());
        for term in hamiltonian {
            let value = if term.is_identity() {
                1.0
            } else {
                let batch = self.run_shots(shots, &mut rng, |rng| executor.term_shot(term, rng))?;
                batch.counts.expectation_z()
            };
            terms.push(TermExpectation {
                term: term.clone(),
                value,
            });
        }

        let values: Vec<Complex64> = terms.iter().map(|t| Complex64::new(t.value, 0.0)).collect();
        let expectation = hamiltonian.combine(&values, self.config.hermitian_tolerance)?;
        Ok(ObserveResult::new(expectation, terms, Some(shots)))
    }

    /// Run `shots` shots, each with its own RNG seeded from `rng`
    ///
    /// Seeds are drawn before any shot runs, so the histogram does not depend
    /// on whether shots go to the rayon pool.
    fn run_shots<F>(&self, shots: usize, rng: &mut StdRng, shot: F) -> Result<ShotBatch>
    where
        F: Fn(&mut StdRng) -> Result<String> + Sync,
    {
        if shots == 0 {
            return Err(SimulatorError::InvalidConfig("shots must be > 0".to_string()));
        }

        let seeds: Vec<u64> = (0..shots).map(|_| rng.gen()).collect();
        let failures = Mutex::new(Vec::new());

        let run = |mut acc: Histogram, (index, &seed): (usize, &u64)| -> Result<Histogram> {
            let mut shot_rng = StdRng::seed_from_u64(seed);
            match shot(&mut shot_rng) {
                Ok(bits) => acc.record(bits, index),
                Err(err) if err.is_recoverable() => {
                    debug!(shot = index, error = %err, "shot failed");
                    failures.lock().push((index, err));
                }
                Err(err) => return Err(err),
            }
            Ok(acc)
        };

        let parallel = shots >= self.config.parallel_shot_threshold;
        let histogram = if parallel {
            seeds
                .par_iter()
                .enumerate()
                .try_fold(Histogram::default, run)
                .try_reduce(Histogram::default, |a, b| Ok(a.merge(b)))?
        } else {
            seeds.iter().enumerate().try_fold(Histogram::default(), run)?
        };

        let mut failures = failures.into_inner();
        failures.sort_by_key(|(index, _)| *index);
        let counts = histogram.into_result();
        let failed = failures.len();

        if counts.is_empty() {
            if let Some((_, first)) = failures.into_iter().next() {
                return Err(SimulatorError::AllShotsFailed {
                    shots,
                    first: Box::new(first),
                });
            }
        } else if failed > 0 {
            warn!(failed, shots, "some shots failed and were discarded");
        }

        Ok(ShotBatch {
            counts,
            failed,
            parallel,
        })
    }
}

fn check_support(circuit: &Circuit, hamiltonian: &Hamiltonian) -> Result<()> {
    let needed = hamiltonian.num_qubits();
    if needed > circuit.num_qubits() {
        return Err(StateError::InvalidQubitIndex {
            index: needed - 1,
            num_qubits: circuit.num_qubits(),
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use qkern_core::CircuitBuilder;
    use qkern_state::spin::{x, z};

    fn bell() -> Circuit {
        let mut builder = CircuitBuilder::new();
        let q = builder.allocate(2).unwrap();
        builder.h(q.qubit(0).unwrap()).unwrap();
        builder.cx(q.qubit(0).unwrap(), q.qubit(1).unwrap()).unwrap();
        builder.measure_all(&q).unwrap();
        builder.build()
    }

    fn seeded() -> Simulator {
        Simulator::new(SimulatorConfig::default().with_seed(1234)).unwrap()
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = SimulatorConfig::default().with_shots(0);
        assert!(matches!(
            Simulator::new(config),
            Err(SimulatorError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_zero_shots() {
        assert!(matches!(
            seeded().sample(&bell(), &[], 0),
            Err(SimulatorError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_sample_bell() {
        let counts = seeded().sample(&bell(), &[], 2000).unwrap();
        assert_eq!(counts.total_shots(), 2000);
        assert_eq!(counts.failed_shots(), 0);
        assert_eq!(counts.count("01") + counts.count("10"), 0);
        assert!(counts.statistics().is_none());
    }

    #[test]
    fn test_statistics_are_attached_on_request() {
        let sim = Simulator::new(
            SimulatorConfig::default()
                .with_seed(3)
                .with_statistics(true),
        )
        .unwrap();
        let counts = sim.sample(&bell(), &[], 300).unwrap();
        let stats = counts.statistics().unwrap();
        assert_eq!(stats.shots, 300);
        assert_eq!(stats.num_qubits, 2);
        assert_eq!(stats.gates_per_shot, 2);
        assert!(stats.parallel);
    }

    #[test]
    fn test_histogram_merge_keeps_first_index() {
        let mut a = Histogram::default();
        a.record("1".into(), 4);
        a.record("0".into(), 7);
        let mut b = Histogram::default();
        b.record("0".into(), 2);
        let merged = a.merge(b).into_result();
        let order: Vec<_> = merged.iter().collect();
        assert_eq!(order, vec![("0", 2), ("1", 1)]);
    }

    #[test]
    fn test_recoverable_failures_are_counted() {
        let sim = seeded();
        let mut rng = StdRng::seed_from_u64(0);
        let batch = sim
            .run_shots(400, &mut rng, |rng| {
                if rng.gen::<bool>() {
                    Ok("0".to_string())
                } else {
                    Err(StateError::DegenerateMeasurement {
                        qubit: 0,
                        probability: 0.0,
                    }
                    .into())
                }
            })
            .unwrap();
        assert!(batch.failed > 0);
        assert_eq!(batch.counts.count("0") + batch.failed, 400);
    }

    #[test]
    fn test_all_shots_failed() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = seeded()
            .run_shots(10, &mut rng, |_| {
                Err(StateError::DegenerateMeasurement {
                    qubit: 1,
                    probability: 0.0,
                }
                .into())
            })
            .map(|_| ())
            .unwrap_err();
        match err {
            SimulatorError::AllShotsFailed { shots, first } => {
                assert_eq!(shots, 10);
                assert!(first.is_recoverable());
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_fatal_shot_error_aborts() {
        let mut rng = StdRng::seed_from_u64(0);
        let result = seeded().run_shots(1000, &mut rng, |_| {
            Err(StateError::NormalizationDrift {
                norm: 2.0,
                tolerance: 1e-9,
            }
            .into())
        });
        assert!(matches!(
            result.map(|_| ()),
            Err(SimulatorError::State(StateError::NormalizationDrift { .. }))
        ));
    }

    #[test]
    fn test_observe_plus_state() {
        let mut builder = CircuitBuilder::new();
        let q = builder.qubit();
        builder.h(q).unwrap();
        let circuit = builder.build();

        let h = 2.0 * x(0) + z(0) + 0.5;
        let result = seeded().observe(&circuit, &h, &[]).unwrap();
        assert_relative_eq!(result.expectation(), 2.5, epsilon = 1e-12);
        assert_eq!(result.term_count(), 3);
        assert_relative_eq!(result.term_expectation(0).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(result.term_expectation(1).unwrap(), 0.0, epsilon = 1e-12);
        assert_eq!(result.shots(), None);
    }

    #[test]
    fn test_observe_rejects_out_of_range_terms() {
        let h = z(2);
        assert!(matches!(
            seeded().observe(&bell(), &h, &[]),
            Err(SimulatorError::State(StateError::InvalidQubitIndex { index: 2, .. }))
        ));
    }

    #[test]
    fn test_observe_sampled_bell_correlations() {
        let mut builder = CircuitBuilder::new();
        let q = builder.allocate(2).unwrap();
        builder.h(q.qubit(0).unwrap()).unwrap();
        builder.cx(q.qubit(0).unwrap(), q.qubit(1).unwrap()).unwrap();
        let circuit = builder.build();

        let h = z(0) * z(1) + x(0) * x(1) + 1.0;
        let result = seeded().observe_sampled(&circuit, &h, &[], 500).unwrap();
        // Bell state is a +1 eigenstate of ZZ and XX
        assert_relative_eq!(result.expectation(), 3.0, epsilon = 1e-12);
        assert_eq!(result.shots(), Some(500));
    }
}
