//! Single-shot circuit interpretation
//!
//! The executor walks a circuit's operation tree once against a fresh
//! [`DenseState`], binding parameter placeholders, applying gate unitaries,
//! collapsing on measurement and following branch arms by the observed bit.

use qkern_core::{Angle, BitId, Circuit, Operation, QuantumError, QubitId};
use qkern_gates::{matrices, unitary, GateMatrix};
use qkern_state::{DenseState, Pauli, PauliTerm};
use rand::Rng;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::config::SimulatorConfig;
use crate::error::{Result, SimulatorError};

/// Live state of one circuit execution
///
/// Holds the amplitude vector and every bit measured so far, in measurement
/// order.
#[derive(Debug, Clone)]
pub struct ExecutionState<'c> {
    circuit: &'c Circuit,
    state: DenseState,
    values: Vec<Option<bool>>,
    record: Vec<bool>,
}

impl<'c> ExecutionState<'c> {
    fn new(circuit: &'c Circuit, state: DenseState) -> Self {
        Self {
            circuit,
            state,
            values: vec![None; circuit.num_bits()],
            record: Vec::new(),
        }
    }

    /// The amplitude vector
    pub fn state(&self) -> &DenseState {
        &self.state
    }

    /// Take ownership of the amplitude vector
    pub fn into_state(self) -> DenseState {
        self.state
    }

    /// Value of a circuit bit, if it was measured on this path
    pub fn bit(&self, bit: BitId) -> Option<bool> {
        self.values.get(bit.index()).copied().flatten()
    }

    /// Value of the bit measured under `label`
    ///
    /// When a label was used more than once, the latest bit measured on
    /// this path wins.
    pub fn bit_by_label(&self, label: &str) -> Option<bool> {
        self.circuit
            .bits()
            .iter()
            .zip(&self.values)
            .rev()
            .filter(|(info, _)| info.label.as_deref() == Some(label))
            .find_map(|(_, value)| *value)
    }

    /// Measured values in measurement order
    pub fn measurements(&self) -> &[bool] {
        &self.record
    }

    /// Measured values as a `'0'`/`'1'` string, first measured bit leftmost
    pub fn bitstring(&self) -> String {
        self.record.iter().map(|&b| if b { '1' } else { '0' }).collect()
    }

    fn record(&mut self, bit: Option<BitId>, outcome: bool) {
        if let Some(bit) = bit {
            self.values[bit.index()] = Some(outcome);
        }
        self.record.push(outcome);
    }
}

/// Interprets one circuit with bound parameters
pub(crate) struct Executor<'c, 'a> {
    circuit: &'c Circuit,
    params: &'a [f64],
    config: &'a SimulatorConfig,
}

impl<'c, 'a> Executor<'c, 'a> {
    /// # Errors
    /// `ParameterCountMismatch` if fewer values than declared placeholders
    pub(crate) fn new(
        circuit: &'c Circuit,
        params: &'a [f64],
        config: &'a SimulatorConfig,
    ) -> Result<Self> {
        if params.len() < circuit.num_parameters() {
            return Err(SimulatorError::ParameterCountMismatch {
                expected: circuit.num_parameters(),
                actual: params.len(),
            });
        }
        Ok(Self {
            circuit,
            params,
            config,
        })
    }

    /// Run the circuit once from |0…0⟩
    pub(crate) fn execute<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<ExecutionState<'c>> {
        let state = DenseState::new(self.circuit.num_qubits())?
            .with_parallel_threshold(self.config.state_parallel_threshold);
        let mut exec = ExecutionState::new(self.circuit, state);
        self.run_ops(self.circuit.as_slice(), &mut exec, rng)?;
        Ok(exec)
    }

    /// Run the circuit and read out the shot's bitstring
    ///
    /// Circuits without any measurement are measured on every qubit at the
    /// end, in qubit order.
    pub(crate) fn shot<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<String> {
        let mut exec = self.execute(rng)?;
        if !self.circuit.has_measurements() {
            for q in 0..self.circuit.num_qubits() {
                let m = exec.state.measure_qubit(q, rng)?;
                exec.record(None, m.outcome);
            }
        }
        Ok(exec.bitstring())
    }

    /// Run the circuit, rotate each factor of `term` into the Z basis and
    /// measure the term's qubits
    pub(crate) fn term_shot<R: Rng + ?Sized>(&self, term: &PauliTerm, rng: &mut R) -> Result<String> {
        let mut exec = self.execute(rng)?;
        let mut readout = String::with_capacity(term.weight());
        for &(q, pauli) in term.factors() {
            match pauli {
                Pauli::X => exec.state.apply_single_qubit_gate(&matrices::HADAMARD, q)?,
                Pauli::Y => {
                    exec.state.apply_single_qubit_gate(&matrices::S_DAGGER, q)?;
                    exec.state.apply_single_qubit_gate(&matrices::HADAMARD, q)?;
                }
                Pauli::Z | Pauli::I => {}
            }
            let m = exec.state.measure_qubit(q, rng)?;
            readout.push(m.as_char());
        }
        Ok(readout)
    }

    fn run_ops<R: Rng + ?Sized>(
        &self,
        ops: &[Operation],
        exec: &mut ExecutionState<'c>,
        rng: &mut R,
    ) -> Result<()> {
        for op in ops {
            match op {
                Operation::Gate {
                    kind,
                    targets,
                    params,
                } => {
                    let matrix = unitary(*kind, &self.bind(params)?)?;
                    match matrix {
                        GateMatrix::Single(m) => {
                            exec.state.apply_single_qubit_gate(&m, targets[0].index())?
                        }
                        GateMatrix::Two(m) => exec.state.apply_two_qubit_gate(
                            &m,
                            targets[0].index(),
                            targets[1].index(),
                        )?,
                    }
                    self.verify(&exec.state)?;
                }
                Operation::Controlled {
                    kind,
                    controls,
                    target,
                    params,
                } => {
                    let matrix = unitary(*kind, &self.bind(params)?)?;
                    let m = matrix
                        .as_single()
                        .ok_or(QuantumError::NotControllable(kind.name()))?;
                    let controls: SmallVec<[usize; 4]> =
                        controls.iter().map(QubitId::index).collect();
                    exec.state
                        .apply_controlled_gate(m, &controls, target.index())?;
                    self.verify(&exec.state)?;
                }
                Operation::Measure { qubit, bit } => {
                    let m = exec.state.measure_qubit(qubit.index(), rng)?;
                    trace!(qubit = qubit.index(), outcome = m.outcome, "measured");
                    exec.record(Some(*bit), m.outcome);
                }
                Operation::Branch {
                    bit,
                    then_ops,
                    else_ops,
                } => {
                    let value = exec
                        .bit(*bit)
                        .ok_or(QuantumError::UnknownMeasuredBit(bit.index()))?;
                    debug!(bit = bit.index(), value, "branch");
                    let arm = if value { then_ops } else { else_ops };
                    self.run_ops(arm, exec, rng)?;
                }
            }
        }
        Ok(())
    }

    fn bind(&self, params: &[Angle]) -> Result<SmallVec<[f64; 3]>> {
        params
            .iter()
            .map(|angle| {
                angle
                    .resolve(self.params)
                    .ok_or(SimulatorError::ParameterCountMismatch {
                        expected: self.circuit.num_parameters(),
                        actual: self.params.len(),
                    })
            })
            .collect()
    }

    fn verify(&self, state: &DenseState) -> Result<()> {
        if self.config.verify_normalization {
            state.check_normalized(self.config.norm_tolerance)?;
        }
        Ok(())
    }
}
