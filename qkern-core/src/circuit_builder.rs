//! Circuit builder: qubit allocation, gates, measurements and branches

use crate::circuit::BitInfo;
use crate::operation::{BitId, MeasuredBit, Operation};
use crate::parameter::ParamId;
use crate::qubit::Register;
use crate::{Angle, Circuit, GateKind, QuantumError, QubitId, Result};

/// Builder for quantum circuits
///
/// The builder mirrors how a kernel is written: allocate registers, apply
/// gates, measure, and branch on measured bits. Every call validates its
/// arguments immediately, so errors surface at the line that caused them.
/// The builder never executes anything; [`build`](Self::build) hands back a
/// declarative [`Circuit`].
///
/// # Example
/// ```
/// use qkern_core::CircuitBuilder;
///
/// // mid-circuit measurement with a classical branch
/// let mut kernel = CircuitBuilder::new();
/// let q = kernel.allocate(2).unwrap();
/// let ancilla = kernel.qubit();
/// let theta = kernel.parameter();
///
/// kernel.ry(theta, ancilla).unwrap();
/// let aux = kernel.measure_named(ancilla, "aux").unwrap();
///
/// let q0 = q.qubit(0).unwrap();
/// let q1 = q.qubit(1).unwrap();
/// kernel
///     .branch(
///         aux,
///         |k| {
///             k.x(q0)?.x(ancilla)?;
///             Ok(())
///         },
///         |k| {
///             k.x(q0)?.x(q1)?;
///             Ok(())
///         },
///     )
///     .unwrap();
/// kernel.measure(ancilla).unwrap();
/// kernel.measure_all(&q).unwrap();
///
/// let circuit = kernel.build();
/// assert_eq!(circuit.num_qubits(), 3);
/// assert_eq!(circuit.num_parameters(), 1);
/// assert_eq!(circuit.num_bits(), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CircuitBuilder {
    num_qubits: usize,
    num_params: usize,
    bits: Vec<BitInfo>,
    ops: Vec<Operation>,
    // bits that may be branched on from the current scope
    visible: Vec<BitId>,
}

macro_rules! fixed_gates {
    ($($(#[$doc:meta])* $method:ident => $kind:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            #[inline]
            pub fn $method(&mut self, qubit: QubitId) -> Result<&mut Self> {
                self.gate(GateKind::$kind, &[qubit], &[])
            }
        )*
    };
}

macro_rules! rotation_gates {
    ($($(#[$doc:meta])* $method:ident => $kind:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            #[inline]
            pub fn $method(&mut self, angle: impl Into<Angle>, qubit: QubitId) -> Result<&mut Self> {
                self.gate(GateKind::$kind, &[qubit], &[angle.into()])
            }
        )*
    };
}

impl CircuitBuilder {
    /// Create an empty builder with no qubits
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a register of `size` fresh qubits, all starting in |0⟩
    ///
    /// # Errors
    /// `EmptyRegister` if `size` is zero
    pub fn allocate(&mut self, size: usize) -> Result<Register> {
        if size == 0 {
            return Err(QuantumError::EmptyRegister);
        }
        let register = Register::new(self.num_qubits, size);
        self.num_qubits += size;
        Ok(register)
    }

    /// Allocate a single qubit
    pub fn qubit(&mut self) -> QubitId {
        let id = QubitId::new(self.num_qubits);
        self.num_qubits += 1;
        id
    }

    /// Declare a late-bound angle parameter
    ///
    /// Parameters are bound positionally: the `i`-th call corresponds to
    /// `params[i]` at execution time.
    pub fn parameter(&mut self) -> Angle {
        let id = ParamId::new(self.num_params);
        self.num_params += 1;
        Angle::Param(id)
    }

    /// Declare `count` parameters at once (`theta: list[float]` in kernel code)
    pub fn parameters(&mut self, count: usize) -> Vec<Angle> {
        (0..count).map(|_| self.parameter()).collect()
    }

    /// Qubits allocated so far
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Parameters declared so far
    #[inline]
    pub fn num_parameters(&self) -> usize {
        self.num_params
    }

    /// Operations in the current scope
    #[inline]
    pub fn num_operations(&self) -> usize {
        self.ops.len()
    }

    /// Whether the current scope has no operations
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Append a gate
    ///
    /// # Errors
    /// `InvalidQubitIndex`, `InvalidQubitCount`, `InvalidParameterCount` or
    /// `DuplicateQubitReference`, see [`Operation::gate`]
    pub fn gate(
        &mut self,
        kind: GateKind,
        targets: &[QubitId],
        params: &[Angle],
    ) -> Result<&mut Self> {
        let op = Operation::gate(kind, targets, params, self.num_qubits)?;
        self.ops.push(op);
        Ok(self)
    }

    fixed_gates! {
        /// Hadamard
        h => H,
        /// Pauli X
        x => X,
        /// Pauli Y
        y => Y,
        /// Pauli Z
        z => Z,
        /// S gate
        s => S,
        /// S† gate
        sdg => Sdg,
        /// T gate
        t => T,
        /// T† gate
        tdg => Tdg,
    }

    rotation_gates! {
        /// Rotation about X
        rx => Rx,
        /// Rotation about Y
        ry => Ry,
        /// Rotation about Z
        rz => Rz,
        /// Phase shift diag(1, e^{iλ})
        r1 => R1,
    }

    /// Generic single-qubit rotation U3(θ, φ, λ)
    pub fn u3(
        &mut self,
        theta: impl Into<Angle>,
        phi: impl Into<Angle>,
        lambda: impl Into<Angle>,
        qubit: QubitId,
    ) -> Result<&mut Self> {
        self.gate(
            GateKind::U3,
            &[qubit],
            &[theta.into(), phi.into(), lambda.into()],
        )
    }

    /// Swap two qubits
    pub fn swap(&mut self, a: QubitId, b: QubitId) -> Result<&mut Self> {
        self.gate(GateKind::Swap, &[a, b], &[])
    }

    /// Apply a parameter-free single-qubit gate to every qubit of a register
    pub fn apply_all(&mut self, kind: GateKind, register: &Register) -> Result<&mut Self> {
        for q in register.iter() {
            self.gate(kind, &[q], &[])?;
        }
        Ok(self)
    }

    /// Append a controlled gate
    ///
    /// The target unitary acts only on the subspace where every control
    /// qubit is |1⟩.
    ///
    /// # Errors
    /// See [`Operation::controlled`]
    pub fn controlled(
        &mut self,
        kind: GateKind,
        controls: &[QubitId],
        target: QubitId,
        params: &[Angle],
    ) -> Result<&mut Self> {
        let op = Operation::controlled(kind, controls, target, params, self.num_qubits)?;
        self.ops.push(op);
        Ok(self)
    }

    /// Controlled-X (CNOT)
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> Result<&mut Self> {
        self.controlled(GateKind::X, &[control], target, &[])
    }

    /// Controlled-Z
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> Result<&mut Self> {
        self.controlled(GateKind::Z, &[control], target, &[])
    }

    /// Toffoli (doubly controlled X)
    pub fn ccx(&mut self, c0: QubitId, c1: QubitId, target: QubitId) -> Result<&mut Self> {
        self.controlled(GateKind::X, &[c0, c1], target, &[])
    }

    /// Multi-controlled X with the controls taken from a register view
    pub fn mcx(&mut self, controls: &Register, target: QubitId) -> Result<&mut Self> {
        let controls = controls.to_vec();
        self.controlled(GateKind::X, &controls, target, &[])
    }

    /// Measure a qubit in the Z basis
    pub fn measure(&mut self, qubit: QubitId) -> Result<MeasuredBit> {
        self.push_measure(qubit, None)
    }

    /// Measure a qubit and attach a label to the resulting bit
    pub fn measure_named(&mut self, qubit: QubitId, label: impl Into<String>) -> Result<MeasuredBit> {
        self.push_measure(qubit, Some(label.into()))
    }

    /// Measure every qubit of a register, in register order
    pub fn measure_all(&mut self, register: &Register) -> Result<Vec<MeasuredBit>> {
        register.iter().map(|q| self.measure(q)).collect()
    }

    fn push_measure(&mut self, qubit: QubitId, label: Option<String>) -> Result<MeasuredBit> {
        if qubit.index() >= self.num_qubits {
            return Err(QuantumError::invalid_qubit(qubit.index(), self.num_qubits));
        }
        let bit = BitId::new(self.bits.len());
        self.bits.push(BitInfo { qubit, label });
        self.visible.push(bit);
        self.ops.push(Operation::Measure { qubit, bit });
        Ok(MeasuredBit::new(bit, qubit))
    }

    /// Append a classical branch on a measured bit
    ///
    /// Each arm is built by a closure that receives this builder; the
    /// operations it appends are collected into that arm. Bits measured
    /// inside an arm cannot be branched on after the arm closes.
    ///
    /// # Errors
    /// - `UnknownMeasuredBit` if `bit` is not visible in the current scope
    /// - any error returned by either arm
    pub fn branch<T, E>(
        &mut self,
        bit: MeasuredBit,
        then_branch: T,
        else_branch: E,
    ) -> Result<&mut Self>
    where
        T: FnOnce(&mut Self) -> Result<()>,
        E: FnOnce(&mut Self) -> Result<()>,
    {
        let measured_here = self
            .bits
            .get(bit.id().index())
            .is_some_and(|info| info.qubit == bit.qubit());
        if !measured_here || !self.visible.contains(&bit.id()) {
            return Err(QuantumError::UnknownMeasuredBit(bit.id().index()));
        }

        // a failure in either arm discards everything both arms allocated
        let (num_qubits, num_params) = (self.num_qubits, self.num_params);
        let bits_len = self.bits.len();
        let arms = self
            .scoped(then_branch)
            .and_then(|then_ops| Ok((then_ops, self.scoped(else_branch)?)));
        let (then_ops, else_ops) = match arms {
            Ok(arms) => arms,
            Err(err) => {
                self.num_qubits = num_qubits;
                self.num_params = num_params;
                self.bits.truncate(bits_len);
                return Err(err);
            }
        };
        self.ops.push(Operation::Branch {
            bit: bit.id(),
            then_ops,
            else_ops,
        });
        Ok(self)
    }

    /// Branch with an empty else arm
    pub fn branch_if<T>(&mut self, bit: MeasuredBit, then_branch: T) -> Result<&mut Self>
    where
        T: FnOnce(&mut Self) -> Result<()>,
    {
        self.branch(bit, then_branch, |_| Ok(()))
    }

    fn scoped<F>(&mut self, body: F) -> Result<Vec<Operation>>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        let outer_ops = std::mem::take(&mut self.ops);
        let visible_len = self.visible.len();

        let outcome = body(self);

        let inner_ops = std::mem::replace(&mut self.ops, outer_ops);
        self.visible.truncate(visible_len);
        outcome.map(|()| inner_ops)
    }

    /// Build the final circuit, consuming the builder
    pub fn build(self) -> Circuit {
        Circuit::from_parts(self.num_qubits, self.num_params, self.ops, self.bits)
    }
}
