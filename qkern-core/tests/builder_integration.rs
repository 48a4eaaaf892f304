//! Integration tests for the circuit builder

use proptest::prelude::*;
use qkern_core::{
    draw, Angle, CircuitBuilder, GateKind, Operation, QuantumError, QubitId,
};

#[test]
fn test_bell_kernel() {
    let mut kernel = CircuitBuilder::new();
    let q = kernel.allocate(2).unwrap();
    let (q0, q1) = (q.qubit(0).unwrap(), q.qubit(1).unwrap());

    kernel.h(q0).unwrap().cx(q0, q1).unwrap();
    let bits = kernel.measure_all(&q).unwrap();

    assert_eq!(bits.len(), 2);
    assert_eq!(bits[0].qubit(), q0);
    assert_eq!(bits[1].qubit(), q1);

    let circuit = kernel.build();
    assert_eq!(circuit.num_qubits(), 2);
    assert_eq!(circuit.len(), 4);
    assert_eq!(circuit.gate_count(), 2);
    assert!(circuit.has_measurements());
}

#[test]
fn test_multi_controlled_ghz_style_kernel() {
    // x on the front, then a multi-controlled x onto the back
    let mut kernel = CircuitBuilder::new();
    let qubits = kernel.allocate(4).unwrap();
    let front = qubits.front(3).unwrap();

    kernel.apply_all(GateKind::X, &front).unwrap();
    kernel.mcx(&front, qubits.back()).unwrap();

    let circuit = kernel.build();
    assert_eq!(circuit.len(), 4);
    match circuit.get_operation(3).unwrap() {
        Operation::Controlled {
            kind,
            controls,
            target,
            ..
        } => {
            assert_eq!(*kind, GateKind::X);
            assert_eq!(controls.as_slice(), front.to_vec().as_slice());
            assert_eq!(*target, QubitId::new(3));
        }
        other => panic!("unexpected operation {other}"),
    }
}

#[test]
fn test_parameterized_kernel() {
    let mut kernel = CircuitBuilder::new();
    let q = kernel.allocate(2).unwrap();
    let thetas = kernel.parameters(2);

    kernel.rx(thetas[0], q.qubit(0).unwrap()).unwrap();
    kernel.ry(thetas[1], q.qubit(1).unwrap()).unwrap();

    let circuit = kernel.build();
    assert_eq!(circuit.num_parameters(), 2);

    let bound: Vec<Option<f64>> = circuit
        .operations()
        .map(|op| op.params()[0].resolve(&[0.25, 0.75]))
        .collect();
    assert_eq!(bound, vec![Some(0.25), Some(0.75)]);
}

#[test]
fn test_u3_takes_three_angles() {
    let mut kernel = CircuitBuilder::new();
    let q = kernel.qubit();
    let phi = kernel.parameter();
    kernel.u3(0.1, phi, Angle::Value(0.3), q).unwrap();

    let err = kernel
        .gate(GateKind::U3, &[q], &[Angle::Value(0.1)])
        .unwrap_err();
    assert_eq!(
        err,
        QuantumError::InvalidParameterCount {
            gate: "u3",
            expected: 3,
            actual: 1
        }
    );
}

#[test]
fn test_swap_needs_two_distinct_targets() {
    let mut kernel = CircuitBuilder::new();
    let q = kernel.allocate(2).unwrap();
    let (q0, q1) = (q.qubit(0).unwrap(), q.qubit(1).unwrap());

    kernel.swap(q0, q1).unwrap();
    assert_eq!(
        kernel.swap(q1, q1).unwrap_err(),
        QuantumError::DuplicateQubitReference(q1)
    );
    assert!(matches!(
        kernel.gate(GateKind::Swap, &[q0], &[]),
        Err(QuantumError::InvalidQubitCount { .. })
    ));
}

#[test]
fn test_swap_is_not_controllable() {
    let mut kernel = CircuitBuilder::new();
    let q = kernel.allocate(3).unwrap();
    let err = kernel
        .controlled(GateKind::Swap, &[q.qubit(0).unwrap()], q.qubit(1).unwrap(), &[])
        .unwrap_err();
    assert_eq!(err, QuantumError::NotControllable("swap"));
}

#[test]
fn test_mid_circuit_measurement_kernel() {
    let mut kernel = CircuitBuilder::new();
    let q = kernel.allocate(2).unwrap();
    let ancilla = kernel.qubit();
    let (q0, q1) = (q.qubit(0).unwrap(), q.qubit(1).unwrap());

    kernel.h(ancilla).unwrap();
    let aux = kernel.measure_named(ancilla, "aux").unwrap();
    kernel
        .branch(
            aux,
            |k| {
                k.x(q0)?.x(ancilla)?;
                Ok(())
            },
            |k| {
                k.x(q0)?.x(q1)?;
                Ok(())
            },
        )
        .unwrap();
    kernel.measure_all(&q).unwrap();

    let circuit = kernel.build();
    assert_eq!(circuit.num_bits(), 3);
    assert_eq!(circuit.bit_label(aux.id()), Some("aux"));
    assert_eq!(circuit.gate_count(), 5);

    let diagram = draw(&circuit);
    assert!(diagram.contains("aux=1"));
    assert!(diagram.contains("aux=0"));
}

#[test]
fn test_branch_before_measurement_fails() {
    let mut other = CircuitBuilder::new();
    let q = other.qubit();
    let later = other.measure(q).unwrap();

    let mut kernel = CircuitBuilder::new();
    kernel.qubit();
    assert!(matches!(
        kernel.branch_if(later, |_| Ok(())),
        Err(QuantumError::UnknownMeasuredBit(0))
    ));
}

#[test]
fn test_circuit_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<qkern_core::Circuit>();
}

proptest! {
    /// Any reference past the allocated qubits is rejected, anything inside is accepted
    #[test]
    fn gate_bounds_follow_allocation(size in 1usize..12, index in 0usize..24) {
        let mut kernel = CircuitBuilder::new();
        kernel.allocate(size).unwrap();

        let result = kernel.h(QubitId::new(index));
        if index < size {
            prop_assert!(result.is_ok());
        } else {
            prop_assert_eq!(
                result.unwrap_err(),
                QuantumError::InvalidQubitIndex { index, size }
            );
        }
    }

    /// Register views never leave their parent window
    #[test]
    fn register_views_stay_inside(size in 1usize..16, start in 0usize..16, len in 0usize..16) {
        let mut kernel = CircuitBuilder::new();
        let reg = kernel.allocate(size).unwrap();

        match reg.slice(start..start + len) {
            Ok(view) => {
                prop_assert!(start + len <= size);
                for q in view.iter() {
                    prop_assert!(q.index() < reg.offset() + reg.len());
                }
            }
            Err(_) => prop_assert!(start + len > size),
        }
    }

    /// Controlled operations reject any repeated qubit
    #[test]
    fn controlled_rejects_overlap(control in 0usize..4, target in 0usize..4) {
        let mut kernel = CircuitBuilder::new();
        kernel.allocate(4).unwrap();

        let result = kernel.cx(QubitId::new(control), QubitId::new(target));
        prop_assert_eq!(result.is_err(), control == target);
    }
}
