//! End-to-end tests: build, sample, branch and observe

use approx::assert_relative_eq;
use proptest::prelude::*;
use qkern_core::{Circuit, CircuitBuilder, GateKind};
use qkern_sim::{observe, sample, SampleResult, Simulator, SimulatorConfig, SimulatorError};
use qkern_state::spin::{x, y, z};
use qkern_state::Hamiltonian;

fn bell() -> Circuit {
    let mut builder = CircuitBuilder::new();
    let q = builder.allocate(2).unwrap();
    builder.h(q.qubit(0).unwrap()).unwrap();
    builder.cx(q.qubit(0).unwrap(), q.qubit(1).unwrap()).unwrap();
    builder.measure_all(&q).unwrap();
    builder.build()
}

fn deuteron_ansatz() -> Circuit {
    let mut builder = CircuitBuilder::new();
    let q = builder.allocate(2).unwrap();
    let theta = builder.parameter();
    builder.x(q.qubit(0).unwrap()).unwrap();
    builder.ry(theta, q.qubit(1).unwrap()).unwrap();
    builder.cx(q.qubit(1).unwrap(), q.qubit(0).unwrap()).unwrap();
    builder.build()
}

fn deuteron() -> Hamiltonian {
    5.907 - 2.1433 * x(0) * x(1) - 2.1433 * y(0) * y(1) + 0.21829 * z(0) - 6.125 * z(1)
}

fn seeded(seed: u64) -> Simulator {
    Simulator::new(SimulatorConfig::default().with_seed(seed)).unwrap()
}

#[test]
fn bell_sampling_yields_only_correlated_outcomes() {
    let counts = sample(&bell(), &[], 10_000).unwrap();
    assert_eq!(counts.total_shots(), 10_000);
    assert_eq!(counts.count("01"), 0);
    assert_eq!(counts.count("10"), 0);
    let p00 = counts.probability("00");
    assert!((0.45..0.55).contains(&p00), "p(00) = {p00}");
    assert!((0.45..0.55).contains(&counts.probability("11")));
}

#[test]
fn most_probable_picks_the_larger_count() {
    let counts = SampleResult::from_counts([("00", 9960), ("11", 40)]);
    assert_eq!(counts.most_probable(), Some("00"));
}

#[test]
fn branch_routes_on_measured_bit() {
    // H q0; b = mz(q0); if b { x(q1) } else { h(q1); h(q1) }; mz(q1)
    let mut builder = CircuitBuilder::new();
    let q = builder.allocate(2).unwrap();
    let (q0, q1) = (q.qubit(0).unwrap(), q.qubit(1).unwrap());
    builder.h(q0).unwrap();
    let b = builder.measure_named(q0, "coin").unwrap();
    builder
        .branch(
            b,
            |k| k.x(q1).map(|_| ()),
            |k| {
                k.h(q1)?;
                k.h(q1)?;
                Ok(())
            },
        )
        .unwrap();
    let before_readout = builder.clone().build();
    builder.measure(q1).unwrap();
    let circuit = builder.build();

    let counts = seeded(17).sample(&circuit, &[], 2000).unwrap();
    assert_eq!(counts.count("00") + counts.count("11"), 2000);
    assert!(counts.count("00") > 800 && counts.count("11") > 800);

    let mut seen = [false; 2];
    for seed in 0..40 {
        let exec = seeded(seed).run(&before_readout, &[]).unwrap();
        let coin = exec.bit_by_label("coin").unwrap();
        seen[coin as usize] = true;
        let expected = if coin { 0b11 } else { 0b00 };
        assert_relative_eq!(
            exec.state().probability(expected).unwrap(),
            1.0,
            epsilon = 1e-12
        );
    }
    assert_eq!(seen, [true, true]);
}

#[test]
fn measured_bitstrings_follow_measurement_order() {
    let mut builder = CircuitBuilder::new();
    let q = builder.allocate(3).unwrap();
    builder.x(q.qubit(2).unwrap()).unwrap();
    builder.measure(q.qubit(2).unwrap()).unwrap();
    builder.measure(q.qubit(0).unwrap()).unwrap();
    let circuit = builder.build();

    let counts = seeded(1).sample(&circuit, &[], 50).unwrap();
    assert_eq!(counts.count("10"), 50);
}

#[test]
fn unmeasured_circuit_is_measured_in_qubit_order() {
    let mut builder = CircuitBuilder::new();
    let q = builder.allocate(3).unwrap();
    builder.x(q.qubit(1).unwrap()).unwrap();
    let circuit = builder.build();

    let counts = seeded(2).sample(&circuit, &[], 10).unwrap();
    assert_eq!(counts.count("010"), 10);
}

#[test]
fn z_expectation_on_basis_states() {
    let mut builder = CircuitBuilder::new();
    let q = builder.qubit();
    let ground = builder.clone().build();
    builder.x(q).unwrap();
    let excited = builder.build();

    assert_eq!(observe(&ground, &z(0), &[]).unwrap().expectation(), 1.0);
    assert_eq!(observe(&excited, &z(0), &[]).unwrap().expectation(), -1.0);
}

#[test]
fn deuteron_energy_at_reference_angle() {
    let result = observe(&deuteron_ansatz(), &deuteron(), &[0.59]).unwrap();
    assert!((result.expectation() - (-1.7488)).abs() < 1e-3);
    assert_eq!(result.term_count(), 5);

    let theta: f64 = 0.59;
    let analytic = 5.907 - 4.2866 * theta.sin() - 6.34329 * theta.cos();
    assert_relative_eq!(result.expectation(), analytic, epsilon = 1e-9);
}

#[test]
fn sampled_energy_tracks_exact_energy() {
    let sim = seeded(2024);
    let exact = sim.observe(&deuteron_ansatz(), &deuteron(), &[0.59]).unwrap();
    let sampled = sim
        .observe_sampled(&deuteron_ansatz(), &deuteron(), &[0.59], 20_000)
        .unwrap();
    assert!(
        (sampled.expectation() - exact.expectation()).abs() < 0.15,
        "sampled {} vs exact {}",
        sampled.expectation(),
        exact.expectation()
    );
    assert_eq!(sampled.shots(), Some(20_000));
}

#[test]
fn missing_parameters_are_rejected() {
    assert!(matches!(
        sample(&deuteron_ansatz(), &[], 10),
        Err(SimulatorError::ParameterCountMismatch {
            expected: 1,
            actual: 0
        })
    ));
    assert!(matches!(
        observe(&deuteron_ansatz(), &deuteron(), &[]),
        Err(SimulatorError::ParameterCountMismatch { .. })
    ));
}

#[test]
fn seeded_sampling_is_independent_of_parallelism() {
    let mut builder = CircuitBuilder::new();
    let q = builder.allocate(3).unwrap();
    let angles = builder.parameters(3);
    for (i, angle) in angles.into_iter().enumerate() {
        builder.ry(angle, q.qubit(i).unwrap()).unwrap();
    }
    builder.cx(q.qubit(0).unwrap(), q.qubit(2).unwrap()).unwrap();
    let b = builder.measure(q.qubit(0).unwrap()).unwrap();
    builder
        .branch_if(b, |k| k.h(q.qubit(1).unwrap()).map(|_| ()))
        .unwrap();
    builder.measure_all(&q.slice(1..3).unwrap()).unwrap();
    let circuit = builder.build();
    let params = [0.7, 1.9, 2.4];

    let config = SimulatorConfig::default().with_seed(99);
    let sequential = Simulator::new(config.clone().with_parallel_shot_threshold(usize::MAX))
        .unwrap()
        .sample(&circuit, &params, 3000)
        .unwrap();
    let parallel = Simulator::new(config.with_parallel_shot_threshold(1))
        .unwrap()
        .sample(&circuit, &params, 3000)
        .unwrap();

    assert_eq!(sequential, parallel);
    assert_eq!(
        sequential.iter().collect::<Vec<_>>(),
        parallel.iter().collect::<Vec<_>>()
    );
}

#[test]
fn unseeded_runs_draw_fresh_entropy() {
    let mut builder = CircuitBuilder::new();
    let q = builder.allocate(8).unwrap();
    builder.apply_all(GateKind::H, &q).unwrap();
    let circuit = builder.build();

    let a = sample(&circuit, &[], 200).unwrap();
    let b = sample(&circuit, &[], 200).unwrap();
    assert_ne!(a, b);
}

fn self_inverse_kind() -> impl Strategy<Value = GateKind> {
    prop::sample::select(vec![
        GateKind::H,
        GateKind::X,
        GateKind::Y,
        GateKind::Z,
    ])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_self_inverse_gates_restore_ground_state(
        gates in prop::collection::vec((self_inverse_kind(), 0usize..3), 1..8),
    ) {
        let mut builder = CircuitBuilder::new();
        let q = builder.allocate(3).unwrap();
        for &(kind, i) in gates.iter().chain(gates.iter().rev()) {
            builder.gate(kind, &[q.qubit(i).unwrap()], &[]).unwrap();
        }
        let circuit = builder.build();
        let exec = seeded(0).run(&circuit, &[]).unwrap();
        prop_assert!((exec.state().probability(0).unwrap() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn prop_hamiltonian_sum_order_does_not_matter(
        a in -3.0f64..3.0,
        b in -3.0f64..3.0,
        theta in 0.0f64..3.1,
    ) {
        let circuit = deuteron_ansatz();
        let h1 = a * x(0) * x(1);
        let h2 = b * z(0);
        let h3 = deuteron();

        let left = observe(&circuit, &((h1.clone() + h2.clone()) + h3.clone()), &[theta])
            .unwrap()
            .expectation();
        let right = observe(&circuit, &(h3 + (h2 + h1)), &[theta])
            .unwrap()
            .expectation();
        prop_assert!((left - right).abs() < 1e-9);
    }
}
