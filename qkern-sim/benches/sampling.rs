use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use qkern_core::{Circuit, CircuitBuilder};
use qkern_sim::{Simulator, SimulatorConfig};
use qkern_state::spin::{x, z};
use qkern_state::Hamiltonian;

fn ghz(num_qubits: usize) -> Circuit {
    let mut builder = CircuitBuilder::new();
    let q = builder.allocate(num_qubits).unwrap();
    builder.h(q.qubit(0).unwrap()).unwrap();
    for i in 0..num_qubits - 1 {
        builder.cx(q.qubit(i).unwrap(), q.qubit(i + 1).unwrap()).unwrap();
    }
    builder.measure_all(&q).unwrap();
    builder.build()
}

fn layered(num_qubits: usize, depth: usize) -> Circuit {
    let mut builder = CircuitBuilder::new();
    let q = builder.allocate(num_qubits).unwrap();
    let theta = builder.parameter();
    for d in 0..depth {
        for i in 0..num_qubits {
            let qubit = q.qubit(i).unwrap();
            if (i + d) % 2 == 0 {
                builder.h(qubit).unwrap();
            } else {
                builder.ry(theta, qubit).unwrap();
            }
        }
        for i in (d % 2..num_qubits - 1).step_by(2) {
            builder.cx(q.qubit(i).unwrap(), q.qubit(i + 1).unwrap()).unwrap();
        }
    }
    builder.build()
}

fn ising(num_qubits: usize) -> Hamiltonian {
    let mut h = Hamiltonian::new();
    for i in 0..num_qubits - 1 {
        h += -1.0 * z(i) * z(i + 1);
    }
    for i in 0..num_qubits {
        h += 0.5 * x(i);
    }
    h
}

fn simulator(parallel_threshold: usize) -> Simulator {
    Simulator::new(
        SimulatorConfig::default()
            .with_seed(42)
            .with_parallel_shot_threshold(parallel_threshold),
    )
    .unwrap()
}

fn bench_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampling");
    group.sample_size(20);

    for num_qubits in [4, 8, 12] {
        let circuit = ghz(num_qubits);
        for (mode, threshold) in [("sequential", usize::MAX), ("parallel", 1)] {
            let sim = simulator(threshold);
            group.bench_with_input(
                BenchmarkId::new(mode, format!("ghz{num_qubits}_1000")),
                &circuit,
                |b, circuit| b.iter(|| sim.sample(black_box(circuit), &[], 1000).unwrap()),
            );
        }
    }

    group.finish();
}

fn bench_observe(c: &mut Criterion) {
    let mut group = c.benchmark_group("observe");
    group.sample_size(20);
    let sim = simulator(256);

    for num_qubits in [4, 8, 12] {
        let circuit = layered(num_qubits, 6);
        let h = ising(num_qubits);

        group.bench_with_input(
            BenchmarkId::new("exact", num_qubits),
            &circuit,
            |b, circuit| b.iter(|| sim.observe(black_box(circuit), &h, &[0.3]).unwrap()),
        );
        group.bench_with_input(
            BenchmarkId::new("sampled_500", num_qubits),
            &circuit,
            |b, circuit| {
                b.iter(|| {
                    sim.observe_sampled(black_box(circuit), &h, &[0.3], 500)
                        .unwrap()
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_sampling, bench_observe);
criterion_main!(benches);
