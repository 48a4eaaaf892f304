//! Introduction: building, drawing and sampling kernels
//!
//! Run with: cargo run --example introduction
//! Set RUST_LOG=qkern_sim=debug to see execution logs.

use qkern_core::{CircuitBuilder, GateKind};
use qkern_sim::{sample, Simulator, SimulatorConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // A single qubit through a chain of fixed gates
    let mut first = CircuitBuilder::new();
    let q = first.qubit();
    first.h(q)?.x(q)?.y(q)?.z(q)?.t(q)?.s(q)?;
    first.measure(q)?;
    println!("{}", first.build().draw());

    // GHZ-style fan-out followed by a register-wide X
    let n = 3;
    let mut second = CircuitBuilder::new();
    let qubits = second.allocate(n)?;
    second.h(qubits.qubit(0)?)?;
    second.cx(qubits.qubit(0)?, qubits.qubit(1)?)?;
    second.cx(qubits.qubit(0)?, qubits.qubit(2)?)?;
    second.apply_all(GateKind::X, &qubits)?;
    second.measure_all(&qubits)?;
    println!("{}", second.build().draw());

    // Multi-controlled X from the front of a register onto its back
    let mut bar = CircuitBuilder::new();
    let qubits = bar.allocate(n)?;
    bar.mcx(&qubits.front(n - 1)?, qubits.back())?;
    println!("{}", bar.build().draw());

    // Bell pair, sampled
    let mut bell = CircuitBuilder::new();
    let qubits = bell.allocate(2)?;
    bell.h(qubits.qubit(0)?)?;
    bell.cx(qubits.qubit(0)?, qubits.qubit(1)?)?;
    bell.measure_all(&qubits)?;
    let bell = bell.build();
    println!("{}", bell.draw());

    let counts = sample(&bell, &[], 10_000)?;
    println!("{counts}");
    for (bits, count) in &counts {
        println!("Observed: {bits}, {count}");
    }

    // Parameterized kernel with multi-controlled gates
    let mut third = CircuitBuilder::new();
    let qubits = third.allocate(4)?;
    let theta = third.parameters(2);
    third.apply_all(GateKind::H, &qubits)?;
    for (i, angle) in theta.iter().enumerate() {
        third.ry(*angle, qubits.qubit(i)?)?;
    }
    third.ccx(qubits.qubit(0)?, qubits.qubit(1)?, qubits.qubit(2)?)?;
    third.mcx(&qubits.front(3)?, qubits.qubit(3)?)?;
    third.mcx(&qubits.slice(0..3)?, qubits.qubit(3)?)?;
    third.measure_all(&qubits)?;
    let third = third.build();
    let params = [0.15, 1.5];
    println!("{}", third.draw_with_params(&params));

    let result = sample(&third, &params, 5000)?;
    println!("Result: {result}");
    if let Some(bits) = result.most_probable() {
        println!("Most probable bit string: {bits}");
    }

    // Mid-circuit measurement steering the rest of the kernel
    let mut mid = CircuitBuilder::new();
    let qubits = mid.allocate(2)?;
    let ancilla = mid.qubit();
    let angle = mid.parameter();
    mid.ry(angle, ancilla)?;
    let aux = mid.measure_named(ancilla, "aux")?;
    mid.branch(
        aux,
        |k| {
            k.x(qubits.qubit(0)?)?;
            k.x(ancilla)?;
            Ok(())
        },
        |k| {
            k.x(qubits.qubit(0)?)?;
            k.x(qubits.qubit(1)?)?;
            Ok(())
        },
    )?;
    mid.measure(ancilla)?;
    mid.measure_all(&qubits)?;
    let mid = mid.build();
    println!("{}", mid.draw());

    let simulator = Simulator::new(SimulatorConfig::from_env()?.with_statistics(true))?;
    let result = simulator.sample_configured(&mid, &[0.5])?;
    println!("{result}");
    if let Some(stats) = result.statistics() {
        println!("{stats}");
    }

    Ok(())
}
