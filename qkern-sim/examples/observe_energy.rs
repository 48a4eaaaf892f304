//! Expectation values of Pauli-sum Hamiltonians
//!
//! Run with: cargo run --example observe_energy

use qkern_core::CircuitBuilder;
use qkern_sim::{observe, Simulator, SimulatorConfig};
use qkern_state::spin::{x, y, z};
use qkern_state::Hamiltonian;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Two-qubit deuteron ansatz
    let mut kernel = CircuitBuilder::new();
    let q = kernel.allocate(2)?;
    let theta = kernel.parameter();
    kernel.x(q.qubit(0)?)?;
    kernel.ry(theta, q.qubit(1)?)?;
    kernel.cx(q.qubit(1)?, q.qubit(0)?)?;
    let ansatz = kernel.build();
    println!("{}", ansatz.draw());

    let deuteron = 5.907 - 2.1433 * x(0) * x(1) - 2.1433 * y(0) * y(1) + 0.21829 * z(0)
        - 6.125 * z(1);
    println!("H = {deuteron}");

    let result = observe(&ansatz, &deuteron, &[0.59])?;
    println!("{result}");
    for term in result.terms() {
        println!("  {:>24}  {:+.6}", term.term.to_string(), term.value);
    }

    println!("\nEnergy scan:");
    let mut best = (f64::INFINITY, 0.0);
    for step in 0..=20 {
        let angle = -std::f64::consts::PI + step as f64 * std::f64::consts::PI / 10.0;
        let energy = observe(&ansatz, &deuteron, &[angle])?.expectation();
        println!("  θ = {angle:+.4}  E = {energy:+.6}");
        if energy < best.0 {
            best = (energy, angle);
        }
    }
    println!("lowest sampled grid point: E = {:.6} at θ = {:.4}", best.0, best.1);

    let simulator = Simulator::new(SimulatorConfig::default().with_seed(7))?;
    for shots in [100, 1000, 10_000] {
        let estimate = simulator.observe_sampled(&ansatz, &deuteron, &[0.59], shots)?;
        println!("{estimate}");
    }

    // Building a Hamiltonian incrementally
    let mut hamiltonian: Hamiltonian = 0.5 * z(0) + x(1) + y(0) + y(0) * y(1) + x(0) * y(1) * z(2);
    for i in 0..2 {
        hamiltonian += -2.0 * z(i) * z(i + 1);
    }
    println!("\nH = {hamiltonian}");
    println!("terms: {}", hamiltonian.term_count());

    // ⟨Z⟩ after two rotations bound at execution time
    let mut kernel = CircuitBuilder::new();
    let qubit = kernel.qubit();
    let angles = kernel.parameters(2);
    kernel.rx(angles[0], qubit)?;
    kernel.ry(angles[1], qubit)?;
    let rotated = kernel.build();

    println!("{}", rotated.draw_with_params(&[0.0, 0.0]));
    for params in [[0.0, 0.0], [0.5, 0.0], [0.5, 1.0]] {
        let expectation = observe(&rotated, &z(0), &params)?.expectation();
        println!("⟨Z⟩ at {params:?} = {expectation:+.6}");
    }

    Ok(())
}
