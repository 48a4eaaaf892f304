//! Circuit execution, shot sampling and Hamiltonian observation
//!
//! This crate drives circuits built with `qkern-core` through the dense
//! state engine of `qkern-state`.
//!
//! # Features
//!
//! - **Sampling**: repeated independent executions collected into a
//!   bitstring histogram, distributed over the rayon pool for large shot
//!   counts and reproducible under a fixed seed
//! - **Mid-circuit measurement**: measurements collapse the live state and
//!   branch operations follow the observed bit
//! - **Observation**: exact `⟨ψ|H|ψ⟩` for Pauli-sum Hamiltonians, or an
//!   estimate from per-term basis-rotated sampling
//! - **Configuration**: `SimulatorConfig` presets, builder methods and
//!   `QKERN_*` environment overrides
//!
//! # Example
//!
//! ```
//! use qkern_core::CircuitBuilder;
//! use qkern_state::spin::{x, y, z};
//!
//! let mut builder = CircuitBuilder::new();
//! let q = builder.allocate(2).unwrap();
//! let theta = builder.parameter();
//! builder.x(q.qubit(0).unwrap()).unwrap();
//! builder.ry(theta, q.qubit(1).unwrap()).unwrap();
//! builder.cx(q.qubit(1).unwrap(), q.qubit(0).unwrap()).unwrap();
//! let ansatz = builder.build();
//!
//! let h = 5.907 - 2.1433 * x(0) * x(1) - 2.1433 * y(0) * y(1) + 0.21829 * z(0)
//!     - 6.125 * z(1);
//! let energy = qkern_sim::observe(&ansatz, &h, &[0.59]).unwrap();
//! assert!((energy.expectation() + 1.7488).abs() < 1e-3);
//! ```

pub mod config;
pub mod error;
pub mod executor;
pub mod result;
pub mod simulator;
pub mod statistics;

pub use config::SimulatorConfig;
pub use error::{Result, SimulatorError};
pub use executor::ExecutionState;
pub use result::{ObserveResult, SampleResult, TermExpectation};
pub use simulator::Simulator;
pub use statistics::ExecutionStatistics;

use qkern_core::Circuit;
use qkern_state::Hamiltonian;

/// Sample `circuit` `shots` times with the default configuration
///
/// See [`Simulator::sample`].
pub fn sample(circuit: &Circuit, params: &[f64], shots: usize) -> Result<SampleResult> {
    Simulator::default().sample(circuit, params, shots)
}

/// Exact `⟨hamiltonian⟩` on the final state of `circuit` with the default
/// configuration
///
/// See [`Simulator::observe`].
pub fn observe(circuit: &Circuit, hamiltonian: &Hamiltonian, params: &[f64]) -> Result<ObserveResult> {
    Simulator::default().observe(circuit, hamiltonian, params)
}
