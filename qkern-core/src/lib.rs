//! Core types for building qkern quantum circuits
//!
//! This crate provides the declarative side of the simulator:
//! - [`QubitId`] and [`Register`]: type-safe qubit addressing
//! - [`GateKind`]: the closed set of supported gates
//! - [`Operation`]: gates, controlled gates, measurements and branches
//! - [`CircuitBuilder`]: validated, kernel-style circuit construction
//! - [`Circuit`]: the immutable result, shareable across threads
//! - [`draw`]: text diagrams for the terminal
//!
//! # Example
//! ```
//! use qkern_core::CircuitBuilder;
//!
//! let mut kernel = CircuitBuilder::new();
//! let q = kernel.allocate(2).unwrap();
//! kernel.h(q.qubit(0).unwrap()).unwrap();
//! kernel.cx(q.qubit(0).unwrap(), q.qubit(1).unwrap()).unwrap();
//! kernel.measure_all(&q).unwrap();
//!
//! let circuit = kernel.build();
//! println!("{}", circuit.draw());
//! ```

pub mod ascii_renderer;
pub mod circuit;
pub mod circuit_builder;
pub mod error;
pub mod gate;
pub mod operation;
pub mod parameter;
pub mod qubit;

// Re-exports for convenience
pub use ascii_renderer::{draw, draw_with_config, draw_with_params, DrawConfig, RenderStyle};
pub use circuit::{BitInfo, Circuit};
pub use circuit_builder::CircuitBuilder;
pub use error::QuantumError;
pub use gate::GateKind;
pub use operation::{BitId, MeasuredBit, Operation};
pub use parameter::{Angle, ParamId};
pub use qubit::{QubitId, Register};

/// Type alias for circuit construction results
pub type Result<T> = std::result::Result<T, QuantumError>;
