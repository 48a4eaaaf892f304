//! Dense state vectors for circuit simulation
//!
//! This crate holds the `2^n` amplitude vector of an `n`-qubit register and
//! the operations the simulator drives on it:
//!
//! - unitary kernels for one-qubit, two-qubit and multi-controlled gates,
//!   running on the rayon pool above a configurable qubit count
//! - Z-basis measurement with collapse and renormalization
//! - Pauli-sum Hamiltonians and their expectation values
//!
//! Amplitude index bit `q` is the value of qubit `q` (little-endian).
//!
//! # Example
//!
//! ```
//! use qkern_state::{spin::z, DenseState};
//! use num_complex::Complex64;
//!
//! let h = std::f64::consts::FRAC_1_SQRT_2;
//! let hadamard = [
//!     [Complex64::new(h, 0.0), Complex64::new(h, 0.0)],
//!     [Complex64::new(h, 0.0), Complex64::new(-h, 0.0)],
//! ];
//!
//! let mut state = DenseState::new(1).unwrap();
//! state.apply_single_qubit_gate(&hadamard, 0).unwrap();
//! assert!(z(0).expectation(&state, 1e-9).unwrap().abs() < 1e-12);
//! ```

pub mod dense_state;
pub mod error;
pub mod hamiltonian;
pub mod kernels;
pub mod measurement;
pub mod observable;

pub use dense_state::{DenseState, DEFAULT_PARALLEL_THRESHOLD, MAX_QUBITS};
pub use error::{Result, StateError};
pub use hamiltonian::{spin, Hamiltonian};
pub use kernels::{Matrix2x2, Matrix4x4};
pub use measurement::{QubitMeasurement, DEGENERATE_PROBABILITY};
pub use observable::{Pauli, PauliTerm};
