//! Gate unitaries for the qkern simulator
//!
//! Fixed gates (H, X, Y, Z, S, T and their adjoints, SWAP) are `const`
//! matrices; rotations and U3 are generated from their bound angles. The
//! simulator asks [`unitary`] for the matrix of each gate as it executes.
//!
//! # Example
//!
//! ```
//! use qkern_core::GateKind;
//! use qkern_gates::{matrices, unitary};
//! use std::f64::consts::PI;
//!
//! let ry = unitary(GateKind::Ry, &[PI]).unwrap();
//! let m = ry.as_single().unwrap();
//! assert!(matrices::is_unitary(m, 1e-12));
//! ```

pub mod matrices;
pub mod standard;

pub use matrices::{Matrix2, Matrix4};
pub use standard::{unitary, GateMatrix};
