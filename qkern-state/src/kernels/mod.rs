//! Amplitude update kernels
//!
//! Every kernel has a sequential path and a rayon path. The rayon path
//! splits the amplitude vector into disjoint blocks, so no two workers
//! ever touch the same amplitude. Reductions go through fixed-size
//! partial sums, which keeps their result independent of the thread count.

pub mod single_qubit;
pub mod two_qubit;

use num_complex::Complex64;
use rayon::prelude::*;

pub use single_qubit::{apply_controlled, apply_single_qubit};
pub use two_qubit::apply_two_qubit;

/// Row-major 2x2 gate matrix
pub type Matrix2x2 = [[Complex64; 2]; 2];

/// Row-major 4x4 gate matrix
pub type Matrix4x4 = [[Complex64; 4]; 4];

/// Amplitudes per partial sum in reductions
const REDUCTION_BLOCK: usize = 1 << 12;

/// Σ |a_i|² over the amplitudes selected by `filter`
pub fn sum_probabilities<F>(state: &[Complex64], parallel: bool, filter: F) -> f64
where
    F: Fn(usize) -> bool + Sync,
{
    let block_sum = |(k, block): (usize, &[Complex64])| -> f64 {
        let base = k * REDUCTION_BLOCK;
        block
            .iter()
            .enumerate()
            .filter(|(j, _)| filter(base + j))
            .map(|(_, a)| a.norm_sqr())
            .sum()
    };

    if parallel {
        let partials: Vec<f64> = state
            .par_chunks(REDUCTION_BLOCK)
            .enumerate()
            .map(block_sum)
            .collect();
        partials.into_iter().sum()
    } else {
        state.chunks(REDUCTION_BLOCK).enumerate().map(block_sum).sum()
    }
}

/// ⟨a|b⟩ with the same blocking as [`sum_probabilities`]
pub fn inner_product(a: &[Complex64], b: &[Complex64], parallel: bool) -> Complex64 {
    let block_dot = |(x, y): (&[Complex64], &[Complex64])| -> Complex64 {
        x.iter().zip(y).map(|(p, q)| p.conj() * q).sum()
    };

    if parallel {
        let partials: Vec<Complex64> = a
            .par_chunks(REDUCTION_BLOCK)
            .zip(b.par_chunks(REDUCTION_BLOCK))
            .map(block_dot)
            .collect();
        partials.into_iter().sum()
    } else {
        a.chunks(REDUCTION_BLOCK)
            .zip(b.chunks(REDUCTION_BLOCK))
            .map(block_dot)
            .sum()
    }
}

/// Multiply every amplitude by `factor`, zeroing those `keep` rejects
pub fn scale_filtered<F>(state: &mut [Complex64], factor: f64, parallel: bool, keep: F)
where
    F: Fn(usize) -> bool + Sync,
{
    let update = |(i, amp): (usize, &mut Complex64)| {
        if keep(i) {
            *amp *= factor;
        } else {
            *amp = Complex64::new(0.0, 0.0);
        }
    };

    if parallel {
        state.par_iter_mut().enumerate().for_each(update);
    } else {
        state.iter_mut().enumerate().for_each(update);
    }
}
