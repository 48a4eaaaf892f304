//! Two-target kernel

use super::Matrix4x4;
use num_complex::Complex64;
use rayon::prelude::*;

/// Apply a 4x4 unitary to the qubit pair `(first, second)`
///
/// Matrix rows are indexed by `(bit of first) << 1 | (bit of second)`.
/// The qubits must differ.
pub fn apply_two_qubit(
    state: &mut [Complex64],
    matrix: &Matrix4x4,
    first: usize,
    second: usize,
    parallel: bool,
) {
    let mask_a = 1usize << first;
    let mask_b = 1usize << second;
    // blocks aligned to the higher qubit keep both bits local to a block
    let block = mask_a.max(mask_b) << 1;
    let low_mask = mask_a.min(mask_b);

    let update_block = |chunk: &mut [Complex64]| {
        let half = chunk.len() / 2;
        for j in (0..half).filter(|j| j & low_mask == 0) {
            let idx = [j, j | mask_b, j | mask_a, j | mask_a | mask_b];
            let v = idx.map(|i| chunk[i]);
            for (row, &i) in matrix.iter().zip(&idx) {
                chunk[i] = row.iter().zip(&v).map(|(m, a)| m * a).sum();
            }
        }
    };

    if parallel && state.len() > block {
        state.par_chunks_mut(block).for_each(update_block);
    } else {
        state.chunks_mut(block).for_each(update_block);
    }
}
