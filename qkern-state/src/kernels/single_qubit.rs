//! Single-target kernels, plain and controlled

use super::Matrix2x2;
use num_complex::Complex64;
use rayon::prelude::*;

#[inline(always)]
fn mix(m: &Matrix2x2, a: &mut Complex64, b: &mut Complex64) {
    let (x, y) = (*a, *b);
    *a = m[0][0] * x + m[0][1] * y;
    *b = m[1][0] * x + m[1][1] * y;
}

/// Apply a 2x2 unitary to `target`
///
/// Amplitudes are processed in pairs `(i, i | 1 << target)`.
#[inline]
pub fn apply_single_qubit(state: &mut [Complex64], matrix: &Matrix2x2, target: usize, parallel: bool) {
    apply_controlled(state, matrix, 0, target, parallel);
}

/// Apply a 2x2 unitary to `target` on the subspace where every bit of
/// `control_mask` is set
///
/// `control_mask` must not contain the target bit. A zero mask applies the
/// gate unconditionally.
///
/// # Example
/// ```
/// use num_complex::Complex64;
/// use qkern_state::kernels::apply_controlled;
///
/// let one = Complex64::new(1.0, 0.0);
/// let zero = Complex64::new(0.0, 0.0);
/// let x = [[zero, one], [one, zero]];
///
/// // |01⟩ (qubit 0 set) -> CX(0 -> 1) -> |11⟩
/// let mut state = vec![zero, one, zero, zero];
/// apply_controlled(&mut state, &x, 0b01, 1, false);
/// assert_eq!(state[3], one);
/// ```
pub fn apply_controlled(
    state: &mut [Complex64],
    matrix: &Matrix2x2,
    control_mask: usize,
    target: usize,
    parallel: bool,
) {
    let stride = 1usize << target;
    let block = stride << 1;

    let update_block = |(k, chunk): (usize, &mut [Complex64])| {
        let base = k * block;
        let (lo, hi) = chunk.split_at_mut(stride);
        for (j, (a, b)) in lo.iter_mut().zip(hi.iter_mut()).enumerate() {
            if (base + j) & control_mask == control_mask {
                mix(matrix, a, b);
            }
        }
    };

    if !parallel {
        state.chunks_mut(block).enumerate().for_each(update_block);
        return;
    }

    if state.len() / block >= rayon::current_num_threads() {
        // many small blocks: one block per task
        state.par_chunks_mut(block).enumerate().for_each(update_block);
    } else {
        // few large blocks: split the pair range inside each block
        for (k, chunk) in state.chunks_mut(block).enumerate() {
            let base = k * block;
            let (lo, hi) = chunk.split_at_mut(stride);
            lo.par_iter_mut()
                .zip(hi.par_iter_mut())
                .enumerate()
                .for_each(|(j, (a, b))| {
                    if (base + j) & control_mask == control_mask {
                        mix(matrix, a, b);
                    }
                });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ZERO: Complex64 = Complex64::new(0.0, 0.0);
    const ONE: Complex64 = Complex64::new(1.0, 0.0);
    const X: Matrix2x2 = [[ZERO, ONE], [ONE, ZERO]];

    fn hadamard() -> Matrix2x2 {
        let h = Complex64::new(std::f64::consts::FRAC_1_SQRT_2, 0.0);
        [[h, h], [h, -h]]
    }

    fn basis(n: usize, index: usize) -> Vec<Complex64> {
        let mut v = vec![ZERO; 1 << n];
        v[index] = ONE;
        v
    }

    #[test]
    fn test_x_flips_target_bit() {
        for target in 0..3 {
            let mut state = basis(3, 0);
            apply_single_qubit(&mut state, &X, target, false);
            assert_eq!(state[1 << target], ONE);
        }
    }

    #[test]
    fn test_hadamard_superposition() {
        let mut state = basis(1, 0);
        apply_single_qubit(&mut state, &hadamard(), 0, false);
        assert_relative_eq!(state[0].re, std::f64::consts::FRAC_1_SQRT_2);
        assert_relative_eq!(state[1].re, std::f64::consts::FRAC_1_SQRT_2);
    }

    #[test]
    fn test_controlled_requires_all_controls() {
        // controls 0 and 1, target 2: only |011⟩ flips
        let mut state = basis(3, 0b001);
        apply_controlled(&mut state, &X, 0b011, 2, false);
        assert_eq!(state[0b001], ONE);

        let mut state = basis(3, 0b011);
        apply_controlled(&mut state, &X, 0b011, 2, false);
        assert_eq!(state[0b111], ONE);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let n = 12;
        let mut seq: Vec<Complex64> = (0..1 << n)
            .map(|i| Complex64::new((i as f64).sin(), (i as f64).cos()))
            .collect();
        let mut par = seq.clone();

        for (target, mask) in [(0, 0), (5, 0b10), (11, 0b1001), (3, 0)] {
            apply_controlled(&mut seq, &hadamard(), mask, target, false);
            apply_controlled(&mut par, &hadamard(), mask, target, true);
        }
        assert_eq!(seq, par);
    }
}
