//! Forward and inverse 8x8 DCT
//!
//! Direct O(64^2) summation of the type-II (forward) and type-III
//! (inverse) transforms. The naive formulation is deliberate: this crate
//! exists to show the math, so the loops mirror the textbook definition
//! rather than a fast factorization.

use std::f64::consts::{PI, SQRT_2};

use crate::consts::{BLOCK_SIZE, BLOCK_SIZE2, LEVEL_SHIFT};

/// Normalization constant: C(0) = 1/sqrt(2), C(k) = 1 for k > 0
#[inline]
fn c(k: usize) -> f64 {
    if k == 0 {
        1.0 / SQRT_2
    } else {
        1.0
    }
}

/// Forward 2D DCT-II over an 8x8 block of level-shifted values.
///
/// `F(i,j) = (1/4) C(i) C(j) sum_x sum_y B(x,y)
///           cos((2x+1) i pi / 16) cos((2y+1) j pi / 16)`
///
/// Input and output are flat, indexed `x * 8 + y` / `i * 8 + j`.
#[must_use]
pub fn forward_dct(block: &[f64; BLOCK_SIZE2]) -> [f64; BLOCK_SIZE2] {
    let mut output = [0.0f64; BLOCK_SIZE2];
    for i in 0..BLOCK_SIZE {
        for j in 0..BLOCK_SIZE {
            let mut sum = 0.0;
            for x in 0..BLOCK_SIZE {
                for y in 0..BLOCK_SIZE {
                    sum += block[x * BLOCK_SIZE + y]
                        * ((2.0 * x as f64 + 1.0) * i as f64 * PI / 16.0).cos()
                        * ((2.0 * y as f64 + 1.0) * j as f64 * PI / 16.0).cos();
                }
            }
            output[i * BLOCK_SIZE + j] = sum * c(i) * c(j) / 4.0;
        }
    }
    output
}

/// Inverse 2D DCT-III over an 8x8 coefficient block.
///
/// `B(x,y) = sum_i sum_j (1/4) C(i) C(j) F(i,j)
///           cos((2x+1) i pi / 16) cos((2y+1) j pi / 16)`
#[must_use]
pub fn inverse_dct(coefficients: &[f64; BLOCK_SIZE2]) -> [f64; BLOCK_SIZE2] {
    let mut output = [0.0f64; BLOCK_SIZE2];
    for x in 0..BLOCK_SIZE {
        for y in 0..BLOCK_SIZE {
            let mut sum = 0.0;
            for i in 0..BLOCK_SIZE {
                for j in 0..BLOCK_SIZE {
                    sum += c(i) * c(j) / 4.0
                        * coefficients[i * BLOCK_SIZE + j]
                        * ((2.0 * x as f64 + 1.0) * i as f64 * PI / 16.0).cos()
                        * ((2.0 * y as f64 + 1.0) * j as f64 * PI / 16.0).cos();
                }
            }
            output[x * BLOCK_SIZE + y] = sum;
        }
    }
    output
}

/// Level-shift values for the forward transform (subtract 128)
#[must_use]
pub fn level_shift(values: &[f64]) -> Vec<f64> {
    values.iter().map(|v| v - LEVEL_SHIFT).collect()
}

/// Undo the level shift after the inverse transform (add 128)
#[must_use]
pub fn level_unshift(values: &[f64]) -> Vec<f64> {
    values.iter().map(|v| v + LEVEL_SHIFT).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_dct_uniform_block_is_dc_only() {
        // A level-shifted uniform 128 block is all zeros: DC and AC vanish
        let block = [0.0f64; BLOCK_SIZE2];
        let coeffs = forward_dct(&block);
        for (k, coeff) in coeffs.iter().enumerate() {
            assert!(coeff.abs() < 1e-12, "coefficient [{}] = {}", k, coeff);
        }
    }

    #[test]
    fn test_dct_dc_value_of_constant_block() {
        // Constant v: F(0,0) = (1/4)(1/sqrt2)(1/sqrt2) * 64 v = 8 v
        let block = [42.0f64; BLOCK_SIZE2];
        let coeffs = forward_dct(&block);
        assert_relative_eq!(coeffs[0], 8.0 * 42.0, epsilon = 1e-9);
        for coeff in &coeffs[1..] {
            assert!(coeff.abs() < 1e-9);
        }
    }

    #[test]
    fn test_idct_inverts_dct() {
        // A deterministic but non-trivial block
        let mut block = [0.0f64; BLOCK_SIZE2];
        for (k, value) in block.iter_mut().enumerate() {
            *value = ((k * 37 + 11) % 256) as f64 - 128.0;
        }
        let restored = inverse_dct(&forward_dct(&block));
        for (orig, back) in block.iter().zip(&restored) {
            assert!((orig - back).abs() < 1e-9, "{} vs {}", orig, back);
        }
    }

    #[test]
    fn test_level_shift_roundtrip() {
        let values = [0.0, 128.0, 255.0];
        let shifted = level_shift(&values);
        assert_eq!(shifted, vec![-128.0, 0.0, 127.0]);
        assert_eq!(level_unshift(&shifted), values.to_vec());
    }
}
