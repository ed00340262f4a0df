//! Quality-scaled quantization matrix and element-wise (de)quantization
//!
//! The matrix is derived per invocation from the fixed Annex K luminance
//! table; nothing is persisted across quality changes. Quantization here is
//! plain real-valued division - the information loss comes from the rounding
//! step applied afterwards, not from the division itself.

use crate::consts::{BASE_QUANT_MATRIX, BLOCK_SIZE2, MAX_QUALITY, MIN_QUALITY};
use crate::error::{Error, Result};

/// An 8x8 quantization matrix scaled for one quality setting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantMatrix {
    values: [u16; BLOCK_SIZE2],
}

impl QuantMatrix {
    /// Scale the base table for the given quality (1-100).
    ///
    /// Uses the standard JPEG scaling:
    /// `factor = quality < 50 ? 5000 / quality : 200 - 2 * quality`,
    /// `values[k] = clamp(round(base[k] * factor / 100), 1, 255)`.
    /// Quality 100 yields a factor of 0, so every entry clamps to 1.
    pub fn from_quality(quality: u8) -> Result<Self> {
        if !(MIN_QUALITY..=MAX_QUALITY).contains(&quality) {
            return Err(Error::OutOfRange {
                what: "quality",
                value: i64::from(quality),
                min: i64::from(MIN_QUALITY),
                max: i64::from(MAX_QUALITY),
            });
        }
        let q = f64::from(quality);
        let factor = if quality < 50 { 5000.0 / q } else { 200.0 - 2.0 * q };

        let mut values = [0u16; BLOCK_SIZE2];
        for (value, base) in values.iter_mut().zip(BASE_QUANT_MATRIX.iter()) {
            *value = (f64::from(*base) * factor / 100.0).round().clamp(1.0, 255.0) as u16;
        }
        Ok(Self { values })
    }

    /// Matrix entries in natural (row-major) order
    #[must_use]
    pub fn values(&self) -> &[u16; BLOCK_SIZE2] {
        &self.values
    }

    /// Element-wise division of a coefficient block, no rounding
    #[must_use]
    pub fn quantize(&self, block: &[f64; BLOCK_SIZE2]) -> [f64; BLOCK_SIZE2] {
        let mut result = [0.0f64; BLOCK_SIZE2];
        for k in 0..BLOCK_SIZE2 {
            result[k] = block[k] / f64::from(self.values[k]);
        }
        result
    }

    /// Element-wise multiplication, inverting [`Self::quantize`] up to
    /// floating-point division error
    #[must_use]
    pub fn dequantize(&self, block: &[f64; BLOCK_SIZE2]) -> [f64; BLOCK_SIZE2] {
        let mut result = [0.0f64; BLOCK_SIZE2];
        for k in 0..BLOCK_SIZE2 {
            result[k] = block[k] * f64::from(self.values[k]);
        }
        result
    }
}

/// Quantize a block with a matrix generated for `quality`
pub fn apply_quantization(block: &[f64; BLOCK_SIZE2], quality: u8) -> Result<[f64; BLOCK_SIZE2]> {
    Ok(QuantMatrix::from_quality(quality)?.quantize(block))
}

/// Dequantize a block with a matrix generated for `quality`
pub fn apply_dequantization(block: &[f64; BLOCK_SIZE2], quality: u8) -> Result<[f64; BLOCK_SIZE2]> {
    Ok(QuantMatrix::from_quality(quality)?.dequantize(block))
}
