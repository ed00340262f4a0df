//! Pipeline orchestration: staged views and the full round trip
//!
//! Composes the color converter, partitioner, DCT, quantizer and rounding
//! policy into the complete DCT -> quantize -> dequantize -> IDCT round
//! trip, plus the partial per-stage views the visualizer steps through.
//! Every stage is a pure computation over buffers it exclusively owns;
//! blocks never outlive the stage that produced them.

use rand::Rng;
use tracing::debug;

use crate::consts::{BLOCK_SIZE, BLOCK_SIZE2};
use crate::dct::{forward_dct, inverse_dct, level_shift, level_unshift};
use crate::error::{Error, Result};
use crate::partition::{to_square_blocks, Block};
use crate::pixel::PixelBuffer;
use crate::quant::QuantMatrix;
use crate::rounding::{round_values, round_values_with, RoundingMode};
use crate::subsample::subsample;
use crate::types::{ColorMode, Component, DisplayComponent, Subsampling};

/// Clamp a value into the displayable [0, 255] range
#[inline]
#[must_use]
pub fn normalize_value(value: f64) -> f64 {
    value.clamp(0.0, 255.0)
}

/// Clamp every value into [0, 255]
#[must_use]
pub fn normalize_values(values: &[f64]) -> Vec<f64> {
    values.iter().map(|v| normalize_value(*v)).collect()
}

/// Absolute value of every element
#[must_use]
pub fn absolute_values(values: &[f64]) -> Vec<f64> {
    values.iter().map(|v| v.abs()).collect()
}

/// Round every value to the given number of decimal places.
/// The DCT stage keeps its coefficients at two decimals for display.
#[must_use]
pub fn round_to_decimals(values: &[f64], places: u32) -> Vec<f64> {
    let scale = 10f64.powi(places as i32);
    values.iter().map(|v| (v * scale).round() / scale).collect()
}

/// Output of one pipeline stage: a displayable buffer plus the raw
/// unnormalized values the next stage (or an inspector) consumes
#[derive(Debug, Clone)]
pub struct StageOutput {
    /// Buffer of normalized absolute values, ready for display
    pub buffer: PixelBuffer,
    /// The stage's real-valued results, before normalization
    pub values: Vec<f64>,
}

/// Result of the rounding-sensitivity round trip: the reconstructed image
/// plus the per-block IDCT values it was rebuilt from, kept so the caller
/// can re-run the quantization round trip on recalculated data
#[derive(Debug, Clone)]
pub struct RoundingRoundTrip {
    pub buffer: PixelBuffer,
    /// Level-shifted spatial values per block, after DCT -> round -> IDCT
    pub idct_blocks: Vec<Block<f64>>,
}

fn as_block(values: &[f64]) -> Result<[f64; BLOCK_SIZE2]> {
    values.try_into().map_err(|_| Error::InvalidShape {
        length: values.len(),
        divisor: BLOCK_SIZE2,
        context: "transform block values",
    })
}

/// Extract the selected 8x8 block as its own buffer with rebased
/// coordinates. Fails with `OutOfRange` past the block grid.
pub fn crop_block(
    buffer: &PixelBuffer,
    block_row: usize,
    block_col: usize,
) -> Result<PixelBuffer> {
    let x1 = block_col * BLOCK_SIZE;
    let y1 = block_row * BLOCK_SIZE;
    if x1 + BLOCK_SIZE > buffer.width() {
        return Err(Error::OutOfRange {
            what: "selected block column",
            value: block_col as i64,
            min: 0,
            max: (buffer.width() / BLOCK_SIZE) as i64 - 1,
        });
    }
    if y1 + BLOCK_SIZE > buffer.height() {
        return Err(Error::OutOfRange {
            what: "selected block row",
            value: block_row as i64,
            min: 0,
            max: (buffer.height() / BLOCK_SIZE) as i64 - 1,
        });
    }

    let mut pixels = Vec::with_capacity(BLOCK_SIZE2);
    for y in y1..y1 + BLOCK_SIZE {
        for x in x1..x1 + BLOCK_SIZE {
            pixels.push(buffer.get_pixel(x, y)?.clone().with_position(y - y1, x - x1));
        }
    }
    PixelBuffer::new(pixels, buffer.color_mode(), BLOCK_SIZE, BLOCK_SIZE)
}

/// Forward-DCT view of one 8x8 buffer: convert to YCbCr, level-shift the
/// luma, transform, and keep the coefficients at two decimals
pub fn dct_stage(buffer: &PixelBuffer) -> Result<StageOutput> {
    let buffer = buffer.clone().into_color_mode(ColorMode::YCbCr);
    let luma = buffer.component_values(Component::Y)?;
    let coefficients = forward_dct(&as_block(&level_shift(&luma))?);
    let values = round_to_decimals(&coefficients, 2);
    let display = PixelBuffer::from_values(
        &normalize_values(&absolute_values(&values)),
        ColorMode::YCbCr,
        buffer.width(),
        buffer.height(),
        None,
    )?;
    Ok(StageOutput { buffer: display, values })
}

/// Quantization view: divide the coefficients by the quality-scaled matrix
/// and apply the rounding policy
pub fn quantization_stage(
    values: &[f64],
    width: usize,
    height: usize,
    quality: u8,
    mode: RoundingMode,
) -> Result<StageOutput> {
    quantization_stage_with_rng(values, width, height, quality, mode, &mut rand::thread_rng())
}

/// [`quantization_stage`] with an injected randomness source
pub fn quantization_stage_with_rng<R: Rng + ?Sized>(
    values: &[f64],
    width: usize,
    height: usize,
    quality: u8,
    mode: RoundingMode,
    rng: &mut R,
) -> Result<StageOutput> {
    let quantized = QuantMatrix::from_quality(quality)?.quantize(&as_block(values)?);
    let rounded = round_values_with(&quantized, mode, rng);
    let display = PixelBuffer::from_values(
        &normalize_values(&absolute_values(&rounded)),
        ColorMode::YCbCr,
        width,
        height,
        None,
    )?;
    Ok(StageOutput { buffer: display, values: rounded })
}

/// Dequantization view: multiply the rounded coefficients back up
pub fn dequantization_stage(
    values: &[f64],
    width: usize,
    height: usize,
    quality: u8,
) -> Result<StageOutput> {
    let dequantized = QuantMatrix::from_quality(quality)?.dequantize(&as_block(values)?);
    let display = PixelBuffer::from_values(
        &normalize_values(&absolute_values(&dequantized)),
        ColorMode::YCbCr,
        width,
        height,
        None,
    )?;
    Ok(StageOutput { buffer: display, values: dequantized.to_vec() })
}

/// Inverse-DCT view: reconstruct the spatial block, round to display
/// integers and undo the level shift
pub fn idct_stage(values: &[f64], width: usize, height: usize) -> Result<StageOutput> {
    let restored = inverse_dct(&as_block(values)?);
    let rounded = round_values(&restored, RoundingMode::Classic);
    let increased = level_unshift(&rounded);
    let display = PixelBuffer::from_values(
        &normalize_values(&increased),
        ColorMode::YCbCr,
        width,
        height,
        None,
    )?;
    Ok(StageOutput { buffer: display, values: increased })
}

/// Run the full round trip over every 8x8 luma block:
/// level shift -> DCT -> quantize -> round -> dequantize -> IDCT ->
/// round -> unshift -> normalize, reassembled luma-only (chroma stays at
/// the neutral midpoint) and converted back to RGB.
///
/// Deterministic for a given `(quality, mode)` except for
/// [`RoundingMode::RandomInInterval`].
pub fn full_round_trip(
    buffer: PixelBuffer,
    quality: u8,
    mode: RoundingMode,
) -> Result<PixelBuffer> {
    full_round_trip_with_rng(buffer, quality, mode, &mut rand::thread_rng())
}

/// [`full_round_trip`] with an injected randomness source
pub fn full_round_trip_with_rng<R: Rng + ?Sized>(
    buffer: PixelBuffer,
    quality: u8,
    mode: RoundingMode,
    rng: &mut R,
) -> Result<PixelBuffer> {
    let matrix = QuantMatrix::from_quality(quality)?;
    let source = buffer.into_color_mode(ColorMode::YCbCr);
    let (width, height) = (source.width(), source.height());
    let luma = source.component_values(Component::Y)?;
    let blocks = to_square_blocks(&luma, BLOCK_SIZE, width)?;
    debug!(quality, mode = %mode, blocks = blocks.len(), "running full round trip");

    let mut result = PixelBuffer::filled(ColorMode::YCbCr, width, height);
    for block in &blocks {
        let coefficients = forward_dct(&as_block(&level_shift(&block.values))?);
        let quantized = matrix.quantize(&coefficients);
        let rounded = round_values_with(&quantized, mode, rng);
        let dequantized = matrix.dequantize(&as_block(&rounded)?);
        let restored = inverse_dct(&dequantized);
        // Final rounding to display integers is always round-to-nearest;
        // the policy only biases the quantized coefficients
        let output = round_values(&level_unshift(&restored), RoundingMode::Classic);
        result.add_pixel_values(
            &normalize_values(&output),
            block.block_row,
            block.block_col,
            BLOCK_SIZE,
            BLOCK_SIZE,
            Some(&[Component::Y]),
        )?;
    }
    Ok(result.into_color_mode(ColorMode::Rgb))
}

/// Rounding-sensitivity round trip: per block, DCT -> round with the
/// policy -> IDCT, without any quantization. Returns the reconstructed
/// image and the per-block IDCT values for later recalculated runs.
pub fn rounding_round_trip(
    buffer: &PixelBuffer,
    mode: RoundingMode,
) -> Result<RoundingRoundTrip> {
    rounding_round_trip_with_rng(buffer, mode, &mut rand::thread_rng())
}

/// [`rounding_round_trip`] with an injected randomness source
pub fn rounding_round_trip_with_rng<R: Rng + ?Sized>(
    buffer: &PixelBuffer,
    mode: RoundingMode,
    rng: &mut R,
) -> Result<RoundingRoundTrip> {
    let source = buffer.clone().into_color_mode(ColorMode::YCbCr);
    let (width, height) = (source.width(), source.height());
    let luma = source.component_values(Component::Y)?;
    let blocks = to_square_blocks(&luma, BLOCK_SIZE, width)?;
    debug!(mode = %mode, blocks = blocks.len(), "running rounding round trip");

    let mut result = PixelBuffer::filled(ColorMode::YCbCr, width, height);
    let mut idct_blocks = Vec::with_capacity(blocks.len());
    for block in &blocks {
        let coefficients = forward_dct(&as_block(&level_shift(&block.values))?);
        let rounded = round_values_with(&coefficients, mode, rng);
        let restored = inverse_dct(&as_block(&rounded)?);
        idct_blocks.push(Block {
            block_row: block.block_row,
            block_col: block.block_col,
            values: restored.to_vec(),
        });
        let output = round_values(&level_unshift(&restored), RoundingMode::Classic);
        result.add_pixel_values(
            &normalize_values(&output),
            block.block_row,
            block.block_col,
            BLOCK_SIZE,
            BLOCK_SIZE,
            Some(&[Component::Y]),
        )?;
    }
    Ok(RoundingRoundTrip { buffer: result.into_color_mode(ColorMode::Rgb), idct_blocks })
}

/// Re-run the quantization round trip from stored level-shifted blocks
/// (the `idct_blocks` of a previous [`rounding_round_trip`])
pub fn recalculated_round_trip(
    blocks: &[Block<f64>],
    quality: u8,
    width: usize,
    height: usize,
) -> Result<PixelBuffer> {
    let matrix = QuantMatrix::from_quality(quality)?;
    let mut result = PixelBuffer::filled(ColorMode::YCbCr, width, height);
    for block in blocks {
        let coefficients = forward_dct(&as_block(&block.values)?);
        let quantized = matrix.quantize(&coefficients);
        let rounded = round_values(&quantized, RoundingMode::Classic);
        let dequantized = matrix.dequantize(&as_block(&rounded)?);
        let restored = inverse_dct(&dequantized);
        let output = round_values(&level_unshift(&restored), RoundingMode::Classic);
        result.add_pixel_values(
            &normalize_values(&output),
            block.block_row,
            block.block_col,
            BLOCK_SIZE,
            BLOCK_SIZE,
            Some(&[Component::Y]),
        )?;
    }
    Ok(result.into_color_mode(ColorMode::Rgb))
}

/// Subsample the chroma of an image and convert back to RGB for display
pub fn subsample_pipeline(buffer: PixelBuffer, scheme: Subsampling) -> Result<PixelBuffer> {
    debug!(scheme = %scheme, "running subsampling pipeline");
    let subsampled = subsample(&buffer.into_color_mode(ColorMode::YCbCr), scheme)?;
    Ok(subsampled.into_color_mode(ColorMode::Rgb))
}

/// Subsample and project a single YCbCr component for display; every
/// channel of the view carries the component value (grayscale rendering)
pub fn subsample_view(
    buffer: PixelBuffer,
    scheme: Subsampling,
    component: Component,
) -> Result<PixelBuffer> {
    let subsampled = subsample(&buffer.into_color_mode(ColorMode::YCbCr), scheme)?;
    let values = subsampled.component_values(component)?;
    PixelBuffer::from_values(
        &values,
        ColorMode::YCbCr,
        subsampled.width(),
        subsampled.height(),
        None,
    )
}

/// Project a display component out of a buffer. `Original` clones the
/// buffer unchanged. An RGB component keeps only that channel (the others
/// at zero); a YCbCr component is rendered grayscale by carrying the value
/// in every channel.
pub fn component_view(
    buffer: &PixelBuffer,
    display: DisplayComponent,
) -> Result<PixelBuffer> {
    let component = match display {
        DisplayComponent::Original => return Ok(buffer.clone()),
        DisplayComponent::Single(component) => component,
    };
    let mode = component.color_mode();
    let converted = buffer.clone().into_color_mode(mode);
    let values = converted.component_values(component)?;
    let fill: Option<&[Component]> = match mode {
        ColorMode::Rgb => Some(std::slice::from_ref(&component)),
        ColorMode::YCbCr => None,
    };
    PixelBuffer::from_values(&values, mode, converted.width(), converted.height(), fill)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_clamps() {
        assert_eq!(normalize_value(-5.0), 0.0);
        assert_eq!(normalize_value(300.0), 255.0);
        assert_eq!(normalize_value(128.0), 128.0);
    }

    #[test]
    fn test_round_to_decimals() {
        assert_eq!(round_to_decimals(&[1.23456, -0.005], 2), vec![1.23, -0.01]);
    }

    #[test]
    fn test_crop_block_rebases_coordinates() {
        let mut buffer = PixelBuffer::filled(ColorMode::YCbCr, 16, 16);
        buffer
            .add_pixel_values(&[200.0; 64], 1, 1, 8, 8, Some(&[Component::Y]))
            .unwrap();
        let cropped = crop_block(&buffer, 1, 1).unwrap();
        assert_eq!(cropped.width(), 8);
        let pixel = cropped.get_pixel(0, 0).unwrap();
        assert_eq!((pixel.row(), pixel.col()), (0, 0));
        assert_eq!(pixel.component(Component::Y), Some(200.0));

        assert!(matches!(
            crop_block(&buffer, 2, 0),
            Err(Error::OutOfRange { what: "selected block row", .. })
        ));
    }

    #[test]
    fn test_dequantization_stage_multiplies_back() {
        let quantized =
            quantization_stage(&[8.0; 64], 8, 8, 50, RoundingMode::Classic).unwrap();
        let dequantized = dequantization_stage(&quantized.values, 8, 8, 50).unwrap();
        assert_eq!(dequantized.values.len(), 64);
        // Base table entry 16 at DC: round(8 / 16) * 16
        assert_eq!(dequantized.values[0], 16.0);
    }

    #[test]
    fn test_as_block_requires_64_values() {
        assert!(matches!(
            as_block(&[0.0; 63]),
            Err(Error::InvalidShape { length: 63, divisor: 64, .. })
        ));
    }
}
