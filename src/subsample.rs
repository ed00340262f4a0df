//! Chroma subsampling over YCbCr pixel chunks
//!
//! The scheme selects the chunking, not the averaging: every chunk's Cb/Cr
//! are replaced by the chunk means while luma stays untouched. 4:4:4 chunks
//! are single pixels (a no-op), 4:2:2 uses horizontal pairs, 4:2:0 uses
//! 2x2 squares.

use crate::error::{Error, Result};
use crate::partition;
use crate::pixel::{Pixel, PixelBuffer};
use crate::types::{ColorMode, Component, Subsampling};

/// Apply chroma subsampling to a YCbCr buffer, returning a new buffer.
/// Fails with `UnknownMode` if the buffer is not in YCbCr, and with
/// `InvalidShape` if the dimensions don't divide into the scheme's chunks.
pub fn subsample(buffer: &PixelBuffer, scheme: Subsampling) -> Result<PixelBuffer> {
    if buffer.color_mode() != ColorMode::YCbCr {
        return Err(Error::UnknownMode {
            kind: "color mode for subsampling",
            value: buffer.color_mode().name().to_string(),
        });
    }

    match scheme {
        Subsampling::S444 | Subsampling::S422 => {
            let chunks = partition::to_grid(buffer.pixels(), scheme.h_factor())?;
            let pixels = chunks.into_iter().flat_map(average_chunk).collect();
            PixelBuffer::new(pixels, ColorMode::YCbCr, buffer.width(), buffer.height())
        }
        Subsampling::S420 => {
            let squares = partition::to_square_blocks(buffer.pixels(), 2, buffer.width())?;
            let mut result = buffer.clone();
            for square in squares {
                result.add_pixels(
                    &average_chunk(square.values),
                    square.block_row,
                    square.block_col,
                    2,
                    2,
                )?;
            }
            Ok(result)
        }
    }
}

/// Overwrite every pixel's chroma with the chunk means, leaving luma alone
fn average_chunk(chunk: Vec<Pixel>) -> Vec<Pixel> {
    let avg_cb = component_mean(&chunk, Component::Cb);
    let avg_cr = component_mean(&chunk, Component::Cr);
    chunk
        .into_iter()
        .map(|pixel| match pixel {
            Pixel::YCbCr { y, row, col, .. } => {
                Pixel::YCbCr { y, cb: avg_cb, cr: avg_cr, row, col }
            }
            other => other,
        })
        .collect()
}

fn component_mean(pixels: &[Pixel], component: Component) -> f64 {
    let sum: f64 = pixels.iter().filter_map(|p| p.component(component)).sum();
    sum / pixels.len() as f64
}
