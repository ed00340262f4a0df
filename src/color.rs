//! Color space conversion between RGB and YCbCr
//!
//! Uses the JFIF/BT.601 coefficients. No clamping or rounding happens
//! here - normalization into [0, 255] is a separate display step, so the
//! transform stages can observe exact real-valued results.

use crate::pixel::Pixel;
use crate::types::ColorMode;

/// Convert an RGB triple to YCbCr
///
/// - Y  =  0.299 * R + 0.587 * G + 0.114 * B
/// - Cb = -0.168736 * R - 0.331264 * G + 0.5 * B + 128
/// - Cr =  0.5 * R - 0.418688 * G - 0.081312 * B + 128
#[inline]
#[must_use]
pub fn rgb_to_ycbcr(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let cb = -0.168736 * r - 0.331264 * g + 0.5 * b + 128.0;
    let cr = 0.5 * r - 0.418688 * g - 0.081312 * b + 128.0;
    (y, cb, cr)
}

/// Convert a YCbCr triple to RGB
///
/// Inverse of [`rgb_to_ycbcr`] up to floating-point error; the round trip
/// is not bit-exact once intermediate rounding is applied.
#[inline]
#[must_use]
pub fn ycbcr_to_rgb(y: f64, cb: f64, cr: f64) -> (f64, f64, f64) {
    let r = y + 1.402 * (cr - 128.0);
    let g = y - 0.34414 * (cb - 128.0) - 0.71414 * (cr - 128.0);
    let b = y + 1.772 * (cb - 128.0);
    (r, g, b)
}

/// Convert a pixel into the target color mode, keeping its position.
/// Returns a clone when the mode already matches.
#[must_use]
pub fn convert_pixel(pixel: &Pixel, mode: ColorMode) -> Pixel {
    match (pixel, mode) {
        (Pixel::Rgb { r, g, b, row, col }, ColorMode::YCbCr) => {
            let (y, cb, cr) = rgb_to_ycbcr(*r, *g, *b);
            Pixel::YCbCr { y, cb, cr, row: *row, col: *col }
        }
        (Pixel::YCbCr { y, cb, cr, row, col }, ColorMode::Rgb) => {
            let (r, g, b) = ycbcr_to_rgb(*y, *cb, *cr);
            Pixel::Rgb { r, g, b, row: *row, col: *col }
        }
        _ => pixel.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_rgb_ycbcr_roundtrip() {
        let colors = [
            (0.0, 0.0, 0.0),       // Black
            (255.0, 255.0, 255.0), // White
            (255.0, 0.0, 0.0),     // Red
            (0.0, 255.0, 0.0),     // Green
            (0.0, 0.0, 255.0),     // Blue
            (128.0, 128.0, 128.0), // Gray
            (17.0, 203.0, 91.0),
        ];

        for (r, g, b) in colors {
            let (y, cb, cr) = rgb_to_ycbcr(r, g, b);
            let (r2, g2, b2) = ycbcr_to_rgb(y, cb, cr);

            // The truncated inverse coefficients leave a residual of a few
            // 1e-4 on saturated colors, well under a gray level
            assert_abs_diff_eq!(r, r2, epsilon = 1e-3);
            assert_abs_diff_eq!(g, g2, epsilon = 1e-3);
            assert_abs_diff_eq!(b, b2, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_gray_has_neutral_chroma() {
        let (y, cb, cr) = rgb_to_ycbcr(128.0, 128.0, 128.0);
        assert_relative_eq!(y, 128.0, epsilon = 1e-9);
        assert_relative_eq!(cb, 128.0, epsilon = 1e-9);
        assert_relative_eq!(cr, 128.0, epsilon = 1e-9);
    }

    #[test]
    fn test_conversion_is_unclamped() {
        // Saturated blue pushes Cb well above the byte range before
        // normalization; the converter must not clip it.
        let (_, cb, _) = rgb_to_ycbcr(0.0, 0.0, 300.0);
        assert!(cb > 255.0);
    }

    #[test]
    fn test_convert_pixel_keeps_position() {
        let pixel = Pixel::Rgb { r: 10.0, g: 20.0, b: 30.0, row: 3, col: 5 };
        let converted = convert_pixel(&pixel, ColorMode::YCbCr);
        assert_eq!(converted.row(), 3);
        assert_eq!(converted.col(), 5);
        assert_eq!(converted.color_mode(), ColorMode::YCbCr);

        let same = convert_pixel(&pixel, ColorMode::Rgb);
        assert_eq!(same, pixel);
    }
}
