//! Constants and tables for the compression pipeline

/// Transform block dimension
pub const BLOCK_SIZE: usize = 8;

/// Transform block size (8x8 = 64)
pub const BLOCK_SIZE2: usize = 64;

/// Lowest accepted compression quality
pub const MIN_QUALITY: u8 = 1;

/// Highest accepted compression quality
pub const MAX_QUALITY: u8 = 100;

/// Default compression quality
pub const DEFAULT_QUALITY: u8 = 50;

/// Offset applied to luma values before the forward DCT and removed
/// after the inverse DCT, centering them around zero
pub const LEVEL_SHIFT: f64 = 128.0;

/// Chroma midpoint, the "no color" value for Cb/Cr
pub const CHROMA_NEUTRAL: f64 = 128.0;

/// Standard JPEG Annex K luminance quantization table.
/// Scaled per invocation by the quality factor; never used raw.
#[rustfmt::skip]
pub const BASE_QUANT_MATRIX: [u16; 64] = [
    16,  11,  10,  16,  24,  40,  51,  61,
    12,  12,  14,  19,  26,  58,  60,  55,
    14,  13,  16,  24,  40,  57,  69,  56,
    14,  17,  22,  29,  51,  87,  80,  62,
    18,  22,  37,  56,  68, 109, 103,  77,
    24,  35,  55,  64,  81, 104, 113,  92,
    49,  64,  78,  87, 103, 121, 120, 101,
    72,  92,  95,  98, 112, 100, 103,  99,
];
