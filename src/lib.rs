//! # dctlab - Block Compression Teaching Pipeline
//!
//! dctlab implements the classical block-based image-compression pipeline
//! as a set of inspectable stages: RGB/YCbCr color conversion, chroma
//! subsampling, 8x8 DCT and IDCT, and quality-controlled quantization.
//! It is built for step-by-step visualization, so every stage exposes its
//! intermediate real-valued results instead of hiding them behind a
//! bitstream.
//!
//! ## Key properties
//!
//! - **Direct-summation DCT**: the forward and inverse transforms are the
//!   textbook O(64^2) double loops, kept deliberately naive so the math
//!   stays readable
//! - **Pluggable rounding**: classic, biased (`maximal`/`minimal`) and
//!   randomized rounding policies demonstrate how reconstruction reacts to
//!   systematic rounding bias
//! - **Eager validation**: shape and domain violations fail at the first
//!   component that needs the invariant; nothing is silently truncated
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dctlab::{pipeline, PixelBuffer, ColorMode, RoundingMode};
//!
//! let buffer = PixelBuffer::from_image(image.as_ref(), ColorMode::Rgb);
//! let result = pipeline::full_round_trip(buffer, 50, RoundingMode::Classic)?;
//! let rgba = result.to_image();
//! ```
//!
//! Not in scope: entropy coding, JPEG bitstream I/O, and every rendering
//! concern - callers hand in pixel buffers and get pixel buffers back.

pub mod color;
pub mod consts;
mod error;
pub mod pixel;
pub mod types;

// Transform stages
pub mod dct;
pub mod partition;
pub mod quant;
pub mod rounding;
pub mod subsample;

// Stage composition
pub mod pipeline;

// Public API
pub use error::Error;
pub use partition::Block;
pub use pipeline::{RoundingRoundTrip, StageOutput};
pub use pixel::{Pixel, PixelBuffer};
pub use quant::QuantMatrix;
pub use rounding::RoundingMode;
pub use types::{ColorMode, Component, DisplayComponent, Subsampling};

/// Result type for dctlab operations
pub type Result<T> = std::result::Result<T, Error>;
