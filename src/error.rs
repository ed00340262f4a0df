//! Error types for dctlab

use std::fmt;

/// Result type for dctlab operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for dctlab operations
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// Sequence length incompatible with the requested grid/block dimensions
    InvalidShape {
        length: usize,
        divisor: usize,
        context: &'static str,
    },
    /// Coordinate or parameter outside its valid domain
    OutOfRange {
        what: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
    /// Unrecognized color mode, subsampling scheme, rounding mode or component
    UnknownMode {
        kind: &'static str,
        value: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidShape { length, divisor, context } => {
                write!(
                    f,
                    "Sequence of {} values cannot be partitioned into {} of size {}",
                    length, context, divisor
                )
            }
            Error::OutOfRange { what, value, min, max } => {
                write!(f, "{} {} out of range [{}, {}]", what, value, min, max)
            }
            Error::UnknownMode { kind, value } => {
                write!(f, "Unknown {}: {:?}", kind, value)
            }
        }
    }
}

impl std::error::Error for Error {}
