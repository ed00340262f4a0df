//! Pluggable rounding policies over value sequences
//!
//! The visualizer uses these to demonstrate how sensitive the reconstructed
//! image is to systematic rounding bias: `Maximal`/`Minimal` push every
//! value toward the edge of its rounding interval, `RandomInInterval` picks
//! one uniform offset per call and applies it to the whole sequence.

use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::error::Error;

/// Rounding strategy applied to intermediate real-valued results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundingMode {
    /// Standard round-to-nearest
    #[default]
    Classic,
    /// `round(v) + 0.499`, the top of the rounding interval
    Maximal,
    /// `round(v) - 0.499`, the bottom of the rounding interval
    Minimal,
    /// `round(v) + u` with one uniform draw from [-0.499, 0.499] per call,
    /// shared by every element of that call
    RandomInInterval,
    /// No rounding at all
    Identity,
}

impl RoundingMode {
    /// Canonical name of this mode
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            RoundingMode::Classic => "classic",
            RoundingMode::Maximal => "maximal",
            RoundingMode::Minimal => "minimal",
            RoundingMode::RandomInInterval => "random_in_interval",
            RoundingMode::Identity => "none",
        }
    }
}

impl FromStr for RoundingMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "classic" => Ok(RoundingMode::Classic),
            "maximal" => Ok(RoundingMode::Maximal),
            "minimal" => Ok(RoundingMode::Minimal),
            "random_in_interval" => Ok(RoundingMode::RandomInInterval),
            "none" => Ok(RoundingMode::Identity),
            other => Err(Error::UnknownMode {
                kind: "rounding mode",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Apply the rounding policy using the thread-local RNG
#[must_use]
pub fn round_values(values: &[f64], mode: RoundingMode) -> Vec<f64> {
    round_values_with(values, mode, &mut rand::thread_rng())
}

/// Apply the rounding policy with an injected randomness source.
/// `RandomInInterval` draws its offset once per call, not per element.
pub fn round_values_with<R: Rng + ?Sized>(
    values: &[f64],
    mode: RoundingMode,
    rng: &mut R,
) -> Vec<f64> {
    match mode {
        RoundingMode::Classic => values.iter().map(|v| v.round()).collect(),
        RoundingMode::Maximal => values.iter().map(|v| v.round() + 0.499).collect(),
        RoundingMode::Minimal => values.iter().map(|v| v.round() - 0.499).collect(),
        RoundingMode::RandomInInterval => {
            let magnitude = rng.gen::<f64>() * 0.499;
            let offset = if rng.gen_bool(0.5) { magnitude } else { -magnitude };
            values.iter().map(|v| v.round() + offset).collect()
        }
        RoundingMode::Identity => values.to_vec(),
    }
}
