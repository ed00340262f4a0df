//! Core types for dctlab

use std::fmt;
use std::str::FromStr;

use crate::consts::CHROMA_NEUTRAL;
use crate::error::Error;

/// Color mode of a pixel buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// RGB color space (most common input)
    #[default]
    Rgb,
    /// YCbCr, the working color space of the transform stages
    YCbCr,
}

impl ColorMode {
    /// Components of this color mode, in buffer order
    #[must_use]
    pub const fn components(self) -> [Component; 3] {
        match self {
            ColorMode::Rgb => [Component::R, Component::G, Component::B],
            ColorMode::YCbCr => [Component::Y, Component::Cb, Component::Cr],
        }
    }

    /// Neutral value written into components excluded from a fill:
    /// 0 for RGB, the chroma midpoint 128 for YCbCr
    #[must_use]
    pub const fn neutral_value(self) -> f64 {
        match self {
            ColorMode::Rgb => 0.0,
            ColorMode::YCbCr => CHROMA_NEUTRAL,
        }
    }

    /// Canonical name of this color mode
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ColorMode::Rgb => "RGB",
            ColorMode::YCbCr => "YCbCr",
        }
    }
}

impl FromStr for ColorMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "RGB" => Ok(ColorMode::Rgb),
            "YCbCr" => Ok(ColorMode::YCbCr),
            other => Err(Error::UnknownMode {
                kind: "color mode",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single color component of either color mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    R,
    G,
    B,
    Y,
    Cb,
    Cr,
}

impl Component {
    /// The color mode this component belongs to
    #[must_use]
    pub const fn color_mode(self) -> ColorMode {
        match self {
            Component::R | Component::G | Component::B => ColorMode::Rgb,
            Component::Y | Component::Cb | Component::Cr => ColorMode::YCbCr,
        }
    }

    /// Canonical lowercase name of this component
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Component::R => "r",
            Component::G => "g",
            Component::B => "b",
            Component::Y => "y",
            Component::Cb => "cb",
            Component::Cr => "cr",
        }
    }
}

impl FromStr for Component {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "r" => Ok(Component::R),
            "g" => Ok(Component::G),
            "b" => Ok(Component::B),
            "y" => Ok(Component::Y),
            "cb" => Ok(Component::Cb),
            "cr" => Ok(Component::Cr),
            other => Err(Error::UnknownMode {
                kind: "component",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Chroma subsampling scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Subsampling {
    /// No subsampling (4:4:4) - every pixel is its own chunk
    #[default]
    S444,
    /// Horizontal subsampling only (4:2:2) - horizontal pairs
    S422,
    /// Both horizontal and vertical (4:2:0) - 2x2 squares
    S420,
}

impl Subsampling {
    /// Horizontal chunk extent for chroma averaging
    #[must_use]
    pub const fn h_factor(self) -> usize {
        match self {
            Subsampling::S444 => 1,
            Subsampling::S422 | Subsampling::S420 => 2,
        }
    }

    /// Vertical chunk extent for chroma averaging
    #[must_use]
    pub const fn v_factor(self) -> usize {
        match self {
            Subsampling::S444 | Subsampling::S422 => 1,
            Subsampling::S420 => 2,
        }
    }

    /// Canonical J:a:b notation for this scheme
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Subsampling::S444 => "4:4:4",
            Subsampling::S422 => "4:2:2",
            Subsampling::S420 => "4:2:0",
        }
    }
}

impl FromStr for Subsampling {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "4:4:4" => Ok(Subsampling::S444),
            "4:2:2" => Ok(Subsampling::S422),
            "4:2:0" => Ok(Subsampling::S420),
            other => Err(Error::UnknownMode {
                kind: "subsampling scheme",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Subsampling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Component selection for single-channel display views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayComponent {
    /// Show the buffer as-is
    #[default]
    Original,
    /// Project a single component
    Single(Component),
}

impl FromStr for DisplayComponent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        if s == "original" {
            return Ok(DisplayComponent::Original);
        }
        s.parse::<Component>()
            .map(DisplayComponent::Single)
            .map_err(|_| Error::UnknownMode {
                kind: "display component",
                value: s.to_string(),
            })
    }
}
