//! Pixel and pixel-buffer data model
//!
//! A [`PixelBuffer`] is a width x height grid of [`Pixel`]s tagged with a
//! color mode. Buffers are value-like: conversions return new owned buffers,
//! and block outputs are assembled into a pre-allocated result buffer via
//! [`PixelBuffer::add_pixel_values`] / [`PixelBuffer::add_pixels`].
//!
//! Components are `f64` because transform stages legitimately hold
//! fractional and out-of-range values (DCT coefficients, negative
//! differences) before the final normalization step.

use imgref::{ImgRef, ImgVec};
use rgb::RGBA8;

use crate::color::convert_pixel;
use crate::error::{Error, Result};
use crate::types::{ColorMode, Component};

/// A single pixel: component values plus its row/col position
#[derive(Debug, Clone, PartialEq)]
pub enum Pixel {
    Rgb {
        r: f64,
        g: f64,
        b: f64,
        row: usize,
        col: usize,
    },
    YCbCr {
        y: f64,
        cb: f64,
        cr: f64,
        row: usize,
        col: usize,
    },
}

impl Pixel {
    /// Build a pixel of the given mode from its three component values,
    /// in buffer order (r,g,b or y,cb,cr)
    #[must_use]
    pub fn from_triple(mode: ColorMode, values: [f64; 3], row: usize, col: usize) -> Self {
        match mode {
            ColorMode::Rgb => Pixel::Rgb { r: values[0], g: values[1], b: values[2], row, col },
            ColorMode::YCbCr => Pixel::YCbCr { y: values[0], cb: values[1], cr: values[2], row, col },
        }
    }

    /// Build a pixel carrying `value` in every component listed in `fill`;
    /// the remaining components get the mode's neutral default
    #[must_use]
    pub fn from_value(
        value: f64,
        mode: ColorMode,
        row: usize,
        col: usize,
        fill: &[Component],
    ) -> Self {
        let neutral = mode.neutral_value();
        let components = mode.components();
        let pick = |c: Component| if fill.contains(&c) { value } else { neutral };
        Pixel::from_triple(
            mode,
            [pick(components[0]), pick(components[1]), pick(components[2])],
            row,
            col,
        )
    }

    /// A pixel with every component at the mode's neutral default
    #[must_use]
    pub fn neutral(mode: ColorMode, row: usize, col: usize) -> Self {
        Pixel::from_value(mode.neutral_value(), mode, row, col, &mode.components())
    }

    #[must_use]
    pub fn row(&self) -> usize {
        match self {
            Pixel::Rgb { row, .. } | Pixel::YCbCr { row, .. } => *row,
        }
    }

    #[must_use]
    pub fn col(&self) -> usize {
        match self {
            Pixel::Rgb { col, .. } | Pixel::YCbCr { col, .. } => *col,
        }
    }

    #[must_use]
    pub fn color_mode(&self) -> ColorMode {
        match self {
            Pixel::Rgb { .. } => ColorMode::Rgb,
            Pixel::YCbCr { .. } => ColorMode::YCbCr,
        }
    }

    /// Component values in buffer order
    #[must_use]
    pub fn components(&self) -> [f64; 3] {
        match self {
            Pixel::Rgb { r, g, b, .. } => [*r, *g, *b],
            Pixel::YCbCr { y, cb, cr, .. } => [*y, *cb, *cr],
        }
    }

    /// Value of the named component, or `None` if it belongs to the
    /// other color mode
    #[must_use]
    pub fn component(&self, component: Component) -> Option<f64> {
        match (self, component) {
            (Pixel::Rgb { r, .. }, Component::R) => Some(*r),
            (Pixel::Rgb { g, .. }, Component::G) => Some(*g),
            (Pixel::Rgb { b, .. }, Component::B) => Some(*b),
            (Pixel::YCbCr { y, .. }, Component::Y) => Some(*y),
            (Pixel::YCbCr { cb, .. }, Component::Cb) => Some(*cb),
            (Pixel::YCbCr { cr, .. }, Component::Cr) => Some(*cr),
            _ => None,
        }
    }

    /// The same pixel relocated to a new position
    #[must_use]
    pub fn with_position(mut self, new_row: usize, new_col: usize) -> Self {
        match &mut self {
            Pixel::Rgb { row, col, .. } | Pixel::YCbCr { row, col, .. } => {
                *row = new_row;
                *col = new_col;
            }
        }
        self
    }
}

/// A width x height grid of pixels tagged with a color mode
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    pixels: Vec<Pixel>,
    color_mode: ColorMode,
    width: usize,
    height: usize,
}

impl PixelBuffer {
    /// Create a buffer from an existing pixel list.
    /// Fails with `InvalidShape` unless `pixels.len() == width * height`.
    pub fn new(
        pixels: Vec<Pixel>,
        color_mode: ColorMode,
        width: usize,
        height: usize,
    ) -> Result<Self> {
        if width == 0 || height == 0 || pixels.len() != width * height {
            return Err(Error::InvalidShape {
                length: pixels.len(),
                divisor: width * height,
                context: "pixel buffer cells",
            });
        }
        Ok(Self { pixels, color_mode, width, height })
    }

    /// Create a buffer with every pixel at the mode's neutral default.
    /// Used as the assembly target when writing back block outputs.
    #[must_use]
    pub fn filled(color_mode: ColorMode, width: usize, height: usize) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                pixels.push(Pixel::neutral(color_mode, row, col));
            }
        }
        Self { pixels, color_mode, width, height }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    #[must_use]
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Pixel at the given coordinate. Fails with `OutOfRange` outside bounds.
    pub fn get_pixel(&self, col: usize, row: usize) -> Result<&Pixel> {
        if col >= self.width {
            return Err(Error::OutOfRange {
                what: "pixel column",
                value: col as i64,
                min: 0,
                max: self.width as i64 - 1,
            });
        }
        if row >= self.height {
            return Err(Error::OutOfRange {
                what: "pixel row",
                value: row as i64,
                min: 0,
                max: self.height as i64 - 1,
            });
        }
        Ok(&self.pixels[row * self.width + col])
    }

    /// The named component's value from every pixel, in buffer order.
    /// Fails with `UnknownMode` if the component belongs to the other mode.
    pub fn component_values(&self, component: Component) -> Result<Vec<f64>> {
        if component.color_mode() != self.color_mode {
            return Err(Error::UnknownMode {
                kind: "component for this color mode",
                value: component.name().to_string(),
            });
        }
        Ok(self
            .pixels
            .iter()
            .map(|p| p.component(component).unwrap_or_else(|| self.color_mode.neutral_value()))
            .collect())
    }

    /// Convert the buffer into the given color mode.
    /// Returns `self` untouched (no copy) when the mode already matches.
    #[must_use]
    pub fn into_color_mode(mut self, mode: ColorMode) -> Self {
        self.change_color_mode(mode);
        self
    }

    /// Convert every pixel in place
    pub fn change_color_mode(&mut self, mode: ColorMode) {
        if self.color_mode == mode {
            return;
        }
        for pixel in &mut self.pixels {
            *pixel = convert_pixel(pixel, mode);
        }
        self.color_mode = mode;
    }

    /// Write scalar values into the sub-region at block position
    /// `(block_row, block_col)`. Components listed in `fill` receive the
    /// value; the rest are set to the neutral default. `fill = None` fills
    /// every component of the buffer's mode.
    pub fn add_pixel_values(
        &mut self,
        values: &[f64],
        block_row: usize,
        block_col: usize,
        block_width: usize,
        block_height: usize,
        fill: Option<&[Component]>,
    ) -> Result<()> {
        if values.len() != block_width * block_height {
            return Err(Error::InvalidShape {
                length: values.len(),
                divisor: block_width * block_height,
                context: "block values",
            });
        }
        self.check_block_region(block_row, block_col, block_width, block_height)?;
        let fill = self.validate_fill(fill)?;
        for row in 0..block_height {
            for col in 0..block_width {
                let dest_row = row + block_row * block_height;
                let dest_col = col + block_col * block_width;
                self.pixels[dest_row * self.width + dest_col] = Pixel::from_value(
                    values[row * block_width + col],
                    self.color_mode,
                    dest_row,
                    dest_col,
                    &fill,
                );
            }
        }
        Ok(())
    }

    /// Write whole pixels into the sub-region at block position
    /// `(block_row, block_col)`, rebasing their coordinates to the
    /// destination. Other regions are untouched.
    pub fn add_pixels(
        &mut self,
        pixels: &[Pixel],
        block_row: usize,
        block_col: usize,
        block_width: usize,
        block_height: usize,
    ) -> Result<()> {
        if pixels.len() != block_width * block_height {
            return Err(Error::InvalidShape {
                length: pixels.len(),
                divisor: block_width * block_height,
                context: "block pixels",
            });
        }
        self.check_block_region(block_row, block_col, block_width, block_height)?;
        for row in 0..block_height {
            for col in 0..block_width {
                let dest_row = row + block_row * block_height;
                let dest_col = col + block_col * block_width;
                self.pixels[dest_row * self.width + dest_col] =
                    pixels[row * block_width + col].clone().with_position(dest_row, dest_col);
            }
        }
        Ok(())
    }

    /// Construct a buffer from a flat scalar sequence, one value per pixel.
    ///
    /// The value mapping intentionally reproduces the reference layout:
    /// `values[i * height + j]` lands on the pixel with `row = j, col = i`,
    /// so the view is transposed relative to a row-major reading of
    /// `values`. Do not "fix" the mapping, golden outputs depend on it.
    /// Storage stays row-major like every other constructor, keeping
    /// `get_pixel` and block write-back consistent.
    pub fn from_values(
        values: &[f64],
        color_mode: ColorMode,
        width: usize,
        height: usize,
        fill: Option<&[Component]>,
    ) -> Result<Self> {
        if width == 0 || height == 0 || values.len() != width * height {
            return Err(Error::InvalidShape {
                length: values.len(),
                divisor: width * height,
                context: "pixel buffer cells",
            });
        }
        let fill = match fill {
            Some(list) => Self::validate_fill_for(color_mode, list)?,
            None => color_mode.components().to_vec(),
        };
        let mut pixels = vec![Pixel::neutral(color_mode, 0, 0); width * height];
        for i in 0..width {
            for j in 0..height {
                pixels[j * width + i] =
                    Pixel::from_value(values[i * height + j], color_mode, j, i, &fill);
            }
        }
        Ok(Self { pixels, color_mode, width, height })
    }

    /// Construct a buffer from an external RGBA image, reading the first
    /// three channels into the mode's components. Alpha is ignored.
    #[must_use]
    pub fn from_image(image: ImgRef<'_, RGBA8>, color_mode: ColorMode) -> Self {
        let mut pixels = Vec::with_capacity(image.width() * image.height());
        for (row, row_pixels) in image.rows().enumerate() {
            for (col, px) in row_pixels.iter().enumerate() {
                pixels.push(Pixel::from_triple(
                    color_mode,
                    [f64::from(px.r), f64::from(px.g), f64::from(px.b)],
                    row,
                    col,
                ));
            }
        }
        Self { pixels, color_mode, width: image.width(), height: image.height() }
    }

    /// Produce an RGBA image for the display layer: each component rounded
    /// and clamped to a byte, written in buffer order, alpha fixed at 255.
    #[must_use]
    pub fn to_image(&self) -> ImgVec<RGBA8> {
        let mut data = vec![RGBA8::new(0, 0, 0, 255); self.width * self.height];
        for pixel in &self.pixels {
            let [c0, c1, c2] = pixel.components();
            data[pixel.row() * self.width + pixel.col()] = RGBA8::new(
                to_byte(c0),
                to_byte(c1),
                to_byte(c2),
                255,
            );
        }
        ImgVec::new(data, self.width, self.height)
    }

    fn check_block_region(
        &self,
        block_row: usize,
        block_col: usize,
        block_width: usize,
        block_height: usize,
    ) -> Result<()> {
        if block_width == 0 || (block_col + 1) * block_width > self.width {
            return Err(Error::OutOfRange {
                what: "block column",
                value: block_col as i64,
                min: 0,
                max: (self.width / block_width.max(1)) as i64 - 1,
            });
        }
        if block_height == 0 || (block_row + 1) * block_height > self.height {
            return Err(Error::OutOfRange {
                what: "block row",
                value: block_row as i64,
                min: 0,
                max: (self.height / block_height.max(1)) as i64 - 1,
            });
        }
        Ok(())
    }

    fn validate_fill(&self, fill: Option<&[Component]>) -> Result<Vec<Component>> {
        match fill {
            Some(list) => Self::validate_fill_for(self.color_mode, list),
            None => Ok(self.color_mode.components().to_vec()),
        }
    }

    fn validate_fill_for(mode: ColorMode, fill: &[Component]) -> Result<Vec<Component>> {
        for component in fill {
            if component.color_mode() != mode {
                return Err(Error::UnknownMode {
                    kind: "fill component for this color mode",
                    value: component.name().to_string(),
                });
            }
        }
        Ok(fill.to_vec())
    }
}

#[inline]
fn to_byte(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
