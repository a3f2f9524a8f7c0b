use std::cmp::Ordering;

use rug::Float;

use crate::error::CoreError;
use crate::fractal::FractalKind;
use crate::precise::{parse_float, PreciseComplex};
use crate::precision::MIN_PRECISION_BITS;

/// The visible region of the complex plane, in arbitrary precision.
///
/// `scale` is the half-width of the view in plane units, measured along the
/// smaller image dimension. Center and scale are always stored rounded to
/// `precision` bits, so every mapped coordinate is computed at that budget.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewWindow {
    center: PreciseComplex,
    scale: Float,
    precision: u32,
}

impl ViewWindow {
    /// Create a view window, rounding `center` and `scale` to `precision` bits.
    pub fn new(center: PreciseComplex, scale: Float, precision: u32) -> crate::Result<Self> {
        if precision < MIN_PRECISION_BITS {
            return Err(CoreError::InvalidPrecision(precision));
        }
        if scale.cmp0() != Some(Ordering::Greater) || !scale.is_finite() {
            return Err(CoreError::InvalidViewWindow {
                reason: format!("scale must be positive and finite, got {scale}"),
            });
        }
        if !center.re.is_finite() || !center.im.is_finite() {
            return Err(CoreError::InvalidViewWindow {
                reason: "center must be finite".to_string(),
            });
        }
        Ok(Self {
            center: center.with_precision(precision),
            scale: Float::with_val(precision, &scale),
            precision,
        })
    }

    /// Start-of-run view for the Mandelbrot set: half-width 1.5 around the
    /// seahorse valley, which keeps the whole set in frame.
    pub fn default_mandelbrot(precision: u32) -> crate::Result<Self> {
        let center = PreciseComplex::parse("-0.743643887037151", "0.13182590420533", precision)?;
        Self::new(center, parse_float("1.5", precision)?, precision)
    }

    /// Start-of-run view for Julia sets: origin-centred, half-width 1.875.
    pub fn default_julia(precision: u32) -> crate::Result<Self> {
        Self::new(
            PreciseComplex::zero(precision),
            parse_float("1.875", precision)?,
            precision,
        )
    }

    pub fn default_for(kind: FractalKind, precision: u32) -> crate::Result<Self> {
        match kind {
            FractalKind::Mandelbrot => Self::default_mandelbrot(precision),
            FractalKind::Julia => Self::default_julia(precision),
        }
    }

    pub fn center(&self) -> &PreciseComplex {
        &self.center
    }

    pub fn scale(&self) -> &Float {
        &self.scale
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Plane units per pixel: `2 · scale / min(width, height)`.
    pub fn pixel_step(&self, width: u32, height: u32) -> crate::Result<Float> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidDimensions { width, height });
        }
        let mut step = self.scale.clone();
        step *= 2u32;
        step /= width.min(height);
        Ok(step)
    }

    /// Map a pixel to its complex-plane coordinate.
    ///
    /// `(0, 0)` is the top-left pixel; columns grow the real part and rows
    /// move downward (decreasing imaginary part). Pixel
    /// `(height / 2, width / 2)` maps exactly to the center.
    pub fn map_pixel(
        &self,
        row: u32,
        col: u32,
        width: u32,
        height: u32,
    ) -> crate::Result<PreciseComplex> {
        check_pixel(row, col, width, height)?;
        let step = self.pixel_step(width, height)?;
        Ok(PreciseComplex::new(
            self.axis_re(col, width, &step),
            self.axis_im(row, height, &step),
        ))
    }

    /// Real part shared by every pixel of column `col`.
    pub fn map_col(&self, col: u32, width: u32, height: u32) -> crate::Result<Float> {
        check_pixel(0, col, width, height)?;
        let step = self.pixel_step(width, height)?;
        Ok(self.axis_re(col, width, &step))
    }

    /// Imaginary part shared by every pixel of row `row`.
    pub fn map_row(&self, row: u32, width: u32, height: u32) -> crate::Result<Float> {
        check_pixel(row, 0, width, height)?;
        let step = self.pixel_step(width, height)?;
        Ok(self.axis_im(row, height, &step))
    }

    fn axis_re(&self, col: u32, width: u32, step: &Float) -> Float {
        let offset = i64::from(col) - i64::from(width / 2);
        let mut re = Float::with_val(self.precision, offset);
        re *= step;
        re += &self.center.re;
        re
    }

    fn axis_im(&self, row: u32, height: u32, step: &Float) -> Float {
        let offset = i64::from(row) - i64::from(height / 2);
        let mut delta = Float::with_val(self.precision, offset);
        delta *= step;
        Float::with_val(self.precision, &self.center.im - &delta)
    }
}

fn check_pixel(row: u32, col: u32, width: u32, height: u32) -> crate::Result<()> {
    if width == 0 || height == 0 {
        return Err(CoreError::InvalidDimensions { width, height });
    }
    if row >= height || col >= width {
        return Err(CoreError::PixelOutOfRange {
            row,
            col,
            width,
            height,
        });
    }
    Ok(())
}
