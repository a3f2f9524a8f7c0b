use rug::Float;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::precise::PreciseComplex;
use crate::precision::required_precision;
use crate::view::ViewWindow;

/// The pixel the edge detector picked for the next step.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomTarget {
    pub row: u32,
    pub col: u32,
    pub iterations: u32,
    /// Plane distance between the target and the view center.
    pub distance_from_center: Float,
}

/// Zoom-controller tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomConfig {
    /// Scale multiplier per step, in `(0, 1)`.
    pub zoom_factor: f64,

    /// Fraction of the way the center moves toward the target, in `(0, 1]`.
    /// `1.0` re-centers exactly on the target.
    pub recenter_fraction: f64,

    /// Hard precision ceiling in bits. `None` lets precision grow freely.
    pub max_precision: Option<u32>,
}

impl ZoomConfig {
    /// `1 / 1.1`: the view grows 10 % per step.
    pub const DEFAULT_ZOOM_FACTOR: f64 = 1.0 / 1.1;

    pub fn new(
        zoom_factor: f64,
        recenter_fraction: f64,
        max_precision: Option<u32>,
    ) -> crate::Result<Self> {
        let config = Self {
            zoom_factor,
            recenter_fraction,
            max_precision,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> crate::Result<()> {
        if !(self.zoom_factor > 0.0 && self.zoom_factor < 1.0) {
            return Err(CoreError::InvalidZoomFactor(self.zoom_factor));
        }
        if !(self.recenter_fraction > 0.0 && self.recenter_fraction <= 1.0) {
            return Err(CoreError::InvalidRecenterFraction(self.recenter_fraction));
        }
        Ok(())
    }
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            zoom_factor: Self::DEFAULT_ZOOM_FACTOR,
            recenter_fraction: 1.0,
            max_precision: None,
        }
    }
}

/// Whether the zoom is still deepening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomState {
    Deepening,
    /// The next scale would need `required` bits but the ceiling is
    /// `ceiling`; the scale is frozen and only the center keeps moving.
    PrecisionCeiling { required: u32, ceiling: u32 },
}

/// The view for the next step plus the zoom state it was produced in.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomStep {
    pub view: ViewWindow,
    pub state: ZoomState,
}

/// Produce the next view window: re-center on `target` and shrink the scale.
///
/// Precision grows to [`required_precision`] for the new pixel step and
/// never drops. With a ceiling configured and exceeded, the scale is frozen
/// instead of silently losing significant digits.
pub fn advance(
    view: &ViewWindow,
    target: &ZoomTarget,
    width: u32,
    height: u32,
    config: &ZoomConfig,
) -> crate::Result<ZoomStep> {
    config.validate()?;

    let prec = view.precision();
    let target_point = view.map_pixel(target.row, target.col, width, height)?;
    let center = if config.recenter_fraction >= 1.0 {
        target_point
    } else {
        let fraction = Float::with_val(prec, config.recenter_fraction);
        glide(view.center(), &target_point, &fraction)
    };

    let factor = Float::with_val(prec, config.zoom_factor);
    let mut scale = view.scale().clone();
    scale *= &factor;

    let mut new_step = scale.clone();
    new_step *= 2u32;
    new_step /= width.min(height);
    let required = required_precision(&new_step);

    let (scale, precision, state) = match config.max_precision {
        Some(ceiling) if required > ceiling => {
            warn!(
                required,
                ceiling,
                precision = view.precision(),
                "Precision ceiling reached, freezing zoom"
            );
            (
                view.scale().clone(),
                view.precision(),
                ZoomState::PrecisionCeiling { required, ceiling },
            )
        }
        _ => {
            let precision = view.precision().max(required);
            if precision > view.precision() {
                debug!(from = view.precision(), to = precision, "Raising precision");
            }
            (scale, precision, ZoomState::Deepening)
        }
    };

    let view = ViewWindow::new(center, scale, precision)?;
    Ok(ZoomStep { view, state })
}

/// `from + (to - from) · fraction`, at the precision of `from`.
fn glide(from: &PreciseComplex, to: &PreciseComplex, fraction: &Float) -> PreciseComplex {
    let prec = from.precision();
    let mut re = Float::with_val(prec, &to.re - &from.re);
    re *= fraction;
    re += &from.re;
    let mut im = Float::with_val(prec, &to.im - &from.im);
    im *= fraction;
    im += &from.im;
    PreciseComplex::new(re, im)
}
