use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::precise::PreciseComplex;

/// The escape outcome of a single point.
///
/// Color is binary (`escaped` picks white, otherwise black), but the
/// iteration count is kept because the edge detector ranks pixels by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IterationOutcome {
    /// `false` means "presumed inside the set".
    pub escaped: bool,
    /// Steps taken before escape, or `max_iterations` for bounded points.
    pub iterations: u32,
}

impl IterationOutcome {
    #[inline]
    pub fn escaped(iterations: u32) -> Self {
        Self {
            escaped: true,
            iterations,
        }
    }

    #[inline]
    pub fn bounded(max_iterations: u32) -> Self {
        Self {
            escaped: false,
            iterations: max_iterations,
        }
    }
}

/// Which escape-time family a run is drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FractalKind {
    Mandelbrot,
    Julia,
}

impl FractalKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Mandelbrot => "Mandelbrot",
            Self::Julia => "Julia",
        }
    }
}

/// Fractal family plus its Julia constant. Fixed for one animation run and
/// replaced wholesale on reset.
#[derive(Debug, Clone, PartialEq)]
pub struct FractalSpec {
    kind: FractalKind,
    julia_constant: PreciseComplex,
}

impl FractalSpec {
    pub fn mandelbrot(precision: u32) -> Self {
        Self {
            kind: FractalKind::Mandelbrot,
            julia_constant: PreciseComplex::zero(precision),
        }
    }

    pub fn julia(constant: PreciseComplex) -> Self {
        Self {
            kind: FractalKind::Julia,
            julia_constant: constant,
        }
    }

    pub fn kind(&self) -> FractalKind {
        self.kind
    }

    /// The Julia constant, or `None` for the Mandelbrot set.
    pub fn julia_constant(&self) -> Option<&PreciseComplex> {
        match self.kind {
            FractalKind::Mandelbrot => None,
            FractalKind::Julia => Some(&self.julia_constant),
        }
    }

    /// One-line description for logs and the HUD.
    pub fn describe(&self) -> String {
        match self.julia_constant() {
            Some(c) => format!("Julia c = {}", c.to_string_digits(8)),
            None => "Mandelbrot".to_string(),
        }
    }
}

/// Parameters controlling escape-time iteration.
///
/// The cached `escape_radius_sq` field is recomputed on deserialization so
/// loaded preferences always stay consistent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FractalParams {
    /// Iteration budget; a point still bounded after it is classified inside.
    pub max_iterations: u32,

    /// Bailout radius: the orbit escaped once `|z| >= escape_radius`.
    pub escape_radius: f64,

    #[serde(skip)]
    escape_radius_sq: f64,
}

impl<'de> Deserialize<'de> for FractalParams {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            max_iterations: u32,
            escape_radius: f64,
        }
        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.max_iterations, raw.escape_radius).map_err(serde::de::Error::custom)
    }
}

impl FractalParams {
    pub const DEFAULT_MAX_ITERATIONS: u32 = 50;
    pub const DEFAULT_ESCAPE_RADIUS: f64 = 2.0;

    pub fn new(max_iterations: u32, escape_radius: f64) -> crate::Result<Self> {
        if max_iterations < 1 {
            return Err(CoreError::InvalidMaxIterations(max_iterations));
        }
        if escape_radius <= 0.0 || !escape_radius.is_finite() {
            return Err(CoreError::InvalidEscapeRadius(escape_radius));
        }
        Ok(Self {
            max_iterations,
            escape_radius,
            escape_radius_sq: escape_radius * escape_radius,
        })
    }

    #[inline]
    pub fn escape_radius_sq(&self) -> f64 {
        self.escape_radius_sq
    }
}

impl Default for FractalParams {
    fn default() -> Self {
        Self {
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
            escape_radius: Self::DEFAULT_ESCAPE_RADIUS,
            escape_radius_sq: Self::DEFAULT_ESCAPE_RADIUS * Self::DEFAULT_ESCAPE_RADIUS,
        }
    }
}
