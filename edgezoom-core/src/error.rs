use thiserror::Error;

/// Errors originating from the core zoom engine.
///
/// Every variant describes input the caller should never have produced;
/// none of them is a recoverable runtime condition.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid max iterations: {0} (must be >= 1)")]
    InvalidMaxIterations(u32),

    #[error("invalid escape radius: {0} (must be > 0.0)")]
    InvalidEscapeRadius(f64),

    #[error("invalid view window: {reason}")]
    InvalidViewWindow { reason: String },

    #[error("invalid precision: {0} bits (must be >= {min})", min = crate::precision::MIN_PRECISION_BITS)]
    InvalidPrecision(u32),

    #[error("invalid image dimensions: {width}×{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("pixel (row {row}, col {col}) outside {width}×{height} grid")]
    PixelOutOfRange {
        row: u32,
        col: u32,
        width: u32,
        height: u32,
    },

    #[error("invalid zoom factor: {0} (must be in (0, 1))")]
    InvalidZoomFactor(f64),

    #[error("invalid recenter fraction: {0} (must be in (0, 1])")]
    InvalidRecenterFraction(f64),

    #[error("invalid numeric literal: {0:?}")]
    InvalidLiteral(String),
}
