pub mod complex;
pub mod error;
pub mod fractal;
pub mod kernel;
pub mod precise;
pub mod precision;
pub mod reset;
pub mod view;
pub mod zoom;

// Re-export primary types for convenience.
pub use complex::{Complex, ComplexNum};
pub use error::CoreError;
pub use fractal::{FractalKind, FractalParams, FractalSpec, IterationOutcome};
pub use kernel::{iterate, EscapeKernel};
pub use precise::PreciseComplex;
pub use view::ViewWindow;
pub use zoom::{advance, ZoomConfig, ZoomState, ZoomStep, ZoomTarget};

/// Re-exported so callers can build precise values without naming `rug` themselves.
pub use rug::Float;

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
