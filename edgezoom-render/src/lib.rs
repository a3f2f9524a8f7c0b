pub mod buffer;
pub mod edge;
pub mod error;
pub mod evaluator;
pub mod export;
pub mod frame;
pub mod session;
pub mod tile;

pub use buffer::RenderBuffer;
pub use edge::select_target;
pub use error::RenderError;
pub use evaluator::{evaluate, Arithmetic, ArithmeticMode, FrameResult, RenderCancel};
pub use export::{export_png, ExportMetadata};
pub use frame::Frame;
pub use session::{SessionConfig, StepReport, ZoomSession};
pub use tile::TILE_SIZE;

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
