use thiserror::Error;

/// Errors originating from frame evaluation, the zoom session, and export.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid image dimensions: {width}×{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("precision ceiling {ceiling} bits is below the initial precision {initial} bits")]
    CeilingBelowInitial { ceiling: u32, initial: u32 },

    #[error("frame evaluation cancelled")]
    Cancelled,

    #[error("frame holds {actual} outcomes, expected {expected}")]
    FrameSize { expected: usize, actual: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Png(#[from] png::EncodingError),

    #[error(transparent)]
    Core(#[from] edgezoom_core::CoreError),
}
