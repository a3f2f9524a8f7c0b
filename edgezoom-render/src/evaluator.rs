use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use rug::Float;
use serde::{Deserialize, Serialize};
use tracing::debug;

use edgezoom_core::precision::fits_hardware;
use edgezoom_core::{
    Complex, ComplexNum, EscapeKernel, FractalParams, FractalSpec, IterationOutcome,
    PreciseComplex, ViewWindow,
};

use crate::error::RenderError;
use crate::frame::Frame;
use crate::tile::{build_tile_grid, Tile};

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

/// Tracks the current evaluation generation for cancellation and progress.
///
/// Incrementing the generation tells every in-flight tile to stop; the
/// evaluation that started under the old generation then returns
/// [`RenderError::Cancelled`]. The progress counters feed the HUD.
#[derive(Debug)]
pub struct RenderCancel {
    generation: AtomicU64,
    progress_done: AtomicUsize,
    progress_total: AtomicUsize,
}

impl RenderCancel {
    pub fn new() -> Self {
        Self {
            generation: AtomicU64::new(0),
            progress_done: AtomicUsize::new(0),
            progress_total: AtomicUsize::new(0),
        }
    }

    /// Cancel the current evaluation by advancing the generation.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Reset progress for a new pass with `total` tiles.
    pub fn reset_progress(&self, total: usize) {
        self.progress_total.store(total, Ordering::Relaxed);
        self.progress_done.store(0, Ordering::Relaxed);
    }

    pub fn inc_progress(&self) {
        self.progress_done.fetch_add(1, Ordering::Relaxed);
    }

    /// Current progress as `(done, total)` tiles.
    pub fn progress(&self) -> (usize, usize) {
        (
            self.progress_done.load(Ordering::Relaxed),
            self.progress_total.load(Ordering::Relaxed),
        )
    }
}

impl Default for RenderCancel {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Arithmetic selection
// ---------------------------------------------------------------------------

/// How the evaluator picks the kernel's number type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ArithmeticMode {
    /// Hardware `f64` while the pixel step is coarse enough, MPFR after.
    #[default]
    Auto,
    Hardware,
    Precise,
}

/// The arithmetic a pass actually ran with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arithmetic {
    Hardware,
    Precise,
}

impl Arithmetic {
    pub fn label(self) -> &'static str {
        match self {
            Self::Hardware => "f64",
            Self::Precise => "mpfr",
        }
    }
}

impl ArithmeticMode {
    /// Decide the arithmetic for a view whose pixel step is `step`.
    pub fn resolve(self, step: &Float) -> Arithmetic {
        match self {
            Self::Hardware => Arithmetic::Hardware,
            Self::Precise => Arithmetic::Precise,
            Self::Auto if fits_hardware(step) => Arithmetic::Hardware,
            Self::Auto => Arithmetic::Precise,
        }
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// A completed evaluation pass.
#[derive(Debug, Clone)]
pub struct FrameResult {
    pub frame: Frame,
    pub elapsed: Duration,
    pub tiles: usize,
    pub arithmetic: Arithmetic,
}

// ---------------------------------------------------------------------------
// Full-frame evaluation
// ---------------------------------------------------------------------------

/// Evaluate every pixel of a `width`×`height` grid over `view`.
///
/// Coordinates come from the precise mapper. The map is separable, so one
/// column vector and one row vector are computed up front and every pixel
/// pairs an entry from each. Tiles run in parallel via Rayon, each filling
/// its own outcome vector; the vectors are then scattered into a fresh
/// [`Frame`] by address, so scheduling order never shows in the result.
pub fn evaluate(
    view: &ViewWindow,
    spec: &FractalSpec,
    params: FractalParams,
    width: u32,
    height: u32,
    mode: ArithmeticMode,
    cancel: &RenderCancel,
) -> crate::Result<FrameResult> {
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidDimensions { width, height });
    }

    let start = Instant::now();
    let gen = cancel.generation();

    let step = view.pixel_step(width, height)?;
    let arithmetic = mode.resolve(&step);
    let cols = (0..width)
        .map(|col| view.map_col(col, width, height))
        .collect::<edgezoom_core::Result<Vec<Float>>>()?;
    let rows = (0..height)
        .map(|row| view.map_row(row, width, height))
        .collect::<edgezoom_core::Result<Vec<Float>>>()?;

    let tiles = build_tile_grid(width, height);
    cancel.reset_progress(tiles.len());
    debug!(
        tiles = tiles.len(),
        width,
        height,
        precision = view.precision(),
        arithmetic = arithmetic.label(),
        "Starting frame evaluation"
    );

    let tile_data = match arithmetic {
        Arithmetic::Hardware => {
            let cols: Vec<f64> = cols.iter().map(Float::to_f64).collect();
            let rows: Vec<f64> = rows.iter().map(Float::to_f64).collect();
            let kernel = EscapeKernel::<Complex>::new(spec, params);
            evaluate_tiles(&tiles, &kernel, cancel, gen, |row, col| {
                Complex::new(cols[col as usize], rows[row as usize])
            })
        }
        Arithmetic::Precise => {
            let kernel = EscapeKernel::<PreciseComplex>::new(spec, params);
            evaluate_tiles(&tiles, &kernel, cancel, gen, |row, col| {
                PreciseComplex::new(cols[col as usize].clone(), rows[row as usize].clone())
            })
        }
    };

    if cancel.generation() != gen {
        debug!("Frame evaluation cancelled");
        return Err(RenderError::Cancelled);
    }

    let mut frame = Frame::blank(width, height, params.max_iterations);
    for (tile, data) in tiles.iter().zip(&tile_data) {
        let Some(data) = data else {
            return Err(RenderError::Cancelled);
        };
        frame.blit_tile(tile, data);
    }

    let elapsed = start.elapsed();
    debug!(
        elapsed_ms = elapsed.as_millis(),
        escaped = frame.escaped_count(),
        "Frame evaluation complete"
    );

    Ok(FrameResult {
        frame,
        elapsed,
        tiles: tiles.len(),
        arithmetic,
    })
}

/// Run every tile through `kernel`. A tile abandoned because the generation
/// moved comes back as `None`.
fn evaluate_tiles<Z, P>(
    tiles: &[Tile],
    kernel: &EscapeKernel<Z>,
    cancel: &RenderCancel,
    gen: u64,
    point: P,
) -> Vec<Option<Vec<IterationOutcome>>>
where
    Z: ComplexNum,
    P: Fn(u32, u32) -> Z + Sync,
{
    tiles
        .par_iter()
        .map(|tile| {
            let mut data = Vec::with_capacity(tile.pixel_count());
            for (row, col) in tile.pixels() {
                // Once per row keeps precise tiles responsive to a reset.
                if col == tile.col && cancel.generation() != gen {
                    return None;
                }
                data.push(kernel.iterate(&point(row, col)));
            }
            cancel.inc_progress();
            Some(data)
        })
        .collect()
}
