use edgezoom_core::IterationOutcome;

use crate::error::RenderError;
use crate::tile::Tile;

/// The escape outcomes of one evaluated view, addressed by `(row, col)`.
///
/// Produced in one piece by the frame evaluator and read-only afterwards;
/// the sink turns it into pixels and the edge detector ranks it.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: u32,
    height: u32,
    max_iterations: u32,
    data: Vec<IterationOutcome>,
}

impl Frame {
    /// Allocate a frame with every pixel bounded.
    pub fn blank(width: u32, height: u32, max_iterations: u32) -> Self {
        Self {
            width,
            height,
            max_iterations,
            data: vec![IterationOutcome::bounded(max_iterations); width as usize * height as usize],
        }
    }

    /// Wrap row-major outcomes, checking they fill the grid exactly.
    pub fn from_outcomes(
        width: u32,
        height: u32,
        max_iterations: u32,
        data: Vec<IterationOutcome>,
    ) -> crate::Result<Self> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(RenderError::FrameSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            max_iterations,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Outcome at `(row, col)`, or `None` outside the grid.
    pub fn get(&self, row: u32, col: u32) -> Option<IterationOutcome> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.data.get(self.index(row, col)).copied()
    }

    /// Every outcome in row-major order.
    pub fn outcomes(&self) -> &[IterationOutcome] {
        &self.data
    }

    /// The pixel that maps exactly to the view center.
    pub fn center_pixel(&self) -> (u32, u32) {
        (self.height / 2, self.width / 2)
    }

    pub fn escaped_count(&self) -> usize {
        self.data.iter().filter(|o| o.escaped).count()
    }

    #[inline]
    pub(crate) fn index(&self, row: u32, col: u32) -> usize {
        row as usize * self.width as usize + col as usize
    }

    /// Copy one tile's row-major outcomes into place.
    pub(crate) fn blit_tile(&mut self, tile: &Tile, tile_data: &[IterationOutcome]) {
        debug_assert_eq!(tile_data.len(), tile.pixel_count());
        let tw = tile.width as usize;
        for r in 0..tile.height {
            let dst = self.index(tile.row + r, tile.col);
            let src = r as usize * tw;
            self.data[dst..dst + tw].copy_from_slice(&tile_data[src..src + tw]);
        }
    }
}
