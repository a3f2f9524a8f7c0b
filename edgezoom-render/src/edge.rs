//! Edge-following target selection.
//!
//! Escaped pixels with the highest iteration count sit closest to the set
//! boundary, which is where the detail is. Zooming toward one of them keeps
//! the animation on the edge instead of drifting into a uniform region.

use std::cmp::Reverse;

use rayon::prelude::*;
use rug::Float;
use tracing::debug;

use edgezoom_core::{ViewWindow, ZoomTarget};

use crate::frame::Frame;

/// Pick the next zoom target from an evaluated frame.
///
/// Among escaped pixels, the highest iteration count wins; ties go to the
/// pixel farthest from the view center, then to the first in row-major
/// order. Distances are compared as integer pixel offsets, which is exact
/// because every pixel shares one plane step. A frame with no escaped pixel
/// targets its center pixel with distance zero.
pub fn select_target(frame: &Frame, view: &ViewWindow) -> crate::Result<ZoomTarget> {
    let (center_row, center_col) = frame.center_pixel();
    let width = frame.width();

    let best = frame
        .outcomes()
        .par_iter()
        .enumerate()
        .filter(|(_, outcome)| outcome.escaped)
        .map(|(index, outcome)| {
            let row = (index / width as usize) as u32;
            let col = (index % width as usize) as u32;
            let dist2 = offset_sq(row, center_row) + offset_sq(col, center_col);
            (outcome.iterations, dist2, Reverse(index))
        })
        .max();

    let Some((iterations, dist2, Reverse(index))) = best else {
        debug!(
            row = center_row,
            col = center_col,
            "No escaped pixels, targeting the view center"
        );
        return Ok(ZoomTarget {
            row: center_row,
            col: center_col,
            iterations: frame.max_iterations(),
            distance_from_center: Float::new(view.precision()),
        });
    };

    let row = (index / width as usize) as u32;
    let col = (index % width as usize) as u32;

    let step = view.pixel_step(width, frame.height())?;
    let mut distance = Float::with_val(view.precision(), dist2);
    distance.sqrt_mut();
    distance *= &step;

    debug!(row, col, iterations, "Selected zoom target");
    Ok(ZoomTarget {
        row,
        col,
        iterations,
        distance_from_center: distance,
    })
}

#[inline]
fn offset_sq(a: u32, b: u32) -> u64 {
    let d = u64::from(a.abs_diff(b));
    d * d
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgezoom_core::{IterationOutcome, PreciseComplex};

    const MAX: u32 = 50;

    fn view() -> ViewWindow {
        // Half-width 2 over a 4-pixel side: one plane unit per pixel.
        ViewWindow::new(PreciseComplex::zero(64), Float::with_val(64, 2), 64).unwrap()
    }

    fn frame_with(width: u32, height: u32, escaped: &[((u32, u32), u32)]) -> Frame {
        let mut data = vec![IterationOutcome::bounded(MAX); (width * height) as usize];
        for &((row, col), n) in escaped {
            data[(row * width + col) as usize] = IterationOutcome::escaped(n);
        }
        Frame::from_outcomes(width, height, MAX, data).unwrap()
    }

    #[test]
    fn unique_maximum_wins() {
        let frame = frame_with(4, 4, &[((0, 0), 3), ((1, 3), 9), ((3, 3), 8)]);
        let t = select_target(&frame, &view()).unwrap();
        assert_eq!((t.row, t.col, t.iterations), (1, 3, 9));
    }

    #[test]
    fn tie_goes_to_farthest_from_center() {
        // Center pixel is (2, 2); (0, 0) is farther than (1, 2).
        let frame = frame_with(4, 4, &[((1, 2), 5), ((0, 0), 5)]);
        let t = select_target(&frame, &view()).unwrap();
        assert_eq!((t.row, t.col), (0, 0));
        let expected = Float::with_val(64, 8).sqrt();
        assert_eq!(t.distance_from_center, expected);
    }

    #[test]
    fn equal_distance_goes_to_first_in_scan_order() {
        // (1, 2) and (2, 1) are both one pixel from the center.
        let frame = frame_with(4, 4, &[((2, 1), 4), ((1, 2), 4), ((2, 3), 4)]);
        let t = select_target(&frame, &view()).unwrap();
        assert_eq!((t.row, t.col), (1, 2));
        assert_eq!(t.distance_from_center, 1);
    }

    #[test]
    fn bounded_pixels_never_win() {
        let frame = frame_with(4, 4, &[((3, 0), 1)]);
        let t = select_target(&frame, &view()).unwrap();
        assert_eq!((t.row, t.col, t.iterations), (3, 0, 1));
    }

    #[test]
    fn all_bounded_falls_back_to_center() {
        let frame = Frame::blank(5, 3, MAX);
        let t = select_target(&frame, &view()).unwrap();
        assert_eq!((t.row, t.col), (1, 2));
        assert_eq!(t.iterations, MAX);
        assert!(t.distance_from_center.is_zero());
    }

    #[test]
    fn selection_is_deterministic() {
        let escaped: Vec<_> = (0..64u32)
            .map(|i| ((i / 8, i % 8), 7 + (i % 3)))
            .collect();
        let frame = frame_with(8, 8, &escaped);
        let first = select_target(&frame, &view()).unwrap();
        for _ in 0..20 {
            assert_eq!(select_target(&frame, &view()).unwrap(), first);
        }
    }
}
