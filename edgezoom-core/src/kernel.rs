use crate::complex::ComplexNum;
use crate::fractal::{FractalKind, FractalParams, FractalSpec, IterationOutcome};

/// The escape-time recurrence `z ← z² + c`, shared by both fractal families.
///
/// - Mandelbrot: `z₀ = 0`, `c = point`.
/// - Julia: `z₀ = point`, `c` = the Julia constant of the run.
///
/// Generic over the arithmetic so the frame evaluator can pick the hardware
/// or the arbitrary-precision path per frame. Construction converts the
/// Julia constant once; [`iterate`](Self::iterate) is then pure.
#[derive(Debug, Clone)]
pub struct EscapeKernel<Z> {
    kind: FractalKind,
    julia_c: Option<Z>,
    params: FractalParams,
}

impl<Z: ComplexNum> EscapeKernel<Z> {
    pub fn new(spec: &FractalSpec, params: FractalParams) -> Self {
        Self {
            kind: spec.kind(),
            julia_c: spec.julia_constant().map(Z::from_precise),
            params,
        }
    }

    /// Iterate a single point.
    ///
    /// A point that reaches `|z| >= escape_radius` after step `n` reports
    /// `escaped(n)`. The bound is checked on steps `1..max_iterations`, so an
    /// escaped count is always strictly below `max_iterations`; anything still
    /// bounded is `bounded(max_iterations)`.
    pub fn iterate(&self, point: &Z) -> IterationOutcome {
        let max_iter = self.params.max_iterations;
        let escape_radius_sq = self.params.escape_radius_sq();

        let (mut z, c) = match (&self.julia_c, self.kind) {
            (Some(c), FractalKind::Julia) => (point.clone(), c),
            _ => {
                if point.in_mandelbrot_bulbs() {
                    return IterationOutcome::bounded(max_iter);
                }
                (point.zero_like(), point)
            }
        };

        for n in 1..max_iter {
            z = z.square_add(c);
            if z.norm_sq_at_least(escape_radius_sq) {
                return IterationOutcome::escaped(n);
            }
        }

        IterationOutcome::bounded(max_iter)
    }
}

/// One-shot form of [`EscapeKernel::iterate`].
///
/// Prefer building an [`EscapeKernel`] once per frame; this converts the
/// Julia constant on every call.
pub fn iterate<Z: ComplexNum>(
    point: &Z,
    spec: &FractalSpec,
    params: FractalParams,
) -> IterationOutcome {
    EscapeKernel::new(spec, params).iterate(point)
}
