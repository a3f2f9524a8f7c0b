//! Fresh-run selection: which fractal to draw and where to start.

use rand::Rng;
use tracing::info;

use crate::fractal::FractalSpec;
use crate::precise::PreciseComplex;
use crate::view::ViewWindow;

/// Chance that a reset picks the Mandelbrot set; Julia takes the rest.
pub const MANDELBROT_PROBABILITY: f64 = 0.10;

/// Julia constants with visually rich, connected-or-nearly-connected sets.
pub const JULIA_CONSTANTS: [(&str, &str); 10] = [
    ("-0.8", "0.156"),
    ("0.285", "0.01"),
    ("-0.70176", "-0.3842"),
    ("-0.4", "0.6"),
    ("0.3", "0.5"),
    // Seahorse valley
    ("-0.7269", "0.1889"),
    ("0.35", "0.35"),
    ("-0.1", "0.65"),
    ("-0.12", "0.77"),
    ("-0.54", "0.54"),
];

/// Roll a new fractal: Mandelbrot with [`MANDELBROT_PROBABILITY`], otherwise
/// a Julia set with a constant drawn uniformly from [`JULIA_CONSTANTS`].
pub fn roll_fractal_spec<R: Rng + ?Sized>(
    rng: &mut R,
    precision: u32,
) -> crate::Result<FractalSpec> {
    if rng.random_bool(MANDELBROT_PROBABILITY) {
        return Ok(FractalSpec::mandelbrot(precision));
    }
    let (re, im) = JULIA_CONSTANTS[rng.random_range(0..JULIA_CONSTANTS.len())];
    Ok(FractalSpec::julia(PreciseComplex::parse(re, im, precision)?))
}

/// Roll a fractal and pair it with its family's default view.
pub fn reset<R: Rng + ?Sized>(
    rng: &mut R,
    precision: u32,
) -> crate::Result<(FractalSpec, ViewWindow)> {
    let spec = roll_fractal_spec(rng, precision)?;
    let view = ViewWindow::default_for(spec.kind(), precision)?;
    info!(fractal = %spec.describe(), precision, "Generating new fractal");
    Ok((spec, view))
}
