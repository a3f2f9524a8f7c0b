use serde::{Deserialize, Serialize};

use crate::precise::PreciseComplex;

/// Arithmetic capability set the escape-time kernel is written against.
///
/// The kernel only needs complex add, multiply and a magnitude bound test,
/// so a hardware `f64` pair and an MPFR pair are interchangeable. Which one
/// runs is decided by the frame evaluator, never by the kernel.
pub trait ComplexNum: Clone + Send + Sync {
    /// Convert a mapped plane coordinate into this representation.
    fn from_precise(point: &PreciseComplex) -> Self;

    /// Zero carrying the same precision as `self`.
    fn zero_like(&self) -> Self;

    fn add(&self, rhs: &Self) -> Self;

    fn mul(&self, rhs: &Self) -> Self;

    /// `self² + c`, the escape-time recurrence step.
    fn square_add(&self, c: &Self) -> Self {
        self.mul(self).add(c)
    }

    /// `|self|² >= bound_sq`.
    fn norm_sq_at_least(&self, bound_sq: f64) -> bool;

    /// Closed-form Mandelbrot interior test (main cardioid or period-2 bulb).
    ///
    /// Only representations cheap enough to make the shortcut worthwhile
    /// override this; returning `false` just means "iterate normally".
    fn in_mandelbrot_bulbs(&self) -> bool {
        false
    }
}

/// A complex number represented as two `f64` components.
///
/// The hardware fast path for shallow views. Never used for coordinate
/// math: values arrive here already mapped by the precise mapper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const ZERO: Self = Self { re: 0.0, im: 0.0 };

    #[inline]
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// Returns `re² + im²` without taking the square root.
    #[inline]
    pub fn norm_sq(self) -> f64 {
        self.re * self.re + self.im * self.im
    }
}

impl ComplexNum for Complex {
    #[inline]
    fn from_precise(point: &PreciseComplex) -> Self {
        Self::new(point.re.to_f64(), point.im.to_f64())
    }

    #[inline]
    fn zero_like(&self) -> Self {
        Self::ZERO
    }

    #[inline]
    fn add(&self, rhs: &Self) -> Self {
        Self::new(self.re + rhs.re, self.im + rhs.im)
    }

    #[inline]
    fn mul(&self, rhs: &Self) -> Self {
        Self::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }

    #[inline]
    fn square_add(&self, c: &Self) -> Self {
        Self::new(
            self.re * self.re - self.im * self.im + c.re,
            2.0 * self.re * self.im + c.im,
        )
    }

    #[inline]
    fn norm_sq_at_least(&self, bound_sq: f64) -> bool {
        self.norm_sq() >= bound_sq
    }

    #[inline]
    fn in_mandelbrot_bulbs(&self) -> bool {
        let (re, im) = (self.re, self.im);
        let im2 = im * im;
        let q = (re - 0.25) * (re - 0.25) + im2;
        let cardioid = q * (q + (re - 0.25)) <= 0.25 * im2;
        let bulb = (re + 1.0) * (re + 1.0) + im2 <= 0.0625;
        cardioid || bulb
    }
}
