use rug::Float;

use crate::complex::ComplexNum;
use crate::error::CoreError;

/// A complex-plane point with arbitrary-precision (MPFR) components.
///
/// Immutable once constructed. Arithmetic results inherit the precision of
/// the left-hand operand, so a point mapped at `n` bits iterates at `n` bits.
#[derive(Debug, Clone, PartialEq)]
pub struct PreciseComplex {
    pub re: Float,
    pub im: Float,
}

impl PreciseComplex {
    pub fn new(re: Float, im: Float) -> Self {
        Self { re, im }
    }

    /// Zero at the given precision.
    pub fn zero(precision: u32) -> Self {
        Self {
            re: Float::new(precision),
            im: Float::new(precision),
        }
    }

    /// Parse decimal literals without passing through `f64`.
    pub fn parse(re: &str, im: &str, precision: u32) -> crate::Result<Self> {
        Ok(Self {
            re: parse_float(re, precision)?,
            im: parse_float(im, precision)?,
        })
    }

    /// Re-round both components to `precision` bits.
    ///
    /// Raising the precision is exact; lowering it rounds to nearest.
    pub fn with_precision(&self, precision: u32) -> Self {
        Self {
            re: Float::with_val(precision, &self.re),
            im: Float::with_val(precision, &self.im),
        }
    }

    /// Precision of the real component in bits.
    pub fn precision(&self) -> u32 {
        self.re.prec()
    }

    /// Short human-readable form, `digits` significant decimal digits per component.
    pub fn to_string_digits(&self, digits: usize) -> String {
        let re = self.re.to_string_radix(10, Some(digits));
        let im = self.im.to_string_radix(10, Some(digits));
        if im.starts_with('-') {
            format!("{re} {im}i")
        } else {
            format!("{re} +{im}i")
        }
    }
}

pub(crate) fn parse_float(literal: &str, precision: u32) -> crate::Result<Float> {
    let parsed =
        Float::parse(literal).map_err(|_| CoreError::InvalidLiteral(literal.to_string()))?;
    Ok(Float::with_val(precision, parsed))
}

impl ComplexNum for PreciseComplex {
    fn from_precise(point: &PreciseComplex) -> Self {
        point.clone()
    }

    fn zero_like(&self) -> Self {
        Self::zero(self.precision())
    }

    fn add(&self, rhs: &Self) -> Self {
        let prec = self.precision();
        Self {
            re: Float::with_val(prec, &self.re + &rhs.re),
            im: Float::with_val(prec, &self.im + &rhs.im),
        }
    }

    fn mul(&self, rhs: &Self) -> Self {
        let prec = self.precision();
        let rr = Float::with_val(prec, &self.re * &rhs.re);
        let ii = Float::with_val(prec, &self.im * &rhs.im);
        let ri = Float::with_val(prec, &self.re * &rhs.im);
        let ir = Float::with_val(prec, &self.im * &rhs.re);
        Self {
            re: rr - &ii,
            im: ri + &ir,
        }
    }

    fn square_add(&self, c: &Self) -> Self {
        let prec = self.precision();
        let mut re = Float::with_val(prec, self.re.square_ref());
        let im2 = Float::with_val(prec, self.im.square_ref());
        re -= &im2;
        re += &c.re;

        let mut im = Float::with_val(prec, &self.re * &self.im);
        im *= 2u32;
        im += &c.im;

        Self { re, im }
    }

    fn norm_sq_at_least(&self, bound_sq: f64) -> bool {
        let prec = self.precision();
        let mut norm_sq = Float::with_val(prec, self.re.square_ref());
        let im2 = Float::with_val(prec, self.im.square_ref());
        norm_sq += &im2;
        norm_sq >= bound_sq
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keeps_digits_beyond_f64() {
        let p = PreciseComplex::parse("0.1000000000000000000000000001", "0", 128).unwrap();
        let rounded = Float::with_val(128, 0.1_f64);
        assert_ne!(p.re, rounded, "literal must not round-trip through f64");
        assert_eq!(p.precision(), 128);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(PreciseComplex::parse("zero", "0", 64).is_err());
    }

    #[test]
    fn multiplication() {
        // (1 + 2i)(3 + 4i) = -5 + 10i
        let a = PreciseComplex::parse("1", "2", 96).unwrap();
        let b = PreciseComplex::parse("3", "4", 96).unwrap();
        let c = a.mul(&b);
        assert_eq!(c.re, -5);
        assert_eq!(c.im, 10);
    }

    #[test]
    fn square_add_matches_mul_then_add() {
        let z = PreciseComplex::parse("0.375", "-0.625", 80).unwrap();
        let c = PreciseComplex::parse("-0.125", "0.25", 80).unwrap();
        assert_eq!(z.square_add(&c), z.mul(&z).add(&c));
    }

    #[test]
    fn norm_bound_is_inclusive() {
        let on = PreciseComplex::parse("2", "0", 64).unwrap();
        let inside = PreciseComplex::parse("1.5", "1.3", 64).unwrap();
        assert!(on.norm_sq_at_least(4.0));
        assert!(!inside.norm_sq_at_least(4.0));
    }

    #[test]
    fn raising_precision_is_exact() {
        let p = PreciseComplex::parse("-0.743643887037151", "0.13182590420533", 100).unwrap();
        let wide = p.with_precision(300);
        assert_eq!(wide, p);
        assert_eq!(wide.precision(), 300);
    }

    #[test]
    fn results_inherit_left_precision() {
        let a = PreciseComplex::zero(200);
        let b = PreciseComplex::parse("1", "1", 64).unwrap();
        assert_eq!(a.add(&b).precision(), 200);
    }
}
