//! Precision budget policy.
//!
//! A view needs enough mantissa bits to tell neighbouring pixels apart, plus
//! a margin for the rounding that accumulates along an orbit. With a pixel
//! step of `2^-k` plane units that is `k + PRECISION_MARGIN_BITS` bits.

use rug::Float;

/// Smallest precision a view window accepts.
pub const MIN_PRECISION_BITS: u32 = 64;

/// Bits kept on top of the pixel resolution.
pub const PRECISION_MARGIN_BITS: u32 = 32;

/// Initial precision budget for a fresh view.
pub const DEFAULT_PRECISION_BITS: u32 = 100;

/// Resolution (in bits below 1.0) up to which `f64` iteration is trusted.
///
/// Corresponds to a pixel step of roughly `1e-13`, which leaves about ten
/// bits of the 53-bit mantissa for orbit error growth.
pub const HARDWARE_SAFE_BITS: u32 = 43;

/// Number of binary digits below 1.0 needed to resolve `step`.
///
/// Returns `ceil(-log2(step))` (clamped at zero); a step of `2^-10` needs 10.
pub fn resolution_bits(step: &Float) -> u32 {
    // step = m·2^exp with 0.5 <= m < 1, so -log2(step) lies in (-exp, 1 - exp].
    match step.get_exp() {
        Some(exp) => (1 - i64::from(exp)).max(0) as u32,
        None => 0,
    }
}

/// Precision (bits) required to map a view whose pixel step is `step`.
pub fn required_precision(step: &Float) -> u32 {
    (resolution_bits(step) + PRECISION_MARGIN_BITS).max(MIN_PRECISION_BITS)
}

/// Whether a hardware `f64` kernel can iterate a view with this pixel step.
pub fn fits_hardware(step: &Float) -> bool {
    resolution_bits(step) <= HARDWARE_SAFE_BITS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pow2(exp: i32) -> Float {
        let mut f = Float::with_val(128, 1);
        f <<= exp;
        f
    }

    #[test]
    fn powers_of_two_are_exact() {
        assert_eq!(resolution_bits(&pow2(-10)), 10);
        assert_eq!(resolution_bits(&pow2(-1)), 1);
        assert_eq!(resolution_bits(&pow2(0)), 0);
    }

    #[test]
    fn other_values_round_up() {
        // 3·2^-12 lies between 2^-11 and 2^-10, so 11 bits are needed.
        let step = Float::with_val(128, 3) * pow2(-12);
        assert_eq!(resolution_bits(&step), 11);
    }

    #[test]
    fn coarse_steps_need_no_fraction_bits() {
        assert_eq!(resolution_bits(&Float::with_val(64, 3.5)), 0);
        assert_eq!(resolution_bits(&Float::new(64)), 0);
    }

    #[test]
    fn required_precision_has_floor_and_margin() {
        assert_eq!(required_precision(&pow2(-4)), MIN_PRECISION_BITS);
        assert_eq!(
            required_precision(&pow2(-200)),
            200 + PRECISION_MARGIN_BITS
        );
    }

    #[test]
    fn hardware_cutoff() {
        assert!(fits_hardware(&pow2(-20)));
        assert!(fits_hardware(&pow2(-43)));
        assert!(!fits_hardware(&pow2(-44)));
    }
}
