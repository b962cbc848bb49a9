//! Power-of-two rescaling for samples near the limits of `f64`.
//!
//! Differences such as `max - min` overflow to infinity once the sample
//! spans more than `f64::MAX`. Dividing by a power of two first keeps the
//! arithmetic finite and, being exact, leaves ordinary data bit-for-bit
//! unchanged.

/// Power of two that brings `magnitude` into `[0.5, 1]`.
///
/// Returns `1.0` for zero and for non-finite input.
pub fn pow2_scale(magnitude: f64) -> f64 {
    if magnitude == 0.0 || !magnitude.is_finite() {
        return 1.0;
    }
    let exponent = magnitude.abs().log2().ceil() as i32;
    2f64.powi(exponent.clamp(-1022, 1023))
}

/// Scale for a sample bounded by `lo` and `hi`.
pub fn range_scale(lo: f64, hi: f64) -> f64 {
    pow2_scale(lo.abs().max(hi.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pow2_scale_is_a_power_of_two() {
        assert_eq!(pow2_scale(10.0), 16.0);
        assert_eq!(pow2_scale(0.3), 0.5);
        assert_eq!(pow2_scale(0.0), 1.0);
        assert_eq!(pow2_scale(f64::NAN), 1.0);
    }

    #[test]
    fn test_scale_keeps_extreme_ranges_finite() {
        let scale = range_scale(-1e308, 1e308);
        let span = 1e308 / scale - (-1e308 / scale);
        assert!(span.is_finite());
        assert!(span > 0.0 && span <= 4.0);

        let scale = range_scale(-f64::MAX, f64::MAX);
        assert!((f64::MAX / scale - (-f64::MAX / scale)).is_finite());
    }
}
