/// Percentile of ascending-sorted values with linear interpolation between
/// order statistics: position `h = (m - 1) p`.
///
/// `p` is clamped to `[0, 1]`. NaN for an empty slice or a NaN `p`.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() || p.is_nan() {
        return f64::NAN;
    }
    let h = (sorted.len() - 1) as f64 * p.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&v, 0.0), 1.0);
        assert_eq!(percentile(&v, 1.0), 4.0);
    }

    #[test]
    fn test_interpolates_between_order_statistics() {
        let v = [10.0, 20.0, 30.0, 40.0, 50.0];
        assert_eq!(percentile(&v, 0.5), 30.0);
        assert!((percentile(&v, 0.1) - 14.0).abs() < 1e-12);
        assert!((percentile(&v, 0.975) - 49.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(percentile(&[], 0.5).is_nan());
        assert!(percentile(&[1.0], f64::NAN).is_nan());
        assert_eq!(percentile(&[7.0], 0.3), 7.0);
        assert_eq!(percentile(&[1.0, 2.0], 1.5), 2.0);
    }
}
