//! Easing curves for transition progress.

/// Maps linear progress in `[0, 1]` to blend weight in `[0, 1]`.
pub type Easing = fn(f64) -> f64;

/// Cubic ease-in-out: slow start, fast middle, slow end.
pub fn cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Constant-rate progress.
pub fn linear(t: f64) -> f64 {
    t.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cubic_endpoints() {
        assert_eq!(cubic_in_out(0.0), 0.0);
        assert_eq!(cubic_in_out(0.5), 0.5);
        assert_eq!(cubic_in_out(1.0), 1.0);
    }

    #[test]
    fn test_cubic_is_symmetric() {
        for i in 0..=20 {
            let t = i as f64 / 20.0;
            let sum = cubic_in_out(t) + cubic_in_out(1.0 - t);
            assert!((sum - 1.0).abs() < 1e-12, "t = {}", t);
        }
    }

    #[test]
    fn test_cubic_is_monotone() {
        let mut prev = 0.0;
        for i in 1..=1000 {
            let v = cubic_in_out(i as f64 / 1000.0);
            assert!(v >= prev);
            prev = v;
        }
    }

    #[test]
    fn test_cubic_slow_at_edges() {
        assert!(cubic_in_out(0.1) < 0.1);
        assert!(cubic_in_out(0.9) > 0.9);
    }

    #[test]
    fn test_inputs_clamped() {
        assert_eq!(cubic_in_out(-1.0), 0.0);
        assert_eq!(cubic_in_out(2.0), 1.0);
        assert_eq!(linear(1.5), 1.0);
        assert_eq!(linear(0.25), 0.25);
    }
}
