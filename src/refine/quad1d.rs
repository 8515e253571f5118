//! Quadratic 1D fitting for peak refinement.

/// Turning point of the parabola through samples at `x = -1, 0, +1`.
///
/// For `f(x) = a x^2 + b x + c` this is `x0 = -b / (2a)`, computed as
/// `-0.5 * (y[2] - y[0]) / (y[0] - 2 y[1] + y[2])`. No guard is applied: a
/// flat or linear triple has a zero denominator and yields an infinite or
/// NaN offset, and a convex triple yields the location of the minimum.
pub fn parabolic_turning_point(y: [f64; 3]) -> f64 {
    let numerator = -0.5 * (y[2] - y[0]);
    let denominator = y[0] - 2.0 * y[1] + y[2];
    numerator / denominator
}

#[cfg(test)]
mod tests {
    use super::parabolic_turning_point;

    #[test]
    fn symmetric_peak_is_centered() {
        assert_eq!(parabolic_turning_point([1.0, 2.0, 1.0]), 0.0);
    }

    #[test]
    fn shifted_parabola_recovers_vertex() {
        let f = |x: f64| 1.0 - (x - 0.25).powi(2);
        let dx = parabolic_turning_point([f(-1.0), f(0.0), f(1.0)]);
        assert!((dx - 0.25).abs() < 1e-12);
    }

    #[test]
    fn linear_samples_divide_by_zero() {
        // numerator -1, denominator 0
        let dx = parabolic_turning_point([1.0, 2.0, 3.0]);
        assert_eq!(dx, f64::NEG_INFINITY);
    }

    #[test]
    fn flat_samples_give_nan() {
        assert!(parabolic_turning_point([0.5, 0.5, 0.5]).is_nan());
    }
}
