//! Shared Numeric Helpers
//!
//! Small pure functions used by the estimator, the scorer and the response
//! builder. None of them allocate beyond their inputs and none of them
//! panic: empty inputs return `None` or a documented default.

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample variance (n − 1 denominator), `None` below two values
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some(sum_sq / (values.len() - 1) as f64)
}

/// Weighted mean of `(value, weight)` pairs, `None` when the weights sum to zero
pub fn weighted_mean(pairs: impl IntoIterator<Item = (f64, f64)>) -> Option<f64> {
    let (weighted_sum, weight_sum) = pairs
        .into_iter()
        .fold((0.0, 0.0), |(ws, w), (value, weight)| (ws + value * weight, w + weight));

    if weight_sum > 0.0 {
        Some(weighted_sum / weight_sum)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding() {
        assert_eq!(round_to(0.6 + 0.1 + 0.1, 2), 0.8);
        assert_eq!(round_to(12.345, 1), 12.3);
        assert_eq!(round_to(-2.25, 1), -2.3);
    }

    #[test]
    fn mean_and_variance() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[20.0, 22.0, 24.0]), Some(22.0));

        assert_eq!(sample_variance(&[5.0]), None);
        assert_eq!(sample_variance(&[20.0, 22.0, 24.0]), Some(4.0));
        assert_eq!(sample_variance(&[7.0, 7.0]), Some(0.0));
    }

    #[test]
    fn weighted() {
        assert_eq!(weighted_mean(vec![(10.0, 1.0), (20.0, 3.0)]), Some(17.5));
        assert_eq!(weighted_mean(vec![(10.0, 0.0)]), None);
        assert_eq!(weighted_mean(Vec::new()), None);
    }
}
