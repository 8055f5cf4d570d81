/**
Calculates the arithmetic mean of a slice of f64 values.

## Arguments
- `values`: A slice of f64 values.

## Returns
The mean, or `None` if the slice is empty.
 */
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/**
Calculates the `q`-th quantile of a slice of f64 values using linear interpolation
between the two nearest order statistics (position `(n - 1) * q`).

## Arguments
- `values`: A slice of f64 values, in any order.
- `q`: The quantile in `[0, 1]`.

## Returns
The interpolated quantile, or `None` if the slice is empty, `q` is outside `[0, 1]`,
or any value is not finite.
 */
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    if values.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let mut sorted_values = values.to_vec();
    sorted_values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let position = (sorted_values.len() - 1) as f64 * q;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    let low_value = sorted_values[lower];
    let high_value = sorted_values[upper];
    Some(low_value + (high_value - low_value) * fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_basic() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0]), Some(2.5));
    }

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_quantile_interpolates() {
        // Sorted: [10, 100, 1000]. Position 0.3 -> 10 + 0.3 * 90 = 37
        let values = vec![100.0, 10.0, 1000.0];
        let q15 = quantile(&values, 0.15).unwrap();
        assert!((q15 - 37.0).abs() < 1e-9);
        // Position 1.7 -> 100 + 0.7 * 900 = 730
        let q85 = quantile(&values, 0.85).unwrap();
        assert!((q85 - 730.0).abs() < 1e-9);
    }

    #[test]
    fn test_quantile_extremes_and_median() {
        let values = vec![3.0, 1.0, 4.0, 1.0, 5.0, 9.0];
        assert_eq!(quantile(&values, 0.0), Some(1.0));
        assert_eq!(quantile(&values, 1.0), Some(9.0));
        // Sorted: [1, 1, 3, 4, 5, 9] -> position 2.5 -> 3.5
        assert_eq!(quantile(&values, 0.5), Some(3.5));
    }

    #[test]
    fn test_quantile_single() {
        assert_eq!(quantile(&[42.0], 0.85), Some(42.0));
    }

    #[test]
    fn test_quantile_invalid_input() {
        assert_eq!(quantile(&[], 0.5), None);
        assert_eq!(quantile(&[1.0, 2.0], 1.5), None);
        assert_eq!(quantile(&[1.0, f64::NAN], 0.5), None);
    }
}
