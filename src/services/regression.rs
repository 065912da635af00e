use crate::errors::TrendError;
use crate::models::Regression;

/// Ordinary least-squares fit of `values` against x = 0..n-1.
///
/// Fails with `InsufficientData` for an empty window and `DegenerateRegression` when the
/// x-variance is zero (a single point), instead of handing back NaN or infinite coefficients.
pub fn fit_regression(values: &[f64]) -> Result<Regression, TrendError> {
    let n = values.len();
    if n == 0 {
        return Err(TrendError::InsufficientData);
    }

    let n_f = n as f64;

    let (sum_x, sum_y, sum_xy, sum_x2) = values
        .iter()
        .enumerate()
        .fold((0.0, 0.0, 0.0, 0.0), |(sx, sy, sxy, sx2), (i, &y)| {
            let x = i as f64;
            (sx + x, sy + y, sxy + x * y, sx2 + x * x)
        });

    let denominator = n_f * sum_x2 - sum_x * sum_x;
    if denominator == 0.0 {
        return Err(TrendError::DegenerateRegression);
    }

    let slope = (n_f * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n_f;

    Ok(Regression { intercept, slope })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        let tolerance = 1e-9 * expected.abs().max(1.0);
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_recovers_exact_line() {
        let values: Vec<f64> = (0..24).map(|i| 37.5 - 1.25 * i as f64).collect();
        let regression = fit_regression(&values).unwrap();

        assert_close(regression.intercept, 37.5);
        assert_close(regression.slope, -1.25);
    }

    #[test]
    fn test_arithmetic_sales_series() {
        let values: Vec<f64> = (0..24).map(|i| 100.0 + 2.0 * i as f64).collect();
        let regression = fit_regression(&values).unwrap();

        assert_close(regression.slope, 2.0);
        assert_close(regression.intercept, 100.0);
    }

    #[test]
    fn test_flat_series_has_zero_slope() {
        let regression = fit_regression(&[42.0; 6]).unwrap();
        assert_close(regression.slope, 0.0);
        assert_close(regression.intercept, 42.0);
    }

    #[test]
    fn test_two_points_define_the_line() {
        let regression = fit_regression(&[10.0, 16.0]).unwrap();
        assert_close(regression.intercept, 10.0);
        assert_close(regression.slope, 6.0);
    }

    #[test]
    fn test_empty_window_is_insufficient() {
        assert_eq!(fit_regression(&[]), Err(TrendError::InsufficientData));
    }

    #[test]
    fn test_single_point_is_degenerate() {
        assert_eq!(fit_regression(&[150.0]), Err(TrendError::DegenerateRegression));
    }
}
