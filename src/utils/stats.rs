//! Descriptive statistics with numpy-compatible conventions
//! (population standard deviation, `None` instead of NaN for empty input).

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(x: &[f64]) -> Option<f64> {
    if x.is_empty() {
        return None;
    }
    Some(x.iter().sum::<f64>() / x.len() as f64)
}

/// Population standard deviation (`ddof = 0`), `None` for an empty slice.
///
/// # Example
/// ```
/// use glottis::utils::pstd;
///
/// let s = pstd(&[100.0, 150.0, 200.0]).unwrap();
/// assert!((s - 40.824829).abs() < 1e-6);
/// ```
pub fn pstd(x: &[f64]) -> Option<f64> {
    let m = mean(x)?;
    let var = x.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / x.len() as f64;
    Some(var.sqrt())
}

pub fn min(x: &[f64]) -> Option<f64> {
    x.iter().copied().reduce(f64::min)
}

pub fn max(x: &[f64]) -> Option<f64> {
    x.iter().copied().reduce(f64::max)
}

/// Coefficient of variation, `pstd / mean`.
///
/// Returns `None` for an empty slice or a zero mean, where the ratio is
/// undefined.
pub fn coefficient_of_variation(x: &[f64]) -> Option<f64> {
    let m = mean(x)?;
    if m == 0.0 {
        return None;
    }
    Some(pstd(x)? / m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_is_none() {
        assert!(mean(&[]).is_none());
        assert!(pstd(&[]).is_none());
        assert!(min(&[]).is_none());
        assert!(max(&[]).is_none());
        assert!(coefficient_of_variation(&[]).is_none());
    }

    #[test]
    fn test_constant_has_zero_spread() {
        let x = [100.0; 10];
        assert_eq!(pstd(&x), Some(0.0));
        assert_eq!(coefficient_of_variation(&x), Some(0.0));
    }

    #[test]
    fn test_cv_zero_mean() {
        assert!(coefficient_of_variation(&[0.0, 0.0]).is_none());
    }

    #[test]
    fn test_min_max_mean() {
        let x = [3.0, -1.0, 4.0];
        assert_eq!(min(&x), Some(-1.0));
        assert_eq!(max(&x), Some(4.0));
        assert_relative_eq!(mean(&x).unwrap(), 2.0);
    }
}
