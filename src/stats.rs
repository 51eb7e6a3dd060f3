//! Statistics helpers on top of `u_numflow::stats`.
//!
//! Detectors call `u_numflow::stats` directly for quantiles (R-7 linear
//! interpolation), the mean and the **population** standard deviation.
//! This module only adds the input check every detector starts with and
//! the median absolute deviation.

use crate::error::OutlierError;

/// Median absolute deviation from the median: `median(|v - median(v)|)`.
///
/// Returns `(median, mad)`, or `None` for an empty slice.
pub fn median_abs_deviation(values: &[f64]) -> Option<(f64, f64)> {
    let median = u_numflow::stats::median(values)?;
    let abs_devs: Vec<f64> = values.iter().map(|&v| (v - median).abs()).collect();
    let mad = u_numflow::stats::median(&abs_devs)?;
    Some((median, mad))
}

/// Fails with [`OutlierError::EmptyInput`] or [`OutlierError::NonFiniteValue`]
/// unless every value is finite and there is at least one.
pub fn ensure_finite(values: &[f64]) -> Result<(), OutlierError> {
    if values.is_empty() {
        return Err(OutlierError::EmptyInput);
    }
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(OutlierError::NonFiniteValue { index }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mad_of_known_data() {
        let (m, mad) = median_abs_deviation(&[1.0, 1.0, 2.0, 2.0, 4.0, 6.0, 9.0]).unwrap();
        assert_eq!(m, 2.0);
        assert_eq!(mad, 1.0);
    }

    #[test]
    fn mad_of_even_length_averages_middle_pair() {
        // median 3.5, sorted deviations 0.5 0.5 1.5 1.5 2.5 96.5
        let (m, mad) = median_abs_deviation(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]).unwrap();
        assert_eq!(m, 3.5);
        assert_eq!(mad, 1.5);
    }

    #[test]
    fn mad_empty() {
        assert_eq!(median_abs_deviation(&[]), None);
    }

    #[test]
    fn empty_rejected() {
        assert_eq!(ensure_finite(&[]), Err(OutlierError::EmptyInput));
    }

    #[test]
    fn non_finite_rejected() {
        assert_eq!(
            ensure_finite(&[1.0, f64::NAN]),
            Err(OutlierError::NonFiniteValue { index: 1 })
        );
        assert!(ensure_finite(&[1.0, f64::INFINITY]).is_err());
        assert!(ensure_finite(&[1.0, 2.0]).is_ok());
    }
}
