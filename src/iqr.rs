//! Interquartile-range (Tukey fence) outlier detection.
//!
//! # Algorithm
//!
//! 1. Q1 and Q3 by linear interpolation between closest ranks
//! 2. IQR = Q3 - Q1
//! 3. Fences: `Q1 - k * IQR` and `Q3 + k * IQR` (k = 1.5 by default)
//! 4. A value strictly outside the fences is an outlier
//!
//! When IQR = 0 both fences collapse onto Q1 = Q3 and every value that
//! differs from it is flagged. A constant column therefore flags nothing.
//!
//! # Example
//!
//! ```
//! use outlier_handler::iqr::{iqr, IqrConfig};
//!
//! let result = iqr(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0], &IqrConfig::default()).unwrap();
//! assert_eq!(result.q1, 2.25);
//! assert_eq!(result.q3, 4.75);
//! assert_eq!(result.fences.upper, 8.5);
//! assert_eq!(result.mask.indices(), vec![5]);
//! ```

use u_numflow::stats::quantile_sorted;

use crate::error::OutlierError;
use crate::mask::{Fences, OutlierMask};
use crate::stats;

// ── Configuration ─────────────────────────────────────────────────────

/// Configuration for IQR outlier detection.
#[derive(Debug, Clone, PartialEq)]
pub struct IqrConfig {
    /// Fence multiplier k. Default: 1.5.
    pub multiplier: f64,
}

impl Default for IqrConfig {
    fn default() -> Self {
        Self { multiplier: 1.5 }
    }
}

impl IqrConfig {
    /// Sets the fence multiplier.
    pub fn multiplier(mut self, k: f64) -> Self {
        self.multiplier = k;
        self
    }
}

// ── Result ────────────────────────────────────────────────────────────

/// Result of IQR outlier detection.
#[derive(Debug, Clone, PartialEq)]
pub struct IqrResult {
    /// First quartile (25th percentile).
    pub q1: f64,
    /// Third quartile (75th percentile).
    pub q3: f64,
    /// Q3 - Q1.
    pub iqr: f64,
    /// Tukey fences.
    pub fences: Fences,
    /// Outlier flags.
    pub mask: OutlierMask,
}

/// Detects outliers with Tukey fences.
///
/// # Errors
///
/// - [`OutlierError::EmptyInput`] if `values` is empty
/// - [`OutlierError::NonFiniteValue`] if `values` contains NaN or ±∞
/// - [`OutlierError::InvalidParameter`] if the multiplier is negative or not finite
pub fn iqr(values: &[f64], config: &IqrConfig) -> Result<IqrResult, OutlierError> {
    stats::ensure_finite(values)?;
    let k = config.multiplier;
    if !k.is_finite() || k < 0.0 {
        return Err(OutlierError::invalid_parameter(
            "multiplier",
            format!("must be a non-negative finite number, got {k}"),
        ));
    }

    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);
    let q1 = quantile_sorted(&sorted, 0.25).ok_or(OutlierError::EmptyInput)?;
    let q3 = quantile_sorted(&sorted, 0.75).ok_or(OutlierError::EmptyInput)?;
    let iqr = q3 - q1;

    let fences = Fences {
        lower: q1 - k * iqr,
        upper: q3 + k * iqr,
    };
    let mask = fences.mask(values);

    log::debug!(
        "iqr: q1={q1} q3={q3} iqr={iqr}, {} of {} values outside fences",
        mask.count(),
        values.len()
    );

    Ok(IqrResult {
        q1,
        q3,
        iqr,
        fences,
        mask,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_single_high_outlier() {
        let result = iqr(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0], &IqrConfig::default()).unwrap();
        assert!((result.iqr - 2.5).abs() < 1e-12);
        assert!((result.fences.lower - (-1.5)).abs() < 1e-12);
        assert!((result.fences.upper - 8.5).abs() < 1e-12);
        assert_eq!(result.mask.indices(), vec![5]);
    }

    #[test]
    fn flags_low_outlier() {
        let data = [-50.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0];
        let result = iqr(&data, &IqrConfig::default()).unwrap();
        assert_eq!(result.mask.indices(), vec![0]);
    }

    #[test]
    fn constant_column_flags_nothing() {
        let result = iqr(&[5.0; 10], &IqrConfig::default()).unwrap();
        assert_eq!(result.iqr, 0.0);
        assert_eq!(result.fences.lower, 5.0);
        assert_eq!(result.fences.upper, 5.0);
        assert_eq!(result.mask.count(), 0);
    }

    #[test]
    fn zero_iqr_flags_any_other_value() {
        // Quartiles both land on 5.0, so the lone 6.0 is outside.
        let data = [5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 6.0];
        let result = iqr(&data, &IqrConfig::default()).unwrap();
        assert_eq!(result.iqr, 0.0);
        assert_eq!(result.mask.indices(), vec![7]);
    }

    #[test]
    fn larger_multiplier_widens_fences() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0, 12.0];
        let narrow = iqr(&data, &IqrConfig::default()).unwrap();
        let wide = iqr(&data, &IqrConfig::default().multiplier(3.0)).unwrap();
        assert_eq!(narrow.mask.count(), 1);
        assert_eq!(wide.mask.count(), 0);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let data = [3.1, 2.7, 9.9, 3.3, 2.9, 3.0, -4.0, 3.2];
        let a = iqr(&data, &IqrConfig::default()).unwrap();
        let b = iqr(&data, &IqrConfig::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn error_empty() {
        assert_eq!(iqr(&[], &IqrConfig::default()), Err(OutlierError::EmptyInput));
    }

    #[test]
    fn error_nan() {
        assert!(iqr(&[1.0, f64::NAN], &IqrConfig::default()).is_err());
    }

    #[test]
    fn error_negative_multiplier() {
        let result = iqr(&[1.0, 2.0], &IqrConfig::default().multiplier(-1.0));
        assert!(matches!(result, Err(OutlierError::InvalidParameter { .. })));
    }
}
