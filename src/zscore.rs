//! Z-score outlier detection.
//!
//! Standardizes each value with the population mean μ and the
//! **population** standard deviation σ (ddof = 0) and flags values with
//! `|z| > threshold`.
//!
//! A column with σ = 0 has no defined z-scores; every value equals μ, so
//! the mask is all `false` instead of carrying NaN comparisons through.
//!
//! # Example
//!
//! ```
//! use outlier_handler::zscore::{zscore, ZScoreConfig};
//!
//! let mut data: Vec<f64> = (0..50).map(|i| i as f64).collect();
//! data.push(500.0);
//! let result = zscore(&data, &ZScoreConfig::default()).unwrap();
//! assert_eq!(result.mask.indices(), vec![50]);
//! ```

use crate::error::OutlierError;
use crate::mask::{Fences, OutlierMask};
use crate::stats;

// ── Configuration ─────────────────────────────────────────────────────

/// Configuration for Z-score outlier detection.
#[derive(Debug, Clone, PartialEq)]
pub struct ZScoreConfig {
    /// Absolute z-score above which a value is an outlier. Default: 3.0.
    pub threshold: f64,
}

impl Default for ZScoreConfig {
    fn default() -> Self {
        Self { threshold: 3.0 }
    }
}

impl ZScoreConfig {
    /// Sets the z-score threshold.
    pub fn threshold(mut self, t: f64) -> Self {
        self.threshold = t;
        self
    }
}

// ── Result ────────────────────────────────────────────────────────────

/// Result of Z-score outlier detection.
#[derive(Debug, Clone, PartialEq)]
pub struct ZScoreResult {
    /// Population mean.
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    /// z-score of each value; all `0.0` when σ = 0.
    pub scores: Vec<f64>,
    /// `mean ± threshold * std_dev`.
    pub fences: Fences,
    /// Outlier flags.
    pub mask: OutlierMask,
}

/// Detects outliers by absolute z-score.
///
/// # Errors
///
/// - [`OutlierError::EmptyInput`] if `values` is empty
/// - [`OutlierError::NonFiniteValue`] if `values` contains NaN or ±∞
/// - [`OutlierError::InvalidParameter`] if the threshold is negative or not finite
/// - [`OutlierError::NumericOverflow`] if the mean or σ overflow `f64`
pub fn zscore(values: &[f64], config: &ZScoreConfig) -> Result<ZScoreResult, OutlierError> {
    stats::ensure_finite(values)?;
    let threshold = config.threshold;
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(OutlierError::invalid_parameter(
            "threshold",
            format!("must be a non-negative finite number, got {threshold}"),
        ));
    }

    let n = values.len();
    let mean = u_numflow::stats::mean(values).ok_or(OutlierError::EmptyInput)?;
    let std_dev =
        u_numflow::stats::population_std_dev(values).ok_or(OutlierError::EmptyInput)?;
    if !mean.is_finite() || !std_dev.is_finite() {
        return Err(OutlierError::NumericOverflow {
            quantity: "mean and standard deviation",
        });
    }
    let fences = Fences {
        lower: mean - threshold * std_dev,
        upper: mean + threshold * std_dev,
    };

    // Identical values can leave a rounding residue in σ; treat as zero.
    let constant = values.iter().all(|&v| v == values[0]);
    if std_dev == 0.0 || constant {
        log::debug!("zscore: zero variance over {n} values, nothing flagged");
        return Ok(ZScoreResult {
            mean,
            std_dev,
            scores: vec![0.0; n],
            fences,
            mask: OutlierMask::none(n),
        });
    }

    let scores: Vec<f64> = values.iter().map(|&v| (v - mean) / std_dev).collect();
    let mask: OutlierMask = scores.iter().map(|z| z.abs() > threshold).collect();

    log::debug!(
        "zscore: mean={mean} std={std_dev}, {} of {n} values with |z| > {threshold}",
        mask.count()
    );

    Ok(ZScoreResult {
        mean,
        std_dev,
        scores,
        fences,
        mask,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_variance_gives_all_false() {
        let result = zscore(&[7.0, 7.0, 7.0, 7.0], &ZScoreConfig::default()).unwrap();
        assert_eq!(result.mask.as_slice(), &[false, false, false, false]);
        assert!(result.scores.iter().all(|z| *z == 0.0));
        assert_eq!(result.std_dev, 0.0);
    }

    #[test]
    fn repeated_decimal_is_still_constant() {
        let result = zscore(&[0.1; 10], &ZScoreConfig::default().threshold(0.0)).unwrap();
        assert_eq!(result.mask.count(), 0);
    }

    #[test]
    fn uses_population_std_dev() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let result = zscore(&data, &ZScoreConfig::default()).unwrap();
        assert!((result.std_dev - 2.0).abs() < 1e-12);
        assert!((result.scores[7] - 2.0).abs() < 1e-12);
        assert!((result.fences.upper - 11.0).abs() < 1e-12);
    }

    #[test]
    fn threshold_controls_flags() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        // z of 9.0 is exactly 2.0, z of 2.0 is -1.5
        let strict = zscore(&data, &ZScoreConfig::default().threshold(1.4)).unwrap();
        assert_eq!(strict.mask.indices(), vec![0, 7]);
        let loose = zscore(&data, &ZScoreConfig::default().threshold(2.1)).unwrap();
        assert_eq!(loose.mask.count(), 0);
    }

    #[test]
    fn uniform_data_has_no_outliers() {
        let data: Vec<f64> = (1..=10).map(|i| i as f64).collect();
        let result = zscore(&data, &ZScoreConfig::default()).unwrap();
        assert_eq!(result.mask.count(), 0);
    }

    #[test]
    fn error_empty() {
        assert_eq!(
            zscore(&[], &ZScoreConfig::default()),
            Err(OutlierError::EmptyInput)
        );
    }

    #[test]
    fn error_infinite() {
        assert_eq!(
            zscore(&[1.0, f64::INFINITY], &ZScoreConfig::default()),
            Err(OutlierError::NonFiniteValue { index: 1 })
        );
    }

    #[test]
    fn error_spread_overflows() {
        assert!(matches!(
            zscore(&[-1e308, 1e308], &ZScoreConfig::default()),
            Err(OutlierError::NumericOverflow { .. })
        ));
    }

    #[test]
    fn error_nan_threshold() {
        assert!(zscore(&[1.0, 2.0], &ZScoreConfig::default().threshold(f64::NAN)).is_err());
    }
}
