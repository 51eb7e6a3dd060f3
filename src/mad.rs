//! Median-absolute-deviation outlier detection.
//!
//! Fences are placed at `median ± threshold * MAD` where
//! `MAD = median(|x_i - median(x)|)`. The raw MAD is used, without the
//! 1.4826 normal-consistency factor.
//!
//! When MAD = 0 (more than half the values equal the median) both fences
//! collapse onto the median and every other value is flagged, the same
//! boundary behavior as [`iqr`](crate::iqr).
//!
//! # Example
//!
//! ```
//! use outlier_handler::mad::{mad, MadConfig};
//!
//! let data = [1.0, 2.0, 2.5, 3.0, 2.0, 3.0, 2.5, 50.0];
//! let result = mad(&data, &MadConfig::default()).unwrap();
//! assert_eq!(result.median, 2.5);
//! assert_eq!(result.mask.indices(), vec![7]);
//! ```

use crate::error::OutlierError;
use crate::mask::{Fences, OutlierMask};
use crate::stats;

// ── Configuration ─────────────────────────────────────────────────────

/// Configuration for MAD outlier detection.
#[derive(Debug, Clone, PartialEq)]
pub struct MadConfig {
    /// Number of MADs from the median at which fences are placed. Default: 3.5.
    pub threshold: f64,
}

impl Default for MadConfig {
    fn default() -> Self {
        Self { threshold: 3.5 }
    }
}

impl MadConfig {
    /// Sets the MAD multiplier.
    pub fn threshold(mut self, t: f64) -> Self {
        self.threshold = t;
        self
    }
}

// ── Result ────────────────────────────────────────────────────────────

/// Result of MAD outlier detection.
#[derive(Debug, Clone, PartialEq)]
pub struct MadResult {
    /// Column median.
    pub median: f64,
    /// Median absolute deviation from the median.
    pub mad: f64,
    /// `median ± threshold * mad`.
    pub fences: Fences,
    /// Outlier flags.
    pub mask: OutlierMask,
}

/// Detects outliers with median/MAD fences.
///
/// # Errors
///
/// - [`OutlierError::EmptyInput`] if `values` is empty
/// - [`OutlierError::NonFiniteValue`] if `values` contains NaN or ±∞
/// - [`OutlierError::InvalidParameter`] if the threshold is negative or not finite
pub fn mad(values: &[f64], config: &MadConfig) -> Result<MadResult, OutlierError> {
    stats::ensure_finite(values)?;
    let t = config.threshold;
    if !t.is_finite() || t < 0.0 {
        return Err(OutlierError::invalid_parameter(
            "threshold",
            format!("must be a non-negative finite number, got {t}"),
        ));
    }

    let (median, mad) = stats::median_abs_deviation(values).ok_or(OutlierError::EmptyInput)?;
    let fences = Fences {
        lower: median - t * mad,
        upper: median + t * mad,
    };
    let mask = fences.mask(values);

    log::debug!(
        "mad: median={median} mad={mad}, {} of {} values outside fences",
        mask.count(),
        values.len()
    );

    Ok(MadResult {
        median,
        mad,
        fences,
        mask,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────
