//! Detection and remediation of one DataFrame column in a single call.
//!
//! [`handle_outliers`] extracts the column, runs the detector over its
//! present values, aligns the mask back onto the frame's rows (missing
//! values are never flagged) and applies the remediation policy.
//!
//! The fence detectors (IQR and MAD) report their fences through `log` at
//! `info` level, together with the number of values still outside the
//! fences after remediation. Z-score fences are not reported: its mask
//! comes from `|z| > t`, which a constant column skips entirely. The
//! report never changes the returned frame.
//!
//! # Example
//!
//! ```
//! use outlier_handler::dataframe::{Column, DataFrame};
//! use outlier_handler::detector::Detector;
//! use outlier_handler::handler::handle_outliers;
//! use outlier_handler::remediation::RemediationPolicy;
//!
//! let df = DataFrame::from_columns([
//!     ("Value", Column::from_values(vec![1.0, 2.0, 3.0, 4.0, 5.0, 100.0])),
//! ])
//! .unwrap();
//!
//! let out = handle_outliers(&df, "Value", &Detector::default(), RemediationPolicy::Drop).unwrap();
//! let values = out.column_by_name("Value").unwrap().as_numeric().unwrap();
//! assert_eq!(values, &[1.0, 2.0, 3.0, 4.0, 5.0]);
//! ```

use crate::dataframe::{Column, DataFrame};
use crate::detector::Detector;
use crate::error::OutlierError;
use crate::mask::{Detection, Fences, OutlierMask};
use crate::remediation::{remediate, RemediationPolicy};

/// Runs `detector` over the column `column_name` of `df`.
///
/// The returned mask has one entry per row of `df`; rows whose value is
/// missing are never flagged.
///
/// # Errors
///
/// - [`OutlierError::ColumnNotFound`] / [`OutlierError::NonNumericColumn`]
/// - [`OutlierError::EmptyInput`] if the column has no present values
/// - any error of the detector itself
pub fn detect_outliers(
    df: &DataFrame,
    column_name: &str,
    detector: &Detector,
) -> Result<Detection, OutlierError> {
    let column = df.numeric_column(column_name)?;
    let (rows, values) = present_values(column);
    if values.is_empty() {
        return Err(OutlierError::EmptyInput);
    }

    let detection = detector.detect(&values)?;

    let mut flags = vec![false; df.row_count()];
    for (&row, flagged) in rows.iter().zip(detection.mask.iter()) {
        flags[row] = flagged;
    }
    let mask = OutlierMask::new(flags);

    log::debug!(
        "{detector} flagged {} of {} values in '{column_name}'",
        mask.count(),
        values.len()
    );

    Ok(Detection {
        mask,
        fences: detection.fences,
    })
}

/// Detects outliers in `column_name` and remediates them with `policy`.
///
/// Returns a new frame; `df` is not modified.
///
/// # Errors
///
/// Everything [`detect_outliers`] and [`remediate`] can return.
pub fn handle_outliers(
    df: &DataFrame,
    column_name: &str,
    detector: &Detector,
    policy: RemediationPolicy,
) -> Result<DataFrame, OutlierError> {
    let detection = detect_outliers(df, column_name, detector)?;
    let reported = reported_fences(detector, &detection);
    if let Some(fences) = reported {
        log::info!("Lower fence: {}", fences.lower);
        log::info!("Upper fence: {}", fences.upper);
    }

    let result = remediate(df, column_name, &detection.mask, policy)?;

    if let Some(fences) = reported {
        let remaining = outside_fences(&result, column_name, fences)?;
        log::info!("Total number of outliers left: {remaining}");
    }
    Ok(result)
}

/// Fences worth reporting: those of detectors whose mask is exactly
/// "outside the fences".
fn reported_fences<'a>(detector: &Detector, detection: &'a Detection) -> Option<&'a Fences> {
    match detector {
        Detector::Iqr(_) | Detector::Mad(_) => detection.fences.as_ref(),
        _ => None,
    }
}

/// Counts present values of `column_name` outside `fences`.
fn outside_fences(
    df: &DataFrame,
    column_name: &str,
    fences: &Fences,
) -> Result<usize, OutlierError> {
    let (_, values) = present_values(df.numeric_column(column_name)?);
    Ok(values.iter().filter(|&&v| fences.excludes(v)).count())
}

/// Row indices and values of the present entries of a numeric column.
fn present_values(column: &Column) -> (Vec<usize>, Vec<f64>) {
    let rows: Vec<usize> = column.validity().valid_indices().collect();
    let values = match column.as_numeric() {
        Some(all) => rows.iter().map(|&i| all[i]).collect(),
        None => Vec::new(),
    };
    (rows, values)
}

// ── Tests ─────────────────────────────────────────────────────────────
