//! Remediation of flagged rows: drop them, or overwrite the flagged values
//! with the column mean or median.
//!
//! The replacement statistic is computed once over every present value of
//! the original column, outliers included, before any substitution.
//!
//! # Example
//!
//! ```
//! use outlier_handler::dataframe::{Column, DataFrame};
//! use outlier_handler::mask::OutlierMask;
//! use outlier_handler::remediation::{remediate, RemediationPolicy};
//!
//! let df = DataFrame::from_columns([
//!     ("Value", Column::from_values(vec![1.0, 2.0, 3.0, 4.0, 5.0, 100.0])),
//! ])
//! .unwrap();
//! let mask = OutlierMask::new(vec![false, false, false, false, false, true]);
//!
//! let filled = remediate(&df, "Value", &mask, RemediationPolicy::FillMedian).unwrap();
//! let col = filled.column_by_name("Value").unwrap();
//! assert_eq!(col.as_numeric().unwrap(), &[1.0, 2.0, 3.0, 4.0, 5.0, 3.5]);
//!
//! let dropped = remediate(&df, "Value", &mask, RemediationPolicy::Drop).unwrap();
//! assert_eq!(dropped.row_count(), 5);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::dataframe::{Column, DataFrame};
use crate::error::OutlierError;
use crate::mask::OutlierMask;
use crate::stats;

// ── Policy ────────────────────────────────────────────────────────────

/// What to do with flagged rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemediationPolicy {
    /// Remove flagged rows, keeping the order of the rest.
    Drop,
    /// Replace flagged values with the column mean.
    FillMean,
    /// Replace flagged values with the column median.
    FillMedian,
}

impl RemediationPolicy {
    /// Builds a policy from an action (`"drop"` or `"fill"`) and, for
    /// `"fill"`, an imputation statistic (`"mean"` or `"median"`).
    ///
    /// ```
    /// use outlier_handler::remediation::RemediationPolicy;
    ///
    /// assert_eq!(
    ///     RemediationPolicy::from_action("fill", "mean").unwrap(),
    ///     RemediationPolicy::FillMean
    /// );
    /// assert!(RemediationPolicy::from_action("fill", "specific_value").is_err());
    /// ```
    pub fn from_action(action: &str, impute: &str) -> Result<Self, OutlierError> {
        match action.trim().to_ascii_lowercase().as_str() {
            "drop" => Ok(Self::Drop),
            "fill" => match impute.trim().to_ascii_lowercase().as_str() {
                "mean" => Ok(Self::FillMean),
                "median" => Ok(Self::FillMedian),
                _ => Err(OutlierError::InvalidImputation {
                    name: impute.to_string(),
                }),
            },
            _ => Err(OutlierError::InvalidPolicy {
                name: action.to_string(),
            }),
        }
    }

    /// Canonical name, as accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            Self::Drop => "drop",
            Self::FillMean => "fill-mean",
            Self::FillMedian => "fill-median",
        }
    }
}

impl fmt::Display for RemediationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RemediationPolicy {
    type Err = OutlierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "drop" => Ok(Self::Drop),
            "fill-mean" | "mean" => Ok(Self::FillMean),
            "fill-median" | "median" => Ok(Self::FillMedian),
            _ => Err(OutlierError::InvalidPolicy {
                name: s.to_string(),
            }),
        }
    }
}

// ── Remediation ───────────────────────────────────────────────────────

/// Applies `policy` to the rows flagged in `mask`, returning a new frame.
///
/// `mask[i]` refers to row `i` of `df`. Other columns are carried along
/// untouched (and filtered together with the target column under
/// [`RemediationPolicy::Drop`]).
///
/// # Errors
///
/// - [`OutlierError::ColumnNotFound`] / [`OutlierError::NonNumericColumn`]
/// - [`OutlierError::DimensionMismatch`] if `mask.len() != df.row_count()`
/// - [`OutlierError::EmptyInput`] when filling a column with no present values
/// - [`OutlierError::NonFiniteValue`] when filling a column holding NaN or ±∞
pub fn remediate(
    df: &DataFrame,
    column_name: &str,
    mask: &OutlierMask,
    policy: RemediationPolicy,
) -> Result<DataFrame, OutlierError> {
    let column = df.numeric_column(column_name)?;
    if mask.len() != df.row_count() {
        return Err(OutlierError::DimensionMismatch {
            expected: df.row_count(),
            actual: mask.len(),
        });
    }

    match policy {
        RemediationPolicy::Drop => {
            let result = df.filter_rows(&mask.inliers())?;
            log::debug!(
                "dropped {} of {} rows from '{column_name}'",
                df.row_count() - result.row_count(),
                df.row_count()
            );
            Ok(result)
        }
        RemediationPolicy::FillMean | RemediationPolicy::FillMedian => {
            let present = column.valid_numeric_values().unwrap_or_default();
            stats::ensure_finite(&present)?;
            let statistic = match policy {
                RemediationPolicy::FillMean => u_numflow::stats::mean(&present),
                _ => u_numflow::stats::median(&present),
            }
            .ok_or(OutlierError::EmptyInput)?;

            let (values, validity) = match column {
                Column::Numeric { values, validity } => (values, validity),
                Column::Text { .. } => {
                    return Err(OutlierError::NonNumericColumn {
                        column: column_name.to_string(),
                    })
                }
            };
            let mut values = values.clone();
            let mut validity = validity.clone();
            for i in mask.indices() {
                values[i] = statistic;
                validity.set_valid(i);
            }

            log::debug!(
                "replaced {} values of '{column_name}' with {policy} statistic {statistic}",
                mask.count()
            );
            df.with_column(column_name, Column::numeric(values, validity))
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────
