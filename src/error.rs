//! Error types for outlier-handler.

use thiserror::Error;

/// All errors produced by outlier-handler operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OutlierError {
    /// Remediation policy name was not recognized.
    #[error("unsupported remediation policy '{name}', expected one of: drop, fill-mean, fill-median")]
    InvalidPolicy { name: String },
    /// Imputation statistic was not recognized.
    #[error("unsupported imputation '{name}', choose 'median' or 'mean' for fill imputation")]
    InvalidImputation { name: String },
    /// Detector name was not recognized.
    #[error("unknown detector '{name}', expected one of: iqr, zscore, mad, dbscan, lof")]
    UnknownDetector { name: String },
    /// A detector parameter is outside its valid range.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter { name: String, message: String },
    /// No values to operate on.
    #[error("cannot detect outliers in an empty column")]
    EmptyInput,
    /// NaN or infinite value handed to a detector.
    #[error("non-finite value at position {index}")]
    NonFiniteValue { index: usize },
    /// Finite input whose spread overflows `f64` in an intermediate result.
    #[error("numeric overflow while computing {quantity}; values span too wide a range")]
    NumericOverflow { quantity: &'static str },
    /// Column not found in DataFrame.
    #[error("column '{name}' not found")]
    ColumnNotFound { name: String },
    /// Column is not numeric where numeric data is required.
    #[error("column '{column}' is not numeric")]
    NonNumericColumn { column: String },
    /// Dimension mismatch.
    #[error("expected {expected} elements, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    /// CSV parsing failed.
    #[error("CSV parse error at line {line}: {message}")]
    CsvParse { line: usize, message: String },
    /// I/O error during file reading or writing.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for OutlierError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<csv::Error> for OutlierError {
    fn from(e: csv::Error) -> Self {
        let line = e.position().map_or(0, |p| p.line() as usize);
        match e.kind() {
            csv::ErrorKind::Io(_) => Self::Io(e.to_string()),
            _ => Self::CsvParse {
                line,
                message: e.to_string(),
            },
        }
    }
}

impl OutlierError {
    pub(crate) fn invalid_parameter(name: &str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.to_string(),
            message: message.into(),
        }
    }
}
