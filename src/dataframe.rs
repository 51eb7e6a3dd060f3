//! Column-major DataFrame for tabular data.
//!
//! The [`DataFrame`] stores data in column-major order with typed columns
//! and a compact validity bitmap for tracking missing values. Every
//! operation that changes rows or values returns a new frame; the
//! caller's frame is never modified.
//!
//! # Column Types
//!
//! | Type | Storage | Use case |
//! |------|---------|----------|
//! | [`Numeric`](Column::Numeric) | `Vec<f64>` + bitmap | Values inspected for outliers |
//! | [`Text`](Column::Text) | `Vec<String>` + bitmap | Labels carried along with rows |
//!
//! # Example
//!
//! ```
//! use outlier_handler::dataframe::{Column, DataFrame};
//!
//! let mut df = DataFrame::new();
//! df.add_column("temperature", Column::from_values(vec![20.5, 21.3, 19.8]))
//!     .unwrap();
//! assert_eq!(df.row_count(), 3);
//! assert_eq!(df.column_count(), 1);
//!
//! let kept = df.filter_rows(&[true, false, true]).unwrap();
//! assert_eq!(kept.row_count(), 2);
//! assert_eq!(df.row_count(), 3); // original untouched
//! ```

use crate::error::OutlierError;

// ── ValidityBitmap ────────────────────────────────────────────────────

/// Bit-packed validity bitmap using `Vec<u64>`.
///
/// Each bit indicates whether the corresponding row is valid (1) or
/// missing (0).
#[derive(Debug, Clone, PartialEq)]
pub struct ValidityBitmap {
    bits: Vec<u64>,
    len: usize,
}

impl ValidityBitmap {
    /// Creates a bitmap where all `len` positions are valid.
    pub fn all_valid(len: usize) -> Self {
        let n_words = len.div_ceil(64);
        let mut bits = vec![u64::MAX; n_words];
        let trailing = len % 64;
        if trailing != 0 && n_words > 0 {
            bits[n_words - 1] = (1u64 << trailing) - 1;
        }
        Self { bits, len }
    }

    /// Creates an empty bitmap with no rows.
    pub fn empty() -> Self {
        Self {
            bits: Vec::new(),
            len: 0,
        }
    }

    /// Returns `true` if the value at `idx` is valid (not missing).
    #[inline]
    pub fn is_valid(&self, idx: usize) -> bool {
        debug_assert!(idx < self.len, "index {idx} out of bounds (len={})", self.len);
        let (word, bit) = (idx / 64, idx % 64);
        (self.bits[word] >> bit) & 1 == 1
    }

    /// Marks position `idx` as valid.
    #[inline]
    pub fn set_valid(&mut self, idx: usize) {
        debug_assert!(idx < self.len, "index {idx} out of bounds (len={})", self.len);
        let (word, bit) = (idx / 64, idx % 64);
        self.bits[word] |= 1u64 << bit;
    }

    /// Marks position `idx` as missing.
    #[inline]
    pub fn set_invalid(&mut self, idx: usize) {
        debug_assert!(idx < self.len, "index {idx} out of bounds (len={})", self.len);
        let (word, bit) = (idx / 64, idx % 64);
        self.bits[word] &= !(1u64 << bit);
    }

    /// Appends a new position (valid or missing).
    pub fn push(&mut self, valid: bool) {
        let idx = self.len;
        self.len += 1;
        let word = idx / 64;
        let bit = idx % 64;
        if word >= self.bits.len() {
            self.bits.push(0);
        }
        if valid {
            self.bits[word] |= 1u64 << bit;
        }
    }

    /// Returns the total number of tracked positions.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the bitmap tracks zero positions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Counts the number of missing positions.
    pub fn null_count(&self) -> usize {
        self.len - self.valid_count()
    }

    /// Counts the number of valid positions.
    pub fn valid_count(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns an iterator over indices of valid positions.
    pub fn valid_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(move |&i| self.is_valid(i))
    }
}

// ── DataType ──────────────────────────────────────────────────────────

/// Data type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// Real values (stored as `f64`).
    Numeric,
    /// Free-form text.
    Text,
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Numeric => write!(f, "Numeric"),
            Self::Text => write!(f, "Text"),
        }
    }
}

// ── Column ────────────────────────────────────────────────────────────

/// A typed column with validity bitmap for missing values.
///
/// Missing positions hold a placeholder (`0.0` or an empty string) that
/// must be ignored.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Dense `f64` values. Missing positions hold `0.0`.
    Numeric {
        values: Vec<f64>,
        validity: ValidityBitmap,
    },
    /// Free-form text column. Missing positions hold an empty string.
    Text {
        values: Vec<String>,
        validity: ValidityBitmap,
    },
}

impl Column {
    /// Creates a numeric column.
    pub fn numeric(values: Vec<f64>, validity: ValidityBitmap) -> Self {
        Self::Numeric { values, validity }
    }

    /// Creates a text column.
    pub fn text(values: Vec<String>, validity: ValidityBitmap) -> Self {
        Self::Text { values, validity }
    }

    /// Creates a numeric column with every value present.
    pub fn from_values(values: Vec<f64>) -> Self {
        let validity = ValidityBitmap::all_valid(values.len());
        Self::Numeric { values, validity }
    }

    /// Creates a numeric column where `None` marks a missing value.
    pub fn from_options(values: Vec<Option<f64>>) -> Self {
        let mut validity = ValidityBitmap::empty();
        let values = values
            .into_iter()
            .map(|v| {
                validity.push(v.is_some());
                v.unwrap_or(0.0)
            })
            .collect();
        Self::Numeric { values, validity }
    }

    /// Returns the data type of this column.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Numeric { .. } => DataType::Numeric,
            Self::Text { .. } => DataType::Text,
        }
    }

    /// Returns the number of rows in this column.
    pub fn len(&self) -> usize {
        self.validity().len()
    }

    /// Returns `true` if the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a reference to the validity bitmap.
    pub fn validity(&self) -> &ValidityBitmap {
        match self {
            Self::Numeric { validity, .. } | Self::Text { validity, .. } => validity,
        }
    }

    /// Returns the number of missing values.
    pub fn null_count(&self) -> usize {
        self.validity().null_count()
    }

    /// Returns `true` if the value at `idx` is present.
    pub fn is_valid(&self, idx: usize) -> bool {
        self.validity().is_valid(idx)
    }

    /// Returns the raw numeric values, or `None` if not a numeric column.
    pub fn as_numeric(&self) -> Option<&[f64]> {
        match self {
            Self::Numeric { values, .. } => Some(values),
            Self::Text { .. } => None,
        }
    }

    /// Returns the numeric value at `idx`, or `None` if missing or not numeric.
    pub fn numeric_at(&self, idx: usize) -> Option<f64> {
        match self {
            Self::Numeric { values, validity } if validity.is_valid(idx) => Some(values[idx]),
            _ => None,
        }
    }

    /// Returns the text value at `idx`, or `None` if missing or not text.
    pub fn text_at(&self, idx: usize) -> Option<&str> {
        match self {
            Self::Text { values, validity } if validity.is_valid(idx) => Some(&values[idx]),
            _ => None,
        }
    }

    /// Returns present numeric values (missing excluded) as a new `Vec<f64>`.
    pub fn valid_numeric_values(&self) -> Option<Vec<f64>> {
        match self {
            Self::Numeric { values, validity } => {
                Some(validity.valid_indices().map(|i| values[i]).collect())
            }
            Self::Text { .. } => None,
        }
    }

    /// Returns a new column holding the rows at `indices`, in that order.
    pub fn take(&self, indices: &[usize]) -> Self {
        let mut validity = ValidityBitmap::empty();
        match self {
            Self::Numeric {
                values,
                validity: src,
            } => {
                let values = indices
                    .iter()
                    .map(|&i| {
                        validity.push(src.is_valid(i));
                        values[i]
                    })
                    .collect();
                Self::Numeric { values, validity }
            }
            Self::Text {
                values,
                validity: src,
            } => {
                let values = indices
                    .iter()
                    .map(|&i| {
                        validity.push(src.is_valid(i));
                        values[i].clone()
                    })
                    .collect();
                Self::Text { values, validity }
            }
        }
    }
}

// ── DataFrame ─────────────────────────────────────────────────────────

/// Column-major tabular data structure.
///
/// Stores named columns of typed data. All columns must have the same
/// number of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct DataFrame {
    names: Vec<String>,
    columns: Vec<Column>,
    row_count: usize,
}

impl DataFrame {
    /// Creates an empty DataFrame with no columns or rows.
    pub fn new() -> Self {
        Self {
            names: Vec::new(),
            columns: Vec::new(),
            row_count: 0,
        }
    }

    /// Builds a DataFrame from `(name, column)` pairs.
    pub fn from_columns<S: Into<String>>(
        columns: impl IntoIterator<Item = (S, Column)>,
    ) -> Result<Self, OutlierError> {
        let mut df = Self::new();
        for (name, column) in columns {
            df.add_column(name, column)?;
        }
        Ok(df)
    }

    /// Adds a named column to the DataFrame.
    ///
    /// Returns an error if the column length doesn't match the existing
    /// row count (unless this is the first column).
    pub fn add_column(
        &mut self,
        name: impl Into<String>,
        column: Column,
    ) -> Result<(), OutlierError> {
        let col_len = column.len();
        if self.columns.is_empty() {
            self.row_count = col_len;
        } else if col_len != self.row_count {
            return Err(OutlierError::DimensionMismatch {
                expected: self.row_count,
                actual: col_len,
            });
        }
        self.names.push(name.into());
        self.columns.push(column);
        Ok(())
    }

    /// Returns the number of rows.
    #[inline]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Returns the number of columns.
    #[inline]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if the DataFrame has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns column names.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Returns a reference to the column with the given `name`.
    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.column_index(name).map(|i| &self.columns[i])
    }

    /// Returns the index of the column with the given `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Looks up a numeric column, failing if absent or not numeric.
    pub fn numeric_column(&self, name: &str) -> Result<&Column, OutlierError> {
        let column = self
            .column_by_name(name)
            .ok_or_else(|| OutlierError::ColumnNotFound {
                name: name.to_string(),
            })?;
        match column.data_type() {
            DataType::Numeric => Ok(column),
            DataType::Text => Err(OutlierError::NonNumericColumn {
                column: name.to_string(),
            }),
        }
    }

    /// Returns an iterator over (name, column) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names.iter().map(|s| s.as_str()).zip(self.columns.iter())
    }

    /// Returns a summary of column data types.
    pub fn schema(&self) -> Vec<(&str, DataType)> {
        self.iter().map(|(name, col)| (name, col.data_type())).collect()
    }

    /// Returns a new DataFrame keeping only rows where `keep[i]` is `true`.
    ///
    /// Relative row order is preserved. Keeping no rows yields a frame
    /// with the same columns and zero rows.
    pub fn filter_rows(&self, keep: &[bool]) -> Result<Self, OutlierError> {
        if keep.len() != self.row_count {
            return Err(OutlierError::DimensionMismatch {
                expected: self.row_count,
                actual: keep.len(),
            });
        }
        let indices: Vec<usize> = keep
            .iter()
            .enumerate()
            .filter_map(|(i, &k)| k.then_some(i))
            .collect();
        Ok(Self {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.take(&indices)).collect(),
            row_count: indices.len(),
        })
    }

    /// Returns a new DataFrame with the column `name` replaced by `column`.
    pub fn with_column(&self, name: &str, column: Column) -> Result<Self, OutlierError> {
        let index = self
            .column_index(name)
            .ok_or_else(|| OutlierError::ColumnNotFound {
                name: name.to_string(),
            })?;
        if column.len() != self.row_count {
            return Err(OutlierError::DimensionMismatch {
                expected: self.row_count,
                actual: column.len(),
            });
        }
        let mut df = self.clone();
        df.columns[index] = column;
        Ok(df)
    }
}

impl Default for DataFrame {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> DataFrame {
        DataFrame::from_columns([
            ("x", Column::from_options(vec![Some(1.0), None, Some(3.0), Some(4.0)])),
            (
                "label",
                Column::text(
                    vec!["a".into(), "b".into(), "c".into(), "d".into()],
                    ValidityBitmap::all_valid(4),
                ),
            ),
        ])
        .unwrap()
    }

    // ── ValidityBitmap tests ──────────────────────────────────────

    #[test]
    fn bitmap_set_operations() {
        let mut bm = ValidityBitmap::all_valid(10);
        bm.set_invalid(3);
        bm.set_invalid(7);
        assert_eq!(bm.null_count(), 2);
        assert!(!bm.is_valid(3));
        assert!(bm.is_valid(9));

        bm.set_valid(3);
        assert!(bm.is_valid(3));
        assert_eq!(bm.null_count(), 1);
    }

    #[test]
    fn bitmap_boundary_64() {
        let bm65 = ValidityBitmap::all_valid(65);
        assert_eq!(bm65.bits.len(), 2);
        assert_eq!(bm65.null_count(), 0);
        assert!(bm65.is_valid(64));
    }

    #[test]
    fn bitmap_push_across_word_boundary() {
        let mut bm = ValidityBitmap::empty();
        for i in 0..128 {
            bm.push(i % 3 != 0); // every 3rd is missing
        }
        assert_eq!(bm.len(), 128);
        let expected_nulls = (0..128).filter(|i| i % 3 == 0).count();
        assert_eq!(bm.null_count(), expected_nulls);
    }

    #[test]
    fn bitmap_valid_indices() {
        let mut bm = ValidityBitmap::all_valid(5);
        bm.set_invalid(1);
        bm.set_invalid(3);
        let indices: Vec<usize> = bm.valid_indices().collect();
        assert_eq!(indices, vec![0, 2, 4]);
    }

    // ── Column tests ─────────────────────────────────────────────

    #[test]
    fn column_from_options() {
        let col = Column::from_options(vec![Some(1.0), None, Some(3.0)]);
        assert_eq!(col.data_type(), DataType::Numeric);
        assert_eq!(col.null_count(), 1);
        assert_eq!(col.numeric_at(1), None);
        assert_eq!(col.numeric_at(2), Some(3.0));
        assert_eq!(col.valid_numeric_values(), Some(vec![1.0, 3.0]));
    }

    #[test]
    fn column_take_keeps_validity() {
        let col = Column::from_options(vec![Some(1.0), None, Some(3.0)]);
        let taken = col.take(&[2, 1]);
        assert_eq!(taken.len(), 2);
        assert_eq!(taken.numeric_at(0), Some(3.0));
        assert!(!taken.is_valid(1));
    }

    #[test]
    fn text_column_has_no_numeric_values() {
        let col = Column::text(vec!["hello".into()], ValidityBitmap::all_valid(1));
        assert_eq!(col.text_at(0), Some("hello"));
        assert!(col.as_numeric().is_none());
        assert!(col.valid_numeric_values().is_none());
    }

    // ── DataFrame tests ──────────────────────────────────────────

    #[test]
    fn column_length_mismatch() {
        let mut df = DataFrame::new();
        df.add_column("x", Column::from_values(vec![1.0, 2.0])).unwrap();
        let result = df.add_column("y", Column::from_values(vec![1.0, 2.0, 3.0]));
        assert_eq!(
            result,
            Err(OutlierError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn numeric_column_lookup_errors() {
        let df = sample_frame();
        assert!(df.numeric_column("x").is_ok());
        assert!(matches!(
            df.numeric_column("label"),
            Err(OutlierError::NonNumericColumn { .. })
        ));
        assert!(matches!(
            df.numeric_column("missing"),
            Err(OutlierError::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn filter_rows_preserves_order_and_columns() {
        let df = sample_frame();
        let kept = df.filter_rows(&[false, true, true, false]).unwrap();
        assert_eq!(kept.row_count(), 2);
        assert_eq!(kept.column_names(), df.column_names());
        let x = kept.column_by_name("x").unwrap();
        assert_eq!(x.numeric_at(0), None);
        assert_eq!(x.numeric_at(1), Some(3.0));
        let label = kept.column_by_name("label").unwrap();
        assert_eq!(label.text_at(0), Some("b"));
        assert_eq!(label.text_at(1), Some("c"));
    }

    #[test]
    fn filter_rows_to_empty() {
        let df = sample_frame();
        let kept = df.filter_rows(&[false; 4]).unwrap();
        assert_eq!(kept.row_count(), 0);
        assert_eq!(kept.column_count(), 2);
    }

    #[test]
    fn filter_rows_wrong_length() {
        let df = sample_frame();
        assert!(df.filter_rows(&[true]).is_err());
    }

    #[test]
    fn with_column_copies() {
        let df = sample_frame();
        let replaced = df
            .with_column("x", Column::from_values(vec![9.0, 9.0, 9.0, 9.0]))
            .unwrap();
        assert_eq!(replaced.column_by_name("x").unwrap().numeric_at(1), Some(9.0));
        assert_eq!(df.column_by_name("x").unwrap().numeric_at(1), None);
        assert_eq!(
            replaced.schema(),
            vec![("x", DataType::Numeric), ("label", DataType::Text)]
        );
    }
}
