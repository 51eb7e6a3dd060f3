//! CSV reading and writing for [`DataFrame`]s.
//!
//! Reading infers one type per column: a column whose present cells all
//! parse as `f64` is [`Numeric`](crate::dataframe::Column::Numeric),
//! anything else is [`Text`](crate::dataframe::Column::Text).
//! Standard null markers (empty, `NA`, `N/A`, `null`, `NaN`, ...) become
//! missing values. A leading UTF-8 BOM is skipped by the `csv` reader for
//! every input source. Writing emits missing values as empty fields.
//!
//! [`read_csv`] and [`read_csv_path`] read with the default settings;
//! [`CsvParser`] configures the delimiter and null markers.
//!
//! Note that the `csv` crate skips lines that are entirely empty, so a
//! blank cell in a single-column file is dropped rather than read as
//! missing. Use an explicit marker such as `NA` there.
//!
//! # Example
//!
//! ```
//! use outlier_handler::csv_io::{write_csv, CsvParser};
//! use outlier_handler::dataframe::DataType;
//!
//! let csv = "id,Value\na,1.5\nb,NA\nc,100\n";
//! let df = CsvParser::new().parse_str(csv).unwrap();
//! assert_eq!(df.row_count(), 3);
//! assert_eq!(df.schema()[1], ("Value", DataType::Numeric));
//!
//! let mut out = Vec::new();
//! write_csv(&df, &mut out).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "id,Value\na,1.5\nb,\nc,100\n");
//! ```

use std::io;
use std::path::Path;

use crate::dataframe::{Column, DataFrame, ValidityBitmap};
use crate::error::OutlierError;

// ── Reading ───────────────────────────────────────────────────────────

/// Standard null value markers recognized during parsing.
const DEFAULT_NULL_MARKERS: &[&str] = &[
    "", "NA", "N/A", "na", "n/a", "null", "NULL", "None", "none", ".", "NaN", "nan", "NAN",
    "#N/A", "#NA",
];

/// CSV parser configuration and entry point.
#[derive(Debug, Clone)]
pub struct CsvParser {
    delimiter: u8,
    null_markers: Vec<String>,
}

impl CsvParser {
    /// Creates a parser with default settings (comma delimiter, standard null markers).
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            null_markers: DEFAULT_NULL_MARKERS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }

    /// Sets the field delimiter (default: comma).
    pub fn delimiter(mut self, delim: u8) -> Self {
        self.delimiter = delim;
        self
    }

    /// Sets custom null markers (replaces defaults).
    pub fn null_markers(mut self, markers: Vec<String>) -> Self {
        self.null_markers = markers;
        self
    }

    /// Parses CSV text into a DataFrame.
    pub fn parse_str(&self, input: &str) -> Result<DataFrame, OutlierError> {
        self.parse_reader(input.as_bytes())
    }

    /// Parses a CSV file from disk into a DataFrame.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<DataFrame, OutlierError> {
        let file = std::fs::File::open(path)?;
        self.parse_reader(io::BufReader::new(file))
    }

    /// Parses CSV from any reader. The first record is the header.
    pub fn parse_reader<R: io::Read>(&self, reader: R) -> Result<DataFrame, OutlierError> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let mut raw_columns: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        for record in rdr.records() {
            let record = record?;
            for (col_idx, field) in record.iter().enumerate() {
                raw_columns[col_idx].push(field.trim().to_string());
            }
        }

        let mut df = DataFrame::new();
        for (name, raw) in headers.into_iter().zip(raw_columns) {
            df.add_column(name, self.build_column(raw))?;
        }
        Ok(df)
    }

    fn is_null(&self, field: &str) -> bool {
        self.null_markers.iter().any(|m| m == field)
    }

    /// Numeric if every present cell parses as `f64`, otherwise text.
    fn build_column(&self, raw: Vec<String>) -> Column {
        let mut validity = ValidityBitmap::empty();
        let mut numbers = Vec::with_capacity(raw.len());
        let mut numeric = true;
        for field in &raw {
            if self.is_null(field) {
                validity.push(false);
                numbers.push(0.0);
                continue;
            }
            validity.push(true);
            match field.parse::<f64>() {
                Ok(v) => numbers.push(v),
                Err(_) => {
                    numeric = false;
                    break;
                }
            }
        }
        if numeric {
            return Column::numeric(numbers, validity);
        }

        let mut validity = ValidityBitmap::empty();
        let values = raw
            .into_iter()
            .map(|field| {
                let present = !self.is_null(&field);
                validity.push(present);
                if present {
                    field
                } else {
                    String::new()
                }
            })
            .collect();
        Column::text(values, validity)
    }
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads CSV with a header row from `reader` using the default settings.
pub fn read_csv<R: io::Read>(reader: R) -> Result<DataFrame, OutlierError> {
    CsvParser::new().parse_reader(reader)
}

/// Reads the CSV file at `path` using the default settings.
pub fn read_csv_path(path: impl AsRef<Path>) -> Result<DataFrame, OutlierError> {
    CsvParser::new().parse_file(path)
}

// ── Writing ───────────────────────────────────────────────────────────

/// Writes `df` as CSV with a header row. Missing values become empty fields.
pub fn write_csv<W: io::Write>(df: &DataFrame, writer: W) -> Result<(), OutlierError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(df.column_names())?;
    for row in 0..df.row_count() {
        let record = df.iter().map(|(_, col)| match col {
            Column::Numeric { values, validity } if validity.is_valid(row) => {
                values[row].to_string()
            }
            Column::Text { values, validity } if validity.is_valid(row) => values[row].clone(),
            _ => String::new(),
        });
        wtr.write_record(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes `df` as CSV to the file at `path`.
pub fn write_csv_file(df: &DataFrame, path: impl AsRef<Path>) -> Result<(), OutlierError> {
    let file = std::fs::File::create(path)?;
    write_csv(df, io::BufWriter::new(file))
}

// ── Tests ─────────────────────────────────────────────────────────────
