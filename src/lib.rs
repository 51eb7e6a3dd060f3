//! # outlier-handler
//!
//! Univariate outlier detection and remediation for tabular data.
//!
//! One numeric column of a [`DataFrame`](dataframe::DataFrame) is scanned
//! by one of five detectors, and the flagged rows are then dropped or
//! their values replaced by the column mean or median. Every operation
//! returns a new frame; the input is never modified.
//!
//! ## Modules
//!
//! - [`dataframe`] — Column-major tabular data model with missing values
//! - [`csv_io`] — CSV reading (type inference, null markers) and writing
//! - [`stats`] — Median absolute deviation and input validation
//! - [`mask`] — Outlier masks, fences, detection results
//! - [`iqr`] — Tukey fences around the interquartile range
//! - [`zscore`] — Absolute z-score threshold
//! - [`mad`] — Median ± multiple of the median absolute deviation
//! - [`dbscan`] — Noise points of density-reachability clustering
//! - [`lof`] — Local Outlier Factor with a contamination quota
//! - [`detector`] — The five strategies behind one enum
//! - [`remediation`] — Drop / fill-mean / fill-median policies
//! - [`handler`] — Detection and remediation in one call
//! - [`error`] — Error types
//!
//! ## Quick Start
//!
//! ```
//! use outlier_handler::csv_io::CsvParser;
//! use outlier_handler::handler::handle_outliers;
//!
//! let csv = "Value\n1\n2\n3\n4\n5\n100\n";
//! let df = CsvParser::new().parse_str(csv).unwrap();
//!
//! let detector = "iqr".parse().unwrap();
//! let policy = "fill-median".parse().unwrap();
//! let cleaned = handle_outliers(&df, "Value", &detector, policy).unwrap();
//!
//! let values = cleaned.column_by_name("Value").unwrap().as_numeric().unwrap();
//! assert_eq!(values, &[1.0, 2.0, 3.0, 4.0, 5.0, 3.5]);
//! ```
//!
//! ## Features
//!
//! - `parallel` — compute the pairwise neighbor searches of [`dbscan`] and
//!   [`lof`] on the rayon thread pool. Output is identical to the
//!   sequential build.

pub mod csv_io;
pub mod dataframe;
pub mod dbscan;
pub mod detector;
pub mod error;
pub mod handler;
pub mod iqr;
pub mod lof;
pub mod mad;
pub mod mask;
pub mod remediation;
pub mod stats;
pub mod zscore;

pub use dataframe::{Column, DataFrame};
pub use detector::Detector;
pub use error::OutlierError;
pub use handler::{detect_outliers, handle_outliers};
pub use mask::{Detection, Fences, OutlierMask};
pub use remediation::{remediate, RemediationPolicy};
