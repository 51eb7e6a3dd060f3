//! The five detection strategies behind one enum.
//!
//! A [`Detector`] carries the configuration of one algorithm and dispatches
//! [`detect`](Detector::detect) to it. Every variant returns a
//! [`Detection`]: a mask aligned with the input values, plus fences for the
//! threshold-based variants (IQR, Z-score, MAD).
//!
//! ```
//! use outlier_handler::detector::Detector;
//!
//! let detector: Detector = "iqr".parse().unwrap();
//! let detection = detector.detect(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]).unwrap();
//! assert_eq!(detection.mask.indices(), vec![5]);
//! assert_eq!(detection.fences.unwrap().upper, 8.5);
//! ```

use std::fmt;
use std::str::FromStr;

use crate::dbscan::{dbscan, DbscanConfig};
use crate::error::OutlierError;
use crate::iqr::{iqr, IqrConfig};
use crate::lof::{lof, LofConfig};
use crate::mad::{mad, MadConfig};
use crate::mask::Detection;
use crate::zscore::{zscore, ZScoreConfig};

// ── Detector ──────────────────────────────────────────────────────────

/// Outlier detection strategy and its parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Detector {
    /// Tukey fences around the interquartile range.
    Iqr(IqrConfig),
    /// Absolute z-score threshold.
    ZScore(ZScoreConfig),
    /// Median ± multiple of the median absolute deviation.
    Mad(MadConfig),
    /// Noise points of a density-reachability clustering.
    Dbscan(DbscanConfig),
    /// Highest Local Outlier Factor scores.
    Lof(LofConfig),
}

impl Detector {
    /// Short lowercase name, as accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            Self::Iqr(_) => "iqr",
            Self::ZScore(_) => "zscore",
            Self::Mad(_) => "mad",
            Self::Dbscan(_) => "dbscan",
            Self::Lof(_) => "lof",
        }
    }

    /// Runs the detector over `values`.
    ///
    /// # Errors
    ///
    /// Propagates the errors of the underlying algorithm: empty input,
    /// non-finite values, or parameters out of range.
    pub fn detect(&self, values: &[f64]) -> Result<Detection, OutlierError> {
        let detection = match self {
            Self::Iqr(config) => {
                let r = iqr(values, config)?;
                Detection {
                    mask: r.mask,
                    fences: Some(r.fences),
                }
            }
            Self::ZScore(config) => {
                let r = zscore(values, config)?;
                Detection {
                    mask: r.mask,
                    fences: Some(r.fences),
                }
            }
            Self::Mad(config) => {
                let r = mad(values, config)?;
                Detection {
                    mask: r.mask,
                    fences: Some(r.fences),
                }
            }
            Self::Dbscan(config) => Detection {
                mask: dbscan(values, config)?.mask,
                fences: None,
            },
            Self::Lof(config) => Detection {
                mask: lof(values, config)?.mask,
                fences: None,
            },
        };
        Ok(detection)
    }
}

// ── Names ─────────────────────────────────────────────────────────────

impl Default for Detector {
    fn default() -> Self {
        Self::Iqr(IqrConfig::default())
    }
}

impl fmt::Display for Detector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses a detector name into that detector with default parameters.
///
/// Names are case-insensitive; `z-score` and `z_score` are accepted for
/// `zscore`.
impl FromStr for Detector {
    type Err = OutlierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "iqr" => Ok(Self::Iqr(IqrConfig::default())),
            "zscore" | "z-score" | "z_score" => Ok(Self::ZScore(ZScoreConfig::default())),
            "mad" => Ok(Self::Mad(MadConfig::default())),
            "dbscan" => Ok(Self::Dbscan(DbscanConfig::default())),
            "lof" => Ok(Self::Lof(LofConfig::default())),
            _ => Err(OutlierError::UnknownDetector {
                name: s.to_string(),
            }),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_names() {
        for name in ["iqr", "zscore", "mad", "dbscan", "lof"] {
            let detector: Detector = name.parse().unwrap();
            assert_eq!(detector.name(), name);
            assert_eq!(detector.to_string(), name);
        }
        assert_eq!(
            "Z-Score".parse::<Detector>().unwrap(),
            Detector::ZScore(ZScoreConfig::default())
        );
    }

    #[test]
    fn parse_unknown() {
        assert_eq!(
            "isolation-forest".parse::<Detector>(),
            Err(OutlierError::UnknownDetector {
                name: "isolation-forest".into()
            })
        );
    }

    #[test]
    fn statistical_detectors_report_fences() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        for detector in [
            Detector::Iqr(IqrConfig::default()),
            Detector::ZScore(ZScoreConfig::default().threshold(2.0)),
            Detector::Mad(MadConfig::default()),
        ] {
            let detection = detector.detect(&data).unwrap();
            assert!(detection.fences.is_some(), "{detector} should report fences");
            assert_eq!(detection.mask.indices(), vec![5], "{detector}");
        }
    }

    #[test]
    fn neighborhood_detectors_have_no_fences() {
        let data = [1.0, 1.1, 1.2, 1.3, 1.4, 1.5, 40.0];
        let dbscan = Detector::Dbscan(DbscanConfig::new(0.5, 3)).detect(&data).unwrap();
        assert!(dbscan.fences.is_none());
        assert_eq!(dbscan.mask.indices(), vec![6]);

        let lof = Detector::Lof(LofConfig::default().n_neighbors(3).contamination(0.15))
            .detect(&data)
            .unwrap();
        assert!(lof.fences.is_none());
        assert_eq!(lof.mask.indices(), vec![6]);
    }

    #[test]
    fn every_detector_rejects_empty_input() {
        for name in ["iqr", "zscore", "mad", "dbscan", "lof"] {
            let detector: Detector = name.parse().unwrap();
            assert_eq!(detector.detect(&[]), Err(OutlierError::EmptyInput));
        }
    }

    #[test]
    fn constant_column_flags_nothing() {
        let data = [5.0; 10];
        for name in ["iqr", "zscore", "mad", "dbscan", "lof"] {
            let detector: Detector = name.parse().unwrap();
            let detection = detector.detect(&data).unwrap();
            assert_eq!(detection.mask.as_slice(), &[false; 10], "{name}");
        }
    }
}
