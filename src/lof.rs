//! Local Outlier Factor (LOF) for density-based outlier detection on a
//! single column.
//!
//! LOF identifies local outliers by comparing the local density of a point
//! with the local densities of its neighbors, so it finds values that are
//! isolated relative to their own neighborhood even when the column mixes
//! clusters of different spread.
//!
//! # Algorithm
//!
//! Reference: Breunig, Kriegel, Ng & Sander (2000). "LOF: Identifying
//! Density-based Local Outliers", ACM SIGMOD.
//!
//! 1. k nearest neighbors of each point by `|p - o|`; equal distances are
//!    ranked by lower original index, so exactly k neighbors are kept
//! 2. Reachability distance: reach-dist_k(p, o) = max(k-distance(o), d(p, o))
//! 3. Local reachability density: LRD_k(p) = k / Σ reach-dist_k(p, o)
//! 4. LOF_k(p) = mean over neighbors o of LRD(o) / LRD(p)
//!
//! A zero reachability sum (all k neighbors coincide with p) gives an
//! infinite LRD and a LOF of exactly 1.0.
//!
//! The mask takes the `⌊contamination · n⌋` points with the highest LOF,
//! breaking score ties by lower index, and flags those among them that are
//! strictly more anomalous than the least anomalous point of the column.
//! Points with an infinite LRD are never flagged. A column where every
//! score is equal (constant values, evenly spaced values) therefore flags
//! nothing, and the flagged count can fall short of the quota.
//!
//! Values whose span overflows `f64` fail with
//! [`OutlierError::NumericOverflow`] instead of producing NaN scores.
//!
//! # Example
//!
//! ```
//! use outlier_handler::lof::{lof, LofConfig};
//!
//! // Dense cluster + one far outlier
//! let mut data: Vec<f64> = (0..30).map(|i| i as f64 * 0.1).collect();
//! data.push(100.0);
//!
//! let config = LofConfig::default().n_neighbors(5).contamination(0.05);
//! let result = lof(&data, &config).unwrap();
//! assert_eq!(result.mask.indices(), vec![30]);
//! assert!(result.scores[30] > 1.5);
//! ```

use crate::error::OutlierError;
use crate::mask::OutlierMask;
use crate::stats;

// ── Configuration ─────────────────────────────────────────────────────

/// Configuration for Local Outlier Factor.
#[derive(Debug, Clone, PartialEq)]
pub struct LofConfig {
    /// Number of nearest neighbors (k). Default: 20.
    /// Clamped to `n - 1` for short columns.
    pub n_neighbors: usize,
    /// Fraction of points flagged as outliers, in `[0, 0.5]`. Default: 0.1.
    pub contamination: f64,
}

impl Default for LofConfig {
    fn default() -> Self {
        Self {
            n_neighbors: 20,
            contamination: 0.1,
        }
    }
}

impl LofConfig {
    /// Sets the number of neighbors.
    pub fn n_neighbors(mut self, k: usize) -> Self {
        self.n_neighbors = k;
        self
    }

    /// Sets the contamination fraction.
    pub fn contamination(mut self, c: f64) -> Self {
        self.contamination = c;
        self
    }
}

// ── Result ────────────────────────────────────────────────────────────

/// Result of LOF outlier detection.
#[derive(Debug, Clone, PartialEq)]
pub struct LofResult {
    /// LOF score for each point. Higher = more anomalous.
    pub scores: Vec<f64>,
    /// Local reachability density of each point (may be `f64::INFINITY`).
    pub lrd: Vec<f64>,
    /// Number of neighbors actually used.
    pub k: usize,
    /// Flags for at most `⌊contamination · n⌋` of the highest scores.
    pub mask: OutlierMask,
}

// ── LOF algorithm ─────────────────────────────────────────────────────

/// Runs Local Outlier Factor over the values.
///
/// # Errors
///
/// - [`OutlierError::EmptyInput`] if `values` is empty
/// - [`OutlierError::NonFiniteValue`] if `values` contains NaN or ±∞
/// - [`OutlierError::InvalidParameter`] if `n_neighbors == 0` or
///   `contamination` is outside `[0, 0.5]`
/// - [`OutlierError::NumericOverflow`] if distances or reachability sums
///   overflow `f64`
pub fn lof(values: &[f64], config: &LofConfig) -> Result<LofResult, OutlierError> {
    stats::ensure_finite(values)?;
    if config.n_neighbors == 0 {
        return Err(OutlierError::invalid_parameter(
            "n_neighbors",
            "must be at least 1",
        ));
    }
    let contamination = config.contamination;
    if !(0.0..=0.5).contains(&contamination) {
        return Err(OutlierError::invalid_parameter(
            "contamination",
            format!("must be in [0, 0.5], got {contamination}"),
        ));
    }

    let n = values.len();
    if n == 1 {
        return Ok(LofResult {
            scores: vec![1.0],
            lrd: vec![f64::INFINITY],
            k: 0,
            mask: OutlierMask::none(1),
        });
    }

    let (lo, hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if !(hi - lo).is_finite() {
        return Err(OutlierError::NumericOverflow {
            quantity: "pairwise distances",
        });
    }

    let k = config.n_neighbors.min(n - 1);

    // Step 1: k nearest neighbors and k-distance of every point
    let k_neighbors = nearest_neighbors(values, k);
    let k_distances: Vec<f64> = k_neighbors
        .iter()
        .enumerate()
        .map(|(i, nb)| (values[nb[k - 1]] - values[i]).abs())
        .collect();

    // Step 2 & 3: Local Reachability Density
    let lrd = k_neighbors
        .iter()
        .enumerate()
        .map(|(i, nb)| {
            let sum_reach_dist: f64 = nb
                .iter()
                .map(|&j| k_distances[j].max((values[i] - values[j]).abs()))
                .sum();
            if !sum_reach_dist.is_finite() {
                Err(OutlierError::NumericOverflow {
                    quantity: "reachability distances",
                })
            } else if sum_reach_dist > 0.0 {
                Ok(k as f64 / sum_reach_dist)
            } else {
                Ok(f64::INFINITY)
            }
        })
        .collect::<Result<Vec<f64>, _>>()?;

    // Step 4: LOF scores
    let scores: Vec<f64> = k_neighbors
        .iter()
        .enumerate()
        .map(|(i, nb)| {
            if lrd[i].is_infinite() {
                return 1.0;
            }
            nb.iter().map(|&j| lrd[j] / lrd[i]).sum::<f64>() / k as f64
        })
        .collect();

    // Candidates are the top ⌊contamination · n⌋ scores. The small offset
    // keeps products such as 0.29 * 100 from rounding down one step too far.
    let quota = ((contamination * n as f64) + 1e-9).floor() as usize;
    let min_score = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]).then(a.cmp(&b)));
    let mut flags = vec![false; n];
    for &i in order.iter().take(quota) {
        flags[i] = lrd[i].is_finite() && scores[i] > min_score;
    }
    let mask = OutlierMask::new(flags);

    log::debug!(
        "lof: k={k}, flagged {} of {n} (quota {quota}, contamination {contamination})",
        mask.count()
    );

    Ok(LofResult {
        scores,
        lrd,
        k,
        mask,
    })
}

/// The `k` nearest other points of each point, ordered by (distance, index).
#[cfg(not(feature = "parallel"))]
fn nearest_neighbors(values: &[f64], k: usize) -> Vec<Vec<usize>> {
    (0..values.len())
        .map(|i| neighbors_of(values, i, k))
        .collect()
}

#[cfg(feature = "parallel")]
fn nearest_neighbors(values: &[f64], k: usize) -> Vec<Vec<usize>> {
    use rayon::prelude::*;

    (0..values.len())
        .into_par_iter()
        .map(|i| neighbors_of(values, i, k))
        .collect()
}

fn neighbors_of(values: &[f64], i: usize, k: usize) -> Vec<usize> {
    let p = values[i];
    let mut dists: Vec<(usize, f64)> = (0..values.len())
        .filter(|&j| j != i)
        .map(|j| (j, (values[j] - p).abs()))
        .collect();
    dists.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
    dists.truncate(k);
    dists.into_iter().map(|(j, _)| j).collect()
}

// ── Tests ─────────────────────────────────────────────────────────────
