//! Density-reachability (DBSCAN) outlier detection on a single column.
//!
//! Each value is a point on the real line. Points belonging to no
//! density-connected cluster are noise, and noise points are the outliers.
//!
//! # Algorithm
//!
//! Ester, Kriegel, Sander, Xu (1996). "A Density-Based Algorithm for
//! Discovering Clusters in Large Spatial Databases with Noise."
//!
//! 1. Neighborhood of p: all points q with `|p - q| <= eps`, p included
//! 2. Core point: neighborhood size `>= min_samples`
//! 3. Clusters: core points connected through chains of core neighbors,
//!    plus every non-core point within `eps` of one of those core points
//! 4. Noise: everything else
//!
//! Whether a point is noise depends only on the core flags, so the mask is
//! independent of processing order. Only the cluster ids assigned to
//! border points shared by two clusters depend on order; ids are assigned
//! in ascending order of each cluster's lowest-index core point.
//!
//! With fewer than `min_samples` points in total no point can be core and
//! every point is noise.
//!
//! # Example
//!
//! ```
//! use outlier_handler::dbscan::{dbscan, DbscanConfig};
//!
//! let data = [0.0, 0.1, 0.2, 0.3, 10.0, 10.1, 10.2, 50.0];
//! let result = dbscan(&data, &DbscanConfig::new(0.5, 3)).unwrap();
//! assert_eq!(result.n_clusters, 2);
//! assert_eq!(result.mask.indices(), vec![7]);
//! ```

use std::collections::VecDeque;

use crate::error::OutlierError;
use crate::mask::OutlierMask;
use crate::stats;

// ── Configuration ─────────────────────────────────────────────────────

/// Configuration for DBSCAN outlier detection.
///
/// `eps` is in the units of the data; no rescaling is done.
#[derive(Debug, Clone, PartialEq)]
pub struct DbscanConfig {
    /// Maximum distance between two neighbors. Default: 0.5.
    pub eps: f64,
    /// Minimum neighborhood size (point itself included) of a core point.
    /// Default: 5.
    pub min_samples: usize,
}

impl Default for DbscanConfig {
    fn default() -> Self {
        Self {
            eps: 0.5,
            min_samples: 5,
        }
    }
}

impl DbscanConfig {
    /// Creates a DBSCAN config with the given eps and min_samples.
    ///
    /// Validation is done in [`dbscan`].
    pub fn new(eps: f64, min_samples: usize) -> Self {
        Self { eps, min_samples }
    }

    /// Sets the neighborhood radius.
    pub fn eps(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }

    /// Sets the minimum neighborhood size.
    pub fn min_samples(mut self, min_samples: usize) -> Self {
        self.min_samples = min_samples;
        self
    }
}

// ── Result ────────────────────────────────────────────────────────────

/// Result of DBSCAN outlier detection.
#[derive(Debug, Clone, PartialEq)]
pub struct DbscanResult {
    /// Cluster id per point. `None` = noise.
    pub labels: Vec<Option<usize>>,
    /// Whether each point is a core point.
    pub core_points: Vec<bool>,
    /// Number of clusters discovered.
    pub n_clusters: usize,
    /// Noise flags (the outliers).
    pub mask: OutlierMask,
}

/// Runs DBSCAN over the values and flags noise points as outliers.
///
/// Complexity: O(n²) with brute-force neighbor search.
///
/// # Errors
///
/// - [`OutlierError::EmptyInput`] if `values` is empty
/// - [`OutlierError::NonFiniteValue`] if `values` contains NaN or ±∞
/// - [`OutlierError::InvalidParameter`] if `eps <= 0` or `min_samples == 0`
pub fn dbscan(values: &[f64], config: &DbscanConfig) -> Result<DbscanResult, OutlierError> {
    stats::ensure_finite(values)?;
    if !config.eps.is_finite() || config.eps <= 0.0 {
        return Err(OutlierError::invalid_parameter(
            "eps",
            format!("must be a positive finite number, got {}", config.eps),
        ));
    }
    if config.min_samples == 0 {
        return Err(OutlierError::invalid_parameter(
            "min_samples",
            "must be at least 1",
        ));
    }

    let n = values.len();
    let neighbors = neighborhoods(values, config.eps);
    let core_points: Vec<bool> = neighbors
        .iter()
        .map(|nb| nb.len() >= config.min_samples)
        .collect();

    // Expand clusters from core points in index order (BFS).
    let mut labels: Vec<Option<usize>> = vec![None; n];
    let mut cluster_id = 0;

    for i in 0..n {
        if !core_points[i] || labels[i].is_some() {
            continue;
        }

        labels[i] = Some(cluster_id);
        let mut queue: VecDeque<usize> = VecDeque::from([i]);

        while let Some(p) = queue.pop_front() {
            // Only core points extend the cluster.
            if !core_points[p] {
                continue;
            }
            for &q in &neighbors[p] {
                if labels[q].is_none() {
                    labels[q] = Some(cluster_id);
                    queue.push_back(q);
                }
            }
        }

        cluster_id += 1;
    }

    let mask: OutlierMask = labels.iter().map(Option::is_none).collect();

    log::debug!(
        "dbscan: eps={} min_samples={}, {cluster_id} clusters, {} noise points of {n}",
        config.eps,
        config.min_samples,
        mask.count()
    );

    Ok(DbscanResult {
        labels,
        core_points,
        n_clusters: cluster_id,
        mask,
    })
}

/// Indices within `eps` of each point (the point itself included), ascending.
#[cfg(not(feature = "parallel"))]
fn neighborhoods(values: &[f64], eps: f64) -> Vec<Vec<usize>> {
    (0..values.len())
        .map(|i| neighbors_of(values, i, eps))
        .collect()
}

#[cfg(feature = "parallel")]
fn neighborhoods(values: &[f64], eps: f64) -> Vec<Vec<usize>> {
    use rayon::prelude::*;

    (0..values.len())
        .into_par_iter()
        .map(|i| neighbors_of(values, i, eps))
        .collect()
}

#[inline]
fn neighbors_of(values: &[f64], i: usize, eps: f64) -> Vec<usize> {
    let p = values[i];
    (0..values.len())
        .filter(|&j| (values[j] - p).abs() <= eps)
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_clusters_with_noise() {
        let data = [0.0, 0.5, 0.2, 0.4, 10.0, 10.5, 10.2, 10.4, 50.0];
        let result = dbscan(&data, &DbscanConfig::new(1.5, 2)).unwrap();

        assert_eq!(result.n_clusters, 2);
        assert_eq!(result.mask.indices(), vec![8]);
        assert_eq!(result.labels[0], result.labels[3]);
        assert_eq!(result.labels[4], result.labels[7]);
        assert_ne!(result.labels[0], result.labels[4]);
    }

    #[test]
    fn all_noise() {
        let result = dbscan(&[0.0, 100.0, 200.0], &DbscanConfig::new(1.0, 2)).unwrap();
        assert_eq!(result.n_clusters, 0);
        assert_eq!(result.mask.count(), 3);
    }

    #[test]
    fn fewer_points_than_min_samples_is_all_noise() {
        let result = dbscan(&[1.0, 1.0, 1.0], &DbscanConfig::default()).unwrap();
        assert_eq!(result.mask.count(), 3);
    }

    #[test]
    fn min_samples_one_makes_every_point_core() {
        let result = dbscan(&[0.0, 100.0], &DbscanConfig::new(0.5, 1)).unwrap();
        assert_eq!(result.n_clusters, 2);
        assert_eq!(result.mask.count(), 0);
    }

    #[test]
    fn border_points_join_cluster() {
        // With min_samples=3, only 0.5 and 1.0 are core; 0.0 and 1.5 are border.
        let data = [0.0, 0.5, 1.0, 1.5];
        let result = dbscan(&data, &DbscanConfig::new(0.6, 3)).unwrap();
        assert_eq!(result.core_points, vec![false, true, true, false]);
        assert_eq!(result.n_clusters, 1);
        assert!(result.labels.iter().all(|l| *l == Some(0)));
        assert_eq!(result.mask.count(), 0);
    }

    #[test]
    fn border_points_do_not_chain() {
        // 2.0 is within eps of border point 1.0 but of no core point.
        let data = [-1.0, -1.0, -1.0, 0.0, 1.0, 2.0];
        let result = dbscan(&data, &DbscanConfig::new(1.0, 4)).unwrap();
        assert_eq!(result.core_points, vec![true, true, true, true, false, false]);
        assert_eq!(result.labels[4], Some(0));
        assert_eq!(result.mask.indices(), vec![5]);
    }

    #[test]
    fn eps_is_inclusive() {
        let data = [0.0, 0.5, 1.0];
        let result = dbscan(&data, &DbscanConfig::new(0.5, 3)).unwrap();
        assert!(result.core_points[1]);
        assert_eq!(result.mask.count(), 0);
    }

    #[test]
    fn noise_independent_of_order() {
        let data = [3.0, 0.1, 9.0, 0.0, 3.2, 0.2, 3.1, 20.0, 0.3, 9.1];
        let forward = dbscan(&data, &DbscanConfig::new(0.25, 3)).unwrap();

        let reversed: Vec<f64> = data.iter().rev().copied().collect();
        let backward = dbscan(&reversed, &DbscanConfig::new(0.25, 3)).unwrap();
        let mut back_mask: Vec<bool> = backward.mask.iter().collect();
        back_mask.reverse();

        assert_eq!(forward.mask.as_slice(), back_mask.as_slice());
        assert_eq!(forward.mask.indices(), vec![2, 7, 9]);
    }

    #[test]
    fn chain_forms_single_cluster() {
        let data: Vec<f64> = (0..10).map(|i| i as f64 * 0.5).collect();
        let result = dbscan(&data, &DbscanConfig::new(0.6, 2)).unwrap();
        assert_eq!(result.n_clusters, 1);
        assert_eq!(result.mask.count(), 0);
    }

    #[test]
    fn error_empty() {
        assert_eq!(dbscan(&[], &DbscanConfig::default()), Err(OutlierError::EmptyInput));
    }

    #[test]
    fn error_invalid_eps() {
        assert!(dbscan(&[1.0], &DbscanConfig::new(0.0, 2)).is_err());
        assert!(dbscan(&[1.0], &DbscanConfig::new(f64::NAN, 2)).is_err());
    }

    #[test]
    fn error_zero_min_samples() {
        assert!(dbscan(&[1.0], &DbscanConfig::new(0.5, 0)).is_err());
    }
}
