//! Outlier masks, fences and the detection result every detector returns.

/// Boolean outlier flags, one per value of the column they were computed
/// from. `true` marks an outlier.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutlierMask(Vec<bool>);

impl OutlierMask {
    /// Wraps a vector of flags.
    pub fn new(flags: Vec<bool>) -> Self {
        Self(flags)
    }

    /// A mask with no value flagged.
    pub fn none(len: usize) -> Self {
        Self(vec![false; len])
    }

    /// Number of flags (equals the column length).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the mask has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of flagged values.
    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&f| f).count()
    }

    /// Returns `true` if the value at `idx` is flagged.
    pub fn is_outlier(&self, idx: usize) -> bool {
        self.0[idx]
    }

    /// Indices of flagged values, ascending.
    pub fn indices(&self) -> Vec<usize> {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(i, &f)| f.then_some(i))
            .collect()
    }

    /// The flags as a slice.
    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    /// Iterator over the flags.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter().copied()
    }

    /// Complement of the mask: `true` where the value is kept.
    pub fn inliers(&self) -> Vec<bool> {
        self.0.iter().map(|&f| !f).collect()
    }
}

impl From<Vec<bool>> for OutlierMask {
    fn from(flags: Vec<bool>) -> Self {
        Self(flags)
    }
}

impl FromIterator<bool> for OutlierMask {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Lower and upper thresholds of a statistical detector.
///
/// Values outside `[lower, upper]` are outliers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fences {
    pub lower: f64,
    pub upper: f64,
}

impl Fences {
    /// Returns `true` if `v` falls outside the fences.
    #[inline]
    pub fn excludes(&self, v: f64) -> bool {
        v < self.lower || v > self.upper
    }

    /// Flags every value outside the fences.
    pub fn mask(&self, values: &[f64]) -> OutlierMask {
        values.iter().map(|&v| self.excludes(v)).collect()
    }
}

/// Output of [`Detector::detect`](crate::detector::Detector::detect).
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Outlier flags aligned with the input values.
    pub mask: OutlierMask,
    /// Fences, for detectors that classify by threshold.
    pub fences: Option<Fences>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_counts_and_indices() {
        let mask = OutlierMask::new(vec![false, true, false, true]);
        assert_eq!(mask.len(), 4);
        assert_eq!(mask.count(), 2);
        assert_eq!(mask.indices(), vec![1, 3]);
        assert_eq!(mask.inliers(), vec![true, false, true, false]);
        assert!(mask.is_outlier(1));
    }

    #[test]
    fn fences_are_inclusive() {
        let fences = Fences {
            lower: 1.0,
            upper: 2.0,
        };
        assert!(!fences.excludes(1.0));
        assert!(!fences.excludes(2.0));
        assert!(fences.excludes(0.999));
        assert!(fences.excludes(2.001));
        assert_eq!(fences.mask(&[0.0, 1.5, 3.0]).indices(), vec![0, 2]);
    }

    #[test]
    fn degenerate_fences_flag_everything_else() {
        let fences = Fences {
            lower: 5.0,
            upper: 5.0,
        };
        assert_eq!(fences.mask(&[5.0, 5.0, 5.1]).indices(), vec![2]);
    }
}
