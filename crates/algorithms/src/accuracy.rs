//! Accuracy assessment
//!
//! Confusion matrix over held-out test samples, with overall accuracy,
//! Cohen's kappa and per-class producer's/user's accuracy.

use ndarray::Array2;
use terraclass_core::{Error, Result};

/// Square confusion matrix. Rows are actual classes, columns predicted.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfusionMatrix {
    counts: Array2<u64>,
}

impl ConfusionMatrix {
    /// Build from (actual, predicted) label pairs.
    ///
    /// Any label `>= n_classes` is rejected rather than silently clipped.
    pub fn from_pairs(pairs: &[(u8, u8)], n_classes: u8) -> Result<Self> {
        let n = n_classes as usize;
        if n == 0 {
            return Err(Error::InvalidParameter {
                name: "n_classes",
                value: "0".into(),
                reason: "a confusion matrix needs at least one class".into(),
            });
        }
        let mut counts = Array2::zeros((n, n));
        for &(actual, predicted) in pairs {
            if actual >= n_classes || predicted >= n_classes {
                return Err(Error::InvalidParameter {
                    name: "label",
                    value: format!("({}, {})", actual, predicted),
                    reason: format!("class id must be < {}", n_classes),
                });
            }
            counts[(actual as usize, predicted as usize)] += 1;
        }
        Ok(Self { counts })
    }

    pub fn n_classes(&self) -> usize {
        self.counts.nrows()
    }

    /// Count of samples with actual class `actual` predicted as `predicted`.
    pub fn count(&self, actual: u8, predicted: u8) -> u64 {
        self.counts[(actual as usize, predicted as usize)]
    }

    pub fn total(&self) -> u64 {
        self.counts.sum()
    }

    fn trace(&self) -> u64 {
        (0..self.n_classes()).map(|i| self.counts[(i, i)]).sum()
    }

    fn row_sum(&self, class: usize) -> u64 {
        self.counts.row(class).sum()
    }

    fn col_sum(&self, class: usize) -> u64 {
        self.counts.column(class).sum()
    }

    /// Overall accuracy in [0, 1]: correctly classified share of all test
    /// samples. An empty matrix scores 0.
    pub fn accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.trace() as f64 / total as f64
    }

    /// Cohen's kappa: agreement beyond chance, in [-1, 1].
    ///
    /// Returns `None` when chance agreement is exactly 1 and the statistic
    /// is undefined, e.g. a single-class test set.
    pub fn kappa(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let total = total as f64;
        let observed = self.trace() as f64 / total;
        let expected: f64 = (0..self.n_classes())
            .map(|i| (self.row_sum(i) as f64 / total) * (self.col_sum(i) as f64 / total))
            .sum();

        let denom = 1.0 - expected;
        if denom.abs() < f64::EPSILON {
            return None;
        }
        Some((observed - expected) / denom)
    }

    /// Producer's accuracy per class: of all samples actually in the class,
    /// the share predicted as it. `None` for classes absent from the test
    /// set.
    pub fn producers_accuracy(&self) -> Vec<Option<f64>> {
        (0..self.n_classes())
            .map(|i| {
                let row = self.row_sum(i);
                (row > 0).then(|| self.counts[(i, i)] as f64 / row as f64)
            })
            .collect()
    }

    /// User's accuracy per class: of all samples predicted as the class,
    /// the share actually in it. `None` for classes never predicted.
    pub fn users_accuracy(&self) -> Vec<Option<f64>> {
        (0..self.n_classes())
            .map(|i| {
                let col = self.col_sum(i);
                (col > 0).then(|| self.counts[(i, i)] as f64 / col as f64)
            })
            .collect()
    }
}
