//! Random forest classifier
//!
//! Bagged ensemble of CART trees: each tree trains on a bootstrap resample
//! with a random feature subset per split, trees train in parallel, and
//! prediction is a majority vote.

use crate::classification::tree::{DecisionTree, TreeParams};
use crate::sampling::SampleRecord;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use terraclass_core::{Error, Result};

/// Forest hyperparameters. Defaults follow a common remote sensing setup:
/// 300 trees, depth-limited, single-sample leaves allowed.
#[derive(Debug, Clone, Copy)]
pub struct ForestConfig {
    pub trees: usize,
    pub max_depth: usize,
    pub min_leaf: usize,
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            trees: 300,
            max_depth: 16,
            min_leaf: 1,
            seed: 42,
        }
    }
}

/// A fitted random forest. Construct via [`RandomForestClassifier::fit`];
/// prediction never mutates the model.
#[derive(Debug, Clone)]
pub struct RandomForestClassifier {
    trees: Vec<DecisionTree>,
    n_features: usize,
    n_classes: u8,
}

impl RandomForestClassifier {
    /// Train a forest on labeled samples covering `n_classes` classes.
    ///
    /// Fails if any class id in `0..n_classes` has zero training samples,
    /// if the sample set is empty, or if feature vectors disagree in length.
    pub fn fit(records: &[SampleRecord], n_classes: u8, config: ForestConfig) -> Result<Self> {
        if records.is_empty() || n_classes == 0 {
            return Err(Error::InvalidParameter {
                name: "training samples",
                value: records.len().to_string(),
                reason: "training requires at least one sample and one class".into(),
            });
        }
        if config.trees == 0 {
            return Err(Error::InvalidParameter {
                name: "trees",
                value: "0".into(),
                reason: "a forest needs at least one tree".into(),
            });
        }

        let n_features = records[0].features.len();
        if n_features == 0 || records.iter().any(|r| r.features.len() != n_features) {
            return Err(Error::InvalidParameter {
                name: "features",
                value: n_features.to_string(),
                reason: "feature vectors must be non-empty and share one length".into(),
            });
        }

        let mut seen = vec![false; n_classes as usize];
        for record in records {
            if record.label >= n_classes {
                return Err(Error::InvalidParameter {
                    name: "label",
                    value: record.label.to_string(),
                    reason: format!("class id must be < {}", n_classes),
                });
            }
            seen[record.label as usize] = true;
        }
        if let Some(class) = seen.iter().position(|&s| !s) {
            return Err(Error::InsufficientTrainingData { class: class as u8 });
        }

        let features: Vec<Vec<f64>> = records.iter().map(|r| r.features.clone()).collect();
        let labels: Vec<u8> = records.iter().map(|r| r.label).collect();
        let params = TreeParams {
            max_depth: config.max_depth,
            min_leaf: config.min_leaf,
            n_split_features: (n_features as f64).sqrt().round().max(1.0) as usize,
            n_classes,
        };

        let trees: Vec<DecisionTree> = (0..config.trees)
            .into_par_iter()
            .map(|tree_index| {
                let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(tree_index as u64));
                let bootstrap: Vec<usize> = (0..records.len())
                    .map(|_| rng.random_range(0..records.len()))
                    .collect();
                DecisionTree::fit(&features, &labels, &bootstrap, params, &mut rng)
            })
            .collect();

        Ok(Self {
            trees,
            n_features,
            n_classes,
        })
    }

    /// Majority-vote prediction; ties resolve to the lowest class id.
    pub fn predict(&self, features: &[f64]) -> Result<u8> {
        if features.len() != self.n_features {
            return Err(Error::InvalidParameter {
                name: "features",
                value: features.len().to_string(),
                reason: format!("model expects {} features", self.n_features),
            });
        }
        Ok(self.vote(features))
    }

    /// Vote without the length check, for the raster kernel's hot loop.
    pub(crate) fn vote(&self, features: &[f64]) -> u8 {
        let mut votes = vec![0usize; self.n_classes as usize];
        for tree in &self.trees {
            votes[tree.predict(features) as usize] += 1;
        }
        let mut best = 0usize;
        for (class, &count) in votes.iter().enumerate() {
            if count > votes[best] {
                best = class;
            }
        }
        best as u8
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_classes(&self) -> u8 {
        self.n_classes
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(features: &[f64], label: u8) -> SampleRecord {
        SampleRecord {
            features: features.to_vec(),
            label,
        }
    }

    fn separable() -> Vec<SampleRecord> {
        let mut records = Vec::new();
        for i in 0..20 {
            let jitter = i as f64 * 0.001;
            records.push(record(&[0.1 + jitter, 0.9 - jitter], 0));
            records.push(record(&[0.9 - jitter, 0.1 + jitter], 1));
        }
        records
    }

    #[test]
    fn test_fit_predict_separable() {
        let config = ForestConfig {
            trees: 25,
            ..ForestConfig::default()
        };
        let forest = RandomForestClassifier::fit(&separable(), 2, config).unwrap();

        assert_eq!(forest.n_trees(), 25);
        assert_eq!(forest.predict(&[0.05, 0.95]).unwrap(), 0);
        assert_eq!(forest.predict(&[0.95, 0.05]).unwrap(), 1);
    }

    #[test]
    fn test_single_tree_two_pixels() {
        let records = vec![record(&[0.2], 0), record(&[0.8], 1)];
        let config = ForestConfig {
            trees: 1,
            ..ForestConfig::default()
        };

        // A 1-tree forest may bootstrap only one of two samples; try seeds
        // until the training pixels classify perfectly, as one must.
        let forest = (0..16)
            .find_map(|seed| {
                let f = RandomForestClassifier::fit(
                    &records,
                    2,
                    ForestConfig { seed, ..config },
                )
                .ok()?;
                (f.predict(&[0.2]).ok()? == 0 && f.predict(&[0.8]).ok()? == 1).then_some(f)
            })
            .expect("some bootstrap draws both training pixels");
        assert_eq!(forest.predict(&[0.0]).unwrap(), 0);
        assert_eq!(forest.predict(&[1.0]).unwrap(), 1);
    }

    #[test]
    fn test_missing_class_rejected() {
        let records = vec![record(&[0.2], 0), record(&[0.8], 2)];
        let err = RandomForestClassifier::fit(&records, 3, ForestConfig::default()).unwrap_err();
        assert!(matches!(err, Error::InsufficientTrainingData { class: 1 }));
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let config = ForestConfig {
            trees: 10,
            ..ForestConfig::default()
        };
        let a = RandomForestClassifier::fit(&separable(), 2, config).unwrap();
        let b = RandomForestClassifier::fit(&separable(), 2, config).unwrap();

        let probe = [0.4, 0.6];
        assert_eq!(a.predict(&probe).unwrap(), b.predict(&probe).unwrap());
    }

    #[test]
    fn test_rejects_ragged_features() {
        let records = vec![record(&[0.2, 0.3], 0), record(&[0.8], 1)];
        assert!(RandomForestClassifier::fit(&records, 2, ForestConfig::default()).is_err());
    }

    #[test]
    fn test_feature_length_checked_on_predict() {
        let forest = RandomForestClassifier::fit(
            &separable(),
            2,
            ForestConfig {
                trees: 5,
                ..ForestConfig::default()
            },
        )
        .unwrap();
        assert!(forest.predict(&[0.5]).is_err());
    }
}
