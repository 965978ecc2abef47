//! Train/test splitting
//!
//! Seeded Bernoulli split of labeled samples. Each record draws one uniform
//! number; draws below the train fraction go to the training partition.
//! Not stratified by class.

use crate::sampling::SampleRecord;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use terraclass_core::{Error, Result};

/// Split `records` into (train, test) partitions.
///
/// Every record lands in exactly one partition. The split is deterministic
/// for a given seed; expected train share is `train_fraction`, not exact.
pub fn train_test_split(
    records: Vec<SampleRecord>,
    train_fraction: f64,
    seed: u64,
) -> Result<(Vec<SampleRecord>, Vec<SampleRecord>)> {
    if !(train_fraction > 0.0 && train_fraction < 1.0) {
        return Err(Error::InvalidParameter {
            name: "train_fraction",
            value: train_fraction.to_string(),
            reason: "must lie strictly between 0 and 1".into(),
        });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();
    for record in records {
        if rng.random::<f64>() < train_fraction {
            train.push(record);
        } else {
            test.push(record);
        }
    }
    Ok((train, test))
}
