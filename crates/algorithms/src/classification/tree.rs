//! CART decision tree
//!
//! Binary tree grown greedily on Gini impurity with a random feature subset
//! per node. Nodes live in a flat arena; child links are arena indices.

use rand::rngs::StdRng;

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        class: u8,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Growth limits shared by every tree in a forest.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TreeParams {
    pub max_depth: usize,
    pub min_leaf: usize,
    /// Features considered per split, typically sqrt of the feature count.
    pub n_split_features: usize,
    pub n_classes: u8,
}

#[derive(Debug, Clone)]
pub(crate) struct DecisionTree {
    nodes: Vec<Node>,
}

impl DecisionTree {
    /// Grow a tree on the given sample indices into `features`/`labels`.
    pub fn fit(
        features: &[Vec<f64>],
        labels: &[u8],
        indices: &[usize],
        params: TreeParams,
        rng: &mut StdRng,
    ) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        let mut indices = indices.to_vec();
        tree.grow(features, labels, &mut indices, params, 0, rng);
        tree
    }

    /// Recursively grow the subtree for `indices`, returning its arena index.
    fn grow(
        &mut self,
        features: &[Vec<f64>],
        labels: &[u8],
        indices: &mut [usize],
        params: TreeParams,
        depth: usize,
        rng: &mut StdRng,
    ) -> usize {
        let counts = class_counts(labels, indices, params.n_classes);

        let stop = depth >= params.max_depth
            || indices.len() <= params.min_leaf
            || gini(&counts, indices.len()) == 0.0;
        if !stop {
            if let Some((feature, threshold)) = best_split(features, labels, indices, params, rng) {
                let mid = partition(features, indices, feature, threshold);
                // A split that separates nothing would recurse forever
                if mid > 0 && mid < indices.len() {
                    let node = self.nodes.len();
                    self.nodes.push(Node::Leaf { class: 0 }); // placeholder
                    let (left_idx, right_idx) = indices.split_at_mut(mid);
                    let left = self.grow(features, labels, left_idx, params, depth + 1, rng);
                    let right = self.grow(features, labels, right_idx, params, depth + 1, rng);
                    self.nodes[node] = Node::Split {
                        feature,
                        threshold,
                        left,
                        right,
                    };
                    return node;
                }
            }
        }

        let class = majority(&counts);
        let node = self.nodes.len();
        self.nodes.push(Node::Leaf { class });
        node
    }

    /// Predicted class for one feature vector.
    pub fn predict(&self, features: &[f64]) -> u8 {
        let mut node = 0;
        loop {
            match &self.nodes[node] {
                Node::Leaf { class } => return *class,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

fn class_counts(labels: &[u8], indices: &[usize], n_classes: u8) -> Vec<usize> {
    let mut counts = vec![0usize; n_classes as usize];
    for &i in indices {
        counts[labels[i] as usize] += 1;
    }
    counts
}

/// Gini impurity of a count vector over `total` samples.
fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let sum_sq: f64 = counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total as f64;
            p * p
        })
        .sum();
    1.0 - sum_sq
}

/// Most frequent class, lowest class id on ties.
fn majority(counts: &[usize]) -> u8 {
    let mut best = 0usize;
    for (class, &count) in counts.iter().enumerate() {
        if count > counts[best] {
            best = class;
        }
    }
    best as u8
}

/// Scan a random feature subset for the threshold minimizing weighted child
/// impurity. Candidate thresholds are midpoints between adjacent distinct
/// sorted values.
fn best_split(
    features: &[Vec<f64>],
    labels: &[u8],
    indices: &[usize],
    params: TreeParams,
    rng: &mut StdRng,
) -> Option<(usize, f64)> {
    let n_features = features[indices[0]].len();
    let k = params.n_split_features.clamp(1, n_features);
    let candidates = rand::seq::index::sample(rng, n_features, k);

    let mut best: Option<(usize, f64, f64)> = None;
    let mut values: Vec<(f64, u8)> = Vec::with_capacity(indices.len());

    for feature in candidates {
        values.clear();
        values.extend(indices.iter().map(|&i| (features[i][feature], labels[i])));
        values.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let total = values.len();
        let mut left = vec![0usize; params.n_classes as usize];
        let mut right = class_counts(labels, indices, params.n_classes);

        for i in 0..total - 1 {
            let (value, label) = values[i];
            left[label as usize] += 1;
            right[label as usize] -= 1;

            let next = values[i + 1].0;
            if next <= value {
                continue;
            }
            let n_left = i + 1;
            let n_right = total - n_left;
            let score = (n_left as f64 * gini(&left, n_left)
                + n_right as f64 * gini(&right, n_right))
                / total as f64;

            if best.is_none_or(|(_, _, s)| score < s) {
                best = Some((feature, (value + next) / 2.0, score));
            }
        }
    }

    best.map(|(feature, threshold, _)| (feature, threshold))
}

/// Partition `indices` in place so samples with `feature <= threshold` come
/// first; returns the boundary.
fn partition(features: &[Vec<f64>], indices: &mut [usize], feature: usize, threshold: f64) -> usize {
    let mut mid = 0;
    for i in 0..indices.len() {
        if features[indices[i]][feature] <= threshold {
            indices.swap(mid, i);
            mid += 1;
        }
    }
    mid
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn params(n_classes: u8, n_features: usize) -> TreeParams {
        TreeParams {
            max_depth: 16,
            min_leaf: 1,
            n_split_features: n_features,
            n_classes,
        }
    }

    #[test]
    fn test_gini() {
        assert_eq!(gini(&[4, 0], 4), 0.0);
        assert!((gini(&[2, 2], 4) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_majority_tie_break() {
        assert_eq!(majority(&[3, 3, 1]), 0);
        assert_eq!(majority(&[1, 5, 5]), 1);
    }

    #[test]
    fn test_separable_data_fits_perfectly() {
        let features: Vec<Vec<f64>> =
            vec![vec![0.1], vec![0.2], vec![0.8], vec![0.9]];
        let labels = vec![0u8, 0, 1, 1];
        let indices: Vec<usize> = (0..4).collect();
        let mut rng = StdRng::seed_from_u64(1);

        let tree = DecisionTree::fit(&features, &labels, &indices, params(2, 1), &mut rng);
        for (f, &l) in features.iter().zip(&labels) {
            assert_eq!(tree.predict(f), l);
        }
        assert_eq!(tree.predict(&[0.0]), 0);
        assert_eq!(tree.predict(&[1.0]), 1);
    }

    #[test]
    fn test_pure_node_is_single_leaf() {
        let features: Vec<Vec<f64>> = vec![vec![0.1], vec![0.9]];
        let labels = vec![2u8, 2];
        let indices = vec![0, 1];
        let mut rng = StdRng::seed_from_u64(1);

        let tree = DecisionTree::fit(&features, &labels, &indices, params(3, 1), &mut rng);
        assert_eq!(tree.nodes.len(), 1);
        assert_eq!(tree.predict(&[0.5]), 2);
    }
}
