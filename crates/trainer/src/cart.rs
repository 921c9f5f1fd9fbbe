//! CART regression-tree builder for boosting rounds
//!
//! Exact-greedy split search over midpoint thresholds. Determinism comes
//! from fixed iteration order: features ascending, candidate thresholds
//! ascending, and a strictly-greater gain comparison so ties keep the
//! earliest candidate. No randomness enters tree construction.

use cardio_core::{FeatureVector, Node, Tree};

/// Growth limits and regularization for a single tree.
#[derive(Clone, Debug)]
pub struct TreeConfig {
    pub max_depth: usize,
    pub min_samples_leaf: usize,
    /// L2 regularization on leaf weights.
    pub lambda: f64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 6,
            min_samples_leaf: 32,
            lambda: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature_idx: usize,
    threshold: f64,
    gain: f64,
}

/// Builds one regression tree from per-sample gradients and hessians.
pub struct CartBuilder<'a> {
    config: TreeConfig,
    features: &'a [FeatureVector],
    gradients: &'a [f64],
    hessians: &'a [f64],
    feature_count: usize,
}

impl<'a> CartBuilder<'a> {
    pub fn new(
        features: &'a [FeatureVector],
        gradients: &'a [f64],
        hessians: &'a [f64],
        config: TreeConfig,
    ) -> Self {
        assert_eq!(features.len(), gradients.len());
        assert_eq!(features.len(), hessians.len());

        let feature_count = features.first().map(|f| f.len()).unwrap_or(0);
        Self {
            config,
            features,
            gradients,
            hessians,
            feature_count,
        }
    }

    pub fn build(&self) -> Tree {
        let mut nodes = Vec::new();
        let indices: Vec<usize> = (0..self.features.len()).collect();
        self.build_node(&indices, 0, &mut nodes);
        Tree::new(nodes)
    }

    fn build_node(&self, indices: &[usize], depth: usize, nodes: &mut Vec<Node>) -> i32 {
        let current = nodes.len() as i32;
        let leaf_value = self.leaf_value(indices);

        if depth >= self.config.max_depth || indices.len() < 2 * self.config.min_samples_leaf {
            nodes.push(Node::leaf(leaf_value));
            return current;
        }

        let Some(split) = self.find_best_split(indices) else {
            nodes.push(Node::leaf(leaf_value));
            return current;
        };

        let (left_idx, right_idx) = self.partition(indices, split.feature_idx, split.threshold);
        if left_idx.len() < self.config.min_samples_leaf
            || right_idx.len() < self.config.min_samples_leaf
        {
            nodes.push(Node::leaf(leaf_value));
            return current;
        }

        // Reserve the slot, then patch in child indices after recursion.
        nodes.push(Node::internal(split.feature_idx as i32, split.threshold, 0, 0));
        let left = self.build_node(&left_idx, depth + 1, nodes);
        let right = self.build_node(&right_idx, depth + 1, nodes);
        nodes[current as usize].left = left;
        nodes[current as usize].right = right;

        current
    }

    fn find_best_split(&self, indices: &[usize]) -> Option<SplitCandidate> {
        let (g_parent, h_parent) = self.sums(indices);
        let parent_score = score(g_parent, h_parent, self.config.lambda);

        let mut best: Option<SplitCandidate> = None;

        for feature_idx in 0..self.feature_count {
            for threshold in self.candidate_thresholds(indices, feature_idx) {
                let (left, right) = self.partition(indices, feature_idx, threshold);
                if left.len() < self.config.min_samples_leaf
                    || right.len() < self.config.min_samples_leaf
                {
                    continue;
                }

                let (g_left, h_left) = self.sums(&left);
                let (g_right, h_right) = self.sums(&right);
                let gain = score(g_left, h_left, self.config.lambda)
                    + score(g_right, h_right, self.config.lambda)
                    - parent_score;

                if gain <= 0.0 {
                    continue;
                }
                // Strictly-greater comparison keeps the earliest candidate
                // (lowest feature index, then lowest threshold) on ties.
                if best.map(|b| gain > b.gain).unwrap_or(true) {
                    best = Some(SplitCandidate {
                        feature_idx,
                        threshold,
                        gain,
                    });
                }
            }
        }

        best
    }

    /// Candidate thresholds: midpoints between consecutive distinct values.
    fn candidate_thresholds(&self, indices: &[usize], feature_idx: usize) -> Vec<f64> {
        let mut values: Vec<f64> = indices
            .iter()
            .map(|&i| self.features[i][feature_idx])
            .collect();
        values.sort_by(f64::total_cmp);
        values.dedup();

        values.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
    }

    fn partition(
        &self,
        indices: &[usize],
        feature_idx: usize,
        threshold: f64,
    ) -> (Vec<usize>, Vec<usize>) {
        let mut left = Vec::new();
        let mut right = Vec::new();
        for &i in indices {
            if self.features[i][feature_idx] <= threshold {
                left.push(i);
            } else {
                right.push(i);
            }
        }
        (left, right)
    }

    fn sums(&self, indices: &[usize]) -> (f64, f64) {
        let mut g = 0.0;
        let mut h = 0.0;
        for &i in indices {
            g += self.gradients[i];
            h += self.hessians[i];
        }
        (g, h)
    }

    /// Optimal leaf weight: -G / (H + lambda).
    fn leaf_value(&self, indices: &[usize]) -> f64 {
        let (g, h) = self.sums(indices);
        let denom = h + self.config.lambda;
        if denom <= 0.0 {
            return 0.0;
        }
        -g / denom
    }
}

/// Structure score G^2 / (H + lambda), halved constant dropped since only
/// differences matter for split selection.
fn score(g: f64, h: f64, lambda: f64) -> f64 {
    let denom = h + lambda;
    if denom <= 0.0 {
        return 0.0;
    }
    (g * g) / denom
}
