//! Boosted ensemble with calibrated binary-classification output
//!
//! The ensemble accumulates leaf values (already learning-rate-scaled at
//! training time) on top of a bias term, producing a raw log-odds score.
//! A sigmoid maps the score into [0,1]; the decision threshold is an
//! inclusive 0.5.

use serde::{Deserialize, Serialize};

use super::tree::Tree;

/// Decision threshold on the calibrated probability. Inclusive: a
/// probability of exactly 0.5 predicts the positive class.
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Gradient-boosted tree ensemble for binary classification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ensemble {
    /// Boosted trees, applied in training order
    pub trees: Vec<Tree>,

    /// Initial score (prior log-odds of the positive class)
    pub bias: f64,
}

impl Ensemble {
    pub fn new(trees: Vec<Tree>, bias: f64) -> Self {
        Self { trees, bias }
    }

    /// Raw score: bias plus the sum of all tree outputs. Higher means
    /// more likely positive.
    pub fn score(&self, features: &[f64]) -> f64 {
        let mut sum = self.bias;
        for tree in &self.trees {
            sum += tree.evaluate(features);
        }
        sum
    }

    /// Calibrated probability of the positive class: sigmoid of the score.
    pub fn probability(&self, features: &[f64]) -> f64 {
        sigmoid(self.score(features))
    }

    /// Validate every tree in the ensemble.
    pub fn validate(&self) -> Result<(), String> {
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate()
                .map_err(|e| format!("tree {i} invalid: {e}"))?;
        }
        Ok(())
    }
}

/// Monotonic calibration from raw score to [0,1].
pub fn sigmoid(score: f64) -> f64 {
    1.0 / (1.0 + (-score).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gbdt::tree::Node;

    #[test]
    fn test_score_accumulates_trees_and_bias() {
        let tree1 = Tree::new(vec![
            Node::internal(0, 0.5, 1, 2),
            Node::leaf(0.25),
            Node::leaf(0.75),
        ]);
        let tree2 = Tree::new(vec![Node::leaf(-0.5)]);
        let model = Ensemble::new(vec![tree1, tree2], 0.1);

        // 0.25 - 0.5 + 0.1
        assert!((model.score(&[0.2]) - (-0.15)).abs() < 1e-12);
        // 0.75 - 0.5 + 0.1
        assert!((model.score(&[0.9]) - 0.35).abs() < 1e-12);
    }

    #[test]
    fn test_sigmoid_calibration() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
        assert!(sigmoid(10.0) > 0.999);
        assert!(sigmoid(-10.0) < 0.001);

        // Monotonic
        assert!(sigmoid(-1.0) < sigmoid(0.0));
        assert!(sigmoid(0.0) < sigmoid(1.0));
    }

    #[test]
    fn test_probability_in_unit_interval() {
        let model = Ensemble::new(vec![Tree::new(vec![Node::leaf(100.0)])], 0.0);
        let p = model.probability(&[]);
        assert!((0.0..=1.0).contains(&p));
    }
}
