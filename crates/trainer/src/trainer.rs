//! Gradient-boosted tree training for binary classification
//!
//! Logistic loss: the initial score is the prior log-odds of the positive
//! class, each round fits a CART tree to the loss gradients, and leaf
//! values are learning-rate-scaled before the tree joins the ensemble.
//! Training is deterministic given parameters and input order.

use cardio_core::{sigmoid, Ensemble, FeatureVector, Tree};

use crate::cart::{CartBuilder, TreeConfig};
use crate::errors::{Result, TrainerError};

/// Boosting hyperparameters.
#[derive(Clone, Debug)]
pub struct TrainingParams {
    pub num_trees: usize,
    pub max_depth: usize,
    pub min_samples_leaf: usize,
    pub learning_rate: f64,
    /// L2 regularization on leaf weights.
    pub lambda: f64,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            num_trees: 64,
            max_depth: 6,
            min_samples_leaf: 32,
            learning_rate: 0.1,
            lambda: 1.0,
        }
    }
}

/// GBDT trainer
pub struct GbdtTrainer {
    params: TrainingParams,
}

impl GbdtTrainer {
    pub fn new(params: TrainingParams) -> Self {
        Self { params }
    }

    /// Fit an ensemble on (feature vector, label) pairs.
    pub fn train(&self, features: &[FeatureVector], labels: &[bool]) -> Result<Ensemble> {
        if features.is_empty() {
            return Err(TrainerError::Training("no training samples".to_string()));
        }
        if features.len() != labels.len() {
            return Err(TrainerError::Training(format!(
                "{} feature vectors but {} labels",
                features.len(),
                labels.len()
            )));
        }

        let bias = prior_log_odds(labels);
        let mut scores = vec![bias; features.len()];
        let mut trees = Vec::with_capacity(self.params.num_trees);

        for round in 0..self.params.num_trees {
            let (gradients, hessians) = logistic_gradients(labels, &scores);

            let config = TreeConfig {
                max_depth: self.params.max_depth,
                min_samples_leaf: self.params.min_samples_leaf,
                lambda: self.params.lambda,
            };
            let mut tree = CartBuilder::new(features, &gradients, &hessians, config).build();
            scale_leaves(&mut tree, self.params.learning_rate);

            for (score, vector) in scores.iter_mut().zip(features.iter()) {
                *score += tree.evaluate(vector);
            }

            tracing::debug!(round = round + 1, total = self.params.num_trees, "boosting round done");
            trees.push(tree);
        }

        Ok(Ensemble::new(trees, bias))
    }
}

/// Log-odds of the positive class rate, clamped away from the infinities a
/// single-class training set would otherwise produce.
fn prior_log_odds(labels: &[bool]) -> f64 {
    let positives = labels.iter().filter(|&&l| l).count() as f64;
    let rate = (positives / labels.len() as f64).clamp(1e-6, 1.0 - 1e-6);
    (rate / (1.0 - rate)).ln()
}

/// Per-sample gradient p - y and hessian p(1 - p) of the logistic loss.
fn logistic_gradients(labels: &[bool], scores: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut gradients = Vec::with_capacity(labels.len());
    let mut hessians = Vec::with_capacity(labels.len());

    for (&label, &score) in labels.iter().zip(scores.iter()) {
        let p = sigmoid(score);
        let y = if label { 1.0 } else { 0.0 };
        gradients.push(p - y);
        hessians.push(p * (1.0 - p));
    }

    (gradients, hessians)
}

fn scale_leaves(tree: &mut Tree, learning_rate: f64) {
    for node in &mut tree.nodes {
        if let Some(value) = node.leaf.as_mut() {
            *value *= learning_rate;
        }
    }
}
