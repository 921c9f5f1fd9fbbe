//! Classification metrics
//!
//! Pure functions from (prediction, label) pairs to metrics. Each call
//! computes fresh values; nothing is mutated in place.

use serde::{Deserialize, Serialize};

use cardio_core::{FittedPipeline, DECISION_THRESHOLD};

use crate::dataset::Dataset;
use crate::errors::Result;

/// 2x2 confusion matrix. Counts always sum to the evaluated total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub true_positive: u64,
    pub false_positive: u64,
    pub true_negative: u64,
    pub false_negative: u64,
}

impl ConfusionMatrix {
    pub fn total(&self) -> u64 {
        self.true_positive + self.false_positive + self.true_negative + self.false_negative
    }
}

/// Evaluation metrics for one prediction set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub confusion: ConfusionMatrix,
}

/// Compute metrics from aligned predictions and true labels.
///
/// accuracy = (TP+TN)/total, precision = TP/(TP+FP), recall = TP/(TP+FN),
/// F1 = 2PR/(P+R); each ratio is 0 when its denominator is 0.
pub fn evaluate(predictions: &[bool], labels: &[bool]) -> Metrics {
    debug_assert_eq!(predictions.len(), labels.len());

    let mut confusion = ConfusionMatrix::default();
    for (&predicted, &actual) in predictions.iter().zip(labels.iter()) {
        match (predicted, actual) {
            (true, true) => confusion.true_positive += 1,
            (true, false) => confusion.false_positive += 1,
            (false, false) => confusion.true_negative += 1,
            (false, true) => confusion.false_negative += 1,
        }
    }

    let tp = confusion.true_positive as f64;
    let total = confusion.total() as f64;

    let accuracy = ratio(tp + confusion.true_negative as f64, total);
    let precision = ratio(tp, tp + confusion.false_positive as f64);
    let recall = ratio(tp, tp + confusion.false_negative as f64);
    let f1 = ratio(2.0 * precision * recall, precision + recall);

    Metrics {
        accuracy,
        precision,
        recall,
        f1,
        confusion,
    }
}

/// Transform a labeled dataset through a fitted pipeline, infer, and score
/// the predictions against the true labels.
pub fn evaluate_pipeline(pipeline: &FittedPipeline, dataset: &Dataset) -> Result<Metrics> {
    let vectors = pipeline.transform_all(dataset.records())?;
    let predictions: Vec<bool> = vectors
        .iter()
        .map(|v| pipeline.ensemble.probability(v) >= DECISION_THRESHOLD)
        .collect();
    let labels = dataset.labels()?;
    Ok(evaluate(&predictions, &labels))
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}
