//! Single-record prediction engine
//!
//! Applies a fitted pipeline to exactly one record: transform with the
//! parameters captured at training time, then ensemble inference. Never
//! re-fits anything; the engine is read-only over the pipeline and safe
//! to call repeatedly or concurrently.

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::gbdt::{sigmoid, DECISION_THRESHOLD};
use crate::pipeline::FittedPipeline;
use crate::schema::Record;

/// Outcome of a single inference call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted class: probability >= 0.5 (inclusive threshold).
    pub label: bool,
    /// Calibrated probability of the positive class, in [0,1].
    pub probability: f64,
    /// Raw ensemble score (log-odds); higher means more likely positive.
    pub score: f64,
}

/// Prediction engine over a fitted pipeline.
pub struct PredictionEngine<'a> {
    pipeline: &'a FittedPipeline,
}

impl<'a> PredictionEngine<'a> {
    pub fn new(pipeline: &'a FittedPipeline) -> Self {
        Self { pipeline }
    }

    /// Predict the label for one record. The record's own label, if any,
    /// is ignored.
    pub fn predict(&self, record: &Record) -> Result<Prediction> {
        let features = self.pipeline.transform(record)?;
        let score = self.pipeline.ensemble.score(&features);
        let probability = sigmoid(score);
        Ok(Prediction {
            label: probability >= DECISION_THRESHOLD,
            probability,
            score,
        })
    }
}
