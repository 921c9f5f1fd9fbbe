//! Cardio classifier trainer
//!
//! Deterministic offline training for the cardiovascular-disease GBDT
//! model: dataset loading and medical range filtering, pipeline fitting
//! (impute, normalize, assemble), logistic-loss boosting, evaluation, and
//! k-fold cross-validation. All randomness flows from explicit seeds.

pub mod cart;
pub mod cross_validate;
pub mod dataset;
pub mod deterministic;
pub mod errors;
pub mod evaluate;
pub mod pipeline;
pub mod trainer;

use std::path::Path;

use cardio_core::FittedPipeline;

pub use cross_validate::{cross_validate, CvResult, MetricsAggregate};
pub use dataset::{cardio_filters, Dataset, FilterSpec};
pub use deterministic::LcgRng;
pub use errors::TrainerError;
pub use evaluate::{evaluate, evaluate_pipeline, ConfusionMatrix, Metrics};
pub use pipeline::{PipelineSpec, StageSpec};
pub use trainer::{GbdtTrainer, TrainingParams};

/// Load a semicolon-delimited cardio export, apply the medical cleaning
/// filters, and fit the default pipeline on all surviving rows.
pub fn fit_pipeline_from_file(
    path: &Path,
    params: TrainingParams,
) -> Result<FittedPipeline, TrainerError> {
    let dataset = Dataset::from_delimited_file(path, ';')?;
    let cleaned = dataset.filter_all(&cardio_filters()?);
    PipelineSpec::cardio(params).fit(&cleaned)
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
