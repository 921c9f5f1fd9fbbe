//! Pipeline specification and fitting
//!
//! A pipeline spec is a plain ordered list of stage descriptors. Fitting
//! walks the list once: each trained stage learns its parameters from the
//! data as transformed by all earlier stages (so a normalizer after the
//! imputer sees imputed values), then the assembled vectors feed the GBDT
//! trainer. The result is an immutable `FittedPipeline` from the core
//! crate; applying it to train, test, or a single inference record is one
//! and the same code path.

use cardio_core::{column_index, FeatureVector, FittedPipeline, Record, StageParams, FEATURE_COLUMNS};

use crate::dataset::Dataset;
use crate::errors::{Result, TrainerError};
use crate::trainer::{GbdtTrainer, TrainingParams};

/// Descriptor of one pipeline stage, before fitting.
#[derive(Debug, Clone)]
pub enum StageSpec {
    /// Learn the column mean, fill missing values with it.
    Impute { field: String },
    /// Learn (min, max), rescale into [0,1].
    Normalize { field: String },
    /// Concatenate the named fields into the feature vector.
    Assemble { fields: Vec<String> },
}

/// Ordered stage descriptors plus boosting hyperparameters.
#[derive(Debug, Clone)]
pub struct PipelineSpec {
    pub stages: Vec<StageSpec>,
    pub params: TrainingParams,
}

impl PipelineSpec {
    pub fn new(stages: Vec<StageSpec>, params: TrainingParams) -> Self {
        Self { stages, params }
    }

    /// The cardio pipeline: impute weight, min-max normalize the five
    /// continuous columns, assemble all eleven features in schema order.
    pub fn cardio(params: TrainingParams) -> Self {
        let normalize = |field: &str| StageSpec::Normalize {
            field: field.to_string(),
        };
        Self::new(
            vec![
                StageSpec::Impute {
                    field: "weight".to_string(),
                },
                normalize("age"),
                normalize("height"),
                normalize("weight"),
                normalize("ap_hi"),
                normalize("ap_lo"),
                StageSpec::Assemble {
                    fields: FEATURE_COLUMNS.iter().map(|s| s.to_string()).collect(),
                },
            ],
            params,
        )
    }

    /// Fit every stage in order on the training set, then train the
    /// ensemble on the assembled vectors. Pure over its inputs; all
    /// learned state lands in the returned pipeline.
    pub fn fit(&self, train: &Dataset) -> Result<FittedPipeline> {
        let mut working: Vec<Record> = train.records().to_vec();
        let mut fitted: Vec<StageParams> = Vec::with_capacity(self.stages.len());
        let mut vectors: Option<Vec<FeatureVector>> = None;

        for stage in &self.stages {
            let params = match stage {
                StageSpec::Impute { field } => StageParams::Impute {
                    field: field.clone(),
                    default: column_mean(&working, field)?,
                },
                StageSpec::Normalize { field } => {
                    let (min, max) = column_bounds(&working, field)?;
                    StageParams::Normalize {
                        field: field.clone(),
                        min,
                        max,
                    }
                }
                StageSpec::Assemble { fields } => {
                    for field in fields {
                        if column_index(field).is_none() {
                            return Err(TrainerError::Model(cardio_core::ModelError::Schema(
                                format!("unknown field '{field}' in assemble stage"),
                            )));
                        }
                    }
                    StageParams::Assemble {
                        fields: fields.clone(),
                    }
                }
            };

            let mut assembled = Vec::with_capacity(working.len());
            for record in &mut working {
                if let Some(vector) = params.apply(record)? {
                    assembled.push(vector);
                }
            }
            if matches!(params, StageParams::Assemble { .. }) {
                vectors = Some(assembled);
            }

            fitted.push(params);
        }

        let vectors = vectors.ok_or_else(|| {
            TrainerError::Training("pipeline spec has no assemble stage".to_string())
        })?;
        let labels = train.labels()?;

        tracing::info!(
            rows = vectors.len(),
            stages = fitted.len(),
            trees = self.params.num_trees,
            "pipeline fitted, training ensemble"
        );
        let ensemble = GbdtTrainer::new(self.params.clone()).train(&vectors, &labels)?;

        Ok(FittedPipeline::new(fitted, ensemble))
    }
}

/// Arithmetic mean of the column's present values. Values are summed in
/// sorted order so the learned default does not depend on row order.
/// Falls back to 0.0 when every value is missing.
fn column_mean(records: &[Record], field: &str) -> Result<f64> {
    let mut values = present_values(records, field)?;
    if values.is_empty() {
        return Ok(0.0);
    }
    values.sort_by(f64::total_cmp);
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// (min, max) over the column's present values.
fn column_bounds(records: &[Record], field: &str) -> Result<(f64, f64)> {
    let values = present_values(records, field)?;
    if values.is_empty() {
        return Err(TrainerError::Training(format!(
            "cannot learn normalization bounds for '{field}': no values present"
        )));
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Ok((min, max))
}

fn present_values(records: &[Record], field: &str) -> Result<Vec<f64>> {
    let mut values = Vec::with_capacity(records.len());
    for record in records {
        if let Some(v) = record.get(field)? {
            values.push(v);
        }
    }
    Ok(values)
}
