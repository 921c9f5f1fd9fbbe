//! Fitted transform pipeline
//!
//! A fitted pipeline is a plain ordered sequence of stage parameters
//! captured at training time, plus the trained ensemble. Applying it is a
//! pure function: the same input always yields the bit-identical feature
//! vector, and a single record goes through exactly the same code path as
//! every row of a dataset (training/serving parity).

use serde::{Deserialize, Serialize};

use crate::errors::{ModelError, Result};
use crate::gbdt::Ensemble;
use crate::schema::Record;

/// Fixed-order numeric vector fed to the ensemble.
pub type FeatureVector = Vec<f64>;

/// Parameters of one fitted transform stage.
///
/// `Impute` and `Normalize` carry state learned from the training set;
/// `Assemble` is purely structural. The variants are applied in sequence
/// by [`FittedPipeline::transform`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum StageParams {
    /// Replace a missing value with the default learned at fit time.
    Impute { field: String, default: f64 },

    /// Min-max rescale into [0,1] using training-time bounds; out-of-range
    /// values seen later are clamped. A degenerate column (max == min)
    /// maps every input to 0.
    Normalize { field: String, min: f64, max: f64 },

    /// Concatenate the named fields, in order, into the feature vector.
    Assemble { fields: Vec<String> },
}

impl StageParams {
    /// Apply this stage to one record in place. The assemble stage leaves
    /// the record untouched and returns the feature vector instead.
    ///
    /// This is the one transform implementation: `FittedPipeline::transform`
    /// and the trainer's fit loop both go through it, so a stage can never
    /// behave differently at fit time and at serving time.
    pub fn apply(&self, record: &mut Record) -> Result<Option<FeatureVector>> {
        match self {
            StageParams::Impute { field, default } => {
                if record.get(field)?.is_none() {
                    record.set(field, *default)?;
                }
                Ok(None)
            }
            StageParams::Normalize { field, min, max } => {
                if let Some(value) = record.get(field)? {
                    record.set(field, normalize(value, *min, *max))?;
                }
                Ok(None)
            }
            StageParams::Assemble { fields } => {
                let mut vector = Vec::with_capacity(fields.len());
                for field in fields {
                    let value = record.get(field)?.ok_or_else(|| {
                        ModelError::Schema(format!(
                            "field '{field}' has no value at assembly (missing and not imputed)"
                        ))
                    })?;
                    vector.push(value);
                }
                Ok(Some(vector))
            }
        }
    }
}

/// A fitted pipeline: transform parameters plus the trained ensemble.
/// Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FittedPipeline {
    pub stages: Vec<StageParams>,
    pub ensemble: Ensemble,
}

impl FittedPipeline {
    pub fn new(stages: Vec<StageParams>, ensemble: Ensemble) -> Self {
        Self { stages, ensemble }
    }

    /// Apply every stage, in fit order, to one record.
    ///
    /// Never re-learns anything: imputation defaults and normalization
    /// bounds are exactly those captured at fit time.
    pub fn transform(&self, record: &Record) -> Result<FeatureVector> {
        let mut working = record.clone();
        let mut assembled: Option<FeatureVector> = None;

        for stage in &self.stages {
            if let Some(vector) = stage.apply(&mut working)? {
                assembled = Some(vector);
            }
        }

        assembled.ok_or_else(|| {
            ModelError::Schema("pipeline has no assemble stage".to_string())
        })
    }

    /// Transform every record of a dataset through the single-record path.
    pub fn transform_all(&self, records: &[Record]) -> Result<Vec<FeatureVector>> {
        records.iter().map(|r| self.transform(r)).collect()
    }

    /// The declared feature order, if the pipeline has an assemble stage.
    pub fn assembled_fields(&self) -> Option<&[String]> {
        self.stages.iter().find_map(|s| match s {
            StageParams::Assemble { fields } => Some(fields.as_slice()),
            _ => None,
        })
    }
}

/// Min-max scaling with clamping and the degenerate-column policy.
fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if max <= min {
        return 0.0;
    }
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}
