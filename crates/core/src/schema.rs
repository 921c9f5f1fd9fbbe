//! Patient record schema
//!
//! Field access goes through an explicit ordered column descriptor rather
//! than any name-based reflection: `FEATURE_COLUMNS` is the single source
//! of truth for column order, consulted by the dataset reader, the
//! transform stages, and the feature assembler alike.

use serde::{Deserialize, Serialize};

use crate::errors::{ModelError, Result};

/// Number of feature columns in a record.
pub const FEATURE_COUNT: usize = 11;

/// Feature columns in their fixed source order. This order is a binding
/// contract between the assembler, the trainer, and the prediction engine.
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [
    "age",
    "gender",
    "height",
    "weight",
    "ap_hi",
    "ap_lo",
    "cholesterol",
    "gluc",
    "smoke",
    "alco",
    "active",
];

/// Resolve a feature column name to its index in `FEATURE_COLUMNS`.
pub fn column_index(name: &str) -> Option<usize> {
    FEATURE_COLUMNS.iter().position(|&c| c == name)
}

/// One patient row: eleven feature values plus an optional label.
///
/// Any feature may be absent (`None`); in the cardio dataset only `weight`
/// is expected to be missing in practice, and it is imputed downstream.
/// The label is absent on inference input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    values: [Option<f64>; FEATURE_COUNT],
    label: Option<bool>,
}

impl Record {
    pub fn new(values: [Option<f64>; FEATURE_COUNT], label: Option<bool>) -> Self {
        Self { values, label }
    }

    /// Build a record from fully-present feature values, e.g. inference input.
    pub fn from_features(features: [f64; FEATURE_COUNT], label: Option<bool>) -> Self {
        Self {
            values: features.map(Some),
            label,
        }
    }

    /// Read a feature by name. `Ok(None)` means the field exists but the
    /// value is missing; an unknown name is a schema error.
    pub fn get(&self, field: &str) -> Result<Option<f64>> {
        let idx = column_index(field)
            .ok_or_else(|| ModelError::Schema(format!("unknown field '{field}'")))?;
        Ok(self.values[idx])
    }

    /// Overwrite a feature by name.
    pub fn set(&mut self, field: &str, value: f64) -> Result<()> {
        let idx = column_index(field)
            .ok_or_else(|| ModelError::Schema(format!("unknown field '{field}'")))?;
        self.values[idx] = Some(value);
        Ok(())
    }

    pub fn label(&self) -> Option<bool> {
        self.label
    }

    /// Raw feature slots in schema order.
    pub fn values(&self) -> &[Option<f64>; FEATURE_COUNT] {
        &self.values
    }
}
