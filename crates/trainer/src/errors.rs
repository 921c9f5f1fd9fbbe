//! Error types for the trainer crate

use thiserror::Error;

/// Errors raised while loading data, fitting pipelines, or training.
#[derive(Error, Debug)]
pub enum TrainerError {
    /// A range filter was configured with low > high. Raised before any
    /// data is touched.
    #[error("invalid range filter on '{field}': low {low} > high {high}")]
    RangeSpec { field: String, low: f64, high: f64 },

    /// Dataset could not be read or parsed.
    #[error("dataset error: {0}")]
    Dataset(String),

    /// Pipeline fitting or model training failed.
    #[error("training error: {0}")]
    Training(String),

    /// Cross-validation was configured with an unusable fold count.
    #[error("invalid fold count {folds} for {rows} rows")]
    FoldCount { folds: usize, rows: usize },

    /// Schema or transform failure bubbled up from the core crate.
    #[error(transparent)]
    Model(#[from] cardio_core::ModelError),
}

/// Result type for trainer operations
pub type Result<T> = std::result::Result<T, TrainerError>;
