//! Cardio classifier core
//!
//! Everything needed to *apply* a fitted cardiovascular-disease model:
//! the patient record schema, the fitted transform pipeline, deterministic
//! GBDT ensemble inference with sigmoid calibration, the versioned model
//! artifact, and the single-record prediction engine. Fitting, training,
//! evaluation, and cross-validation live in the `cardio-trainer` crate.
//!
//! Modules:
//! - `schema`: record type and the explicit feature-column descriptor
//! - `pipeline`: fitted stage parameters and the one transform code path
//! - `gbdt`: boosted-tree ensemble evaluation
//! - `artifact`: versioned, checksummed model persistence
//! - `predict`: single-record inference
//! - `canon`: canonical JSON + blake3 fingerprinting

pub mod artifact;
pub mod canon;
pub mod errors;
pub mod gbdt;
pub mod pipeline;
pub mod predict;
pub mod schema;

pub use artifact::{ModelArtifact, ARTIFACT_VERSION};
pub use errors::ModelError;
pub use gbdt::{sigmoid, Ensemble, Node, Tree, DECISION_THRESHOLD};
pub use pipeline::{FeatureVector, FittedPipeline, StageParams};
pub use predict::{Prediction, PredictionEngine};
pub use schema::{column_index, Record, FEATURE_COLUMNS, FEATURE_COUNT};

/// Crate version string for reports and artifact metadata.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
