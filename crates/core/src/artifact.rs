//! Versioned model artifact (save/load)
//!
//! The artifact is a self-describing JSON document: format version,
//! creation timestamp, feature schema, fitted stage parameters, and the
//! trained ensemble, fingerprinted with a blake3 checksum over the
//! canonical-JSON payload. A loaded artifact reconstructs a pipeline whose
//! `transform` is bit-identical to the one that was saved.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::canon::hash_canonical_hex;
use crate::errors::{ModelError, Result};
use crate::pipeline::FittedPipeline;
use crate::schema::column_index;

/// Current artifact format version. `load` rejects anything newer.
pub const ARTIFACT_VERSION: u32 = 1;

/// The checksummed portion of the artifact. `created_at` stays outside so
/// re-saving an identical model keeps an identical fingerprint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Payload {
    version: u32,
    schema: Vec<String>,
    pipeline: FittedPipeline,
}

/// On-disk model artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub version: u32,
    /// Unix timestamp of the save, informational only.
    pub created_at: i64,
    /// Feature column order the pipeline was fitted against.
    pub schema: Vec<String>,
    pub pipeline: FittedPipeline,
    /// Blake3 hex digest of the canonical JSON of (version, schema, pipeline).
    pub checksum: String,
}

impl ModelArtifact {
    /// Package a fitted pipeline and its feature schema for persistence.
    pub fn new(pipeline: FittedPipeline, schema: Vec<String>) -> Result<Self> {
        let payload = Payload {
            version: ARTIFACT_VERSION,
            schema: schema.clone(),
            pipeline,
        };
        let checksum = hash_canonical_hex(&payload)?;
        Ok(Self {
            version: payload.version,
            created_at: Utc::now().timestamp(),
            schema: payload.schema,
            pipeline: payload.pipeline,
            checksum,
        })
    }

    /// Write the artifact to `path` as pretty JSON. The file is written in
    /// one call; no handle outlives the operation.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        tracing::info!(path = %path.as_ref().display(), checksum = %self.checksum, "model artifact saved");
        Ok(())
    }

    /// Read and verify an artifact from `path`.
    ///
    /// Verification order: payload must parse, version must be supported,
    /// checksum must match, schema must name known columns and agree with
    /// the pipeline's assembled field order, and every tree must be
    /// structurally valid. Any violation surfaces as an error; a partial
    /// or garbled model is never returned.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;

        let raw: serde_json::Value = serde_json::from_str(&content)
            .map_err(|e| ModelError::CorruptArtifact(format!("unparseable payload: {e}")))?;

        let version = raw
            .get("version")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| ModelError::CorruptArtifact("missing version field".to_string()))?
            as u32;
        if version > ARTIFACT_VERSION {
            return Err(ModelError::UnsupportedVersion {
                found: version,
                supported: ARTIFACT_VERSION,
            });
        }

        let artifact: ModelArtifact = serde_json::from_value(raw)
            .map_err(|e| ModelError::CorruptArtifact(format!("malformed artifact: {e}")))?;

        artifact.verify()?;
        tracing::debug!(path = %path.as_ref().display(), "model artifact loaded and verified");
        Ok(artifact)
    }

    fn verify(&self) -> Result<()> {
        let payload = Payload {
            version: self.version,
            schema: self.schema.clone(),
            pipeline: self.pipeline.clone(),
        };
        let expected = hash_canonical_hex(&payload)?;
        if expected != self.checksum {
            return Err(ModelError::CorruptArtifact(format!(
                "checksum mismatch: artifact says {}, payload hashes to {expected}",
                self.checksum
            )));
        }

        for field in &self.schema {
            if column_index(field).is_none() {
                return Err(ModelError::CorruptArtifact(format!(
                    "schema names unknown column '{field}'"
                )));
            }
        }

        match self.pipeline.assembled_fields() {
            Some(fields) if fields == self.schema.as_slice() => {}
            Some(_) => {
                return Err(ModelError::CorruptArtifact(
                    "artifact schema disagrees with the pipeline's assembled field order"
                        .to_string(),
                ))
            }
            None => {
                return Err(ModelError::CorruptArtifact(
                    "pipeline has no assemble stage".to_string(),
                ))
            }
        }

        self.pipeline
            .ensemble
            .validate()
            .map_err(ModelError::CorruptArtifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gbdt::{Ensemble, Node, Tree};
    use crate::pipeline::StageParams;
    use crate::schema::FEATURE_COLUMNS;

    fn fitted_pipeline() -> FittedPipeline {
        FittedPipeline::new(
            vec![
                StageParams::Impute {
                    field: "weight".to_string(),
                    default: 74.2,
                },
                StageParams::Normalize {
                    field: "age".to_string(),
                    min: 10585.0,
                    max: 23713.0,
                },
                StageParams::Assemble {
                    fields: FEATURE_COLUMNS.iter().map(|s| s.to_string()).collect(),
                },
            ],
            Ensemble::new(
                vec![Tree::new(vec![
                    Node::internal(0, 0.5, 1, 2),
                    Node::leaf(-0.3),
                    Node::leaf(0.4),
                ])],
                -0.1,
            ),
        )
    }

    fn full_schema() -> Vec<String> {
        FEATURE_COLUMNS.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_checksum_ignores_created_at() {
        let a = ModelArtifact::new(fitted_pipeline(), full_schema()).unwrap();
        let b = ModelArtifact::new(fitted_pipeline(), full_schema()).unwrap();
        assert_eq!(a.checksum, b.checksum);
    }

    #[test]
    fn test_schema_pipeline_disagreement_is_corrupt() {
        let mut schema = full_schema();
        schema.swap(0, 1);
        let artifact = ModelArtifact::new(fitted_pipeline(), schema).unwrap();
        assert!(matches!(
            artifact.verify(),
            Err(ModelError::CorruptArtifact(_))
        ));
    }

    #[test]
    fn test_unknown_schema_column_is_corrupt() {
        let mut schema = full_schema();
        schema[0] = "bmi".to_string();
        let artifact = ModelArtifact::new(fitted_pipeline(), schema).unwrap();
        assert!(matches!(
            artifact.verify(),
            Err(ModelError::CorruptArtifact(_))
        ));
    }
}
