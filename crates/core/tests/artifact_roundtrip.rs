//! Artifact round-trip and tamper-detection tests

use anyhow::Result;
use cardio_core::{
    Ensemble, FittedPipeline, ModelArtifact, ModelError, Node, Record, StageParams, Tree,
    FEATURE_COLUMNS, FEATURE_COUNT,
};

fn fitted_pipeline() -> FittedPipeline {
    let tree = Tree::new(vec![
        Node::internal(4, 0.55, 1, 2), // split on normalized ap_hi
        Node::leaf(-0.42),
        Node::leaf(0.37),
    ]);
    FittedPipeline::new(
        vec![
            StageParams::Impute {
                field: "weight".to_string(),
                default: 74.1,
            },
            StageParams::Normalize {
                field: "age".to_string(),
                min: 10585.0,
                max: 23713.0,
            },
            StageParams::Normalize {
                field: "weight".to_string(),
                min: 30.0,
                max: 200.0,
            },
            StageParams::Normalize {
                field: "ap_hi".to_string(),
                min: 70.0,
                max: 250.0,
            },
            StageParams::Assemble {
                fields: FEATURE_COLUMNS.iter().map(|s| s.to_string()).collect(),
            },
        ],
        Ensemble::new(vec![tree], -0.08),
    )
}

fn schema() -> Vec<String> {
    FEATURE_COLUMNS.iter().map(|s| s.to_string()).collect()
}

fn held_out_record() -> Record {
    let values: [Option<f64>; FEATURE_COUNT] = [
        Some(20000.0),
        Some(1.0),
        Some(165.0),
        None, // weight: exercises the imputer after load
        Some(140.0),
        Some(90.0),
        Some(2.0),
        Some(1.0),
        Some(0.0),
        Some(0.0),
        Some(1.0),
    ];
    Record::new(values, None)
}

#[test]
fn test_save_load_roundtrip_transform_identical() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("cardio_model.json");

    let original = fitted_pipeline();
    let artifact = ModelArtifact::new(original.clone(), schema())?;
    artifact.save(&path)?;

    let loaded = ModelArtifact::load(&path)?;
    assert_eq!(loaded.pipeline, original);

    let record = held_out_record();
    let before = original.transform(&record)?;
    let after = loaded.pipeline.transform(&record)?;
    assert_eq!(before.len(), after.len());
    for (a, b) in before.iter().zip(after.iter()) {
        assert_eq!(a.to_bits(), b.to_bits(), "transform must round-trip bit-identically");
    }

    assert_eq!(
        original.ensemble.score(&before),
        loaded.pipeline.ensemble.score(&after)
    );
    Ok(())
}

#[test]
fn test_tampered_payload_is_rejected() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("cardio_model.json");

    let artifact = ModelArtifact::new(fitted_pipeline(), schema())?;
    artifact.save(&path)?;

    // Flip a learned parameter without updating the checksum.
    let text = std::fs::read_to_string(&path)?;
    let tampered = text.replace("74.1", "99.9");
    assert_ne!(text, tampered);
    std::fs::write(&path, tampered)?;

    match ModelArtifact::load(&path) {
        Err(ModelError::CorruptArtifact(_)) => Ok(()),
        other => panic!("expected CorruptArtifact, got {other:?}"),
    }
}

#[test]
fn test_newer_version_is_rejected() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("cardio_model.json");

    let artifact = ModelArtifact::new(fitted_pipeline(), schema())?;
    artifact.save(&path)?;

    let text = std::fs::read_to_string(&path)?;
    let future = text.replacen("\"version\": 1", "\"version\": 999", 1);
    assert_ne!(text, future);
    std::fs::write(&path, future)?;

    match ModelArtifact::load(&path) {
        Err(ModelError::UnsupportedVersion { found: 999, .. }) => Ok(()),
        other => panic!("expected UnsupportedVersion, got {other:?}"),
    }
}

#[test]
fn test_garbage_file_is_corrupt() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("not_a_model.json");
    std::fs::write(&path, "definitely not json {")?;

    match ModelArtifact::load(&path) {
        Err(ModelError::CorruptArtifact(_)) => Ok(()),
        other => panic!("expected CorruptArtifact, got {other:?}"),
    }
}
