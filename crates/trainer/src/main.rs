//! Cardio GBDT trainer CLI
//!
//! End-to-end batch run: load the delimited export, apply the medical
//! cleaning filters, split, fit the pipeline, evaluate, cross-validate,
//! persist the model artifact, reload it, and run one sample prediction
//! through the loaded pipeline.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use cardio_core::{ModelArtifact, PredictionEngine, Record, FEATURE_COLUMNS};
use cardio_trainer::{
    cardio_filters, cross_validate, Dataset, Metrics, PipelineSpec, TrainingParams,
};

#[derive(Parser, Debug)]
#[command(name = "cardio-train")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Deterministic GBDT trainer for cardiovascular-disease prediction", long_about = None)]
struct Args {
    /// Input dataset path (semicolon-delimited, header row)
    #[arg(short, long)]
    input: PathBuf,

    /// Output path for the model artifact
    #[arg(short, long, default_value = "cardio_model.json")]
    output: PathBuf,

    /// Fraction of cleaned rows held out for evaluation
    #[arg(long, default_value = "0.2")]
    test_fraction: f64,

    /// Number of cross-validation folds (0 skips cross-validation)
    #[arg(long, default_value = "5")]
    folds: usize,

    /// Random seed for splitting and fold assignment
    #[arg(long, default_value = "1")]
    seed: i64,

    /// Number of boosting trees
    #[arg(long, default_value = "64")]
    trees: usize,

    /// Maximum tree depth
    #[arg(long, default_value = "6")]
    max_depth: usize,

    /// Minimum samples per leaf
    #[arg(long, default_value = "32")]
    min_samples_leaf: usize,

    /// Learning rate
    #[arg(long, default_value = "0.1")]
    learning_rate: f64,

    /// L2 regularization on leaf weights
    #[arg(long, default_value = "1.0")]
    lambda: f64,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("cardio deterministic GBDT trainer v{}", env!("CARGO_PKG_VERSION"));
    info!("═══════════════════════════════════════════");

    // Load and clean
    info!("Loading dataset from: {}", args.input.display());
    let dataset =
        Dataset::from_delimited_file(&args.input, ';').context("Failed to load dataset")?;
    info!("Loaded {} rows", dataset.len());

    let filters = cardio_filters()?;
    let cleaned = dataset.filter_all(&filters);
    for f in &filters {
        info!("  filter {} ∈ [{}, {}]", f.field, f.low, f.high);
    }
    info!(
        "Cleaned dataset: {} rows ({} dropped)",
        cleaned.len(),
        dataset.len() - cleaned.len()
    );

    // Split
    let (train, test) = cleaned.train_test_split(args.test_fraction, args.seed)?;
    info!("Split: {} train rows, {} test rows", train.len(), test.len());

    // Fit
    let params = TrainingParams {
        num_trees: args.trees,
        max_depth: args.max_depth,
        min_samples_leaf: args.min_samples_leaf,
        learning_rate: args.learning_rate,
        lambda: args.lambda,
    };
    info!("Training configuration:");
    info!("  Trees: {}", params.num_trees);
    info!("  Max depth: {}", params.max_depth);
    info!("  Min samples per leaf: {}", params.min_samples_leaf);
    info!("  Learning rate: {}", params.learning_rate);
    info!("  Lambda: {}", params.lambda);

    info!("═══════════════════════════════════════════");
    info!("Fitting pipeline on training split...");
    let spec = PipelineSpec::cardio(params);
    let pipeline = spec.fit(&train)?;

    // Evaluate on the held-out split
    let metrics = cardio_trainer::evaluate_pipeline(&pipeline, &test)?;
    report_metrics("MODEL METRICS", &metrics);

    // Cross-validate on the full cleaned dataset
    if args.folds >= 2 {
        info!("═══════════════════════════════════════════");
        info!("Running {}-fold cross-validation...", args.folds);
        let cv = cross_validate(&cleaned, &spec, args.folds, args.seed)?;
        info!("Cross-validation accuracies:");
        for (i, fold) in cv.folds.iter().enumerate() {
            info!("  fold {}: {:.4}", i + 1, fold.accuracy);
        }
        info!(
            "Mean: accuracy={:.4} f1={:.4} precision={:.4} recall={:.4}",
            cv.mean.accuracy, cv.mean.f1, cv.mean.precision, cv.mean.recall
        );
        info!(
            "Variance: accuracy={:.6} f1={:.6}",
            cv.variance.accuracy, cv.variance.f1
        );
    }

    // Persist, reload, and run the sample prediction through the loaded
    // pipeline, proving the artifact round-trips.
    info!("═══════════════════════════════════════════");
    let schema: Vec<String> = FEATURE_COLUMNS.iter().map(|s| s.to_string()).collect();
    let artifact = ModelArtifact::new(pipeline, schema)?;
    artifact.save(&args.output)?;
    info!("Model saved as {}", args.output.display());

    let loaded = ModelArtifact::load(&args.output)?;
    let engine = PredictionEngine::new(&loaded.pipeline);

    let sample = Record::from_features(
        [
            20000.0, // age (days)
            1.0,     // gender
            165.0,   // height
            72.0,    // weight
            140.0,   // ap_hi
            90.0,    // ap_lo
            2.0,     // cholesterol
            1.0,     // gluc
            0.0,     // smoke
            0.0,     // alco
            1.0,     // active
        ],
        None,
    );
    let prediction = engine.predict(&sample)?;

    info!("====== SAMPLE PREDICTION ======");
    info!("Has disease? {}", prediction.label);
    info!("Probability: {:.4}", prediction.probability);
    info!("Score: {:.4}", prediction.score);

    Ok(())
}

fn report_metrics(title: &str, metrics: &Metrics) {
    info!("====== {title} ======");
    info!("Accuracy:  {:.4}", metrics.accuracy);
    info!("F1 Score:  {:.4}", metrics.f1);
    info!("Precision: {:.4}", metrics.precision);
    info!("Recall:    {:.4}", metrics.recall);
    info!("Confusion matrix:");
    info!(
        "  TP={} FP={}",
        metrics.confusion.true_positive, metrics.confusion.false_positive
    );
    info!(
        "  FN={} TN={}",
        metrics.confusion.false_negative, metrics.confusion.true_negative
    );
}
