//! K-fold cross-validation
//!
//! Seeded-random partition: row indices are shuffled once up front, then
//! cut into k contiguous folds whose sizes differ by at most one row. Each
//! fold is held out exactly once while a fresh pipeline is fitted on the
//! other k-1 folds, so no test row ever influences its own fold's learned
//! parameters. A failure in any fold fails the whole call; folds are never
//! silently dropped from the aggregate.

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::deterministic::LcgRng;
use crate::errors::{Result, TrainerError};
use crate::evaluate::{evaluate_pipeline, Metrics};
use crate::pipeline::PipelineSpec;

/// Mean or variance of each metric across folds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsAggregate {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Cross-validation outcome: per-fold metrics plus their mean and
/// (population) variance. Produced once, read-only afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvResult {
    pub folds: Vec<Metrics>,
    pub mean: MetricsAggregate,
    pub variance: MetricsAggregate,
}

/// Split `n` shuffled row indices into k contiguous folds, sizes differing
/// by at most 1.
pub fn partition_folds(n: usize, k: usize, seed: i64) -> Vec<Vec<usize>> {
    let mut indices: Vec<usize> = (0..n).collect();
    LcgRng::new(seed).shuffle(&mut indices);

    let base = n / k;
    let remainder = n % k;

    let mut folds = Vec::with_capacity(k);
    let mut start = 0;
    for i in 0..k {
        let size = base + usize::from(i < remainder);
        folds.push(indices[start..start + size].to_vec());
        start += size;
    }
    folds
}

/// Run k-fold cross-validation of the given pipeline spec over the dataset.
pub fn cross_validate(
    dataset: &Dataset,
    spec: &PipelineSpec,
    k: usize,
    seed: i64,
) -> Result<CvResult> {
    let n = dataset.len();
    if k < 2 || k > n {
        return Err(TrainerError::FoldCount { folds: k, rows: n });
    }

    let folds = partition_folds(n, k, seed);
    let mut results = Vec::with_capacity(k);

    for (fold_idx, test_indices) in folds.iter().enumerate() {
        let in_test = {
            let mut mask = vec![false; n];
            for &i in test_indices {
                mask[i] = true;
            }
            mask
        };

        let train = Dataset::new(
            dataset
                .records()
                .iter()
                .enumerate()
                .filter(|(i, _)| !in_test[*i])
                .map(|(_, r)| r.clone())
                .collect(),
        );
        let test = Dataset::new(
            test_indices
                .iter()
                .map(|&i| dataset.records()[i].clone())
                .collect(),
        );

        let pipeline = spec.fit(&train)?;
        let metrics = evaluate_pipeline(&pipeline, &test)?;
        tracing::info!(
            fold = fold_idx + 1,
            accuracy = metrics.accuracy,
            f1 = metrics.f1,
            "fold evaluated"
        );
        results.push(metrics);
    }

    let mean = aggregate(&results, |values| mean_of(values));
    let variance = aggregate(&results, |values| {
        let m = mean_of(values);
        mean_of(&values.iter().map(|v| (v - m) * (v - m)).collect::<Vec<_>>())
    });

    Ok(CvResult {
        folds: results,
        mean,
        variance,
    })
}

fn mean_of(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn aggregate(folds: &[Metrics], f: impl Fn(&[f64]) -> f64) -> MetricsAggregate {
    let collect = |pick: fn(&Metrics) -> f64| folds.iter().map(pick).collect::<Vec<_>>();
    MetricsAggregate {
        accuracy: f(&collect(|m| m.accuracy)),
        precision: f(&collect(|m| m.precision)),
        recall: f(&collect(|m| m.recall)),
        f1: f(&collect(|m| m.f1)),
    }
}
