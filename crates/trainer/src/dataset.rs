//! Dataset loading, range filtering, and deterministic splitting
//!
//! Reads the semicolon-delimited cardio export (header row, `id` column,
//! eleven feature columns, `cardio` label) into typed records. Column
//! binding goes through the header and the core schema descriptor; there
//! is no positional guessing.

use std::path::Path;

use cardio_core::{column_index, Record, FEATURE_COUNT};

use crate::deterministic::LcgRng;
use crate::errors::{Result, TrainerError};

/// Inclusive range filter over one feature column.
///
/// Constructed up front so a misconfigured bound fails before any data is
/// touched. A row survives only if the value is present and inside
/// [low, high]; a missing value fails the bound.
#[derive(Debug, Clone)]
pub struct FilterSpec {
    pub field: String,
    pub low: f64,
    pub high: f64,
    index: usize,
}

impl FilterSpec {
    pub fn new(field: &str, low: f64, high: f64) -> Result<Self> {
        if low > high {
            return Err(TrainerError::RangeSpec {
                field: field.to_string(),
                low,
                high,
            });
        }
        let index = column_index(field).ok_or_else(|| {
            TrainerError::Model(cardio_core::ModelError::Schema(format!(
                "unknown field '{field}' in range filter"
            )))
        })?;
        Ok(Self {
            field: field.to_string(),
            low,
            high,
            index,
        })
    }

    fn keeps(&self, record: &Record) -> bool {
        match record.values()[self.index] {
            Some(v) => self.low <= v && v <= self.high,
            None => false,
        }
    }
}

/// The medical-cleaning filters the cardio system applies before splitting.
pub fn cardio_filters() -> Result<Vec<FilterSpec>> {
    Ok(vec![
        FilterSpec::new("ap_hi", 70.0, 250.0)?,
        FilterSpec::new("ap_lo", 40.0, 150.0)?,
        FilterSpec::new("weight", 30.0, 200.0)?,
    ])
}

/// Ordered sequence of records. Source order is preserved; only the
/// explicit seeded shuffle reorders.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Load a delimited text file with a header row.
    ///
    /// The header must name every feature column plus `cardio` (the
    /// label); an `id` column, if present, is ignored. Empty cells parse
    /// as missing values.
    pub fn from_delimited_file<P: AsRef<Path>>(path: P, separator: char) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| TrainerError::Dataset(format!("failed to read dataset file: {e}")))?;
        Self::from_delimited(&content, separator)
    }

    /// Parse delimited text with a header row.
    pub fn from_delimited(content: &str, separator: char) -> Result<Self> {
        let mut lines = content.lines().enumerate();

        let (_, header) = lines
            .next()
            .ok_or_else(|| TrainerError::Dataset("dataset is empty".to_string()))?;
        let columns: Vec<&str> = header.split(separator).map(|c| c.trim()).collect();

        // Map each feature column and the label to its position in the file.
        let mut feature_pos = [usize::MAX; FEATURE_COUNT];
        for (name, slot) in cardio_core::FEATURE_COLUMNS.iter().zip(feature_pos.iter_mut()) {
            *slot = columns
                .iter()
                .position(|c| c == name)
                .ok_or_else(|| TrainerError::Dataset(format!("header is missing column '{name}'")))?;
        }
        let label_pos = columns
            .iter()
            .position(|c| *c == "cardio")
            .ok_or_else(|| TrainerError::Dataset("header is missing column 'cardio'".to_string()))?;

        let mut records = Vec::new();
        for (line_idx, line) in lines {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let cells: Vec<&str> = line.split(separator).map(|c| c.trim()).collect();
            if cells.len() != columns.len() {
                return Err(TrainerError::Dataset(format!(
                    "line {}: expected {} columns, got {}",
                    line_idx + 1,
                    columns.len(),
                    cells.len()
                )));
            }

            let mut values = [None; FEATURE_COUNT];
            for (slot, &pos) in values.iter_mut().zip(feature_pos.iter()) {
                let cell = cells[pos];
                if cell.is_empty() {
                    continue; // missing value, imputed downstream
                }
                *slot = Some(cell.parse::<f64>().map_err(|_| {
                    TrainerError::Dataset(format!(
                        "line {}: invalid numeric value '{cell}'",
                        line_idx + 1
                    ))
                })?);
            }

            let label_cell = cells[label_pos];
            let label = match label_cell {
                "0" => Some(false),
                "1" => Some(true),
                other => {
                    return Err(TrainerError::Dataset(format!(
                        "line {}: invalid label '{other}'",
                        line_idx + 1
                    )))
                }
            };

            records.push(Record::new(values, label));
        }

        if records.is_empty() {
            return Err(TrainerError::Dataset("dataset has no data rows".to_string()));
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Pure range filter: keeps rows whose value is present and within the
    /// spec's inclusive bounds.
    pub fn filter(&self, spec: &FilterSpec) -> Dataset {
        Dataset {
            records: self
                .records
                .iter()
                .filter(|r| spec.keeps(r))
                .cloned()
                .collect(),
        }
    }

    /// Apply every filter in order; a row must satisfy all of them.
    pub fn filter_all(&self, specs: &[FilterSpec]) -> Dataset {
        let records = self
            .records
            .iter()
            .filter(|r| specs.iter().all(|s| s.keeps(r)))
            .cloned()
            .collect();
        Dataset { records }
    }

    /// Deterministic train/test split: seeded shuffle of row indices, then
    /// the first `ceil(n * test_fraction)` rows become the test set.
    pub fn train_test_split(&self, test_fraction: f64, seed: i64) -> Result<(Dataset, Dataset)> {
        if !(0.0..1.0).contains(&test_fraction) || test_fraction == 0.0 {
            return Err(TrainerError::Dataset(format!(
                "test fraction must be in (0,1), got {test_fraction}"
            )));
        }

        let n = self.records.len();
        let mut indices: Vec<usize> = (0..n).collect();
        LcgRng::new(seed).shuffle(&mut indices);

        let test_count = ((n as f64) * test_fraction).ceil() as usize;
        let (test_idx, train_idx) = indices.split_at(test_count.min(n));

        let pick = |idx: &[usize]| {
            Dataset {
                records: idx.iter().map(|&i| self.records[i].clone()).collect(),
            }
        };
        Ok((pick(train_idx), pick(test_idx)))
    }

    /// Labels of every record; training data must be fully labeled.
    pub fn labels(&self) -> Result<Vec<bool>> {
        self.records
            .iter()
            .enumerate()
            .map(|(i, r)| {
                r.label()
                    .ok_or_else(|| TrainerError::Dataset(format!("row {i} has no label")))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
id;age;gender;height;weight;ap_hi;ap_lo;cholesterol;gluc;smoke;alco;active;cardio
0;18393;2;168;62.0;110;80;1;1;0;0;1;0
1;20228;1;156;85.0;140;90;3;1;0;0;1;1
2;18857;1;165;;130;70;3;1;0;0;0;1
3;17623;2;169;82.0;300;100;1;1;0;0;1;1
";

    #[test]
    fn test_parse_preserves_order_and_missing_values() {
        let ds = Dataset::from_delimited(SAMPLE, ';').unwrap();
        assert_eq!(ds.len(), 4);
        assert_eq!(ds.records()[0].get("age").unwrap(), Some(18393.0));
        assert_eq!(ds.records()[2].get("weight").unwrap(), None);
        assert_eq!(ds.records()[1].label(), Some(true));
    }

    #[test]
    fn test_range_filter_inclusive_bounds() {
        let ds = Dataset::from_delimited(SAMPLE, ';').unwrap();
        let spec = FilterSpec::new("ap_hi", 70.0, 250.0).unwrap();
        let kept = ds.filter(&spec);
        // Row 3 has ap_hi = 300, strictly outside the bound.
        assert_eq!(kept.len(), 3);
        for r in kept.records() {
            let v = r.get("ap_hi").unwrap().unwrap();
            assert!((70.0..=250.0).contains(&v));
        }
    }

    #[test]
    fn test_range_filter_drops_missing_values() {
        let ds = Dataset::from_delimited(SAMPLE, ';').unwrap();
        let spec = FilterSpec::new("weight", 30.0, 200.0).unwrap();
        let kept = ds.filter(&spec);
        // Row 2 has no weight at all.
        assert_eq!(kept.len(), 3);
    }

    #[test]
    fn test_bad_range_spec_fails_at_configuration() {
        match FilterSpec::new("ap_hi", 250.0, 70.0) {
            Err(TrainerError::RangeSpec { field, low, high }) => {
                assert_eq!(field, "ap_hi");
                assert_eq!(low, 250.0);
                assert_eq!(high, 70.0);
            }
            other => panic!("expected RangeSpec error, got {other:?}"),
        }
    }

    #[test]
    fn test_split_is_deterministic_and_disjoint() {
        let ds = Dataset::from_delimited(SAMPLE, ';').unwrap();
        let (train1, test1) = ds.train_test_split(0.25, 42).unwrap();
        let (train2, test2) = ds.train_test_split(0.25, 42).unwrap();

        assert_eq!(train1.records(), train2.records());
        assert_eq!(test1.records(), test2.records());
        assert_eq!(train1.len() + test1.len(), ds.len());
        assert_eq!(test1.len(), 1);
    }

    #[test]
    fn test_missing_header_column_is_an_error() {
        let broken = "id;age;gender\n0;18393;2\n";
        assert!(matches!(
            Dataset::from_delimited(broken, ';'),
            Err(TrainerError::Dataset(_))
        ));
    }
}
