//! Result Store - append-only raw benchmark results, one table per dataset
//!
//! Raw tables live at `<raw_dir>/<dataset>__raw.csv` with columns
//! `method,repeat,metric,value`. Writes are read-then-append: the store
//! reads the existing table to find the next repeat index for a method and
//! then appends new rows. Nothing is ever rewritten, so a sweep can be
//! interrupted and resumed.
//!
//! Concurrent processes appending to the same table are not safe: there is
//! no file locking.

use crate::record::{Scores, TrialRecord};
use crate::table;
use crate::Result;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Raw-table file name suffix.
pub const RAW_SUFFIX: &str = "__raw.csv";

/// Append-only store for raw per-repeat results.
#[derive(Debug, Clone)]
pub struct ResultStore {
    raw_dir: PathBuf,
}

impl ResultStore {
    /// Create a store rooted at `raw_dir`. The directory is created lazily on
    /// first append.
    #[must_use]
    pub fn new(raw_dir: impl Into<PathBuf>) -> Self {
        Self {
            raw_dir: raw_dir.into(),
        }
    }

    /// Directory holding the raw tables.
    #[must_use]
    pub fn raw_dir(&self) -> &Path {
        &self.raw_dir
    }

    /// Path of the raw table for `dataset`.
    #[must_use]
    pub fn raw_path(&self, dataset: &str) -> PathBuf {
        self.raw_dir.join(format!("{dataset}{RAW_SUFFIX}"))
    }

    /// Read the full raw table for `dataset`.
    ///
    /// Returns `Ok(None)` if no table exists yet.
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read or decoded
    pub fn read_raw(&self, dataset: &str) -> Result<Option<Vec<TrialRecord>>> {
        let path = self.raw_path(dataset);
        if !path.exists() {
            return Ok(None);
        }

        let mut trials = Vec::new();
        for batch in table::read_csv(&path, table::raw_schema())? {
            trials.extend(table::batch_to_trials(&batch)?);
        }
        Ok(Some(trials))
    }

    /// Number of repeats already completed for `method` on `dataset`.
    ///
    /// - No table, or no rows for the method: 0
    /// - Empty `metrics`: highest recorded repeat index + 1
    /// - Otherwise: the smallest number of distinct repeats recorded for any
    ///   of the requested metrics (0 if none of them has rows). A repeat only
    ///   counts as done once every requested metric is present.
    ///
    /// # Errors
    /// Returns error if the raw table exists but cannot be read
    pub fn count_existing_repeats(
        &self,
        dataset: &str,
        method: &str,
        metrics: &[String],
    ) -> Result<u64> {
        let Some(trials) = self.read_raw(dataset)? else {
            return Ok(0);
        };

        let existing: Vec<&TrialRecord> = trials.iter().filter(|t| t.method() == method).collect();
        if existing.is_empty() {
            return Ok(0);
        }

        if metrics.is_empty() {
            return Ok(next_repeat(existing.iter().copied()));
        }

        let mut repeats_per_metric: BTreeMap<&str, BTreeSet<u64>> = metrics
            .iter()
            .map(|m| (m.as_str(), BTreeSet::new()))
            .collect();
        let mut matched = false;
        for trial in existing {
            if let Some(repeats) = repeats_per_metric.get_mut(trial.metric()) {
                repeats.insert(trial.repeat());
                matched = true;
            }
        }
        if !matched {
            return Ok(0);
        }

        let complete = repeats_per_metric
            .values()
            .map(|repeats| repeats.len() as u64)
            .min()
            .unwrap_or(0);
        debug!(dataset, method, complete, "counted existing repeats");
        Ok(complete)
    }

    /// Append the scores of consecutive repeats for `method` on `dataset`.
    ///
    /// Repeat indices continue after the highest index already recorded for
    /// the method (0 if none). Returns the number of rows written; an empty
    /// `repeats` slice writes nothing.
    ///
    /// # Errors
    /// Returns error if the existing table cannot be read or the append fails
    pub fn append_repeats(&self, dataset: &str, method: &str, repeats: &[Scores]) -> Result<usize> {
        let offset = self
            .read_raw(dataset)?
            .map_or(0, |trials| next_repeat(trials.iter().filter(|t| t.method() == method)));

        let rows: Vec<TrialRecord> = repeats
            .iter()
            .zip(offset..)
            .flat_map(|(scores, repeat)| {
                scores
                    .iter()
                    .map(move |(metric, value)| TrialRecord::new(method, repeat, metric.as_str(), *value))
            })
            .collect();

        if rows.is_empty() {
            debug!(dataset, method, "no repeats to append");
            return Ok(0);
        }

        std::fs::create_dir_all(&self.raw_dir)?;
        let path = self.raw_path(dataset);
        table::append_csv(&path, &table::trials_to_batch(&rows)?)?;

        info!(
            "[{dataset} -- {method}] {} raw rows appended to {}",
            rows.len(),
            path.display()
        );
        Ok(rows.len())
    }
}

/// Highest repeat index + 1, or 0 for no trials.
fn next_repeat<'a>(trials: impl Iterator<Item = &'a TrialRecord>) -> u64 {
    trials.map(TrialRecord::repeat).max().map_or(0, |max| max + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(pairs: &[(&str, f64)]) -> Scores {
        pairs.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
    }

    #[test]
    fn test_count_without_table_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path());
        assert_eq!(store.count_existing_repeats("iris", "svm", &[]).unwrap(), 0);
        assert!(store.read_raw("iris").unwrap().is_none());
    }

    #[test]
    fn test_count_unknown_method_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path());
        store
            .append_repeats("iris", "svm", &[scores(&[("accuracy", 0.9)])])
            .unwrap();
        assert_eq!(store.count_existing_repeats("iris", "knn", &[]).unwrap(), 0);
    }

    #[test]
    fn test_count_empty_metrics_uses_max_repeat() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path());
        let repeats = vec![scores(&[("accuracy", 0.9)]); 4];
        store.append_repeats("iris", "svm", &repeats).unwrap();
        assert_eq!(store.count_existing_repeats("iris", "svm", &[]).unwrap(), 4);
    }

    #[test]
    fn test_count_limited_by_least_complete_metric() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path());
        store
            .append_repeats(
                "iris",
                "svm",
                &[
                    scores(&[("accuracy", 0.9), ("f1", 0.8)]),
                    scores(&[("accuracy", 0.9)]),
                    scores(&[("accuracy", 0.9)]),
                ],
            )
            .unwrap();

        let both = vec!["accuracy".to_string(), "f1".to_string()];
        assert_eq!(store.count_existing_repeats("iris", "svm", &both).unwrap(), 1);
        let acc = vec!["accuracy".to_string()];
        assert_eq!(store.count_existing_repeats("iris", "svm", &acc).unwrap(), 3);
    }

    #[test]
    fn test_count_requested_metric_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path());
        store
            .append_repeats("iris", "svm", &[scores(&[("accuracy", 0.9)])])
            .unwrap();

        let none = vec!["mse".to_string()];
        assert_eq!(store.count_existing_repeats("iris", "svm", &none).unwrap(), 0);
        let partial = vec!["accuracy".to_string(), "mse".to_string()];
        assert_eq!(store.count_existing_repeats("iris", "svm", &partial).unwrap(), 0);
    }

    #[test]
    fn test_append_continues_repeat_numbering() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path());
        store
            .append_repeats("iris", "svm", &vec![scores(&[("accuracy", 0.5)]); 2])
            .unwrap();
        store
            .append_repeats("iris", "knn", &[scores(&[("accuracy", 0.4)])])
            .unwrap();
        store
            .append_repeats("iris", "svm", &vec![scores(&[("accuracy", 0.6)]); 3])
            .unwrap();

        let trials = store.read_raw("iris").unwrap().unwrap();
        let svm: Vec<u64> = trials
            .iter()
            .filter(|t| t.method() == "svm")
            .map(TrialRecord::repeat)
            .collect();
        assert_eq!(svm, vec![0, 1, 2, 3, 4]);
        let knn: Vec<u64> = trials
            .iter()
            .filter(|t| t.method() == "knn")
            .map(TrialRecord::repeat)
            .collect();
        assert_eq!(knn, vec![0]);
    }

    #[test]
    fn test_append_empty_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResultStore::new(dir.path().join("raw"));
        assert_eq!(store.append_repeats("iris", "svm", &[]).unwrap(), 0);
        assert!(!store.raw_path("iris").exists());
    }
}
