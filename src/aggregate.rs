//! Formatter - aggregate raw per-repeat results into summary tables
//!
//! Groups a raw table by `(method, metric)` and computes, per group:
//!
//! - `repeat_tol`: number of raw rows
//! - `mean_val`: arithmetic mean
//! - `std_val`: sample standard deviation (n - 1 denominator), missing for
//!   fewer than two rows
//!
//! The formatted table is a pure function of the raw table. It is always
//! regenerated in full and written over the previous version, so running
//! the formatter twice yields the same file.

use crate::record::{SummaryRecord, TrialRecord};
use crate::store::ResultStore;
use crate::table;
use crate::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Formatted-table file name suffix.
pub const FORMATTED_SUFFIX: &str = "__formatted.csv";

/// Aggregate trial records into one summary per `(method, metric)`.
///
/// Rows are ordered by method, then metric.
#[must_use]
pub fn summarize(trials: &[TrialRecord]) -> Vec<SummaryRecord> {
    let mut groups: BTreeMap<(&str, &str), Vec<f64>> = BTreeMap::new();
    for trial in trials {
        groups
            .entry((trial.method(), trial.metric()))
            .or_default()
            .push(trial.value());
    }

    groups
        .into_iter()
        .map(|((method, metric), values)| {
            let (mean, std) = mean_std(&values);
            SummaryRecord::new(method, metric, values.len() as u64, mean, std)
        })
        .collect()
}

/// Mean and sample standard deviation of `values`.
///
/// The standard deviation is `None` for fewer than two values.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean_std(values: &[f64]) -> (f64, Option<f64>) {
    if values.is_empty() {
        return (f64::NAN, None);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if values.len() < 2 {
        return (mean, None);
    }
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (mean, Some((sum_sq / (n - 1.0)).sqrt()))
}

/// Path of the formatted table for `dataset` inside `formatted_dir`.
#[must_use]
pub fn formatted_path(formatted_dir: &Path, dataset: &str) -> PathBuf {
    formatted_dir.join(format!("{dataset}{FORMATTED_SUFFIX}"))
}

/// Read the formatted table for `dataset`.
///
/// # Errors
/// Returns `Error::Io` (kind `NotFound`) if the table has not been produced
/// yet, or a decode error if it is malformed
pub fn read_formatted(formatted_dir: &Path, dataset: &str) -> Result<Vec<SummaryRecord>> {
    let mut rows = Vec::new();
    for batch in table::read_csv(&formatted_path(formatted_dir, dataset), table::formatted_schema())? {
        rows.extend(table::batch_to_summaries(&batch)?);
    }
    Ok(rows)
}

/// Turns raw tables from a [`ResultStore`] into formatted tables.
#[derive(Debug, Clone)]
pub struct Formatter {
    store: ResultStore,
    formatted_dir: PathBuf,
}

impl Formatter {
    /// Create a formatter reading from `store` and writing to `formatted_dir`.
    #[must_use]
    pub fn new(store: ResultStore, formatted_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            formatted_dir: formatted_dir.into(),
        }
    }

    /// Directory the formatted tables are written to.
    #[must_use]
    pub fn formatted_dir(&self) -> &Path {
        &self.formatted_dir
    }

    /// Regenerate the formatted table for `dataset`.
    ///
    /// Returns `Ok(None)` without writing anything when the dataset has no
    /// raw table.
    ///
    /// # Errors
    /// Returns error if the raw table is unreadable or the output cannot be
    /// written
    pub fn format_results(&self, dataset: &str) -> Result<Option<Vec<SummaryRecord>>> {
        let Some(trials) = self.store.read_raw(dataset)? else {
            warn!(
                "No raw results found for dataset {dataset} in {}",
                self.store.raw_dir().display()
            );
            return Ok(None);
        };

        let summaries = summarize(&trials);

        std::fs::create_dir_all(&self.formatted_dir)?;
        let path = formatted_path(&self.formatted_dir, dataset);
        table::write_csv(&path, &table::summaries_to_batch(&summaries)?)?;

        info!("Formatted results saved to {}", path.display());
        Ok(Some(summaries))
    }
}
