//! Table Exporter - combined LaTeX tables across datasets
//!
//! ## Pipeline
//!
//! ```text
//! <dataset>__formatted.csv (one per dataset)
//!     │ filter metric
//!     ▼
//! outer join on method ──> keep selected methods ──> rank means per column
//!     │
//!     ▼
//! benchmark_<metric>.tex
//! ```
//!
//! Each dataset column marks its highest mean as best and the runner-up as
//! second. Methods without a result on a dataset get a missing cell there,
//! never an error. Ties go to the method listed first.

mod latex;
mod names;

pub use latex::{format_cell, render_table, MISSING_CELL};
pub use names::{title_case, DisplayNames};

use crate::aggregate::read_formatted;
use crate::rank::{top_k_indices, SortOrder};
use crate::record::SummaryRecord;
use crate::{Error, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// Highlighting of a cell within its dataset column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellStyle {
    /// Highest mean in the column
    Best,
    /// Second-highest mean in the column
    Second,
    /// No highlighting
    #[default]
    Plain,
}

/// One (method, dataset) cell of a combined table.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CombinedCell {
    /// Mean, if the method has a result on the dataset
    pub mean: Option<f64>,
    /// Standard deviation, if defined
    pub std: Option<f64>,
    /// Highlighting
    pub style: CellStyle,
}

/// One method row of a combined table.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedRow {
    method: String,
    cells: Vec<CombinedCell>,
}

impl CombinedRow {
    /// Method name.
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// One cell per dataset, in dataset order.
    #[must_use]
    pub fn cells(&self) -> &[CombinedCell] {
        &self.cells
    }
}

/// Methods × datasets table for a single metric.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedTable {
    datasets: Vec<String>,
    rows: Vec<CombinedRow>,
}

impl CombinedTable {
    /// Join per-dataset formatted tables on method name.
    ///
    /// `tables` holds `(dataset, formatted rows)` in column order. Only rows
    /// for `metric` are used. A method gets a row if it is listed in
    /// `methods` and has a result on at least one dataset; rows follow the
    /// order of `methods`.
    #[must_use]
    pub fn join(tables: &[(String, Vec<SummaryRecord>)], metric: &str, methods: &[String]) -> Self {
        let datasets: Vec<String> = tables.iter().map(|(name, _)| name.clone()).collect();

        let mut joined: HashMap<&str, Vec<CombinedCell>> = HashMap::new();
        for (column, (_, rows)) in tables.iter().enumerate() {
            for row in rows.iter().filter(|r| r.metric() == metric) {
                let cells = joined
                    .entry(row.method())
                    .or_insert_with(|| vec![CombinedCell::default(); tables.len()]);
                cells[column] = CombinedCell {
                    mean: Some(row.mean()).filter(|m| !m.is_nan()),
                    std: row.std(),
                    style: CellStyle::Plain,
                };
            }
        }

        let mut rows: Vec<CombinedRow> = Vec::new();
        for method in methods {
            if rows.iter().any(|r| &r.method == method) {
                continue;
            }
            if let Some(cells) = joined.remove(method.as_str()) {
                rows.push(CombinedRow {
                    method: method.clone(),
                    cells,
                });
            }
        }

        let mut table = Self { datasets, rows };
        table.assign_styles();
        table
    }

    fn assign_styles(&mut self) {
        for column in 0..self.datasets.len() {
            let means: Vec<Option<f64>> = self.rows.iter().map(|r| r.cells[column].mean).collect();
            let ranked = top_k_indices(&means, 2, SortOrder::Descending);
            for (rank, row) in ranked.into_iter().enumerate() {
                self.rows[row].cells[column].style = if rank == 0 {
                    CellStyle::Best
                } else {
                    CellStyle::Second
                };
            }
        }
    }

    /// Dataset names, in column order.
    #[must_use]
    pub fn datasets(&self) -> &[String] {
        &self.datasets
    }

    /// Method rows.
    #[must_use]
    pub fn rows(&self) -> &[CombinedRow] {
        &self.rows
    }

    /// Row for `method`, if present.
    #[must_use]
    pub fn row(&self, method: &str) -> Option<&CombinedRow> {
        self.rows.iter().find(|r| r.method == method)
    }
}

/// File name of the exported table for `metric`.
#[must_use]
pub fn export_file_name(metric: &str) -> String {
    format!("benchmark_{metric}.tex")
}

/// Writes combined LaTeX tables from formatted result tables.
#[derive(Debug, Clone, Default)]
pub struct TableExporter {
    names: DisplayNames,
}

impl TableExporter {
    /// Exporter using `names` for row and column labels.
    #[must_use]
    pub const fn new(names: DisplayNames) -> Self {
        Self { names }
    }

    /// Display names in use.
    #[must_use]
    pub const fn names(&self) -> &DisplayNames {
        &self.names
    }

    /// Load the formatted tables of `datasets` and combine them for `metric`.
    ///
    /// # Errors
    /// Returns `Error::Io` (kind `NotFound`) if any dataset has no formatted
    /// table in `results_dir`
    pub fn combine(
        &self,
        datasets: &[String],
        methods: &[String],
        metric: &str,
        results_dir: &Path,
    ) -> Result<CombinedTable> {
        let tables = datasets
            .iter()
            .map(|d| Ok((d.clone(), read_formatted(results_dir, d)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(CombinedTable::join(&tables, metric, methods))
    }

    /// Export the combined table for `metric` to
    /// `<output_dir>/benchmark_<metric>.tex` and return its path.
    ///
    /// # Errors
    /// Returns `Error::InvalidInput` if `datasets` is empty, or `Error::Io`
    /// if a formatted table is missing or the output cannot be written
    pub fn export_table(
        &self,
        datasets: &[String],
        methods: &[String],
        metric: &str,
        as_percentage: bool,
        results_dir: &Path,
        output_dir: &Path,
    ) -> Result<PathBuf> {
        if datasets.is_empty() {
            return Err(Error::InvalidInput(format!(
                "No datasets selected for the {metric} table"
            )));
        }
        let table = self.combine(datasets, methods, metric, results_dir)?;
        let latex = render_table(&table, metric, &self.names, as_percentage);

        std::fs::create_dir_all(output_dir)?;
        let path = output_dir.join(export_file_name(metric));
        std::fs::write(&path, latex)?;

        info!("LaTeX table saved to {}", path.display());
        Ok(path)
    }
}
