//! Benchmark configuration
//!
//! A benchmark is described by one TOML file:
//!
//! ```toml
//! num_repeats = 10
//! metrics = ["accuracy", "mae"]
//!
//! [paths]
//! raw_dir = "tables/benchmark_raw"
//!
//! [[datasets]]
//! name = "linear"
//! parameters = { n_samples = 50, slope = 2.0 }
//!
//! [[methods]]
//! name = "example_method"
//! kind = "affine"
//! parameters = { param1 = 2.0, param2 = 0.0 }
//!
//! [export]
//! metrics = ["accuracy"]
//! percentage = true
//!
//! [display.methods]
//! example_method = "Example"
//! ```

use crate::aggregate::Formatter;
use crate::export::{DisplayNames, TableExporter};
use crate::registry::{DatasetDescriptor, DatasetRegistry, MethodRegistry, Parameters};
use crate::runner::{Benchmark, DEFAULT_NUM_REPEATS};
use crate::store::ResultStore;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Top-level benchmark configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BenchmarkConfig {
    /// Target repeats per (dataset, method)
    #[serde(default = "default_num_repeats")]
    pub num_repeats: u64,
    /// Metrics requested from the evaluator
    #[serde(default)]
    pub metrics: Vec<String>,
    /// Result directories
    #[serde(default)]
    pub paths: PathsConfig,
    /// Datasets, in run and column order
    #[serde(default)]
    pub datasets: Vec<DatasetDescriptor>,
    /// Methods, in run and row order
    #[serde(default)]
    pub methods: Vec<MethodConfig>,
    /// Table export settings
    #[serde(default)]
    pub export: ExportConfig,
    /// Display-name overrides
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            num_repeats: DEFAULT_NUM_REPEATS,
            metrics: Vec::new(),
            paths: PathsConfig::default(),
            datasets: Vec::new(),
            methods: Vec::new(),
            export: ExportConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

const fn default_num_repeats() -> u64 {
    DEFAULT_NUM_REPEATS
}

/// Where raw, formatted and exported tables live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Raw per-repeat tables
    pub raw_dir: PathBuf,
    /// Formatted summary tables
    pub formatted_dir: PathBuf,
    /// Exported LaTeX tables
    pub tex_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            raw_dir: PathBuf::from("tables/benchmark_raw"),
            formatted_dir: PathBuf::from("tables/benchmark_formatted"),
            tex_dir: PathBuf::from("tables/tex"),
        }
    }
}

/// A method entry: result-table name, built-in kind and parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodConfig {
    /// Name used in result tables
    pub name: String,
    /// Built-in implementation (`affine`, `constant`)
    pub kind: String,
    /// Method parameters
    #[serde(default)]
    pub parameters: Parameters,
}

/// Export settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Metrics to export, one table each (empty: the benchmark metrics)
    pub metrics: Vec<String>,
    /// Scale means and standard deviations by 100
    pub percentage: bool,
    /// Datasets to include (empty: all configured datasets)
    pub datasets: Vec<String>,
    /// Methods to include (empty: all configured methods)
    pub methods: Vec<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            metrics: Vec::new(),
            percentage: true,
            datasets: Vec::new(),
            methods: Vec::new(),
        }
    }
}

/// Display-name overrides for exported tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Method name to display name
    pub methods: HashMap<String, String>,
    /// Dataset name to display name
    pub datasets: HashMap<String, String>,
}

impl BenchmarkConfig {
    /// Parse a configuration from TOML text.
    ///
    /// # Errors
    /// Returns `Error::Config` if the text is not a valid configuration
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load a configuration file.
    ///
    /// # Errors
    /// Returns `Error::Io` if the file cannot be read, `Error::Config` if it
    /// cannot be parsed
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Names of the configured datasets.
    #[must_use]
    pub fn dataset_names(&self) -> Vec<String> {
        self.datasets.iter().map(|d| d.name.clone()).collect()
    }

    /// Names of the configured methods.
    #[must_use]
    pub fn method_names(&self) -> Vec<String> {
        self.methods.iter().map(|m| m.name.clone()).collect()
    }

    /// Metrics to export: `export.metrics`, else the benchmark metrics.
    #[must_use]
    pub fn export_metrics(&self) -> Vec<String> {
        if self.export.metrics.is_empty() {
            self.metrics.clone()
        } else {
            self.export.metrics.clone()
        }
    }

    /// Datasets to export: `export.datasets`, else all configured datasets.
    #[must_use]
    pub fn export_datasets(&self) -> Vec<String> {
        if self.export.datasets.is_empty() {
            self.dataset_names()
        } else {
            self.export.datasets.clone()
        }
    }

    /// Methods to export: `export.methods`, else all configured methods.
    #[must_use]
    pub fn export_methods(&self) -> Vec<String> {
        if self.export.methods.is_empty() {
            self.method_names()
        } else {
            self.export.methods.clone()
        }
    }

    /// Result store for the raw tables.
    #[must_use]
    pub fn store(&self) -> ResultStore {
        ResultStore::new(&self.paths.raw_dir)
    }

    /// Formatter from the raw to the formatted directory.
    #[must_use]
    pub fn formatter(&self) -> Formatter {
        Formatter::new(self.store(), &self.paths.formatted_dir)
    }

    /// Table exporter with the configured display names.
    #[must_use]
    pub fn exporter(&self) -> TableExporter {
        TableExporter::new(DisplayNames::from_maps(
            self.display.methods.clone(),
            self.display.datasets.clone(),
        ))
    }

    /// Build the method registry from the `[[methods]]` entries.
    ///
    /// # Errors
    /// Returns `Error::UnknownMethod` for an unknown kind or
    /// `Error::InvalidInput` for a duplicate name
    pub fn method_registry(&self) -> Result<MethodRegistry> {
        let mut registry = MethodRegistry::new();
        for method in &self.methods {
            registry.register_kind(&method.name, &method.kind, method.parameters.clone())?;
        }
        Ok(registry)
    }

    /// Build a benchmark using `datasets` for loading.
    ///
    /// # Errors
    /// Returns error if a configured dataset has no loader or a method
    /// cannot be built
    pub fn benchmark(&self, datasets: DatasetRegistry) -> Result<Benchmark> {
        if let Some(missing) = self.datasets.iter().find(|d| !datasets.contains(&d.name)) {
            return Err(Error::UnknownDataset(missing.name.clone()));
        }

        let builder = self.datasets.iter().cloned().fold(
            Benchmark::builder(self.store()).dataset_registry(datasets),
            |builder, descriptor| builder.dataset(descriptor),
        );
        Ok(builder
            .methods(self.method_registry()?)
            .num_repeats(self.num_repeats)
            .metrics(self.metrics.iter().cloned())
            .build())
    }
}
