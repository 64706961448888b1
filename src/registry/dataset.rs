//! Dataset registry - maps dataset names to loaders

use super::{param_f64, param_usize, Parameters};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A loaded dataset: feature rows `X` and targets `Y`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    /// Feature rows
    pub features: Vec<Vec<f64>>,
    /// One target per feature row
    pub targets: Vec<f64>,
}

impl Dataset {
    /// Create a dataset, checking that `features` and `targets` line up.
    ///
    /// # Errors
    /// Returns `Error::InvalidInput` if the lengths differ
    pub fn new(features: Vec<Vec<f64>>, targets: Vec<f64>) -> Result<Self> {
        if features.len() != targets.len() {
            return Err(Error::InvalidInput(format!(
                "{} feature rows but {} targets",
                features.len(),
                targets.len()
            )));
        }
        Ok(Self { features, targets })
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether the dataset has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Names a dataset and the parameters passed to its loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetDescriptor {
    /// Registered dataset name
    pub name: String,
    /// Loader parameters
    #[serde(default)]
    pub parameters: Parameters,
}

impl DatasetDescriptor {
    /// Descriptor with no parameters.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Parameters::new(),
        }
    }

    /// Descriptor with loader parameters.
    #[must_use]
    pub fn with_parameters(name: impl Into<String>, parameters: Parameters) -> Self {
        Self {
            name: name.into(),
            parameters,
        }
    }
}

/// Loads one dataset from its parameters.
pub trait DatasetLoader: Send + Sync {
    /// Load the dataset.
    ///
    /// # Errors
    /// Returns error if the parameters are invalid or the data cannot be read
    fn load(&self, parameters: &Parameters) -> Result<Dataset>;
}

impl<F> DatasetLoader for F
where
    F: Fn(&Parameters) -> Result<Dataset> + Send + Sync,
{
    fn load(&self, parameters: &Parameters) -> Result<Dataset> {
        self(parameters)
    }
}

/// Deterministic regression data: `y = slope * x + intercept` for
/// `x = 0, 1, ..., n_samples - 1`.
///
/// Parameters: `n_samples` (default 100), `slope` (default 1.0),
/// `intercept` (default 0.0).
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearLoader;

impl DatasetLoader for LinearLoader {
    #[allow(clippy::cast_precision_loss)]
    fn load(&self, parameters: &Parameters) -> Result<Dataset> {
        let n = param_usize(parameters, "n_samples", 100)?;
        let slope = param_f64(parameters, "slope", 1.0)?;
        let intercept = param_f64(parameters, "intercept", 0.0)?;

        let features: Vec<Vec<f64>> = (0..n).map(|i| vec![i as f64]).collect();
        let targets = features.iter().map(|x| slope * x[0] + intercept).collect();
        Dataset::new(features, targets)
    }
}

/// Name-to-loader map.
#[derive(Clone, Default)]
pub struct DatasetRegistry {
    loaders: BTreeMap<String, Arc<dyn DatasetLoader>>,
}

impl fmt::Debug for DatasetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatasetRegistry")
            .field("datasets", &self.names())
            .finish()
    }
}

impl DatasetRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in `linear` loader.
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register("linear", LinearLoader);
        registry
    }

    /// Register (or replace) a loader under `name`.
    pub fn register(&mut self, name: impl Into<String>, loader: impl DatasetLoader + 'static) {
        self.loaders.insert(name.into(), Arc::new(loader));
    }

    /// Whether a loader is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.loaders.contains_key(name)
    }

    /// Registered dataset names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.loaders.keys().map(String::as_str).collect()
    }

    /// Load the dataset named by `descriptor`.
    ///
    /// # Errors
    /// Returns `Error::UnknownDataset` if no loader is registered under the
    /// name, or the loader's own error
    pub fn load(&self, descriptor: &DatasetDescriptor) -> Result<Dataset> {
        let loader = self
            .loaders
            .get(&descriptor.name)
            .ok_or_else(|| Error::UnknownDataset(descriptor.name.clone()))?;
        loader.load(&descriptor.parameters)
    }
}
