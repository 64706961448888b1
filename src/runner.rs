//! Repeat runner - executes benchmark sweeps with resume
//!
//! A sweep visits `(dataset, method, repeat)` triples one at a time:
//!
//! ```text
//! for dataset in datasets:            load once via DatasetRegistry
//!     for method in methods:          existing = store.count_existing_repeats(..)
//!         for repeat in existing..N:  scores = evaluator.evaluate(..)
//!         store.append_repeats(..)    one append per (dataset, method)
//! ```
//!
//! Repeats already present in the raw table are skipped, so re-running an
//! interrupted sweep only fills in what is missing. A failed evaluation
//! aborts the sweep; nothing is retried.

use crate::evaluate::{Evaluator, MetricEvaluator};
use crate::record::Scores;
use crate::registry::{Dataset, DatasetDescriptor, DatasetRegistry, MethodDescriptor, MethodRegistry};
use crate::store::ResultStore;
use crate::Result;
use std::fmt;
use std::sync::Arc;
use tracing::{info, info_span};

/// Default number of repeats per method and dataset.
pub const DEFAULT_NUM_REPEATS: u64 = 100;

/// Run one repeat of `method` on `dataset`.
///
/// # Errors
/// Propagates the evaluator's error
pub fn run_one_repeat(
    method: &MethodDescriptor,
    dataset: &Dataset,
    metrics: &[String],
    evaluator: &dyn Evaluator,
) -> Result<Scores> {
    evaluator.evaluate(method, dataset, metrics)
}

/// Outcome of one method on one dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodRun {
    /// Method name
    pub method: String,
    /// Repeats found in the raw table before this run
    pub resumed_from: u64,
    /// Scores of the repeats executed by this run, in order
    pub scores: Vec<Scores>,
}

/// Outcome of all methods on one dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetRun {
    /// Dataset name
    pub dataset: String,
    /// Per-method outcomes in registration order
    pub methods: Vec<MethodRun>,
}

impl DatasetRun {
    /// Total number of repeats executed across methods.
    #[must_use]
    pub fn executed(&self) -> usize {
        self.methods.iter().map(|m| m.scores.len()).sum()
    }
}

/// A benchmark configuration: what to run, how often, and where results go.
#[derive(Clone)]
pub struct Benchmark {
    datasets: Vec<DatasetDescriptor>,
    dataset_registry: DatasetRegistry,
    methods: MethodRegistry,
    evaluator: Arc<dyn Evaluator>,
    store: ResultStore,
    num_repeats: u64,
    metrics: Vec<String>,
}

impl fmt::Debug for Benchmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Benchmark")
            .field("datasets", &self.datasets)
            .field("methods", &self.methods.names())
            .field("store", &self.store)
            .field("num_repeats", &self.num_repeats)
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

impl Benchmark {
    /// Create a benchmark builder writing raw results to `store`.
    #[must_use]
    pub fn builder(store: ResultStore) -> BenchmarkBuilder {
        BenchmarkBuilder::new(store)
    }

    /// The result store.
    #[must_use]
    pub const fn store(&self) -> &ResultStore {
        &self.store
    }

    /// Configured datasets, in run order.
    #[must_use]
    pub fn datasets(&self) -> &[DatasetDescriptor] {
        &self.datasets
    }

    /// Registered methods.
    #[must_use]
    pub const fn methods(&self) -> &MethodRegistry {
        &self.methods
    }

    /// Target number of repeats per method and dataset.
    #[must_use]
    pub const fn num_repeats(&self) -> u64 {
        self.num_repeats
    }

    /// Metrics requested from the evaluator.
    #[must_use]
    pub fn metrics(&self) -> &[String] {
        &self.metrics
    }

    /// Run every method on one dataset, resuming from existing results.
    ///
    /// # Errors
    /// Returns `Error::UnknownDataset` if the dataset is not registered, or
    /// any evaluation or storage error
    pub fn run_dataset(&self, descriptor: &DatasetDescriptor) -> Result<DatasetRun> {
        let dataset_name = descriptor.name.as_str();
        let _span = info_span!("dataset", name = dataset_name).entered();
        let data = self.dataset_registry.load(descriptor)?;

        let mut methods = Vec::with_capacity(self.methods.len());
        for method in self.methods.iter() {
            let method_name = method.name.as_str();
            let existing =
                self.store
                    .count_existing_repeats(dataset_name, method_name, &self.metrics)?;

            let mut repeats = Vec::new();
            for repeat in existing..self.num_repeats {
                info!(
                    "Running method {method_name} on dataset {dataset_name}, repeat {}/{}",
                    repeat + 1,
                    self.num_repeats
                );
                repeats.push(run_one_repeat(method, &data, &self.metrics, self.evaluator.as_ref())?);
            }

            info!(
                "[{dataset_name}] Completed [{}] repeats for {method_name}",
                self.num_repeats.saturating_sub(existing)
            );
            self.store.append_repeats(dataset_name, method_name, &repeats)?;

            methods.push(MethodRun {
                method: method.name.clone(),
                resumed_from: existing,
                scores: repeats,
            });
        }

        Ok(DatasetRun {
            dataset: descriptor.name.clone(),
            methods,
        })
    }

    /// Run every configured dataset in order.
    ///
    /// # Errors
    /// Stops at the first failing dataset and returns its error
    pub fn run_all(&self) -> Result<Vec<DatasetRun>> {
        self.datasets.iter().map(|d| self.run_dataset(d)).collect()
    }
}

/// Builder for [`Benchmark`].
pub struct BenchmarkBuilder {
    datasets: Vec<DatasetDescriptor>,
    dataset_registry: DatasetRegistry,
    methods: MethodRegistry,
    evaluator: Arc<dyn Evaluator>,
    store: ResultStore,
    num_repeats: u64,
    metrics: Vec<String>,
}

impl BenchmarkBuilder {
    /// Builder with the built-in dataset loaders, no methods, the default
    /// evaluator and [`DEFAULT_NUM_REPEATS`].
    #[must_use]
    pub fn new(store: ResultStore) -> Self {
        Self {
            datasets: Vec::new(),
            dataset_registry: DatasetRegistry::with_builtin(),
            methods: MethodRegistry::new(),
            evaluator: Arc::new(MetricEvaluator),
            store,
            num_repeats: DEFAULT_NUM_REPEATS,
            metrics: Vec::new(),
        }
    }

    /// Add a dataset to the sweep.
    #[must_use]
    pub fn dataset(mut self, descriptor: DatasetDescriptor) -> Self {
        self.datasets.push(descriptor);
        self
    }

    /// Replace the dataset loader registry.
    #[must_use]
    pub fn dataset_registry(mut self, registry: DatasetRegistry) -> Self {
        self.dataset_registry = registry;
        self
    }

    /// Replace the method registry.
    #[must_use]
    pub fn methods(mut self, methods: MethodRegistry) -> Self {
        self.methods = methods;
        self
    }

    /// Set the evaluator.
    #[must_use]
    pub fn evaluator(mut self, evaluator: impl Evaluator + 'static) -> Self {
        self.evaluator = Arc::new(evaluator);
        self
    }

    /// Set the target number of repeats.
    #[must_use]
    pub const fn num_repeats(mut self, num_repeats: u64) -> Self {
        self.num_repeats = num_repeats;
        self
    }

    /// Set the metrics requested from the evaluator.
    #[must_use]
    pub fn metrics<S: Into<String>>(mut self, metrics: impl IntoIterator<Item = S>) -> Self {
        self.metrics = metrics.into_iter().map(Into::into).collect();
        self
    }

    /// Build the benchmark.
    #[must_use]
    pub fn build(self) -> Benchmark {
        Benchmark {
            datasets: self.datasets,
            dataset_registry: self.dataset_registry,
            methods: self.methods,
            evaluator: self.evaluator,
            store: self.store,
            num_repeats: self.num_repeats,
            metrics: self.metrics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Parameters;
    use crate::Error;

    fn benchmark(dir: &std::path::Path, repeats: u64) -> Benchmark {
        let mut methods = MethodRegistry::new();
        methods.register_kind("affine", "affine", Parameters::new()).unwrap();
        methods.register_kind("zero", "constant", Parameters::new()).unwrap();
        Benchmark::builder(ResultStore::new(dir))
            .dataset(DatasetDescriptor::new("linear"))
            .methods(methods)
            .num_repeats(repeats)
            .metrics(["accuracy", "mae"])
            .build()
    }

    #[test]
    fn test_run_dataset_executes_all_repeats() {
        let dir = tempfile::tempdir().unwrap();
        let run = benchmark(dir.path(), 3).run_dataset(&DatasetDescriptor::new("linear")).unwrap();
        assert_eq!(run.executed(), 6);
        assert!(run.methods.iter().all(|m| m.resumed_from == 0));
        assert_eq!(run.methods[0].scores[0].len(), 2);
    }

    #[test]
    fn test_rerun_resumes() {
        let dir = tempfile::tempdir().unwrap();
        benchmark(dir.path(), 2).run_all().unwrap();
        let runs = benchmark(dir.path(), 5).run_all().unwrap();

        assert_eq!(runs[0].methods[0].resumed_from, 2);
        assert_eq!(runs[0].methods[0].scores.len(), 3);

        let store = ResultStore::new(dir.path());
        let metrics = vec!["accuracy".to_string(), "mae".to_string()];
        assert_eq!(store.count_existing_repeats("linear", "affine", &metrics).unwrap(), 5);
    }

    #[test]
    fn test_completed_sweep_runs_nothing() {
        let dir = tempfile::tempdir().unwrap();
        benchmark(dir.path(), 2).run_all().unwrap();
        let runs = benchmark(dir.path(), 2).run_all().unwrap();
        assert_eq!(runs[0].executed(), 0);
    }

    #[test]
    fn test_unknown_dataset_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let bench = benchmark(dir.path(), 1);
        let err = bench.run_dataset(&DatasetDescriptor::new("imagenet")).unwrap_err();
        assert!(matches!(err, Error::UnknownDataset(_)));
    }
}
