//! # benchkit: repeated-trial benchmarking with LaTeX result tables
//!
//! benchkit runs competitor methods on datasets many times, keeps every
//! per-repeat score in an append-only raw table, aggregates the raw tables
//! into mean/std summaries and exports them as LaTeX tables with the best
//! and second-best result per dataset highlighted.
//!
//! ## Pipeline
//!
//! ```text
//! Benchmark::run_all ──> <dataset>__raw.csv        (append-only, resumable)
//! Formatter          ──> <dataset>__formatted.csv  (regenerated)
//! TableExporter      ──> benchmark_<metric>.tex    (one per metric)
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use benchkit::aggregate::Formatter;
//! use benchkit::export::{DisplayNames, TableExporter};
//! use benchkit::registry::{DatasetDescriptor, MethodRegistry, Parameters};
//! use benchkit::runner::Benchmark;
//! use benchkit::store::ResultStore;
//! use std::path::Path;
//!
//! let mut methods = MethodRegistry::new();
//! methods.register_kind("example_method", "affine", Parameters::new())?;
//!
//! let store = ResultStore::new("tables/benchmark_raw");
//! let bench = Benchmark::builder(store.clone())
//!     .dataset(DatasetDescriptor::new("linear"))
//!     .methods(methods)
//!     .num_repeats(10)
//!     .metrics(["accuracy"])
//!     .build();
//! bench.run_all()?;
//!
//! Formatter::new(store, "tables/benchmark_formatted").format_results("linear")?;
//!
//! TableExporter::new(DisplayNames::new()).export_table(
//!     &["linear".to_string()],
//!     &["example_method".to_string()],
//!     "accuracy",
//!     true,
//!     Path::new("tables/benchmark_formatted"),
//!     Path::new("tables/tex"),
//! )?;
//! # Ok::<(), benchkit::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregate;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod export;
pub mod rank;
pub mod record;
pub mod registry;
pub mod runner;
pub mod store;
pub mod table;

pub use config::BenchmarkConfig;
pub use error::{Error, Result};
pub use runner::Benchmark;
pub use store::ResultStore;
