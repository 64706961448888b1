//! Command-line interface

use anyhow::{Context, Result};
use benchkit::registry::DatasetRegistry;
use benchkit::BenchmarkConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};

/// Repeated-trial benchmarking with LaTeX result tables
#[derive(Debug, Parser)]
#[command(name = "benchkit", version, about)]
pub struct Cli {
    /// Benchmark configuration file
    #[arg(short, long, global = true, env = "BENCHKIT_CONFIG", default_value = "benchkit.toml")]
    pub config: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the missing repeats of every (dataset, method) pair
    Run {
        /// Only run these datasets (default: all configured)
        #[arg(short, long = "dataset", value_name = "NAME")]
        datasets: Vec<String>,
    },

    /// Show how many repeats are already recorded
    Status,

    /// Regenerate formatted tables from raw tables
    Format {
        /// Only format these datasets (default: all configured)
        #[arg(short, long = "dataset", value_name = "NAME")]
        datasets: Vec<String>,
    },

    /// Export LaTeX tables from formatted tables
    Export {
        /// Metrics to export (default: from config)
        #[arg(short, long = "metric", value_name = "NAME")]
        metrics: Vec<String>,

        /// Print raw values even if the config asks for percentages
        #[arg(long)]
        no_percentage: bool,
    },

    /// Run, format and export in one go
    Pipeline,
}

/// Execute a parsed command line.
pub fn run_command(cli: Cli) -> Result<()> {
    let config = BenchmarkConfig::load(&cli.config)
        .with_context(|| format!("failed to load config {}", cli.config.display()))?;

    match cli.command {
        Command::Run { datasets } => run(&config, &datasets),
        Command::Status => status(&config),
        Command::Format { datasets } => format(&config, &datasets),
        Command::Export {
            metrics,
            no_percentage,
        } => export(&config, &metrics, config.export.percentage && !no_percentage),
        Command::Pipeline => {
            run(&config, &[])?;
            format(&config, &[])?;
            export(&config, &[], config.export.percentage)
        }
    }
}

fn selected(config: &BenchmarkConfig, requested: &[String]) -> Vec<String> {
    if requested.is_empty() {
        config.dataset_names()
    } else {
        requested.to_vec()
    }
}

fn run(config: &BenchmarkConfig, datasets: &[String]) -> Result<()> {
    let bench = config.benchmark(DatasetRegistry::with_builtin())?;
    let names = selected(config, datasets);

    for descriptor in bench.datasets().iter().filter(|d| names.contains(&d.name)) {
        let run = bench
            .run_dataset(descriptor)
            .with_context(|| format!("benchmark failed on dataset {}", descriptor.name))?;
        info!(dataset = %run.dataset, executed = run.executed(), "dataset finished");
    }
    for missing in names.iter().filter(|n| !config.dataset_names().contains(n)) {
        warn!("Dataset {missing} is not in the configuration, skipped");
    }
    Ok(())
}

fn status(config: &BenchmarkConfig) -> Result<()> {
    let store = config.store();
    for dataset in config.dataset_names() {
        for method in config.method_names() {
            let done = store.count_existing_repeats(&dataset, &method, &config.metrics)?;
            println!("{dataset:<24} {method:<24} {done:>6}/{}", config.num_repeats);
        }
    }
    Ok(())
}

fn format(config: &BenchmarkConfig, datasets: &[String]) -> Result<()> {
    let formatter = config.formatter();
    for dataset in selected(config, datasets) {
        formatter
            .format_results(&dataset)
            .with_context(|| format!("failed to format results for {dataset}"))?;
    }
    Ok(())
}

fn export(config: &BenchmarkConfig, metrics: &[String], percentage: bool) -> Result<()> {
    let metrics = if metrics.is_empty() {
        config.export_metrics()
    } else {
        metrics.to_vec()
    };
    if metrics.is_empty() {
        warn!("No metrics to export; set `metrics` or `export.metrics` in the config");
        return Ok(());
    }

    let exporter = config.exporter();
    let datasets = config.export_datasets();
    let methods = config.export_methods();
    for metric in &metrics {
        let path = exporter
            .export_table(
                &datasets,
                &methods,
                metric,
                percentage,
                &config.paths.formatted_dir,
                &config.paths.tex_dir,
            )
            .with_context(|| format!("failed to export {metric} table"))?;
        println!("{}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_export_flags() {
        let cli = Cli::parse_from([
            "benchkit",
            "--config",
            "b.toml",
            "export",
            "-m",
            "accuracy",
            "--metric",
            "mae",
            "--no-percentage",
        ]);
        assert_eq!(cli.config, PathBuf::from("b.toml"));
        match cli.command {
            Command::Export {
                metrics,
                no_percentage,
            } => {
                assert_eq!(metrics, vec!["accuracy", "mae"]);
                assert!(no_percentage);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_verbose_count() {
        let cli = Cli::parse_from(["benchkit", "-vv", "status"]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Command::Status));
    }

    fn write_config(dir: &std::path::Path, percentage: bool) -> PathBuf {
        let formatted = dir.join("formatted");
        std::fs::create_dir_all(&formatted).unwrap();
        std::fs::write(
            formatted.join("linear__formatted.csv"),
            "method,metric,repeat_tol,mean_val,std_val\nexample,accuracy,2,0.5,0.1\n",
        )
        .unwrap();

        let config = format!(
            "metrics = [\"accuracy\"]\n\n\
             [paths]\n\
             raw_dir = '{raw}'\n\
             formatted_dir = '{formatted}'\n\
             tex_dir = '{tex}'\n\n\
             [[datasets]]\n\
             name = \"linear\"\n\n\
             [[methods]]\n\
             name = \"example\"\n\
             kind = \"affine\"\n\n\
             [export]\n\
             percentage = {percentage}\n",
            raw = dir.join("raw").display(),
            formatted = formatted.display(),
            tex = dir.join("tex").display(),
        );
        let path = dir.join("benchkit.toml");
        std::fs::write(&path, config).unwrap();
        path
    }

    fn exported(dir: &std::path::Path) -> String {
        std::fs::read_to_string(dir.join("tex").join("benchmark_accuracy.tex")).unwrap()
    }

    #[test]
    fn test_export_honors_configured_percentage() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(dir.path(), false);

        let cli = Cli::parse_from(["benchkit", "--config", config.to_str().unwrap(), "export"]);
        run_command(cli).unwrap();

        let tex = exported(dir.path());
        assert!(tex.contains("\\mybest{0.50 \\mystd{0.10}}"), "{tex}");
        assert!(!tex.contains("50.00"));
    }

    #[test]
    fn test_export_flag_overrides_percentage() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(dir.path(), true);

        let cli = Cli::parse_from(["benchkit", "--config", config.to_str().unwrap(), "export"]);
        run_command(cli).unwrap();
        assert!(exported(dir.path()).contains("\\mybest{50.00 \\mystd{10.00}}"));

        let cli = Cli::parse_from([
            "benchkit",
            "--config",
            config.to_str().unwrap(),
            "export",
            "--no-percentage",
        ]);
        run_command(cli).unwrap();
        assert!(exported(dir.path()).contains("\\mybest{0.50 \\mystd{0.10}}"));
    }
}
