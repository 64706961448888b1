//! benchkit CLI
//!
//! # Usage
//!
//! ```bash
//! # Run missing repeats for every configured dataset and method
//! benchkit --config benchkit.toml run
//!
//! # Show recorded repeats
//! benchkit status
//!
//! # Aggregate raw tables, then export LaTeX tables
//! benchkit format
//! benchkit export --metric accuracy
//!
//! # All of the above
//! benchkit pipeline
//! ```

mod cli;

use clap::Parser;
use cli::{run_command, Cli};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
