//! Function for running the command line program.

use super::{
    build, evaluate::run_evaluate_subcommand, utils, validate::run_validate_subcommand,
};
use clap::ArgMatches;
use std::time::Instant;
use tracing_subscriber::{fmt, EnvFilter};

/// Runs the `gridterp` command line program.
pub fn run() {
    run_with_args(build::build().get_matches());
}

/// Runs the `gridterp` command line program with the given parsed arguments.
pub fn run_with_args(arguments: ArgMatches) {
    init_logging(utils::get_flag(&arguments, "verbose"));

    let start_instant = Instant::now();

    match arguments.subcommand() {
        Some(("validate", validate_arguments)) => run_validate_subcommand(validate_arguments),
        Some(("evaluate", evaluate_arguments)) => run_evaluate_subcommand(evaluate_arguments),
        _ => unreachable!("Subcommand is required"),
    }

    if utils::get_flag(&arguments, "timing") {
        println!("Elapsed time: {} s", start_instant.elapsed().as_secs_f64());
    }
}

/// Installs a log subscriber writing to stderr.
///
/// The `RUST_LOG` environment variable overrides the default filter.
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "gridterp=debug" } else { "warn" }));

    // Ignore failure if a subscriber is already installed
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
