//! Cubridor CLI: coverage reports and test matrices for Cargo projects
//!
//! ## Usage
//!
//! ```bash
//! cubridor coverage                           # lcov report at target/coverage.info
//! cubridor coverage --lib                     # extra args pass through to cargo test
//! cubridor test --channels stable,nightly     # matrix over toolchain channels
//! cubridor test --feature-sets default:extra  # matrix over feature sets
//! ```

use clap::Parser;
use cubridor::handlers::coverage::execute_coverage;
use cubridor::handlers::test::execute_test;
use cubridor::{Cli, CliConfig, CliResult, ColorChoice, Commands, Verbosity};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    // Build configuration from CLI args
    let config = build_config(&cli);

    match cli.command {
        Commands::Coverage(args) => execute_coverage(&config, &args),
        Commands::Test(args) => execute_test(&config, &args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = if cli.quiet {
        Verbosity::Quiet
    } else {
        match cli.verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    };

    let color: ColorChoice = cli.color.clone().into();

    CliConfig::new().with_verbosity(verbosity).with_color(color)
}
