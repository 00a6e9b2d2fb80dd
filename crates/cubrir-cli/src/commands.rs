//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Cubridor: CLI for Cubrir - coverage reports and test matrices for Cargo projects
#[derive(Parser, Debug)]
#[command(name = "cubridor")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate an lcov coverage report for the test suite
    ///
    /// Runs the suite under LLVM instrumentation, merges the per-process
    /// raw profiles, discovers the compiled test binaries, and exports one
    /// lcov report. Exits with the first failing tool's exit code.
    Coverage(CoverageArgs),

    /// Run the test suite across toolchain channels and feature sets
    Test(TestArgs),
}

/// Arguments for the coverage command
#[derive(Parser, Debug)]
pub struct CoverageArgs {
    /// Report output path
    #[arg(long, default_value = "target/coverage.info")]
    pub output: PathBuf,

    /// Source paths excluded from the report
    #[arg(long, default_value = "/.cargo/registry")]
    pub ignore_filename_regex: String,

    /// Extra arguments passed through to every `cargo test` invocation
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub cargo_args: Vec<String>,
}

/// Arguments for the test command
#[derive(Parser, Debug)]
pub struct TestArgs {
    /// Colon-separated feature sets to test ("default" keeps default features)
    #[arg(long, default_value = "default")]
    pub feature_sets: String,

    /// Comma-separated toolchain channels to test ("default" uses the ambient toolchain)
    #[arg(long, default_value = "default")]
    pub channels: String,

    /// Extra arguments passed through to every `cargo test` invocation
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub cargo_args: Vec<String>,
}

/// Color output argument
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
