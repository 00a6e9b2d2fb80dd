//! Cubridor CLI Library
//!
//! Command-line interface for Cubrir, the coverage and test-matrix
//! orchestrator for Cargo projects.

#![warn(missing_docs)]

mod commands;
mod config;
mod error;
pub mod handlers;
mod output;

pub use commands::{Cli, ColorArg, Commands, CoverageArgs, TestArgs};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::ProgressReporter;
