//! Error types for the CLI

use cubrir::CubrirError;
use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Pipeline or matrix error from the core library
    #[error("{0}")]
    Cubrir(#[from] CubrirError),

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Exit code this error should produce: a failing external tool's own
    /// exit code, or 1 for internal errors.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Cubrir(err) => err.exit_code(),
            Self::Io(_) => 1,
        }
    }
}
