//! Error types for pipeline orchestration

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Result type for pipeline operations
pub type CubrirResult<T> = Result<T, CubrirError>;

/// Errors that can occur while orchestrating external tools
#[derive(Debug, Error)]
pub enum CubrirError {
    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An external tool could not be spawned
    #[error("Failed to run {program}: {source}")]
    Spawn {
        /// Program that failed to start
        program: String,
        /// Underlying spawn error
        #[source]
        source: std::io::Error,
    },

    /// An external tool exited with a non-zero status
    #[error("{program} exited with status {code}")]
    ToolFailure {
        /// Program that failed
        program: String,
        /// Exit code (-1 when the process was killed by a signal)
        code: i32,
    },

    /// A matrix combination failed
    #[error("tests failed for channel {channel}, features {features} (status {code})")]
    CombinationFailed {
        /// Channel label of the failing combination
        channel: String,
        /// Feature-set label of the failing combination
        features: String,
        /// Exit code of the failing test run
        code: i32,
    },

    /// A required external tool is not installed
    #[error("Missing command: {program}. Install LLVM tools matching your rustc's LLVM version.")]
    MissingTool {
        /// Program that could not be found
        program: String,
    },

    /// A line of discovery output was not a valid JSON record
    #[error("Malformed build message: {message}")]
    MalformedMessage {
        /// Parse failure detail including the offending line
        message: String,
    },

    /// The coverage report could not be written
    #[error("Failed to write report to {path}: {source}")]
    ReportWrite {
        /// Report destination
        path: PathBuf,
        /// Underlying write error
        #[source]
        source: std::io::Error,
    },
}

impl CubrirError {
    /// Create a spawn error for a program
    #[must_use]
    pub fn spawn(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            source,
        }
    }

    /// Create a tool failure from an exit status
    #[must_use]
    pub fn tool_failure(program: impl Into<String>, status: ExitStatus) -> Self {
        Self::ToolFailure {
            program: program.into(),
            code: status.code().unwrap_or(-1),
        }
    }

    /// Create a missing tool error
    #[must_use]
    pub fn missing_tool(program: impl Into<String>) -> Self {
        Self::MissingTool {
            program: program.into(),
        }
    }

    /// Create a malformed message error
    #[must_use]
    pub fn malformed_message(message: impl Into<String>) -> Self {
        Self::MalformedMessage {
            message: message.into(),
        }
    }

    /// Exit code this error should propagate to the calling process.
    ///
    /// External tool failures carry the child's own exit code through
    /// unchanged; everything else (spawn errors, parse errors, I/O) maps to
    /// the generic failure code 1. Codes outside 1..=255 (signal deaths)
    /// also map to 1.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::ToolFailure { code, .. } | Self::CombinationFailed { code, .. } => {
                u8::try_from(*code).ok().filter(|c| *c != 0).unwrap_or(1)
            }
            _ => 1,
        }
    }
}
