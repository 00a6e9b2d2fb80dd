//! The coverage pipeline: instrumented tests, profile merge, binary
//! discovery, report export
//!
//! One [`CoveragePipeline::run`] produces one report file. The steps run
//! strictly in sequence; the first non-zero child exit aborts everything
//! after it and the child's exit code becomes the pipeline's error. There
//! is no retry and no timeout: a hung tool hangs the pipeline, and the
//! operating environment is the place to interrupt it.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::discover;
use crate::error::{CubrirError, CubrirResult};
use crate::export;
use crate::invoke::Invocation;
use crate::profdata;
use crate::session::CoverageSession;

/// Resolve an external tool name: environment override first (the
/// `CARGO`/`LLVM_PROFDATA`/`LLVM_COV` convention), plain PATH name
/// otherwise.
fn resolve_tool(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.to_string())
}

/// Probe that a tool can be spawned at all. Only a spawn failure counts:
/// whatever `--version` prints or returns is irrelevant here.
fn check_tool(program: &str) -> CubrirResult<()> {
    let probe = Command::new(program)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    match probe {
        Ok(_) => Ok(()),
        Err(_) => Err(CubrirError::missing_tool(program)),
    }
}

/// Orchestrates one coverage run end to end.
#[derive(Debug)]
pub struct CoveragePipeline {
    cargo_args: Vec<String>,
    output: PathBuf,
    ignore_regex: String,
    cargo: String,
    llvm_profdata: String,
    llvm_cov: String,
}

impl Default for CoveragePipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl CoveragePipeline {
    /// Create a pipeline with default output path, filter, and tools
    /// resolved from the environment.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cargo_args: Vec::new(),
            output: PathBuf::from(export::DEFAULT_REPORT_PATH),
            ignore_regex: export::DEFAULT_IGNORE_REGEX.to_string(),
            cargo: resolve_tool("CARGO", "cargo"),
            llvm_profdata: resolve_tool("LLVM_PROFDATA", "llvm-profdata"),
            llvm_cov: resolve_tool("LLVM_COV", "llvm-cov"),
        }
    }

    /// Pass extra arguments through to every `cargo test` invocation
    #[must_use]
    pub fn with_cargo_args(mut self, args: Vec<String>) -> Self {
        self.cargo_args = args;
        self
    }

    /// Set the report destination
    #[must_use]
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    /// Set the source-path exclusion filter handed to the export tool
    #[must_use]
    pub fn with_ignore_regex(mut self, regex: impl Into<String>) -> Self {
        self.ignore_regex = regex.into();
        self
    }

    /// Override the cargo executable
    #[must_use]
    pub fn with_cargo(mut self, cargo: impl Into<String>) -> Self {
        self.cargo = cargo.into();
        self
    }

    /// Override the profile merge tool
    #[must_use]
    pub fn with_llvm_profdata(mut self, tool: impl Into<String>) -> Self {
        self.llvm_profdata = tool.into();
        self
    }

    /// Override the coverage export tool
    #[must_use]
    pub fn with_llvm_cov(mut self, tool: impl Into<String>) -> Self {
        self.llvm_cov = tool.into();
        self
    }

    /// Report destination
    #[must_use]
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Run the pipeline and return the written report path.
    ///
    /// Step order: instrumented `cargo test`, raw-profile merge, discovery
    /// build, lcov export, report write. The raw-profile directory is
    /// removed on every exit path; a removal failure is only a warning and
    /// never masks the pipeline result.
    pub fn run(&self) -> CubrirResult<PathBuf> {
        check_tool(&self.llvm_profdata)?;
        check_tool(&self.llvm_cov)?;

        let session = CoverageSession::new()?;

        let status = Invocation::new(&self.cargo)
            .arg("test")
            .args(self.cargo_args.iter().cloned())
            .env_overlay(session.env_overlay())
            .run()?;
        if !status.success() {
            return Err(CubrirError::tool_failure(&self.cargo, status));
        }

        let profdata_path = profdata::merge(&self.llvm_profdata, &session)?;

        let binaries = discover::discover(&self.cargo, &self.cargo_args, session.env_overlay())?;

        let report = export::export(
            &self.llvm_cov,
            &profdata_path,
            &binaries,
            &self.ignore_regex,
        )?;
        export::write_report(&self.output, &report)?;

        if let Err(e) = session.close() {
            eprintln!("warning: failed to remove raw-profile directory: {e}");
        }

        Ok(self.output.clone())
    }
}
