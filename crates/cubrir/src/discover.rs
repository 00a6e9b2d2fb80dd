//! Test-binary discovery: doc-test glob plus cargo's JSON build messages
//!
//! The export step needs the compiled test executables. Two sources feed
//! the set: pre-existing doc-test binaries found by a fixed glob, and the
//! artifact messages of a `cargo test --no-run --message-format=json`
//! build. Only the first artifact flagged `profile.test == true`
//! contributes its files; scanning stops there. In a workspace with
//! several independent test targets that means later targets are skipped -
//! a known gap, kept until it is widened deliberately.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{CubrirError, CubrirResult};
use crate::invoke::{EnvAction, Invocation};

/// Glob pattern for doc-test binaries persisted under the target directory.
pub const DOCTEST_BIN_PATTERN: &str = "target/debug/doctestbins/*/rust_out";

/// One record of a `--message-format=json` stream. Only the two fields the
/// discoverer reads are modeled; everything else in the record is ignored.
#[derive(Debug, Deserialize)]
pub struct BuildMessage {
    /// Build profile of the emitted artifact, absent on non-artifact records
    #[serde(default)]
    pub profile: Option<ArtifactProfile>,
    /// Paths of the files the artifact produced
    #[serde(default)]
    pub filenames: Vec<String>,
}

/// The `profile` object of an artifact record.
#[derive(Debug, Deserialize)]
pub struct ArtifactProfile {
    /// Whether the artifact is a test executable
    #[serde(default)]
    pub test: bool,
}

impl BuildMessage {
    /// Whether this record describes a test executable.
    #[must_use]
    pub fn is_test_artifact(&self) -> bool {
        self.profile.as_ref().is_some_and(|p| p.test)
    }
}

/// Scan a newline-delimited JSON stream for the first test artifact and
/// return its file paths.
///
/// The scan is lazy and short-circuits at the first match, so arbitrarily
/// large streams stay memory-bounded. A line that fails to parse is a hard
/// error: silently skipping it could mask a broken discovery build. Blank
/// lines (a trailing newline) are skipped.
pub fn parse_test_binaries(stream: &str) -> CubrirResult<Vec<PathBuf>> {
    for line in stream.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let message: BuildMessage = serde_json::from_str(line)
            .map_err(|e| CubrirError::malformed_message(format!("{e}: {line}")))?;
        if message.is_test_artifact() {
            return Ok(message.filenames.into_iter().map(PathBuf::from).collect());
        }
    }
    Ok(Vec::new())
}

/// Doc-test binaries under `root`, in glob order. Missing directories
/// simply produce no matches.
#[must_use]
pub fn doctest_binaries_in(root: &Path) -> Vec<PathBuf> {
    let pattern = root.join(DOCTEST_BIN_PATTERN);
    match glob::glob(&pattern.to_string_lossy()) {
        Ok(paths) => paths.flatten().collect(),
        Err(_) => Vec::new(),
    }
}

/// Doc-test binaries relative to the current directory.
#[must_use]
pub fn doctest_binaries() -> Vec<PathBuf> {
    doctest_binaries_in(Path::new("."))
}

/// The discovery build: compile the test suite without running it,
/// emitting machine-readable artifact records on stdout. Build noise on
/// stderr is discarded.
#[must_use]
pub fn discovery_invocation(cargo: &str, cargo_args: &[String]) -> Invocation {
    Invocation::new(cargo)
        .arg("test")
        .args(cargo_args.iter().cloned())
        .arg("--no-run")
        .arg("--message-format=json")
        .quiet_stderr()
}

/// Produce the full binary set: doc-test glob matches first, then the
/// first test artifact of a fresh discovery build.
///
/// The discovery build runs under the same environment overlay as the
/// instrumented test run, so cargo reports the instrumented binaries
/// instead of recompiling plain ones.
pub fn discover(
    cargo: &str,
    cargo_args: &[String],
    overlay: Vec<(String, EnvAction)>,
) -> CubrirResult<Vec<PathBuf>> {
    let invocation = discovery_invocation(cargo, cargo_args).env_overlay(overlay);
    let output = invocation.capture()?;
    if !output.status.success() {
        return Err(CubrirError::tool_failure(cargo, output.status));
    }
    let stream = String::from_utf8_lossy(&output.stdout);

    let mut binaries = doctest_binaries();
    binaries.extend(parse_test_binaries(&stream)?);
    Ok(binaries)
}
