//! Instrumented-test session: environment composition and raw-profile
//! directory ownership
//!
//! A [`CoverageSession`] owns the directory that instrumented test
//! processes write their raw profiles into. Ownership of a
//! [`tempfile::TempDir`] guarantees the directory is removed on every exit
//! path, including unwinding; [`CoverageSession::close`] exists so callers
//! can surface a removal failure as a warning instead of losing it.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::invoke::EnvAction;

/// Compiler flags that switch on source-based coverage instrumentation.
pub const RUST_COVERAGE_FLAGS: &str = "-C instrument-coverage";

/// Doc-test counterpart of [`RUST_COVERAGE_FLAGS`]. Empty until doc-test
/// profiles are usable without `-Z unstable-options --persist-doctests`;
/// the variable is still threaded through so doc-test builds see a
/// consistent environment.
pub const RUSTDOC_COVERAGE_FLAGS: &str = "";

/// Per-process raw profile filename template. The profile runtime expands
/// `%p` to the writing process's pid, so concurrent test processes never
/// overwrite each other's files.
const PROFILE_FILE_TEMPLATE: &str = "default_%p.profraw";

/// Filename of the consolidated profile produced by the merge step.
const PROFDATA_FILE: &str = "coverage.profdata";

/// Owns the raw-profile directory for one coverage run.
#[derive(Debug)]
pub struct CoverageSession {
    dir: TempDir,
}

impl CoverageSession {
    /// Acquire a uniquely named raw-profile directory.
    pub fn new() -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("coverage-").tempdir()?;
        Ok(Self { dir })
    }

    /// Path of the owned directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Environment overlay for instrumented test invocations: RUSTFLAGS and
    /// RUSTDOCFLAGS extended with the instrumentation flags, and
    /// LLVM_PROFILE_FILE pointed into the owned directory.
    #[must_use]
    pub fn env_overlay(&self) -> Vec<(String, EnvAction)> {
        let profile_file = self.dir.path().join(PROFILE_FILE_TEMPLATE);
        vec![
            (
                "RUSTFLAGS".to_string(),
                EnvAction::Append(RUST_COVERAGE_FLAGS.to_string()),
            ),
            (
                "RUSTDOCFLAGS".to_string(),
                EnvAction::Append(RUSTDOC_COVERAGE_FLAGS.to_string()),
            ),
            (
                "LLVM_PROFILE_FILE".to_string(),
                EnvAction::Set(profile_file.to_string_lossy().into_owned()),
            ),
        ]
    }

    /// Glob pattern matching every raw profile written into the session.
    #[must_use]
    pub fn profile_pattern(&self) -> String {
        self.dir
            .path()
            .join("default_*.profraw")
            .to_string_lossy()
            .into_owned()
    }

    /// Path the merged profile data is written to.
    #[must_use]
    pub fn profdata_path(&self) -> PathBuf {
        self.dir.path().join(PROFDATA_FILE)
    }

    /// Remove the directory now, reporting any removal failure.
    ///
    /// Dropping the session removes the directory too; this variant exists
    /// so the pipeline can warn about a failed cleanup without masking its
    /// own result.
    pub fn close(self) -> io::Result<()> {
        self.dir.close()
    }
}
