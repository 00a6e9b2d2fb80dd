//! Raw-profile merge via llvm-profdata

use std::path::{Path, PathBuf};

use crate::error::{CubrirError, CubrirResult};
use crate::invoke::Invocation;
use crate::session::CoverageSession;

/// Raw per-process profiles currently present in the session directory.
#[must_use]
pub fn raw_profiles(session: &CoverageSession) -> Vec<PathBuf> {
    match glob::glob(&session.profile_pattern()) {
        Ok(paths) => paths.flatten().collect(),
        Err(_) => Vec::new(),
    }
}

/// The merge command: every raw profile in, one consolidated
/// `coverage.profdata` out, written next to its inputs.
///
/// An empty input set is passed through unchanged; llvm-profdata rejects
/// it, and that failure aborts the pipeline like any other tool failure.
/// Zero raw profiles usually means instrumentation never took effect
/// (stale RUSTFLAGS, or no test process ran).
#[must_use]
pub fn merge_invocation(tool: &str, raw: &[PathBuf], out: &Path) -> Invocation {
    Invocation::new(tool)
        .args(["merge", "-sparse"])
        .args(raw.iter().map(|p| p.to_string_lossy().into_owned()))
        .arg("-o")
        .arg(out.to_string_lossy().into_owned())
}

/// Merge the session's raw profiles and return the consolidated path.
pub fn merge(tool: &str, session: &CoverageSession) -> CubrirResult<PathBuf> {
    let raw = raw_profiles(session);
    let out = session.profdata_path();
    let status = merge_invocation(tool, &raw, &out).run()?;
    if !status.success() {
        return Err(CubrirError::tool_failure(tool, status));
    }
    Ok(out)
}
