//! Coverage report export via llvm-cov

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CubrirError, CubrirResult};
use crate::invoke::Invocation;

/// Source paths excluded from the report by default: vendored registry
/// dependencies are noise in a project's own coverage numbers.
pub const DEFAULT_IGNORE_REGEX: &str = "/.cargo/registry";

/// Default report destination under the build output directory.
pub const DEFAULT_REPORT_PATH: &str = "target/coverage.info";

/// The export command: lcov-format line coverage for the consolidated
/// profile, with each discovered binary named as a distinct object. The
/// export tool itself merges the objects into one report.
#[must_use]
pub fn export_invocation(
    tool: &str,
    profdata: &Path,
    binaries: &[PathBuf],
    ignore_regex: &str,
) -> Invocation {
    let mut invocation = Invocation::new(tool)
        .args(["export", "--format", "lcov"])
        .args(["--ignore-filename-regex", ignore_regex])
        .arg("-instr-profile")
        .arg(profdata.to_string_lossy().into_owned());
    for binary in binaries {
        invocation = invocation
            .arg("-object")
            .arg(binary.to_string_lossy().into_owned());
    }
    invocation
}

/// Run the export and return the report bytes.
pub fn export(
    tool: &str,
    profdata: &Path,
    binaries: &[PathBuf],
    ignore_regex: &str,
) -> CubrirResult<Vec<u8>> {
    let output = export_invocation(tool, profdata, binaries, ignore_regex).capture()?;
    if !output.status.success() {
        return Err(CubrirError::tool_failure(tool, output.status));
    }
    Ok(output.stdout)
}

/// Write the exporter's bytes verbatim, creating or truncating the report
/// file (and its parent directory) as needed.
pub fn write_report(path: &Path, bytes: &[u8]) -> CubrirResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| CubrirError::ReportWrite {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }
    fs::write(path, bytes).map_err(|source| CubrirError::ReportWrite {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    mod invocation_tests {
        use super::*;

        #[test]
        fn test_export_invocation_single_binary() {
            let binaries = vec![PathBuf::from("/t/debug/deps/foo-1")];
            let inv = export_invocation(
                "llvm-cov",
                Path::new("/t/coverage.profdata"),
                &binaries,
                DEFAULT_IGNORE_REGEX,
            );
            assert_eq!(inv.program(), "llvm-cov");
            assert_eq!(
                inv.arguments(),
                [
                    "export",
                    "--format",
                    "lcov",
                    "--ignore-filename-regex",
                    "/.cargo/registry",
                    "-instr-profile",
                    "/t/coverage.profdata",
                    "-object",
                    "/t/debug/deps/foo-1",
                ]
            );
        }

        #[test]
        fn test_export_invocation_repeats_object_per_binary() {
            let binaries = vec![PathBuf::from("/t/a"), PathBuf::from("/t/b")];
            let inv = export_invocation(
                "llvm-cov",
                Path::new("/t/coverage.profdata"),
                &binaries,
                DEFAULT_IGNORE_REGEX,
            );
            let objects: Vec<_> = inv
                .arguments()
                .iter()
                .filter(|a| a.as_str() == "-object")
                .collect();
            assert_eq!(objects.len(), 2);
            assert_eq!(inv.arguments().last().unwrap(), "/t/b");
        }

        #[test]
        fn test_export_invocation_no_binaries() {
            let inv = export_invocation(
                "llvm-cov",
                Path::new("/t/coverage.profdata"),
                &[],
                DEFAULT_IGNORE_REGEX,
            );
            assert_eq!(inv.arguments().last().unwrap(), "/t/coverage.profdata");
        }

        #[test]
        fn test_export_invocation_custom_ignore_regex() {
            let inv = export_invocation(
                "llvm-cov",
                Path::new("/t/coverage.profdata"),
                &[],
                "vendor/",
            );
            assert!(inv.arguments().contains(&"vendor/".to_string()));
        }
    }

    mod write_tests {
        use super::*;

        #[test]
        fn test_write_report_creates_file_and_parent() {
            let temp = TempDir::new().unwrap();
            let path = temp.path().join("target/coverage.info");
            write_report(&path, b"TN:\nend_of_record\n").unwrap();
            assert_eq!(std::fs::read(&path).unwrap(), b"TN:\nend_of_record\n");
        }

        #[test]
        fn test_write_report_truncates_existing_file() {
            let temp = TempDir::new().unwrap();
            let path = temp.path().join("coverage.info");
            std::fs::write(&path, b"a much longer earlier report").unwrap();
            write_report(&path, b"short").unwrap();
            assert_eq!(std::fs::read(&path).unwrap(), b"short");
        }

        #[test]
        fn test_write_report_bytes_are_verbatim() {
            let temp = TempDir::new().unwrap();
            let path = temp.path().join("coverage.info");
            let bytes = [0u8, 159, 146, 150];
            write_report(&path, &bytes).unwrap();
            assert_eq!(std::fs::read(&path).unwrap(), bytes);
        }

        #[test]
        fn test_write_report_failure_carries_path() {
            let temp = TempDir::new().unwrap();
            let blocker = temp.path().join("blocker");
            std::fs::write(&blocker, b"file, not dir").unwrap();
            let path = blocker.join("coverage.info");
            let err = write_report(&path, b"x").unwrap_err();
            assert!(matches!(err, CubrirError::ReportWrite { .. }));
            assert!(err.to_string().contains("coverage.info"));
        }
    }
}
