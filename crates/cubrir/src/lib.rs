//! Cubrir: coverage and test-matrix orchestration for Cargo projects
//!
//! Cubrir (Spanish: "to cover") drives `cargo test` under LLVM
//! source-based coverage instrumentation and assembles one merged lcov
//! report per run:
//!
//! ```text
//! instrumented test run ──► raw-profile merge ──► binary discovery ──► lcov export
//!   (LLVM_PROFILE_FILE)     (llvm-profdata)       (--message-format     (llvm-cov,
//!                                                  =json + doc-test      written to
//!                                                  glob)                 target/coverage.info)
//! ```
//!
//! A second entry point runs the suite across a matrix of toolchain
//! channels and feature sets, fail-fast.
//!
//! The external tools (cargo, llvm-profdata, llvm-cov) are opaque
//! collaborators invoked over their command-line contracts; cubrir itself
//! instruments nothing and computes no coverage numbers.

#![warn(missing_docs)]

mod discover;
mod error;
mod export;
mod invoke;
mod matrix;
mod pipeline;
mod profdata;
mod session;

pub use discover::{
    discover, doctest_binaries, doctest_binaries_in, parse_test_binaries, ArtifactProfile,
    BuildMessage, DOCTEST_BIN_PATTERN,
};
pub use error::{CubrirError, CubrirResult};
pub use export::{write_report, DEFAULT_IGNORE_REGEX, DEFAULT_REPORT_PATH};
pub use invoke::{append_env, EnvAction, Invocation};
pub use matrix::{Channel, FeatureSelection, TestMatrix};
pub use pipeline::CoveragePipeline;
pub use session::{CoverageSession, RUSTDOC_COVERAGE_FLAGS, RUST_COVERAGE_FLAGS};
