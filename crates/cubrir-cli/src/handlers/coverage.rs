//! Coverage command handler

use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::ProgressReporter;
use crate::CoverageArgs;
use cubrir::CoveragePipeline;

/// Build the pipeline described by the command-line arguments.
#[must_use]
pub fn pipeline_for(args: &CoverageArgs) -> CoveragePipeline {
    CoveragePipeline::new()
        .with_cargo_args(args.cargo_args.clone())
        .with_output(args.output.clone())
        .with_ignore_regex(args.ignore_filename_regex.clone())
}

/// Execute the coverage command
pub fn execute_coverage(config: &CliConfig, args: &CoverageArgs) -> CliResult<()> {
    let reporter = ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());

    if config.verbosity.is_verbose() {
        reporter.info(&format!(
            "Coverage report will be written to {}",
            args.output.display()
        ));
    }

    let report = pipeline_for(args).run()?;
    reporter.success(&format!("Coverage report written to {}", report.display()));
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    fn args() -> CoverageArgs {
        CoverageArgs {
            output: PathBuf::from("target/coverage.info"),
            ignore_filename_regex: "/.cargo/registry".to_string(),
            cargo_args: vec!["--workspace".to_string()],
        }
    }

    #[test]
    fn test_pipeline_for_maps_output() {
        let pipeline = pipeline_for(&args());
        assert_eq!(pipeline.output(), Path::new("target/coverage.info"));
    }

    #[test]
    fn test_pipeline_for_custom_output() {
        let mut custom = args();
        custom.output = PathBuf::from("cov/report.info");
        let pipeline = pipeline_for(&custom);
        assert_eq!(pipeline.output(), Path::new("cov/report.info"));
    }
}
