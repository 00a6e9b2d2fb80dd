//! Test matrix command handler

use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::ProgressReporter;
use crate::TestArgs;
use cubrir::{Channel, FeatureSelection, TestMatrix};

/// Build the matrix described by the command-line arguments.
#[must_use]
pub fn matrix_for(args: &TestArgs) -> TestMatrix {
    TestMatrix::new(
        Channel::parse_list(&args.channels),
        FeatureSelection::parse_list(&args.feature_sets),
    )
    .with_cargo_args(args.cargo_args.clone())
}

/// Execute the test command
pub fn execute_test(config: &CliConfig, args: &TestArgs) -> CliResult<()> {
    let reporter = ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());

    let matrix = matrix_for(args);
    let combinations = matrix.combinations();

    if config.verbosity.is_verbose() {
        reporter.header("Test matrix");
        for (channel, features) in &combinations {
            reporter.info(&format!("channel {channel}, features {features}"));
        }
    }

    matrix.run()?;
    reporter.success(&format!(
        "All {} combination(s) passed",
        combinations.len()
    ));
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn args(channels: &str, feature_sets: &str) -> TestArgs {
        TestArgs {
            feature_sets: feature_sets.to_string(),
            channels: channels.to_string(),
            cargo_args: vec!["--release".to_string()],
        }
    }

    #[test]
    fn test_matrix_for_parses_both_lists() {
        let matrix = matrix_for(&args("stable,nightly", "default:extras"));
        assert_eq!(matrix.combinations().len(), 4);
    }

    #[test]
    fn test_matrix_for_threads_passthrough_args() {
        let matrix = matrix_for(&args("default", "default"));
        let (channel, features) = &matrix.combinations()[0];
        let invocation = matrix.invocation(channel, features);
        assert_eq!(invocation.arguments(), ["test", "--release"]);
    }

    #[test]
    fn test_matrix_for_single_default_combination() {
        let matrix = matrix_for(&args("default", "default"));
        let combos = matrix.combinations();
        assert_eq!(combos.len(), 1);
        assert_eq!(combos[0].0, Channel::Ambient);
        assert_eq!(combos[0].1, FeatureSelection::Default);
    }
}
