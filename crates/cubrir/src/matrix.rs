//! Channel/feature test matrix: run the suite once per combination
//!
//! Channels come comma-separated, feature sets colon-separated. The
//! literal "default" is a sentinel meaning "no explicit choice" and is
//! turned into an enum variant at parse time, so nothing downstream ever
//! compares against the string again. The matrix runs channel-outer,
//! feature-inner, and stops at the first failing combination.

use std::fmt;

use crate::error::{CubrirError, CubrirResult};
use crate::invoke::Invocation;

/// Toolchain channel selection for one test run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Channel {
    /// Use whatever toolchain is ambient; no `+channel` argument
    Ambient,
    /// Ask rustup for a specific channel via `+channel`
    Named(String),
}

impl Channel {
    /// Interpret one list element; "default" is the ambient sentinel.
    #[must_use]
    pub fn from_arg(raw: &str) -> Self {
        if raw == "default" {
            Self::Ambient
        } else {
            Self::Named(raw.to_string())
        }
    }

    /// Parse a comma-separated channel list.
    #[must_use]
    pub fn parse_list(raw: &str) -> Vec<Self> {
        raw.split(',').map(Self::from_arg).collect()
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ambient => f.write_str("default"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// Feature configuration for one test run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureSelection {
    /// Compile with the project's default features
    Default,
    /// Disable default features and enable exactly this named set
    Only(String),
}

impl FeatureSelection {
    /// Interpret one list element; "default" is the default-features
    /// sentinel.
    #[must_use]
    pub fn from_arg(raw: &str) -> Self {
        if raw == "default" {
            Self::Default
        } else {
            Self::Only(raw.to_string())
        }
    }

    /// Parse a colon-separated feature-set list.
    #[must_use]
    pub fn parse_list(raw: &str) -> Vec<Self> {
        raw.split(':').map(Self::from_arg).collect()
    }
}

impl fmt::Display for FeatureSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("default"),
            Self::Only(name) => f.write_str(name),
        }
    }
}

/// The cartesian product of channels and feature sets, run fail-fast.
#[derive(Debug)]
pub struct TestMatrix {
    channels: Vec<Channel>,
    feature_sets: Vec<FeatureSelection>,
    cargo_args: Vec<String>,
    cargo: String,
}

impl TestMatrix {
    /// Create a matrix over the given channels and feature sets.
    #[must_use]
    pub fn new(channels: Vec<Channel>, feature_sets: Vec<FeatureSelection>) -> Self {
        Self {
            channels,
            feature_sets,
            cargo_args: Vec::new(),
            cargo: std::env::var("CARGO").unwrap_or_else(|_| "cargo".to_string()),
        }
    }

    /// Pass extra arguments through to every test invocation
    #[must_use]
    pub fn with_cargo_args(mut self, args: Vec<String>) -> Self {
        self.cargo_args = args;
        self
    }

    /// Override the cargo executable
    #[must_use]
    pub fn with_cargo(mut self, cargo: impl Into<String>) -> Self {
        self.cargo = cargo.into();
        self
    }

    /// Every (channel, feature set) pair, channel-outer, in input order.
    #[must_use]
    pub fn combinations(&self) -> Vec<(Channel, FeatureSelection)> {
        self.channels
            .iter()
            .flat_map(|channel| {
                self.feature_sets
                    .iter()
                    .map(move |features| (channel.clone(), features.clone()))
            })
            .collect()
    }

    /// The test invocation for one combination.
    #[must_use]
    pub fn invocation(&self, channel: &Channel, features: &FeatureSelection) -> Invocation {
        let mut invocation = Invocation::new(&self.cargo);
        if let Channel::Named(name) = channel {
            invocation = invocation.arg(format!("+{name}"));
        }
        invocation = invocation.arg("test");
        if let FeatureSelection::Only(name) = features {
            invocation = invocation
                .args(["--no-default-features", "--features"])
                .arg(name.as_str());
        }
        invocation.args(self.cargo_args.iter().cloned())
    }

    /// Run every combination in order, stopping at the first failure.
    ///
    /// The error carries the failing combination and its exit code; no
    /// later combination is attempted after a failure.
    pub fn run(&self) -> CubrirResult<()> {
        for (channel, features) in self.combinations() {
            let status = self.invocation(&channel, &features).run()?;
            if !status.success() {
                return Err(CubrirError::CombinationFailed {
                    channel: channel.to_string(),
                    features: features.to_string(),
                    code: status.code().unwrap_or(-1),
                });
            }
        }
        Ok(())
    }
}
