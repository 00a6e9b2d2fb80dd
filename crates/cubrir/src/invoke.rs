//! External process invocation with additive environment overlays
//!
//! Every pipeline step is an [`Invocation`]: a program, an argument list,
//! and an environment overlay applied on top of the inherited process
//! environment. Flag-style variables (RUSTFLAGS and friends) are appended
//! to any caller-supplied value rather than replacing it, so externally
//! configured flags keep working under instrumentation.

use std::process::{Command, ExitStatus, Output, Stdio};

use crate::error::{CubrirError, CubrirResult};

/// How an overlay entry combines with the inherited environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvAction {
    /// Replace whatever value the variable currently has
    Set(String),
    /// Append to the current value, separated by a single space
    Append(String),
}

/// Append an overlay value to an ambient environment value.
///
/// A set ambient value is extended with a single separating space; an unset
/// or empty ambient value yields the addition alone. An empty addition
/// leaves the ambient value unchanged, so the variable round-trips.
#[must_use]
pub fn append_env(ambient: Option<&str>, addition: &str) -> String {
    match ambient {
        Some(prev) if !prev.is_empty() => {
            if addition.is_empty() {
                prev.to_string()
            } else {
                format!("{prev} {addition}")
            }
        }
        _ => addition.to_string(),
    }
}

/// One external command: program, arguments, and environment overlay.
///
/// Running it is a blocking operation; the caller gets the exit status back
/// and decides whether a non-zero status aborts anything. A failure to
/// spawn at all is the only error at this layer.
#[derive(Debug, Clone)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
    env: Vec<(String, EnvAction)>,
    quiet_stderr: bool,
}

impl Invocation {
    /// Create an invocation of the given program
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
            quiet_stderr: false,
        }
    }

    /// Add one argument
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add several arguments
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for the child, replacing any inherited value
    #[must_use]
    pub fn env_set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), EnvAction::Set(value.into())));
        self
    }

    /// Append to an environment variable, preserving any inherited value
    #[must_use]
    pub fn env_append(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), EnvAction::Append(value.into())));
        self
    }

    /// Extend the overlay with prepared entries
    #[must_use]
    pub fn env_overlay<I>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (String, EnvAction)>,
    {
        self.env.extend(entries);
        self
    }

    /// Discard the child's stderr in capture mode
    #[must_use]
    pub fn quiet_stderr(mut self) -> Self {
        self.quiet_stderr = true;
        self
    }

    /// Program name
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Argument list
    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// Effective environment entries, merged against the ambient environment
    #[must_use]
    pub fn resolved_env(&self) -> Vec<(String, String)> {
        self.resolved_with(|key| std::env::var(key).ok())
    }

    /// Merge the overlay against an arbitrary ambient lookup
    fn resolved_with<F>(&self, lookup: F) -> Vec<(String, String)>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.env
            .iter()
            .map(|(key, action)| {
                let value = match action {
                    EnvAction::Set(value) => value.clone(),
                    EnvAction::Append(value) => append_env(lookup(key).as_deref(), value),
                };
                (key.clone(), value)
            })
            .collect()
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        for (key, value) in self.resolved_env() {
            cmd.env(key, value);
        }
        cmd
    }

    /// Run the command with inherited stdio and return its exit status.
    ///
    /// A non-zero status is not an error here; the caller decides.
    pub fn run(&self) -> CubrirResult<ExitStatus> {
        self.command()
            .status()
            .map_err(|e| CubrirError::spawn(&self.program, e))
    }

    /// Run the command capturing stdout; stderr stays on the caller's
    /// stream unless [`quiet_stderr`](Self::quiet_stderr) was requested.
    pub fn capture(&self) -> CubrirResult<Output> {
        let stderr = if self.quiet_stderr {
            Stdio::null()
        } else {
            Stdio::inherit()
        };
        self.command()
            .stdout(Stdio::piped())
            .stderr(stderr)
            .output()
            .map_err(|e| CubrirError::spawn(&self.program, e))
    }
}
