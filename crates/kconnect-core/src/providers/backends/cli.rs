//! Shared runner for vendor CLIs.
//!
//! Shelling out inherits the user's existing vendor login, credential helpers
//! and proxy settings with no SDK setup in this crate.

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::providers::errors::BackendError;

/// A vendor CLI invocation.
#[derive(Debug, Clone, Default)]
pub struct CliCommand {
    pub program: &'static str,
    pub args: Vec<String>,
    pub envs: Vec<(String, String)>,
}

impl CliCommand {
    pub fn new(program: &'static str) -> Self {
        Self {
            program,
            ..Default::default()
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Append `flag value` when `value` is present.
    pub fn opt_arg(self, flag: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.arg(flag).arg(value),
            None => self,
        }
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.envs.push((key.to_string(), value.to_string()));
        self
    }

    /// Run and return stdout. Non-zero exit maps to `CommandFailed` with stderr.
    pub fn run(&self) -> Result<String, BackendError> {
        if which::which(self.program).is_err() {
            warn!(event = "core.backend.not_installed", program = self.program);
            return Err(BackendError::NotInstalled {
                program: self.program.to_string(),
            });
        }

        // Args may carry secrets in other callers; only the subcommand is logged.
        info!(
            event = "core.backend.command_started",
            program = self.program,
            subcommand = self.args.first().map(String::as_str).unwrap_or("")
        );

        let output = std::process::Command::new(self.program)
            .args(&self.args)
            .envs(self.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .output()
            .map_err(|e| BackendError::CommandFailed {
                program: self.program.to_string(),
                message: format!("Failed to execute: {}", e),
            })?;

        if output.status.success() {
            debug!(
                event = "core.backend.command_completed",
                program = self.program,
                bytes = output.stdout.len()
            );
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(
                event = "core.backend.command_failed",
                program = self.program,
                status = ?output.status.code(),
                stderr = %stderr.trim()
            );
            Err(BackendError::CommandFailed {
                program: self.program.to_string(),
                message: stderr.trim().to_string(),
            })
        }
    }

    /// Run and decode stdout as JSON.
    pub fn run_json<T: DeserializeOwned>(&self) -> Result<T, BackendError> {
        let stdout = self.run()?;
        parse_json(self.program, &stdout)
    }
}

pub(crate) fn parse_json<T: DeserializeOwned>(
    program: &str,
    stdout: &str,
) -> Result<T, BackendError> {
    serde_json::from_str(stdout).map_err(|e| BackendError::InvalidOutput {
        program: program.to_string(),
        message: e.to_string(),
    })
}
