use std::collections::HashMap;
use std::process::{Command, Output};
use std::time::Duration;

use crate::errors::LicrawlError;

/// Builder for constructing and executing external processes.
///
/// Arguments and environment variables are set fluently.
pub struct CommandBuilder {
    program: String,
    args: Vec<String>,
    env: HashMap<String, String>,
}

impl CommandBuilder {
    /// Create a new builder for the given program.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: HashMap::new(),
        }
    }

    /// Append a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append multiple arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for the child process.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Render the command line for diagnostics.
    pub fn display(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    /// Execute the command and return its output.
    pub fn exec(&self) -> Result<Output, LicrawlError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        for (k, v) in &self.env {
            cmd.env(k, v);
        }
        cmd.output().map_err(LicrawlError::from)
    }

    /// Execute the command on the tokio runtime, killing the child if it
    /// runs longer than `timeout`.
    pub async fn exec_with_timeout(&self, timeout: Duration) -> Result<Output, LicrawlError> {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.args).kill_on_drop(true);
        for (k, v) in &self.env {
            cmd.env(k, v);
        }
        match tokio::time::timeout(timeout, cmd.output()).await {
            Ok(result) => result.map_err(LicrawlError::from),
            Err(_) => Err(LicrawlError::Timeout {
                message: format!("`{}` exceeded {}s", self.display(), timeout.as_secs()),
            }),
        }
    }
}
