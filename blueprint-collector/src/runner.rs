//! Command execution capability
//!
//! The collector asks a [`CommandRunner`] for command output and never spawns
//! processes itself, so collection can be replayed offline from recorded
//! output. [`ShellRunner`] is the real implementation:
//! - `bash -c <command>` with piped stdout/stderr
//! - per-command timeout
//! - non-zero exit reported as an error carrying stderr

use async_trait::async_trait;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command as AsyncCommand;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` timed out after {timeout_secs}s")]
    Timeout { command: String, timeout_secs: u64 },
    #[error("`{command}` exited with {code:?}: {stderr}")]
    NonZeroExit {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `command` and return its trimmed stdout
    async fn run(&self, command: &str) -> Result<String, ExecutionError>;
}

/// Runs commands through the local shell
#[derive(Debug, Clone)]
pub struct ShellRunner {
    timeout: Duration,
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

impl ShellRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, command: &str) -> Result<String, ExecutionError> {
        let start_time = Instant::now();
        debug!("Executing shell command: {} (timeout: {:?})", command, self.timeout);

        let output = tokio::time::timeout(
            self.timeout,
            AsyncCommand::new("bash")
                .arg("-c")
                .arg(command)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| ExecutionError::Timeout {
            command: command.to_string(),
            timeout_secs: self.timeout.as_secs(),
        })?
        .map_err(|source| ExecutionError::Spawn {
            command: command.to_string(),
            source,
        })?;

        debug!("`{}` finished in {}ms", command, start_time.elapsed().as_millis());

        if !output.status.success() {
            return Err(ExecutionError::NonZeroExit {
                command: command.to_string(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
