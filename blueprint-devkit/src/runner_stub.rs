/*!
Recorded command runner

Stands in for `ShellRunner`: every command answers from a table filled by the
test, and every invocation is recorded for assertions. Commands missing from
the table fail like a missing binary (exit 127).
*/

use async_trait::async_trait;
use blueprint_collector::{CommandRunner, ExecutionError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

#[derive(Debug, Clone)]
enum Recorded {
    Output(String),
    Failure { code: i32, stderr: String },
}

#[derive(Debug, Clone, Default)]
pub struct RecordedRunner {
    responses: Arc<Mutex<HashMap<String, Recorded>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl RecordedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `command` with `output` on stdout
    pub fn with_output(self, command: impl Into<String>, output: impl Into<String>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(command.into(), Recorded::Output(output.into()));
        self
    }

    /// Make `command` exit with `code`
    pub fn with_failure(self, command: impl Into<String>, code: i32, stderr: impl Into<String>) -> Self {
        self.responses.lock().unwrap().insert(
            command.into(),
            Recorded::Failure { code, stderr: stderr.into() },
        );
        self
    }

    /// Commands run so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn was_called(&self, command: &str) -> bool {
        self.calls.lock().unwrap().iter().any(|c| c == command)
    }
}

#[async_trait]
impl CommandRunner for RecordedRunner {
    async fn run(&self, command: &str) -> Result<String, ExecutionError> {
        self.calls.lock().unwrap().push(command.to_string());

        let recorded = self.responses.lock().unwrap().get(command).cloned();
        debug!("RecordedRunner: {} (recorded: {})", command, recorded.is_some());
        match recorded {
            Some(Recorded::Output(output)) => Ok(output.trim().to_string()),
            Some(Recorded::Failure { code, stderr }) => Err(ExecutionError::NonZeroExit {
                command: command.to_string(),
                code: Some(code),
                stderr,
            }),
            None => Err(ExecutionError::NonZeroExit {
                command: command.to_string(),
                code: Some(127),
                stderr: "command not recorded".to_string(),
            }),
        }
    }
}
