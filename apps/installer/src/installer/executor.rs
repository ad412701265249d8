//! External command execution.
//!
//! Admin operations never spawn processes directly; they hand an argument
//! list to a [`CommandExecutor`] so the real process runner can be swapped
//! for a recording double in tests.

use std::io;
use std::process::Command;
#[cfg(test)]
use std::sync::Mutex;

use thiserror::Error;
use tracing::debug;

/// Errors raised while running an external command
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("no command given")]
    EmptyCommand,
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("{program} exited with {}: {stderr}", exit_label(.code))]
    Failed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
    #[error("executor failure on call {call}")]
    Injected { call: usize },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "signal".to_string(),
    }
}

/// Runs an external command. `args[0]` is the program.
pub trait CommandExecutor: Send + Sync {
    fn execute_command(&self, args: &[String]) -> Result<(), ExecutionError>;
}

/// Spawns a real process and waits for it
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl CommandExecutor for SystemExecutor {
    fn execute_command(&self, args: &[String]) -> Result<(), ExecutionError> {
        let (program, rest) = args.split_first().ok_or(ExecutionError::EmptyCommand)?;

        debug!(%program, argc = rest.len(), "spawning command");

        let output = Command::new(program)
            .args(rest)
            .output()
            .map_err(|source| ExecutionError::Launch {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ExecutionError::Failed {
                program: program.clone(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            debug!(%program, stdout = %stdout.trim(), "command output");
        }

        Ok(())
    }
}

/// Records every invocation instead of running it.
///
/// With `fail_after = n` (n > 0) every call from the n-th onwards fails.
/// The failing call is still recorded.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    commands: Mutex<Vec<Vec<String>>>,
    fail_after: usize,
}

#[cfg(test)]
impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_after(fail_after: usize) -> Self {
        Self {
            commands: Mutex::new(Vec::new()),
            fail_after,
        }
    }

    /// Snapshot of recorded commands in invocation order
    pub fn commands(&self) -> Vec<Vec<String>> {
        self.commands
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[cfg(test)]
impl CommandExecutor for RecordingExecutor {
    fn execute_command(&self, args: &[String]) -> Result<(), ExecutionError> {
        let mut commands = self
            .commands
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        commands.push(args.to_vec());

        let call = commands.len();
        if self.fail_after != 0 && call >= self.fail_after {
            return Err(ExecutionError::Injected { call });
        }
        Ok(())
    }
}
