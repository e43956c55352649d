// src/system/executor.rs

use crate::models::CommandOutput;
use std::process::{Command as StdCommand, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Command could not be parsed: {0}")]
    CommandParse(String),
    #[error("No command specified to run.")]
    EmptyCommand,
    #[error("Command '{0}' could not be executed: {1}")]
    CommandFailed(String, std::io::Error),
    #[error("Command '{command}' produced output that was not valid UTF-8")]
    InvalidUtf8Output {
        command: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// The seam between dockhand and the operating system. Implementations run one
/// shell-style command line to completion and capture its output.
///
/// An `Err` means the command could not be run at all (unparseable line,
/// missing binary). A command that ran and exited non-zero is an `Ok` with
/// `success == false`: callers decide what a failed exit means for them.
pub trait CommandRunner {
    fn run(&self, command_line: &str) -> Result<CommandOutput, ExecutionError>;
}

/// The production runner: blocking, synchronous, no timeout. A hang in the
/// underlying runtime blocks the whole startup sequence; that is accepted
/// behavior for this tool.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, command_line: &str) -> Result<CommandOutput, ExecutionError> {
        let trimmed = command_line.trim();
        if trimmed.is_empty() {
            return Err(ExecutionError::EmptyCommand);
        }

        let parts = shlex::split(trimmed)
            .ok_or_else(|| ExecutionError::CommandParse(trimmed.to_string()))?;
        let (program, args) = parts
            .split_first()
            .ok_or(ExecutionError::EmptyCommand)?;

        log::debug!("Executing: {}", trimmed);

        let output = StdCommand::new(program)
            .args(args)
            .stdin(Stdio::inherit()) // sudo may need to prompt for a password.
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| ExecutionError::CommandFailed(trimmed.to_string(), e))?;

        let stdout =
            String::from_utf8(output.stdout).map_err(|e| ExecutionError::InvalidUtf8Output {
                command: trimmed.to_string(),
                source: e,
            })?;
        let stderr =
            String::from_utf8(output.stderr).map_err(|e| ExecutionError::InvalidUtf8Output {
                command: trimmed.to_string(),
                source: e,
            })?;

        log::debug!(
            "Command exited ({}): {}",
            if output.status.success() { "ok" } else { "non-zero" },
            trimmed
        );

        Ok(CommandOutput {
            success: output.status.success(),
            stdout,
            stderr,
        })
    }
}

#[cfg(test)]
pub mod testing {
    //! A scripted runner for unit tests: matches each incoming command line
    //! against registered prefixes, returns the canned output, and records
    //! every invocation so tests can assert on exact command traffic.

    use super::{CommandRunner, ExecutionError};
    use crate::models::CommandOutput;
    use std::cell::RefCell;

    pub struct ScriptedRunner {
        one_shots: RefCell<Vec<(String, CommandOutput)>>,
        responses: Vec<(String, CommandOutput)>,
        pub calls: RefCell<Vec<String>>,
    }

    impl ScriptedRunner {
        pub fn new() -> Self {
            Self {
                one_shots: RefCell::new(Vec::new()),
                responses: Vec::new(),
                calls: RefCell::new(Vec::new()),
            }
        }

        /// Registers a canned response for every command starting with `prefix`.
        /// Earlier registrations win.
        pub fn on_prefix(mut self, prefix: &str, output: CommandOutput) -> Self {
            self.responses.push((prefix.to_string(), output));
            self
        }

        /// Registers a response consumed by the first matching command only.
        /// One-shots take precedence over `on_prefix` registrations, so a
        /// test can script "fail once, then succeed".
        pub fn once_prefix(self, prefix: &str, output: CommandOutput) -> Self {
            self.one_shots
                .borrow_mut()
                .push((prefix.to_string(), output));
            self
        }

        pub fn calls_matching(&self, prefix: &str) -> usize {
            self.calls
                .borrow()
                .iter()
                .filter(|c| c.starts_with(prefix))
                .count()
        }
    }

    impl CommandRunner for ScriptedRunner {
        fn run(&self, command_line: &str) -> Result<CommandOutput, ExecutionError> {
            self.calls.borrow_mut().push(command_line.to_string());
            let mut one_shots = self.one_shots.borrow_mut();
            if let Some(position) = one_shots
                .iter()
                .position(|(prefix, _)| command_line.starts_with(prefix.as_str()))
            {
                let (_, output) = one_shots.remove(position);
                return Ok(output);
            }
            drop(one_shots);
            for (prefix, output) in &self.responses {
                if command_line.starts_with(prefix.as_str()) {
                    return Ok(output.clone());
                }
            }
            // Unscripted commands report a failed exit rather than panicking,
            // mirroring how an absent binary surfaces in the wild.
            Ok(CommandOutput {
                success: false,
                stdout: String::new(),
                stderr: format!("unscripted command: {command_line}"),
            })
        }
    }

    pub fn ok_output(stdout: &str) -> CommandOutput {
        CommandOutput {
            success: true,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    pub fn failed_output(stderr: &str) -> CommandOutput {
        CommandOutput {
            success: false,
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }
}
