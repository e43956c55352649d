// src/core/service.rs

//! # Service Startup State Machine
//!
//! The shared start flow for every container-backed service:
//!
//! ```text
//! Idle -> PreconditionCheck -> Attempting -> { Succeeded, Retrying, Failed }
//! ```
//!
//! Services provide a [`ContainerSpec`] and may hook the two decision points:
//! `run_preconditions` (checked before each attempt) and
//! `handle_start_failure` (invoked after a failed attempt, while retrying is
//! still allowed). The default hooks give the plain no-retry flow; the DNS
//! resolver overrides both to get its bounded single retry.

use crate::models::{CommandOutput, ContainerSpec, StartOutcome};
use crate::system::{docker, executor::CommandRunner};

pub trait DockerService {
    /// Human-facing name, used in progress and failure messages.
    fn service_name(&self) -> &'static str;

    /// The container this service runs.
    fn container_spec(&self) -> ContainerSpec;

    /// Checked before each attempt. Returning false aborts the attempt
    /// without invoking the container runtime. Default: always clear.
    fn run_preconditions(&mut self, _runner: &dyn CommandRunner) -> bool {
        true
    }

    /// Invoked when an attempt fails while `allow_retry` is still true.
    /// Default: the failure is terminal.
    fn handle_start_failure(
        &mut self,
        _runner: &dyn CommandRunner,
        output: CommandOutput,
    ) -> StartOutcome {
        StartOutcome::Failed {
            last_output: Some(output),
        }
    }

    /// Runs the startup sequence. Every terminal state is a returned
    /// outcome; the caller decides exit behavior.
    fn start(&mut self, runner: &dyn CommandRunner) -> StartOutcome {
        self.start_attempt(runner, true)
    }

    /// One pass through the state machine. `allow_retry = false` bars the
    /// failure hook, so nested retries cannot recurse a second time
    /// regardless of outcome.
    fn start_attempt(&mut self, runner: &dyn CommandRunner, allow_retry: bool) -> StartOutcome {
        log::debug!("{} service running preconditions", self.service_name());
        if !self.run_preconditions(runner) {
            log::debug!(
                "{} preconditions not clear, not attempting start",
                self.service_name()
            );
            return StartOutcome::Failed { last_output: None };
        }

        let spec = self.container_spec();
        let output = match docker::start_container(runner, &spec) {
            Ok(output) => output,
            Err(e) => {
                log::warn!("{} start could not run: {e}", self.service_name());
                return StartOutcome::Failed { last_output: None };
            }
        };

        if output.success {
            return StartOutcome::Started;
        }

        log::debug!(
            "{} start attempt failed: {}",
            self.service_name(),
            output.stderr.trim()
        );
        if allow_retry {
            self.handle_start_failure(runner, output)
        } else {
            StartOutcome::Failed {
                last_output: Some(output),
            }
        }
    }
}
