// src/core/dns.rs

//! # DNS Resolver Service
//!
//! The one service with a non-trivial startup path. Its container must own
//! privileged port 53, which on many hosts is already held by a local
//! resolver (systemd-resolved, a stray dnsmasq). The first start attempt is
//! made optimistically, with no port check at all; only when that attempt
//! fails do we inspect the port, negotiate with the operator to reclaim it,
//! and retry exactly once.

use crate::constants::{DNSMASQ_IMAGE, DNS_PORT};
use crate::core::{conflict, listeners, service::DockerService};
use crate::models::{CommandOutput, ContainerSpec, DnsResolverSettings, StartOutcome};
use crate::system::executor::CommandRunner;

/// The DNS resolver service plus its per-invocation retry state.
///
/// `first_attempt_failed` is deliberately a field rather than anything
/// process-global: each `DnsResolver` value owns one startup sequence, so
/// sequential startups (and tests) cannot interfere with each other. It
/// starts false and is set true at most once, immediately before the single
/// permitted retry; once true, a further failure is terminal.
#[derive(Debug)]
pub struct DnsResolver {
    settings: DnsResolverSettings,
    first_attempt_failed: bool,
    /// Non-interactive answer for the conflict prompt, used by tests and
    /// automation. None means ask the operator.
    answer_override: Option<String>,
}

impl DnsResolver {
    pub fn new(settings: DnsResolverSettings) -> Self {
        Self {
            settings,
            first_attempt_failed: false,
            answer_override: None,
        }
    }

    pub fn with_answer_override(mut self, answer: impl Into<String>) -> Self {
        self.answer_override = Some(answer.into());
        self
    }

    pub fn container_name(&self) -> &str {
        &self.settings.container_name
    }
}

impl DockerService for DnsResolver {
    fn service_name(&self) -> &'static str {
        "dns_resolver"
    }

    fn container_spec(&self) -> ContainerSpec {
        ContainerSpec {
            name: self.settings.container_name.clone(),
            image: DNSMASQ_IMAGE.to_string(),
            ports: vec![
                format!("{DNS_PORT}:{DNS_PORT}/tcp"),
                format!("{DNS_PORT}:{DNS_PORT}/udp"),
            ],
            cap_adds: vec!["NET_ADMIN".to_string()],
            args: vec![self.settings.domain.clone(), self.settings.address.clone()],
            ..ContainerSpec::default()
        }
    }

    /// We don't want to hassle the operator with a privileged port check
    /// unless necessary, so the first attempt skips preconditions entirely.
    /// On the retry, the port is inspected: listeners found means the
    /// conflict negotiator decides; none found means the failure has no
    /// discoverable cause here and the startup surfaces as a failure.
    fn run_preconditions(&mut self, runner: &dyn CommandRunner) -> bool {
        if !self.first_attempt_failed {
            log::debug!("Skipping preconditions on first run");
            return true;
        }

        log::debug!("First attempt failed. Checking port {DNS_PORT}");
        let listener_list = listeners::listeners_on_port(runner, DNS_PORT);
        if listener_list.is_empty() {
            return false;
        }
        conflict::offer_to_kill(runner, &listener_list, self.answer_override.as_deref())
    }

    /// Exactly one retry: mark the failure, re-enter the state machine with
    /// retrying barred. If the mark is already set this *is* the retry's own
    /// failure, and nothing recurses further.
    fn handle_start_failure(
        &mut self,
        runner: &dyn CommandRunner,
        output: CommandOutput,
    ) -> StartOutcome {
        if self.first_attempt_failed {
            log::debug!("Attempt to resolve the port conflict failed");
            return StartOutcome::Failed {
                last_output: Some(output),
            };
        }

        log::debug!(
            "First attempt to start the DNS resolver failed. \
             There is probably a conflicting service present"
        );
        self.first_attempt_failed = true;
        self.start_attempt(runner, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Settings;
    use crate::system::executor::testing::{ScriptedRunner, failed_output, ok_output};

    const LSOF_WITH_LISTENERS: &str = "\
COMMAND   PID   USER   FD   TYPE DEVICE SIZE/OFF NODE NAME
dnsmasq   101 nobody    4u  IPv4  19307      0t0  UDP *:domain
dnsmasq   101 nobody    5u  IPv4  19308      0t0  TCP *:domain (LISTEN)
resolved  202 systemd  12u  IPv4  17001      0t0  UDP 127.0.0.53:domain
";

    fn resolver(answer: &str) -> DnsResolver {
        DnsResolver::new(Settings::default().dns_resolver).with_answer_override(answer)
    }

    #[test]
    fn first_attempt_skips_the_port_inspection_entirely() {
        // Even with listeners present, a successful first start never
        // touches lsof.
        let runner = ScriptedRunner::new()
            .on_prefix("docker run", ok_output("abc123"))
            .on_prefix("sudo lsof", ok_output(LSOF_WITH_LISTENERS));
        let outcome = resolver("n").start(&runner);
        assert!(outcome.is_started());
        assert_eq!(runner.calls_matching("sudo lsof"), 0);
        assert_eq!(runner.calls_matching("docker run"), 1);
    }

    #[test]
    fn always_failing_start_makes_exactly_two_attempts() {
        let runner = ScriptedRunner::new()
            .on_prefix("docker run", failed_output("port is already allocated"))
            .on_prefix("sudo lsof", ok_output(LSOF_WITH_LISTENERS))
            .on_prefix("sudo kill", ok_output(""));
        let outcome = resolver("y").start(&runner);
        assert!(!outcome.is_started());
        // One optimistic attempt, one retry after conflict resolution,
        // never a third.
        assert_eq!(runner.calls_matching("docker run"), 2);
        assert_eq!(runner.calls_matching("sudo lsof"), 1);
        assert_eq!(runner.calls_matching("sudo kill"), 1);
    }

    #[test]
    fn retry_succeeds_after_conflict_is_cleared() {
        let runner = ScriptedRunner::new()
            .once_prefix("docker run", failed_output("port is already allocated"))
            .on_prefix("docker run", ok_output("abc123"))
            .on_prefix("sudo lsof", ok_output(LSOF_WITH_LISTENERS))
            .on_prefix("sudo kill", ok_output(""));
        let mut service = resolver("y");
        let outcome = service.start(&runner);
        assert!(outcome.is_started());
        assert!(service.first_attempt_failed);
        assert_eq!(runner.calls_matching("docker run"), 2);
        assert_eq!(runner.calls_matching("sudo kill"), 1);
    }

    #[test]
    fn declined_kill_fails_without_a_second_attempt() {
        let runner = ScriptedRunner::new()
            .on_prefix("docker run", failed_output("port is already allocated"))
            .on_prefix("sudo lsof", ok_output(LSOF_WITH_LISTENERS))
            .on_prefix("sudo kill", ok_output(""));
        let outcome = resolver("n").start(&runner);
        assert!(!outcome.is_started());
        // The decline aborts the retry before the container runtime is
        // invoked again, and no kill is ever issued.
        assert_eq!(runner.calls_matching("docker run"), 1);
        assert_eq!(runner.calls_matching("sudo kill"), 0);
    }

    #[test]
    fn retry_with_no_listeners_is_a_terminal_failure() {
        // A residual failure with no discoverable port conflict is not
        // retried: preconditions report not-clear and startup fails.
        let runner = ScriptedRunner::new()
            .on_prefix("docker run", failed_output("unknown error"))
            .on_prefix(
                "sudo lsof",
                ok_output("COMMAND PID USER FD TYPE DEVICE SIZE/OFF NODE NAME\n"),
            );
        let outcome = resolver("y").start(&runner);
        assert!(!outcome.is_started());
        assert_eq!(runner.calls_matching("docker run"), 1);
        assert_eq!(runner.calls_matching("sudo lsof"), 1);
    }

    #[test]
    fn container_spec_derives_from_settings() {
        let service = DnsResolver::new(Settings::default().dns_resolver);
        let spec = service.container_spec();
        assert_eq!(spec.name, "dockhand_dnsmasq");
        assert_eq!(spec.ports, vec!["53:53/tcp", "53:53/udp"]);
        assert_eq!(spec.cap_adds, vec!["NET_ADMIN"]);
        assert_eq!(spec.args, vec!["docker", "127.0.0.1"]);
    }
}
