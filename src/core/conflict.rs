// src/core/conflict.rs

//! # Conflict Negotiator
//!
//! Turns a list of detected port listeners into an operator-confirmed
//! remediation: one confirmation naming every distinct pid, then a single
//! privileged kill covering all of them.

use crate::models::ListenerRecord;
use crate::system::executor::CommandRunner;
use colored::Colorize;
use dialoguer::{Confirm, theme::ColorfulTheme};

/// Presents the listeners to the operator and, on confirmation, terminates
/// them in one privileged call. Returns whether the port is now cleared to
/// proceed.
///
/// `answer_override` bypasses the interactive prompt for tests and
/// non-interactive use; any answer containing `y`/`Y` is affirmative,
/// everything else declines.
pub fn offer_to_kill(
    runner: &dyn CommandRunner,
    listeners: &[ListenerRecord],
    answer_override: Option<&str>,
) -> bool {
    for listener in listeners {
        println!(
            "Process '{}' with PID '{}' is listening on {} port 53.",
            listener.command, listener.pid, listener.node
        );
    }

    let pids = distinct_pids(listeners);
    if pids.is_empty() {
        return false;
    }
    let pid_phrase = pids
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(" and ");

    let confirmed = match answer_override {
        Some(answer) => answer.to_lowercase().contains('y'),
        None => Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "This interferes with dockhand's DNS resolver container. \
                 Would you like me to kill PID {pid_phrase}?"
            ))
            .default(false)
            .interact()
            .unwrap_or(false),
    };

    if !confirmed {
        println!(
            "{}",
            format!(
                "OK, not killing PID {pid_phrase}. Please kill manually and try starting dockhand again."
            )
            .red()
        );
        return false;
    }

    println!("Requesting sudo to kill PID {pid_phrase}");
    let kill_list = pids
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    match runner.run(&format!("sudo kill {kill_list}")) {
        Ok(output) => {
            if !output.success {
                log::warn!("kill exited non-zero: {}", output.stderr.trim());
            }
            output.success
        }
        Err(e) => {
            log::warn!("Could not run kill: {e}");
            false
        }
    }
}

/// Distinct pids in first-seen order, so the operator is never asked to
/// confirm the same process twice.
fn distinct_pids(listeners: &[ListenerRecord]) -> Vec<u32> {
    let mut pids = Vec::new();
    for listener in listeners {
        if !pids.contains(&listener.pid) {
            pids.push(listener.pid);
        }
    }
    pids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::executor::testing::{ScriptedRunner, failed_output, ok_output};

    fn listener(pid: u32) -> ListenerRecord {
        ListenerRecord {
            command: "dnsmasq".into(),
            pid,
            user: "nobody".into(),
            fd: "4u".into(),
            kind: "IPv4".into(),
            device: "19307".into(),
            size: "0t0".into(),
            node: "UDP".into(),
            name: "*:domain".into(),
        }
    }

    #[test]
    fn duplicate_pids_collapse_into_one_kill_naming_both() {
        let runner = ScriptedRunner::new().on_prefix("sudo kill", ok_output(""));
        let listeners = [listener(101), listener(101), listener(202)];
        assert!(offer_to_kill(&runner, &listeners, Some("y")));
        let calls = runner.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], "sudo kill 101 202");
    }

    #[test]
    fn declining_issues_no_termination_command() {
        let runner = ScriptedRunner::new().on_prefix("sudo kill", ok_output(""));
        let listeners = [listener(101)];
        assert!(!offer_to_kill(&runner, &listeners, Some("n")));
        assert!(runner.calls.borrow().is_empty());
    }

    #[test]
    fn failed_kill_does_not_clear_the_port() {
        let runner =
            ScriptedRunner::new().on_prefix("sudo kill", failed_output("operation not permitted"));
        let listeners = [listener(101)];
        assert!(!offer_to_kill(&runner, &listeners, Some("Y")));
        assert_eq!(runner.calls_matching("sudo kill"), 1);
    }

    #[test]
    fn empty_listener_list_is_never_cleared() {
        let runner = ScriptedRunner::new();
        assert!(!offer_to_kill(&runner, &[], Some("y")));
        assert!(runner.calls.borrow().is_empty());
    }
}
