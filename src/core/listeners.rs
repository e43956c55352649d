// src/core/listeners.rs

//! # Port Listener Inspector
//!
//! Answers "which processes are bound to this port?" by driving a privileged
//! `lsof` through the command runner and parsing its tabular output into
//! fixed-shape [`ListenerRecord`]s.

use crate::models::ListenerRecord;
use crate::system::executor::CommandRunner;
use colored::Colorize;

/// Number of whitespace-delimited columns in an `lsof -i` row. The last
/// column (NAME) may itself contain spaces and absorbs the remainder.
const LSOF_COLUMNS: usize = 9;

/// Lists the processes bound to `port`.
///
/// The inspection runs under sudo; the runner is expected to handle the
/// escalation prompt. If the command cannot run, or exits non-zero (lsof
/// reports non-zero when nothing matches), the result is an empty list:
/// an unresolvable check must not block the startup sequence.
pub fn listeners_on_port(runner: &dyn CommandRunner, port: u16) -> Vec<ListenerRecord> {
    println!(
        "{}",
        format!("Requesting sudo to check if something is bound to port {port}").green()
    );
    let output = match runner.run(&format!("sudo lsof -i :{port}")) {
        Ok(output) => output,
        Err(e) => {
            log::warn!("Port inspection could not run: {e}");
            return Vec::new();
        }
    };
    if !output.success {
        return Vec::new();
    }
    parse_lsof_output(&output.stdout)
}

/// Parses `lsof -i` output: one header line (discarded) followed by one row
/// per bound socket. Rows that do not fit the expected shape are skipped,
/// never allowed to abort the whole inspection.
fn parse_lsof_output(stdout: &str) -> Vec<ListenerRecord> {
    stdout
        .lines()
        .skip(1) // column headers
        .filter(|line| !line.trim().is_empty())
        .filter_map(parse_row)
        .collect()
}

fn parse_row(line: &str) -> Option<ListenerRecord> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < LSOF_COLUMNS {
        log::warn!(
            "Skipping malformed lsof row ({} of {} fields): {line}",
            fields.len(),
            LSOF_COLUMNS
        );
        return None;
    }
    let pid = match fields.get(1)?.parse::<u32>() {
        Ok(pid) => pid,
        Err(_) => {
            log::warn!("Skipping lsof row with non-numeric pid: {line}");
            return None;
        }
    };
    Some(ListenerRecord {
        command: (*fields.first()?).to_string(),
        pid,
        user: (*fields.get(2)?).to_string(),
        fd: (*fields.get(3)?).to_string(),
        kind: (*fields.get(4)?).to_string(),
        device: (*fields.get(5)?).to_string(),
        size: (*fields.get(6)?).to_string(),
        node: (*fields.get(7)?).to_string(),
        name: fields.get(LSOF_COLUMNS - 1..)?.join(" "),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::executor::testing::{ScriptedRunner, failed_output, ok_output};

    const SAMPLE: &str = "\
COMMAND   PID   USER   FD   TYPE DEVICE SIZE/OFF NODE NAME
dnsmasq  1523 nobody    4u  IPv4  19307      0t0  UDP *:domain
dnsmasq  1523 nobody    5u  IPv4  19308      0t0  TCP *:domain (LISTEN)
systemd-r 742 systemd-resolve 12u IPv4 17001 0t0 UDP 127.0.0.53:domain
";

    #[test]
    fn parses_rows_and_discards_the_header() {
        let records = parse_lsof_output(SAMPLE);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].command, "dnsmasq");
        assert_eq!(records[0].pid, 1523);
        assert_eq!(records[0].user, "nobody");
        assert_eq!(records[0].node, "UDP");
        // NAME absorbs trailing tokens.
        assert_eq!(records[1].name, "*:domain (LISTEN)");
        assert_eq!(records[2].pid, 742);
    }

    #[test]
    fn malformed_rows_are_skipped_not_fatal() {
        let with_noise = format!("{SAMPLE}short row\n");
        let records = parse_lsof_output(&with_noise);
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn non_numeric_pid_rows_are_skipped() {
        let sample = "\
COMMAND PID USER FD TYPE DEVICE SIZE/OFF NODE NAME
dnsmasq abc nobody 4u IPv4 19307 0t0 UDP *:domain
";
        assert!(parse_lsof_output(sample).is_empty());
    }

    #[test]
    fn failed_inspection_reads_as_no_listeners() {
        let runner =
            ScriptedRunner::new().on_prefix("sudo lsof", failed_output("lsof: not found"));
        assert!(listeners_on_port(&runner, 53).is_empty());
    }

    #[test]
    fn inspection_queries_the_requested_port() {
        let runner = ScriptedRunner::new().on_prefix("sudo lsof -i :53", ok_output(SAMPLE));
        let records = listeners_on_port(&runner, 53);
        assert_eq!(records.len(), 3);
        assert_eq!(runner.calls_matching("sudo lsof -i :53"), 1);
    }
}
