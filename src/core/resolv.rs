// src/core/resolv.rs

//! # Host Resolver Configuration
//!
//! Points the host's resolver at the DNS container for the dev domain.
//!
//! - macOS: a file under `/etc/resolver/<domain>`; the system routes lookups
//!   for that domain to the nameserver it names.
//! - elsewhere (Linux): a marker-tagged `nameserver` line prepended to
//!   `/etc/resolv.conf`.
//!
//! Every write runs under sudo through the command runner, with all dynamic
//! fragments quoted at the escaping boundary. The marker comment makes the
//! edits reversible: `down` removes exactly what `up` added, nothing else.

use crate::constants::RESOLV_MARKER;
use crate::models::HostResolverSettings;
use crate::system::executor::CommandRunner;
use thiserror::Error;

#[cfg(not(target_os = "macos"))]
const RESOLV_CONF: &str = "/etc/resolv.conf";

#[derive(Error, Debug)]
pub enum ResolvError {
    #[error("Could not read the current resolver configuration: {0}")]
    ReadFailed(String),
    #[error("Privileged write to the resolver configuration failed: {0}")]
    WriteFailed(String),
    #[error("Resolver fragment '{0}' cannot be safely quoted for shell execution.")]
    UnquotableFragment(String),
}

/// The nameserver line we own, tagged so removal never touches operator-
/// managed entries.
fn nameserver_line(settings: &HostResolverSettings) -> String {
    format!("nameserver {} {RESOLV_MARKER}", settings.nameserver)
}

/// Installs the dev-domain resolver entry for `domain`.
pub fn configure(
    runner: &dyn CommandRunner,
    settings: &HostResolverSettings,
    domain: &str,
) -> Result<(), ResolvError> {
    #[cfg(target_os = "macos")]
    {
        let contents = format!("{RESOLV_MARKER}\n{}\n", nameserver_line(settings));
        write_file(runner, &resolver_file(domain), &contents)
    }
    #[cfg(not(target_os = "macos"))]
    {
        let _ = domain; // the resolv.conf route applies to all lookups
        let current = read_file(runner, RESOLV_CONF)?;
        let ours = nameserver_line(settings);
        if current.lines().any(|line| line == ours) {
            log::debug!("Resolver entry already present, nothing to do");
            return Ok(());
        }
        let mut contents = format!("{ours}\n");
        contents.push_str(&strip_our_lines(&current));
        write_file(runner, RESOLV_CONF, &contents)
    }
}

/// Removes exactly the entries `configure` added.
pub fn unconfigure(runner: &dyn CommandRunner, domain: &str) -> Result<(), ResolvError> {
    #[cfg(target_os = "macos")]
    {
        let path = resolver_file(domain);
        let argv = ["sudo", "rm", "-f", path.as_str()];
        let command = shlex::try_join(argv)
            .map_err(|_| ResolvError::UnquotableFragment(path.clone()))?;
        let output = runner
            .run(&command)
            .map_err(|e| ResolvError::WriteFailed(e.to_string()))?;
        if output.success {
            Ok(())
        } else {
            Err(ResolvError::WriteFailed(output.stderr.trim().to_string()))
        }
    }
    #[cfg(not(target_os = "macos"))]
    {
        let _ = domain;
        let current = read_file(runner, RESOLV_CONF)?;
        let stripped = strip_our_lines(&current);
        if stripped == current {
            log::debug!("No resolver entry of ours present, nothing to do");
            return Ok(());
        }
        write_file(runner, RESOLV_CONF, &stripped)
    }
}

/// Whether our marker-tagged entry is currently installed. Used by `status`.
pub fn has_our_nameserver(runner: &dyn CommandRunner, domain: &str) -> bool {
    #[cfg(target_os = "macos")]
    let path = resolver_file(domain);
    #[cfg(not(target_os = "macos"))]
    let path = {
        let _ = domain;
        RESOLV_CONF.to_string()
    };
    match read_file(runner, &path) {
        Ok(contents) => contents.lines().any(|line| line.contains(RESOLV_MARKER)),
        Err(_) => false,
    }
}

#[cfg(target_os = "macos")]
fn resolver_file(domain: &str) -> String {
    format!("/etc/resolver/{domain}")
}

/// Drops every line carrying our marker, leaving the rest byte-identical.
#[cfg(not(target_os = "macos"))]
fn strip_our_lines(contents: &str) -> String {
    let mut kept: String = contents
        .lines()
        .filter(|line| !line.contains(RESOLV_MARKER))
        .collect::<Vec<_>>()
        .join("\n");
    if !kept.is_empty() {
        kept.push('\n');
    }
    kept
}

fn read_file(runner: &dyn CommandRunner, path: &str) -> Result<String, ResolvError> {
    let argv = ["cat", path];
    let command =
        shlex::try_join(argv).map_err(|_| ResolvError::UnquotableFragment(path.to_string()))?;
    let output = runner
        .run(&command)
        .map_err(|e| ResolvError::ReadFailed(e.to_string()))?;
    if output.success {
        Ok(output.stdout)
    } else {
        Err(ResolvError::ReadFailed(output.stderr.trim().to_string()))
    }
}

fn write_file(
    runner: &dyn CommandRunner,
    path: &str,
    contents: &str,
) -> Result<(), ResolvError> {
    // The runner does not interpret shell syntax itself, so redirection has
    // to happen inside an explicit `sh -c` with a fully quoted script.
    let quoted_contents = shlex::try_quote(contents)
        .map_err(|_| ResolvError::UnquotableFragment(contents.to_string()))?;
    let quoted_path = shlex::try_quote(path)
        .map_err(|_| ResolvError::UnquotableFragment(path.to_string()))?;
    let script = format!("printf %s {quoted_contents} > {quoted_path}");
    let argv = ["sudo", "sh", "-c", script.as_str()];
    let command =
        shlex::try_join(argv).map_err(|_| ResolvError::UnquotableFragment(path.to_string()))?;
    println!("Requesting sudo to update {path}");
    let output = runner
        .run(&command)
        .map_err(|e| ResolvError::WriteFailed(e.to_string()))?;
    if output.success {
        Ok(())
    } else {
        Err(ResolvError::WriteFailed(output.stderr.trim().to_string()))
    }
}

#[cfg(all(test, not(target_os = "macos")))]
mod tests {
    use super::*;
    use crate::models::Settings;
    use crate::system::executor::testing::{ScriptedRunner, ok_output};

    #[test]
    fn configure_prepends_a_marked_nameserver_line() {
        let runner = ScriptedRunner::new()
            .on_prefix("cat /etc/resolv.conf", ok_output("nameserver 8.8.8.8\n"))
            .on_prefix("sudo sh -c", ok_output(""));
        configure(&runner, &Settings::default().host_resolver, "docker").unwrap();

        let calls = runner.calls.borrow();
        let write = calls.iter().find(|c| c.starts_with("sudo sh -c")).unwrap();
        assert!(write.contains("nameserver 127.0.0.1 # added by dockhand"));
        assert!(write.contains("nameserver 8.8.8.8"));
        // Our line comes first so it wins resolution order.
        assert!(
            write.find("127.0.0.1 # added by dockhand").unwrap() < write.find("8.8.8.8").unwrap()
        );
    }

    #[test]
    fn configure_is_idempotent() {
        let settings = Settings::default().host_resolver;
        let existing = format!("{}\nnameserver 8.8.8.8\n", nameserver_line(&settings));
        let runner = ScriptedRunner::new()
            .on_prefix("cat /etc/resolv.conf", ok_output(&existing))
            .on_prefix("sudo sh -c", ok_output(""));
        configure(&runner, &settings, "docker").unwrap();
        assert_eq!(runner.calls_matching("sudo sh -c"), 0);
    }

    #[test]
    fn unconfigure_removes_only_marked_lines() {
        let settings = Settings::default().host_resolver;
        let existing = format!("{}\nnameserver 8.8.8.8\n", nameserver_line(&settings));
        let runner = ScriptedRunner::new()
            .on_prefix("cat /etc/resolv.conf", ok_output(&existing))
            .on_prefix("sudo sh -c", ok_output(""));
        unconfigure(&runner, "docker").unwrap();

        let calls = runner.calls.borrow();
        let write = calls.iter().find(|c| c.starts_with("sudo sh -c")).unwrap();
        assert!(!write.contains(RESOLV_MARKER));
        assert!(write.contains("nameserver 8.8.8.8"));
    }

    #[test]
    fn status_detects_our_entry() {
        let settings = Settings::default().host_resolver;
        let runner = ScriptedRunner::new().on_prefix(
            "cat /etc/resolv.conf",
            ok_output(&format!("{}\n", nameserver_line(&settings))),
        );
        assert!(has_our_nameserver(&runner, "docker"));

        let runner = ScriptedRunner::new()
            .on_prefix("cat /etc/resolv.conf", ok_output("nameserver 8.8.8.8\n"));
        assert!(!has_our_nameserver(&runner, "docker"));
    }
}
