// src/cli/handlers/status.rs

use super::commons;
use crate::core::resolv;
use crate::models::ContainerStatus;
use crate::system::{docker, executor::CommandRunner};
use anyhow::Result;
use colored::Colorize;

pub fn handle(_args: Vec<String>, runner: &dyn CommandRunner) -> Result<()> {
    let settings = commons::load_settings()?;

    report_container(
        runner,
        "dns_resolver",
        settings.dns_resolver.enabled,
        &settings.dns_resolver.container_name,
    )?;
    report_container(
        runner,
        "http_proxy",
        settings.http_proxy.enabled,
        &settings.http_proxy.container_name,
    )?;

    if settings.host_resolver.enabled {
        let configured = resolv::has_our_nameserver(runner, &settings.dns_resolver.domain);
        let state = if configured {
            "configured".green()
        } else {
            "not configured".red()
        };
        println!("{:<14} {}", "host_resolver", state);
    } else {
        println!("{:<14} {}", "host_resolver", "disabled".dimmed());
    }

    Ok(())
}

fn report_container(
    runner: &dyn CommandRunner,
    service: &str,
    enabled: bool,
    container_name: &str,
) -> Result<()> {
    if !enabled {
        println!("{service:<14} {}", "disabled".dimmed());
        return Ok(());
    }
    let state = match docker::container_status(runner, container_name)? {
        ContainerStatus::Running => "running".green(),
        ContainerStatus::Exited => "exited".yellow(),
        ContainerStatus::Absent => "not running".red(),
    };
    println!("{service:<14} {state} ({container_name})");
    Ok(())
}
