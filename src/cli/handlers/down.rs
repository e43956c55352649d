// src/cli/handlers/down.rs

use super::commons;
use crate::core::resolv;
use crate::models::ContainerStatus;
use crate::system::{docker, executor::CommandRunner};
use anyhow::{Context, Result};
use colored::Colorize;

pub fn handle(_args: Vec<String>, runner: &dyn CommandRunner) -> Result<()> {
    let settings = commons::load_settings()?;

    if settings.dns_resolver.enabled {
        stop_service(runner, "dns_resolver", &settings.dns_resolver.container_name)?;
    }
    if settings.http_proxy.enabled {
        stop_service(runner, "http_proxy", &settings.http_proxy.container_name)?;
    }
    if settings.host_resolver.enabled {
        resolv::unconfigure(runner, &settings.dns_resolver.domain)
            .context("Failed to restore the host resolver")?;
        println!("{}", "Host resolver restored".green());
    }

    Ok(())
}

fn stop_service(runner: &dyn CommandRunner, service: &str, container_name: &str) -> Result<()> {
    if docker::container_status(runner, container_name)? == ContainerStatus::Absent {
        println!("{service} is not running");
        return Ok(());
    }
    let output = docker::stop_container(runner, container_name)?;
    if output.success {
        println!("{}", format!("Successfully stopped {service}").green());
    } else {
        println!(
            "{}",
            format!("Could not stop {service}: {}", output.stderr.trim()).red()
        );
    }
    Ok(())
}
