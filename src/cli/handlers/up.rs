// src/cli/handlers/up.rs

use super::commons;
use crate::core::{dns::DnsResolver, proxy::HttpProxy, resolv, service::DockerService};
use crate::models::ContainerStatus;
use crate::system::{docker, executor::CommandRunner};
use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)]
struct UpArgs {
    /// Answer for the port-conflict prompt instead of asking interactively
    /// (anything containing 'y' confirms).
    #[arg(long)]
    answer: Option<String>,
}

pub fn handle(args: Vec<String>, runner: &dyn CommandRunner) -> Result<()> {
    let up_args = UpArgs::try_parse_from(&args)?;
    let settings = commons::load_settings()?;

    if settings.dns_resolver.enabled {
        start_dns(runner, &settings, up_args.answer.as_deref())?;
    } else {
        println!("dns_resolver disabled in settings, skipping");
    }

    if settings.http_proxy.enabled {
        start_proxy(runner, &settings)?;
    } else {
        println!("http_proxy disabled in settings, skipping");
    }

    if settings.host_resolver.enabled {
        resolv::configure(runner, &settings.host_resolver, &settings.dns_resolver.domain)
            .context("Failed to configure the host resolver")?;
        println!("{}", "Host resolver configured".green());
    } else {
        println!("host_resolver disabled in settings, skipping");
    }

    Ok(())
}

fn start_dns(
    runner: &dyn CommandRunner,
    settings: &crate::models::Settings,
    answer: Option<&str>,
) -> Result<()> {
    let mut service = DnsResolver::new(settings.dns_resolver.clone());
    if let Some(answer) = answer {
        service = service.with_answer_override(answer);
    }

    if docker::container_status(runner, service.container_name())? == ContainerStatus::Running {
        println!("dns_resolver is already running");
        return Ok(());
    }
    // A stale exited container would make `docker run --name` fail outright.
    docker::remove_if_exited(runner, service.container_name())?;

    let outcome = service.start(runner);
    commons::report_start_outcome("dns_resolver", &outcome)
}

fn start_proxy(runner: &dyn CommandRunner, settings: &crate::models::Settings) -> Result<()> {
    let mut service = HttpProxy::new(settings.http_proxy.clone());

    if docker::container_status(runner, service.container_name())? == ContainerStatus::Running {
        println!("http_proxy is already running");
        return Ok(());
    }
    docker::remove_if_exited(runner, service.container_name())?;

    let outcome = service.start(runner);
    commons::report_start_outcome("http_proxy", &outcome)
}
