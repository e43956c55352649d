// src/system/docker.rs

use crate::models::{CommandOutput, ContainerSpec, ContainerStatus};
use crate::system::executor::{CommandRunner, ExecutionError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DockerError {
    #[error("Argument '{0}' cannot be safely quoted for shell execution.")]
    UnquotableArgument(String),
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

/// Renders a `ContainerSpec` into a full `docker run` command line.
///
/// This is the single escaping boundary: every dynamic fragment (container
/// name, image, ports, volumes, positional arguments) originates from the
/// settings file and is quoted here, never interpolated ad hoc elsewhere.
pub fn run_command(spec: &ContainerSpec) -> Result<String, DockerError> {
    let mut argv: Vec<String> = vec!["docker".into(), "run".into(), "-d".into()];
    for port in &spec.ports {
        argv.push("-p".into());
        argv.push(port.clone());
    }
    for cap in &spec.cap_adds {
        argv.push(format!("--cap-add={cap}"));
    }
    for volume in &spec.volumes {
        argv.push("-v".into());
        argv.push(volume.clone());
    }
    for entry in &spec.env {
        argv.push("-e".into());
        argv.push(entry.clone());
    }
    argv.push(format!("--name={}", spec.name));
    argv.push(spec.image.clone());
    argv.extend(spec.args.iter().cloned());

    shlex::try_join(argv.iter().map(String::as_str))
        .map_err(|_| DockerError::UnquotableArgument(spec.name.clone()))
}

/// Starts the container described by `spec`. Blocking; returns the captured
/// output whether or not docker reported success.
pub fn start_container(
    runner: &dyn CommandRunner,
    spec: &ContainerSpec,
) -> Result<CommandOutput, DockerError> {
    let command = run_command(spec)?;
    log::debug!("Starting container '{}'", spec.name);
    Ok(runner.run(&command)?)
}

/// Stops and removes a named container. A container that is already gone is
/// not an error; the result reports whether anything was actually removed.
pub fn stop_container(
    runner: &dyn CommandRunner,
    name: &str,
) -> Result<CommandOutput, DockerError> {
    let quoted = quote(name)?;
    log::debug!("Stopping container '{}'", name);
    // `docker kill` on a stopped container fails; we still try the rm so a
    // leftover exited container gets cleaned up.
    let _ = runner.run(&format!("docker kill {quoted}"))?;
    Ok(runner.run(&format!("docker rm {quoted}"))?)
}

/// Probes the state of a named container via `docker ps` filters.
pub fn container_status(
    runner: &dyn CommandRunner,
    name: &str,
) -> Result<ContainerStatus, DockerError> {
    let quoted = quote(&format!("name=^/{name}$"))?;
    let running = runner.run(&format!(
        "docker ps --filter {quoted} --format {{{{.Names}}}}"
    ))?;
    if running.success && !running.stdout.trim().is_empty() {
        return Ok(ContainerStatus::Running);
    }
    let any = runner.run(&format!(
        "docker ps -a --filter {quoted} --format {{{{.Names}}}}"
    ))?;
    if any.success && !any.stdout.trim().is_empty() {
        return Ok(ContainerStatus::Exited);
    }
    Ok(ContainerStatus::Absent)
}

/// Removes a stopped container if one with this name exists. Keeps `up`
/// idempotent: a stale exited container would make `docker run --name` fail.
pub fn remove_if_exited(runner: &dyn CommandRunner, name: &str) -> Result<(), DockerError> {
    if container_status(runner, name)? == ContainerStatus::Exited {
        let quoted = quote(name)?;
        let _ = runner.run(&format!("docker rm {quoted}"))?;
    }
    Ok(())
}

fn quote(fragment: &str) -> Result<String, DockerError> {
    shlex::try_quote(fragment)
        .map(|q| q.into_owned())
        .map_err(|_| DockerError::UnquotableArgument(fragment.to_string()))
}
