// src/bin/dockhand.rs

use anyhow::{Result, anyhow};
use clap::Parser;
use colored::Colorize;
use dockhand::{
    cli::{Cli, handlers},
    core::config,
    system::executor::{CommandRunner, ShellRunner},
};

// --- Command Definition and Registry ---

/// Defines a system command, its aliases, and its synchronous handler function.
/// The handler signature is kept consistent across all commands for simplicity
/// in the registry.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>, &dyn CommandRunner) -> Result<()>,
}

/// The single source of truth for all commands. To add a new command, add an
/// entry to this static array.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "up",
        aliases: &["start"],
        handler: handlers::up::handle,
    },
    CommandDefinition {
        name: "down",
        aliases: &["stop"],
        handler: handlers::down::handle,
    },
    CommandDefinition {
        name: "restart",
        aliases: &[],
        handler: handlers::restart::handle,
    },
    CommandDefinition {
        name: "status",
        aliases: &["ps"],
        handler: handlers::status::handle,
    },
    CommandDefinition {
        name: "config",
        aliases: &[],
        handler: handlers::config::handle,
    },
];

/// Finds a command definition in the registry by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// Entry point: sets up logging, dispatches to the handler, and performs
/// centralized error handling.
fn main() {
    init_logging();

    if let Err(e) = run_cli(Cli::parse()) {
        eprintln!("\n{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// The settings `debug` flag raises the default log filter; `RUST_LOG` still
/// takes precedence for operators who want finer control. A broken settings
/// file is ignored here so the handler can report it properly.
fn init_logging() {
    let debug = config::resolve_default_location()
        .map(|settings| settings.debug)
        .unwrap_or(false);

    let mut builder = env_logger::Builder::new();
    builder.filter_level(if debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    });
    builder.parse_default_env();
    builder.init();
}

fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    let mut args = cli.args.into_iter();
    let Some(action) = args.next() else {
        return Err(anyhow!(
            "No command given. Expected one of: up, down, restart, status, config."
        ));
    };

    let command = find_command(&action)
        .ok_or_else(|| anyhow!("Unknown command '{action}'. Run with --help for usage."))?;

    (command.handler)(args.collect(), &ShellRunner)
}
