// src/cli/mod.rs

use clap::Parser;

pub mod handlers;

/// dockhand: provision and supervise local docker development services.
#[derive(Parser, Debug)]
#[command(author, version, about)]
#[command(disable_help_subcommand = true)]
#[command(trailing_var_arg = true)]
pub struct Cli {
    /// The command to run (`up`, `down`, `restart`, `status`, `config`)
    /// followed by its arguments.
    #[arg()]
    pub args: Vec<String>,
}
