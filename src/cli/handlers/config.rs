// src/cli/handlers/config.rs

use super::commons;
use crate::core::{config, paths};
use anyhow::{Result, anyhow};
use clap::Parser;
use colored::Colorize;
use dialoguer::{Confirm, theme::ColorfulTheme};

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true)]
struct ConfigArgs {
    /// `init` writes the commented default settings file; `show` prints the
    /// effective settings tree.
    action: String,

    /// Overwrite an existing settings file without asking.
    #[arg(long)]
    force: bool,
}

pub fn handle(args: Vec<String>, _runner: &dyn crate::system::executor::CommandRunner) -> Result<()> {
    let config_args = ConfigArgs::try_parse_from(&args)?;
    match config_args.action.as_str() {
        "init" => init(config_args.force),
        "show" => show(),
        other => Err(anyhow!(
            "Unknown config action '{other}'. Expected 'init' or 'show'."
        )),
    }
}

fn init(force: bool) -> Result<()> {
    let path = paths::settings_file_path()?;
    if path.exists() && !force {
        let overwrite = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "A settings file already exists at '{}'. Overwrite it with the defaults?",
                path.display()
            ))
            .default(false)
            .interact()?;
        if !overwrite {
            println!("Leaving the existing settings file untouched.");
            return Ok(());
        }
    }
    config::write_default_settings(&path)?;
    println!(
        "{}",
        format!("Wrote default settings to '{}'", path.display()).green()
    );
    Ok(())
}

fn show() -> Result<()> {
    // Printed under the same top-level key the settings file uses, so the
    // output can be pasted back into `~/.dockhand.toml` directly.
    #[derive(serde::Serialize)]
    struct EffectiveDocument<'a> {
        dockhand: &'a crate::models::Settings,
    }
    let settings = commons::load_settings()?;
    print!(
        "{}",
        toml::to_string_pretty(&EffectiveDocument {
            dockhand: &settings
        })?
    );
    Ok(())
}
