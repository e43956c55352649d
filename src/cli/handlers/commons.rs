// src/cli/handlers/commons.rs

use crate::core::config::{self, ConfigError};
use crate::models::{Settings, StartOutcome};
use anyhow::{Result, anyhow};
use colored::Colorize;

/// Resolves the effective settings from the default location. A malformed
/// override file is surfaced immediately, never silently replaced with
/// defaults.
pub fn load_settings() -> Result<Settings, ConfigError> {
    config::resolve_default_location()
}

/// Converts a terminal start failure into the handler's error, attaching the
/// last captured command output for diagnosis.
pub fn report_start_outcome(service: &str, outcome: &StartOutcome) -> Result<()> {
    match outcome {
        StartOutcome::Started => {
            println!("{}", format!("Successfully started {service}").green());
            Ok(())
        }
        StartOutcome::Failed { last_output } => {
            let detail = last_output
                .as_ref()
                .map(|output| {
                    let text = if output.stderr.trim().is_empty() {
                        &output.stdout
                    } else {
                        &output.stderr
                    };
                    format!(": {}", text.trim())
                })
                .unwrap_or_default();
            Err(anyhow!("Failed to start {service}{detail}"))
        }
    }
}
