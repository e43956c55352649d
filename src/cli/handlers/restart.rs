// src/cli/handlers/restart.rs

use super::{down, up};
use crate::system::executor::CommandRunner;
use anyhow::Result;

/// `restart` is exactly `down` followed by `up`. The settings file is
/// re-resolved by each phase, so an edit between them takes effect.
pub fn handle(args: Vec<String>, runner: &dyn CommandRunner) -> Result<()> {
    down::handle(Vec::new(), runner)?;
    up::handle(args, runner)
}
