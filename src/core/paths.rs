// src/core/paths.rs

use crate::constants::SETTINGS_FILENAME;
use lazy_static::lazy_static;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;

lazy_static! {
    static ref SETTINGS_PATH: Mutex<Option<PathBuf>> = Mutex::new(None);
}

#[derive(Error, Debug)]
pub enum PathError {
    #[error("Could not find the home directory.")]
    HomeDirNotFound,
}

/// Returns the path to the operator override file (`~/.dockhand.toml`).
///
/// This function is memoized: the first call computes and caches the path,
/// subsequent calls return the cached value instantly. Only the *location*
/// is cached; the file's contents are re-read on every settings resolve.
pub fn settings_file_path() -> Result<PathBuf, PathError> {
    let mut cached = SETTINGS_PATH
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);

    if let Some(path) = &*cached {
        return Ok(path.clone());
    }

    let path = dirs::home_dir()
        .ok_or(PathError::HomeDirNotFound)?
        .join(SETTINGS_FILENAME);

    *cached = Some(path.clone());
    Ok(path)
}
