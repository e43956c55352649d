// src/cli/handlers/mod.rs

pub mod commons;
pub mod config;
pub mod down;
pub mod restart;
pub mod status;
pub mod up;
