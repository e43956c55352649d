// src/core/mod.rs

pub mod config;
pub mod conflict;
pub mod dns;
pub mod listeners;
pub mod paths;
pub mod proxy;
pub mod resolv;
pub mod service;
