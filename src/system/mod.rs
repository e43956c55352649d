//! # System Interaction Layer
//!
//! This module provides abstractions for interacting with the underlying operating system.
//! It serves as a boundary between the core application logic and the specifics of running
//! external commands and driving the container runtime.
//!
//! ## Modules
//!
//! - **`executor`**: the blocking command runner. Everything dockhand does to the
//!   outside world (starting containers, inspecting ports, killing processes,
//!   editing resolver files) flows through the `CommandRunner` trait defined here,
//!   which is also the seam the tests fake.
//! - **`docker`**: the generic container driver. Renders `ContainerSpec` values
//!   into safely quoted `docker run` command lines and probes container state.

pub mod docker;
pub mod executor;
