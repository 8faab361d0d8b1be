//! CLI tool for inspecting key distribution.
//!
//! Provides commands for:
//! - Printing a distribution histogram over generated keys
//! - Looking up the backends for individual keys
//! - Measuring how many keys move when a backend is removed

pub mod commands;
pub mod config;

pub use commands::{Command, CommandResult};
pub use config::CliConfig;
