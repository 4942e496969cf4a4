//! CLI command implementations for procmon.
//!
//! This module provides implementations for all CLI subcommands:
//! - `check`: System validation for a target process
//! - `config`: Configuration file generation
//! - `sample`: Print sampling cycles without recording

pub mod check;
pub mod config;
pub mod sample;

// Re-export command functions
pub use check::command_check;
pub use config::command_config;
pub use sample::command_sample;
