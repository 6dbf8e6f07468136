//! Configuration for sign generation
//!
//! Provides types and loading for the `linesign.toml` configuration file.

pub mod loader;
pub mod schema;

pub use loader::{load_config, merge_cli_overrides, CliOverrides, ConfigError};
pub use schema::*;
