//! Configuration module
//!
//! Loads the client settings from TOML with environment overrides

#[allow(clippy::module_inception)]
pub mod config;

pub use config::{Config, ConfigError, ODataVersion, RuntimeConfig};
