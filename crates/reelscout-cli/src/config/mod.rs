//! Application configuration module.
//!
//! Manages the TOML config file and the location of the credential
//! file inside the per-user config directory.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::AppConfig;
pub use paths::{resolve_config_path, resolve_credentials_path};
