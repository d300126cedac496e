//! Parsing and validation of `slicedep.toml` tracker configuration files.
//!
//! This crate reads the tracker configuration and produces a strongly-typed
//! [`SliceDepConfig`], including resolution of where the dependency store lives.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE};
pub use types::*;
