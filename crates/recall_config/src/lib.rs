//! Parsing and validation of `recall.toml` cache configuration files.
//!
//! This crate reads the configuration file and produces a strongly-typed
//! [`RecallConfig`] describing where the cache lives and how progress
//! messages are rendered.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{discover_config, load_config, load_config_file, load_config_from_str, CONFIG_FILE};
pub use resolve::resolve_cache_root;
pub use types::*;
