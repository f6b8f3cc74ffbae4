//! Errors raised while reading `recall.toml`.

use std::path::PathBuf;

/// Why a cache configuration could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read, or is missing
    /// when it was named explicitly.
    #[error("cannot read {path}: {source}")]
    Read {
        /// The configuration file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not TOML, or a setting has the wrong type.
    #[error("invalid recall.toml: {0}")]
    Parse(String),

    /// A setting that names the cache root or entry suffix is empty.
    #[error("`{0}` must not be empty")]
    Empty(&'static str),

    /// A setting has a value the cache cannot build entry paths or
    /// progress messages from.
    #[error("invalid `{key}`: {reason}")]
    Invalid {
        /// Dotted name of the setting, e.g. `cache.extension`.
        key: &'static str,
        /// What is wrong with the value.
        reason: String,
    },
}
