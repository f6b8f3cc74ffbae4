//! Configuration types deserialized from `recall.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default cache root, relative to the project directory.
pub const DEFAULT_ROOT: &str = ".recall";

/// Default file extension for cache entries.
pub const DEFAULT_EXTENSION: &str = "bin";

/// Default number of characters kept from each argument preview.
pub const DEFAULT_PREVIEW_CHARS: usize = 10;

/// The top-level configuration parsed from `recall.toml`.
///
/// Every section is optional; a missing file or an empty file yields the
/// same configuration as [`RecallConfig::default`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RecallConfig {
    /// Where cache entries live and how they are named.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Progress message settings.
    #[serde(default)]
    pub progress: ProgressConfig,
}

/// Storage location settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Cache root directory. Relative paths are resolved against the
    /// project directory.
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// File extension appended to every entry file.
    #[serde(default = "default_extension")]
    pub extension: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            extension: default_extension(),
        }
    }
}

/// Settings for the message shown while a result is being computed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProgressConfig {
    /// Maximum characters kept from each argument preview.
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            preview_chars: default_preview_chars(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(DEFAULT_ROOT)
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

fn default_preview_chars() -> usize {
    DEFAULT_PREVIEW_CHARS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RecallConfig::default();
        assert_eq!(config.cache.root, PathBuf::from(".recall"));
        assert_eq!(config.cache.extension, "bin");
        assert_eq!(config.progress.preview_chars, 10);
    }

    #[test]
    fn empty_toml_matches_default() {
        let config: RecallConfig = toml::from_str("").unwrap();
        assert_eq!(config, RecallConfig::default());
    }

    #[test]
    fn partial_section_fills_defaults() {
        let config: RecallConfig = toml::from_str("[cache]\nextension = \"dat\"\n").unwrap();
        assert_eq!(config.cache.extension, "dat");
        assert_eq!(config.cache.root, PathBuf::from(DEFAULT_ROOT));
    }
}
