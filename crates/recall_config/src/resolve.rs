//! Cache root resolution.

use crate::types::RecallConfig;
use std::path::{Path, PathBuf};

/// Resolves the configured cache root against the project directory.
///
/// Absolute roots are returned as-is; relative roots are joined onto
/// `project_dir`.
pub fn resolve_cache_root(config: &RecallConfig, project_dir: &Path) -> PathBuf {
    let root = &config.cache.root;
    if root.is_absolute() {
        root.clone()
    } else {
        project_dir.join(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_root_joins_project_dir() {
        let config = RecallConfig::default();
        let root = resolve_cache_root(&config, Path::new("/work/project"));
        assert_eq!(root, PathBuf::from("/work/project/.recall"));
    }

    #[test]
    fn absolute_root_is_kept() {
        let mut config = RecallConfig::default();
        config.cache.root = PathBuf::from("/tmp/recall-cache");
        let root = resolve_cache_root(&config, Path::new("/work/project"));
        assert_eq!(root, PathBuf::from("/tmp/recall-cache"));
    }
}
