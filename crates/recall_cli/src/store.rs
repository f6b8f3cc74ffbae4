//! Resolves which cache directory a command operates on.

use std::path::{Path, PathBuf};

use recall_cache::CacheStore;
use recall_config::RecallConfig;

use crate::GlobalArgs;

/// Opens the cache store selected by the global flags.
///
/// With `--config` the given file is loaded and relative roots resolve
/// against its directory. Otherwise `recall.toml` is looked up in `cwd`,
/// falling back to defaults. `--root` replaces the configured root but keeps
/// the configured extension.
pub fn open_store(global: &GlobalArgs, cwd: &Path) -> Result<CacheStore, Box<dyn std::error::Error>> {
    let (config, project_dir) = load(global, cwd)?;

    let store = match global.root {
        Some(ref root) => {
            CacheStore::new(&cwd.join(root)).with_extension(&config.cache.extension)
        }
        None => CacheStore::from_config(&config, &project_dir),
    };
    tracing::debug!(root = %store.root().display(), "using cache root");
    Ok(store)
}

fn load(global: &GlobalArgs, cwd: &Path) -> Result<(RecallConfig, PathBuf), Box<dyn std::error::Error>> {
    match global.config {
        Some(ref config_path) => {
            let path = cwd.join(config_path);
            let config = recall_config::load_config_file(&path)?;
            let project_dir = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| cwd.to_path_buf());
            Ok((config, project_dir))
        }
        None => Ok((recall_config::discover_config(cwd)?, cwd.to_path_buf())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global(config: Option<&str>, root: Option<&str>) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            config: config.map(String::from),
            root: root.map(String::from),
        }
    }

    #[test]
    fn defaults_without_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&global(None, None), dir.path()).unwrap();
        assert_eq!(store.root(), dir.path().join(".recall"));
    }

    #[test]
    fn discovers_config_in_cwd() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("recall.toml"),
            "[cache]\nroot = \"store\"\nextension = \"dat\"\n",
        )
        .unwrap();
        let store = open_store(&global(None, None), dir.path()).unwrap();
        assert_eq!(store.root(), dir.path().join("store"));
    }

    #[test]
    fn explicit_config_resolves_relative_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("project");
        std::fs::create_dir_all(&sub).unwrap();
        std::fs::write(sub.join("custom.toml"), "[cache]\nroot = \"cached\"\n").unwrap();

        let store = open_store(&global(Some("project/custom.toml"), None), dir.path()).unwrap();
        assert_eq!(store.root(), sub.join("cached"));
    }

    #[test]
    fn root_flag_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("recall.toml"), "[cache]\nroot = \"ignored\"\n").unwrap();
        let store = open_store(&global(None, Some("elsewhere")), dir.path()).unwrap();
        assert_eq!(store.root(), dir.path().join("elsewhere"));
    }

    #[test]
    fn missing_explicit_config_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_store(&global(Some("nope.toml"), None), dir.path()).unwrap_err();
        assert!(err.to_string().contains("nope.toml"));
    }

    #[test]
    fn invalid_config_errors() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("recall.toml"), "[cache]\nextension = \"a.b\"\n").unwrap();
        assert!(open_store(&global(None, None), dir.path()).is_err());
    }
}
