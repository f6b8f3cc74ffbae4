//! `recall clear`: delete every cached result.

use std::path::Path;

use recall_cache::CacheStore;

use crate::store::open_store;
use crate::GlobalArgs;

/// Runs the `recall clear` command.
///
/// Removing a cache that does not exist is not an error. With `--verbose` the
/// outcome is also logged. Returns exit code 0.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let store = open_store(global, &cwd)?;
    clear(&store, global.verbose, global.quiet)?;
    Ok(0)
}

fn clear(store: &CacheStore, verbose: bool, quiet: bool) -> Result<bool, Box<dyn std::error::Error>> {
    let removed = store.clear(verbose)?;
    if !quiet {
        report(&store.cache_dir(), removed);
    }
    Ok(removed)
}

fn report(dir: &Path, removed: bool) {
    if removed {
        eprintln!("    Cleared {}", dir.display());
    } else {
        eprintln!("    Nothing to clear at {}", dir.display());
    }
}
