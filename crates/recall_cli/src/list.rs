//! `recall list`: print every cached entry.

use std::io::Write;

use recall_cache::CacheStore;

use crate::store::open_store;
use crate::GlobalArgs;

/// Runs the `recall list` command. Returns exit code 0.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let store = open_store(global, &cwd)?;
    let stdout = std::io::stdout();
    write_entries(&store, &mut stdout.lock())?;
    Ok(0)
}

fn write_entries(store: &CacheStore, out: &mut impl Write) -> Result<(), Box<dyn std::error::Error>> {
    for entry in store.entries()? {
        writeln!(out, "{} {}", entry.fingerprint, entry.size)?;
    }
    Ok(())
}
