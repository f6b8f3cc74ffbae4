//! `recall info`: summarize the cache directory.

use std::io::Write;

use recall_cache::CacheStore;

use crate::store::open_store;
use crate::GlobalArgs;

/// Runs the `recall info` command. Returns exit code 0.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let store = open_store(global, &cwd)?;
    let stdout = std::io::stdout();
    write_info(&store, &mut stdout.lock())?;
    Ok(0)
}

/// Writes the cache root, entry count and total entry size.
fn write_info(store: &CacheStore, out: &mut impl Write) -> Result<(), Box<dyn std::error::Error>> {
    let entries = store.entries()?;
    let total: u64 = entries.iter().map(|e| e.size).sum();
    writeln!(out, "root:    {}", store.root().display())?;
    writeln!(out, "entries: {}", entries.len())?;
    writeln!(out, "bytes:   {total}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use recall_common::Fingerprint;

    fn render(store: &CacheStore) -> String {
        let mut out = Vec::new();
        write_info(store, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn empty_cache() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path());
        let text = render(&store);
        assert!(text.contains(&format!("root:    {}", dir.path().display())));
        assert!(text.contains("entries: 0"));
        assert!(text.contains("bytes:   0"));
    }

    #[test]
    fn counts_entries_and_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path());
        let a = store.put(&Fingerprint::from_bytes(b"a"), &1u8).unwrap();
        let b = store.put(&Fingerprint::from_bytes(b"b"), "a longer value").unwrap();
        let expected = std::fs::metadata(a).unwrap().len() + std::fs::metadata(b).unwrap().len();

        let text = render(&store);
        assert!(text.contains("entries: 2"));
        assert!(text.contains(&format!("bytes:   {expected}")));
    }
}
