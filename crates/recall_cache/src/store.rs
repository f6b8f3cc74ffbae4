//! Fingerprint-addressed result storage.
//!
//! Each memoized result is a single bincode file at
//! `<root>/cache/f<fingerprint>.<ext>`. Entries are staged in a temporary
//! file and renamed into place, so readers never see a partial entry. There
//! is no locking; when two writers race on one fingerprint the last rename
//! wins.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use recall_common::Fingerprint;
use recall_config::{resolve_cache_root, RecallConfig, DEFAULT_EXTENSION};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::codec;
use crate::error::CacheError;

/// Subdirectory of the cache root that holds all entries.
pub const CACHE_SUBDIR: &str = "cache";

/// Prefix of every entry file name.
const ENTRY_PREFIX: char = 'f';

/// Metadata about one stored entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    /// The entry's fingerprint, parsed from its file name.
    pub fingerprint: Fingerprint,
    /// Full path of the entry file.
    pub path: PathBuf,
    /// Size of the entry file in bytes.
    pub size: u64,
}

/// Durable fingerprint-to-result storage under a cache root directory.
///
/// The root is created lazily on the first [`put`](Self::put).
#[derive(Debug, Clone)]
pub struct CacheStore {
    /// Root directory owned by the cache.
    root: PathBuf,

    /// File extension for entries, without the dot.
    extension: String,
}

impl CacheStore {
    /// Creates a store rooted at `root` using the default `bin` extension.
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Creates a store from configuration, resolving a relative root against
    /// `project_dir`.
    pub fn from_config(config: &RecallConfig, project_dir: &Path) -> Self {
        Self::new(&resolve_cache_root(config, project_dir)).with_extension(&config.cache.extension)
    }

    /// Replaces the entry file extension.
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.to_string();
        self
    }

    /// Returns the cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the directory that holds entries, `<root>/cache`.
    pub fn cache_dir(&self) -> PathBuf {
        self.root.join(CACHE_SUBDIR)
    }

    /// Returns the entry path for a fingerprint relative to the root.
    fn logical_path(&self, fingerprint: &Fingerprint) -> PathBuf {
        Path::new(CACHE_SUBDIR).join(format!("{ENTRY_PREFIX}{fingerprint}.{}", self.extension))
    }

    /// Returns the absolute entry path for a fingerprint.
    pub fn entry_path(&self, fingerprint: &Fingerprint) -> PathBuf {
        self.root.join(self.logical_path(fingerprint))
    }

    /// Returns `true` if an entry file exists for `fingerprint`.
    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.entry_path(fingerprint).is_file()
    }

    /// Looks up a stored result.
    ///
    /// Returns `Ok(None)` when no entry exists. Any other read failure is an
    /// [`Io`](CacheError::Io) error, and an entry that cannot be decoded as
    /// `T` is [`Corrupt`](CacheError::Corrupt).
    pub fn get<T: DeserializeOwned>(&self, fingerprint: &Fingerprint) -> Result<Option<T>, CacheError> {
        let path = self.entry_path(fingerprint);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::Io { path, source: e }),
        };

        codec::decode(&bytes)
            .map(Some)
            .map_err(|reason| CacheError::Corrupt { path, reason })
    }

    /// Encodes and writes a result, silently replacing any existing entry.
    ///
    /// Missing parent directories are created first. The bytes go to a
    /// temporary file in the cache directory that is then renamed over the
    /// entry, so readers see either the old file or the new one. Returns the
    /// entry path.
    pub fn put<T: Serialize + ?Sized>(
        &self,
        fingerprint: &Fingerprint,
        value: &T,
    ) -> Result<PathBuf, CacheError> {
        let bytes = codec::encode(value)?;
        let path = self.entry_path(fingerprint);
        let dir = self.cache_dir();

        std::fs::create_dir_all(&dir).map_err(|e| CacheError::Io {
            path: dir.clone(),
            source: e,
        })?;
        let mut staged = tempfile::NamedTempFile::new_in(&dir).map_err(|e| CacheError::Io {
            path: dir.clone(),
            source: e,
        })?;
        staged.write_all(&bytes).map_err(|e| CacheError::Io {
            path: staged.path().to_path_buf(),
            source: e,
        })?;
        staged.persist(&path).map_err(|e| CacheError::Io {
            path: path.clone(),
            source: e.error,
        })?;
        Ok(path)
    }

    /// Removes every entry by deleting the whole cache directory.
    ///
    /// Returns `true` if something was removed and `false` if the directory
    /// did not exist. With `verbose` the outcome is logged at `info` level,
    /// otherwise at `debug`.
    pub fn clear(&self, verbose: bool) -> Result<bool, CacheError> {
        let dir = self.cache_dir();
        let removed = match std::fs::remove_dir_all(&dir) {
            Ok(()) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => return Err(CacheError::Io { path: dir, source: e }),
        };

        match (removed, verbose) {
            (true, true) => tracing::info!(path = %dir.display(), "cleared cache directory"),
            (true, false) => tracing::debug!(path = %dir.display(), "cleared cache directory"),
            (false, true) => {
                tracing::info!(path = %dir.display(), "no cache directory, nothing to clear")
            }
            (false, false) => {
                tracing::debug!(path = %dir.display(), "no cache directory, nothing to clear")
            }
        }
        Ok(removed)
    }

    /// Lists every entry whose file name follows the `f<fingerprint>.<ext>`
    /// convention, sorted by fingerprint.
    ///
    /// Other files are ignored. A missing cache directory yields no entries.
    pub fn entries(&self) -> Result<Vec<EntryInfo>, CacheError> {
        let dir = self.cache_dir();
        let read_dir = match std::fs::read_dir(&dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(CacheError::Io { path: dir, source: e }),
        };

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| CacheError::Io {
                path: dir.clone(),
                source: e,
            })?;
            let path = entry.path();
            let Some(fingerprint) = self.parse_entry_name(&path) else {
                continue;
            };
            let metadata = entry.metadata().map_err(|e| CacheError::Io {
                path: path.clone(),
                source: e,
            })?;
            if !metadata.is_file() {
                continue;
            }
            entries.push(EntryInfo {
                fingerprint,
                path,
                size: metadata.len(),
            });
        }

        entries.sort_by(|a, b| a.fingerprint.cmp(&b.fingerprint));
        Ok(entries)
    }

    /// Extracts the fingerprint from an entry file name, if it conforms.
    fn parse_entry_name(&self, path: &Path) -> Option<Fingerprint> {
        if path.extension()?.to_str()? != self.extension {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        Fingerprint::from_hex(stem.strip_prefix(ENTRY_PREFIX)?).ok()
    }
}
