//! Error types for cache and invocation operations.

use std::path::PathBuf;

/// Errors that can occur while fingerprinting, reading, or writing the cache.
///
/// A missing entry is not an error: lookups report it as a miss. Every
/// variant here is surfaced to the caller unchanged.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// An I/O error occurred while reading or writing cache files.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// An argument or result could not be encoded or decoded.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },

    /// A stored entry exists but cannot be decoded, e.g. after a torn write.
    #[error("corrupt cache entry at {path}: {reason}")]
    Corrupt {
        /// The entry file path.
        path: PathBuf,
        /// Description of the decode failure.
        reason: String,
    },

    /// A callable asked for an argument that the invocation does not carry.
    #[error("missing argument {argument}")]
    MissingArgument {
        /// Positional index (`#0`) or name (`scale`) of the argument.
        argument: String,
    },
}

/// Errors returned by [`MemoizingInvoker::invoke`](crate::MemoizingInvoker::invoke).
///
/// `E` is the wrapped callable's own error type, passed through untouched.
#[derive(Debug, thiserror::Error)]
pub enum InvokeError<E> {
    /// Fingerprinting or the cache lookup failed.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The wrapped callable returned an error on a cache miss.
    #[error("callable failed: {0}")]
    Call(#[source] E),
}

impl<E> InvokeError<E> {
    /// Returns the callable's error, if that is what failed.
    pub fn into_call_error(self) -> Option<E> {
        match self {
            Self::Call(e) => Some(e),
            Self::Cache(_) => None,
        }
    }
}
