//! Memoized invocation.
//!
//! [`MemoizingInvoker`] ties the fingerprint computer, the result store, and
//! a progress notifier together. Each call is one linear hit-or-miss decision:
//! a hit returns the stored result without running the callable; a miss runs
//! it, stores the result, and returns it.

use std::path::Path;

use recall_config::{RecallConfig, DEFAULT_PREVIEW_CHARS};
use tracing::{debug, warn};

use crate::callable::Callable;
use crate::describe::describe_call;
use crate::error::{CacheError, InvokeError};
use crate::fingerprint::FingerprintComputer;
use crate::invocation::Invocation;
use crate::progress::{ActivityGuard, NoProgress, Progress};
use crate::store::CacheStore;

/// How a result was obtained.
#[derive(Debug)]
pub enum CacheStatus {
    /// Served from the cache; the callable did not run.
    Hit,
    /// Freshly computed and written to the cache.
    Stored,
    /// Freshly computed, but writing it to the cache failed.
    Unstored(CacheError),
}

/// A result together with how it was obtained.
///
/// A failed cache write does not discard a successfully computed value: the
/// value is returned and the write error travels alongside it.
#[derive(Debug)]
pub struct Outcome<T> {
    /// The callable's result.
    pub value: T,
    /// Whether it was a hit, a stored miss, or a miss that could not be stored.
    pub status: CacheStatus,
}

impl<T> Outcome<T> {
    /// Returns `true` if the value came from the cache.
    pub fn is_hit(&self) -> bool {
        matches!(self.status, CacheStatus::Hit)
    }

    /// Returns the cache write error, if the value could not be stored.
    pub fn store_error(&self) -> Option<&CacheError> {
        match &self.status {
            CacheStatus::Unstored(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the value, ignoring any cache write error.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Returns the value, or the cache write error if storing failed.
    pub fn into_stored(self) -> Result<T, CacheError> {
        match self.status {
            CacheStatus::Unstored(e) => Err(e),
            CacheStatus::Hit | CacheStatus::Stored => Ok(self.value),
        }
    }
}

/// Runs callables through a disk-backed cache.
///
/// Holds no per-call state, so one invoker can be shared between threads
/// when its progress notifier allows it. Concurrent misses on the same
/// fingerprint both compute and both write; the last write wins.
#[derive(Debug, Clone)]
pub struct MemoizingInvoker<P = NoProgress> {
    store: CacheStore,
    progress: P,
    preview_chars: usize,
}

impl MemoizingInvoker<NoProgress> {
    /// Creates an invoker over `store` with no progress display.
    pub fn new(store: CacheStore) -> Self {
        Self {
            store,
            progress: NoProgress,
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }

    /// Creates an invoker from configuration, resolving a relative cache
    /// root against `project_dir`.
    pub fn from_config(config: &RecallConfig, project_dir: &Path) -> Self {
        Self::new(CacheStore::from_config(config, project_dir))
            .with_preview_chars(config.progress.preview_chars)
    }
}

impl<P: Progress> MemoizingInvoker<P> {
    /// Replaces the progress notifier.
    pub fn with_progress<Q: Progress>(self, progress: Q) -> MemoizingInvoker<Q> {
        MemoizingInvoker {
            store: self.store,
            progress,
            preview_chars: self.preview_chars,
        }
    }

    /// Sets how many characters of each argument appear in progress messages.
    pub fn with_preview_chars(mut self, preview_chars: usize) -> Self {
        self.preview_chars = preview_chars;
        self
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    /// Returns the progress notifier.
    pub fn progress(&self) -> &P {
        &self.progress
    }

    /// Returns the stored result for this call, or computes and stores it.
    ///
    /// Fingerprinting and lookup failures are returned as
    /// [`InvokeError::Cache`]; the callable's own failure as
    /// [`InvokeError::Call`] and is never cached. A failure to write a fresh
    /// result is reported in [`Outcome::status`] instead.
    pub fn invoke<C: Callable + ?Sized>(
        &self,
        callable: &C,
        invocation: &Invocation,
    ) -> Result<Outcome<C::Output>, InvokeError<C::Error>> {
        let message = describe_call(callable.name(), invocation, self.preview_chars);
        let _activity = ActivityGuard::begin(&self.progress, &message);

        let fingerprint = FingerprintComputer::compute(callable, invocation)?;
        if let Some(value) = self.store.get::<C::Output>(&fingerprint)? {
            debug!(callable = callable.name(), %fingerprint, "cache hit");
            return Ok(Outcome {
                value,
                status: CacheStatus::Hit,
            });
        }

        debug!(callable = callable.name(), %fingerprint, "cache miss");
        let value = callable.call(invocation).map_err(InvokeError::Call)?;

        let status = match self.store.put(&fingerprint, &value) {
            Ok(_) => CacheStatus::Stored,
            Err(e) => {
                warn!(
                    callable = callable.name(),
                    %fingerprint,
                    error = %e,
                    "failed to store computed result"
                );
                CacheStatus::Unstored(e)
            }
        };
        Ok(Outcome { value, status })
    }

    /// Binds a callable to this invoker.
    pub fn wrap<C: Callable>(&self, callable: C) -> Memoized<'_, C, P> {
        Memoized {
            callable,
            invoker: self,
        }
    }

    /// Removes every cached result. See [`CacheStore::clear`].
    pub fn clear_cache(&self, verbose: bool) -> Result<bool, CacheError> {
        self.store.clear(verbose)
    }
}

/// A callable bound to an invoker, so every call goes through the cache.
pub struct Memoized<'a, C, P = NoProgress> {
    callable: C,
    invoker: &'a MemoizingInvoker<P>,
}

impl<C: Callable, P: Progress> Memoized<'_, C, P> {
    /// Returns the wrapped callable's name.
    pub fn name(&self) -> &str {
        self.callable.name()
    }

    /// Returns the wrapped callable.
    pub fn callable(&self) -> &C {
        &self.callable
    }

    /// Calls through the cache; see [`MemoizingInvoker::invoke`].
    pub fn call(&self, invocation: &Invocation) -> Result<Outcome<C::Output>, InvokeError<C::Error>> {
        self.invoker.invoke(&self.callable, invocation)
    }
}
