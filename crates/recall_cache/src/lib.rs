//! Disk-backed memoization for pure callables.
//!
//! A [`MemoizingInvoker`] derives a [`Fingerprint`] for each call from the
//! callable's normalized instruction text, its output type, and its
//! canonically encoded arguments, looks the fingerprint up in a [`CacheStore`], and only runs the callable on
//! a miss. Results are persisted as `<root>/cache/f<fingerprint>.<ext>`.

#![warn(missing_docs)]

pub mod callable;
mod canonical;
mod codec;
pub mod describe;
pub mod error;
pub mod fingerprint;
pub mod invocation;
pub mod invoker;
pub mod progress;
pub mod store;

pub use callable::{normalize_instruction, Callable, FnCallable, Instructions};
pub use describe::describe_call;
pub use error::{CacheError, InvokeError};
pub use fingerprint::FingerprintComputer;
pub use invocation::Invocation;
pub use invoker::{CacheStatus, Memoized, MemoizingInvoker, Outcome};
pub use progress::{ActivityGuard, NoProgress, Progress, TracingProgress};
pub use recall_common::Fingerprint;
pub use store::{CacheStore, EntryInfo, CACHE_SUBDIR};
