//! Progress notification while a call may be computing.

/// Receives begin/end notifications around each memoized invocation.
///
/// Implementations decide how (or whether) to show the activity; nothing
/// else in the cache observes them.
pub trait Progress {
    /// Called before the cache lookup with a human-readable description.
    fn begin(&self, message: &str);

    /// Called once the invocation finishes, successfully or not.
    fn end(&self);
}

/// A notifier that ignores all activity.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn begin(&self, _message: &str) {}

    fn end(&self) {}
}

/// A notifier that reports activity through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl Progress for TracingProgress {
    fn begin(&self, message: &str) {
        tracing::info!(target: "recall::progress", "{message}");
    }

    fn end(&self) {
        tracing::debug!(target: "recall::progress", "done");
    }
}

/// Scoped activity: begins on construction and ends when dropped.
///
/// Dropping happens on every exit path, including early returns with `?`,
/// so the notifier never sees an unbalanced `begin`.
pub struct ActivityGuard<'a, P: Progress + ?Sized> {
    progress: &'a P,
}

impl<'a, P: Progress + ?Sized> ActivityGuard<'a, P> {
    /// Notifies `progress` that an activity began and returns the guard.
    pub fn begin(progress: &'a P, message: &str) -> Self {
        progress.begin(message);
        Self { progress }
    }
}

impl<P: Progress + ?Sized> Drop for ActivityGuard<'_, P> {
    fn drop(&mut self) {
        self.progress.end();
    }
}
