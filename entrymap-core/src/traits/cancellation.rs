//! Cooperative cancellation token.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation for long-running analysis runs.
///
/// Workers check `is_cancelled()` between file tasks; already-completed
/// work is retained so a cancelled run still yields partial, valid results.
pub trait Cancellable: Send + Sync {
    /// Check if cancellation has been requested.
    fn is_cancelled(&self) -> bool;

    /// Request cancellation.
    fn cancel(&self);
}

/// Default implementation of a cancellation token.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a new cancellation token (not cancelled).
    pub fn new() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Reset the flag (for reuse across runs).
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl Cancellable for CancellationToken {
    fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Worker pools share the token as `&dyn Cancellable`.
    fn shareable<T: Send + Sync + ?Sized>() {}

    #[test]
    fn cancel_is_visible_across_threads() {
        shareable::<dyn Cancellable>();

        let token = CancellationToken::new();
        let shared: &dyn Cancellable = &token;
        assert!(!shared.is_cancelled());

        std::thread::scope(|s| {
            s.spawn(|| shared.cancel());
        });
        assert!(shared.is_cancelled());

        token.reset();
        assert!(!token.is_cancelled());
    }
}
