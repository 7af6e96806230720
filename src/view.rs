//! View liveness tokens for discarding stale fetch results.
//!
//! A fetch issued by a screen completes regardless of whether the screen is
//! still showing. Each screen owns a [ViewToken] and retires it when it goes
//! away; results are applied through the token so a late completion is
//! dropped instead of mutating state for a dead view.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// A cheap, cloneable flag tracking whether the owning view is still active.
#[derive(Debug, Clone)]
pub struct ViewToken {
    active: Arc<AtomicBool>,
}

impl ViewToken {
    /// Create a token for a view that is currently active.
    pub fn new() -> Self {
        Self {
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Whether the owning view is still active.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Mark the owning view as gone. All clones of the token observe this.
    pub fn retire(&self) {
        self.active.store(false, Ordering::Release);
    }

    /// Run `handler` on `value` only if the view is still active.
    ///
    /// Returns whether the handler ran. A discarded result is logged at the
    /// debug level.
    pub fn apply<T, F>(&self, value: T, handler: F) -> bool
    where
        F: FnOnce(T),
    {
        if self.is_active() {
            handler(value);
            true
        } else {
            tracing::debug!("discarding fetch result for a retired view");
            false
        }
    }
}

impl Default for ViewToken {
    fn default() -> Self {
        Self::new()
    }
}
