//! Cancellation of in-flight moves.

use core::sync::atomic::{AtomicBool, Ordering};

/// Cooperative cancellation flag for an execution loop.
///
/// Shared by reference with the move operation; another thread or an
/// interrupt handler sets it, and the loop observes it between steps
/// (never mid-pulse). Position stays consistent with the last fully
/// completed step.
#[derive(Debug, Default)]
pub struct CancelToken {
    cancelled: AtomicBool,
}

impl CancelToken {
    /// Create a token in the not-cancelled state.
    pub const fn new() -> Self {
        Self {
            cancelled: AtomicBool::new(false),
        }
    }

    /// Request cancellation of the move observing this token.
    #[inline]
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether cancellation has been requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Clear the flag so the token can be reused for a later move.
    #[inline]
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::Release);
    }
}
