//! Shared cancellation flag for the correction run.
//!
//! The only shared mutable state between partition workers. Write side makes
//! at most one meaningful transition (not-requested to requested); the read
//! side is checked by every worker before each receive attempt.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cheap-to-clone handle over the run's stop signal.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag {
    requested: Arc<AtomicBool>,
}

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    ///
    /// Returns `true` only for the call that made the transition, so the
    /// caller can log the request exactly once.
    pub fn request(&self) -> bool {
        !self.requested.swap(true, Ordering::AcqRel)
    }

    /// Whether cancellation has been requested.
    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_meaningful_transition() {
        let flag = CancellationFlag::new();
        assert!(!flag.is_requested());

        assert!(flag.request());
        assert!(flag.is_requested());

        // Subsequent requests are no-ops
        assert!(!flag.request());
        assert!(flag.is_requested());
    }

    #[test]
    fn test_clones_share_state() {
        let flag = CancellationFlag::new();
        let observer = flag.clone();

        flag.request();
        assert!(observer.is_requested());
    }
}
