//! Submission re-entrancy guard

use std::sync::atomic::{AtomicBool, Ordering};

/// Guard preventing concurrent or duplicate submission attempts.
///
/// This only protects against double-fires within one session process; it
/// is not a distributed lock and does nothing about a second session
/// running against the same test.
#[derive(Debug, Default)]
pub struct SubmissionGuard {
    in_progress: AtomicBool,
}

impl SubmissionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the guard. Returns false if an attempt is already in
    /// progress, in which case the caller must do nothing.
    pub fn begin(&self) -> bool {
        self.in_progress
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Release the guard so a manual retry can submit again. Only called
    /// on failure; after a successful submission the guard stays held.
    pub fn release(&self) {
        self.in_progress.store(false, Ordering::SeqCst);
    }

    pub fn is_in_progress(&self) -> bool {
        self.in_progress.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_begin_is_refused() {
        let guard = SubmissionGuard::new();
        assert!(guard.begin());
        assert!(!guard.begin());
        assert!(guard.is_in_progress());
    }

    #[test]
    fn release_allows_retry() {
        let guard = SubmissionGuard::new();
        assert!(guard.begin());
        guard.release();
        assert!(!guard.is_in_progress());
        assert!(guard.begin());
    }
}
