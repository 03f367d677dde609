//! Test session state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};

use tokio::sync::watch;
use tracing::{info, warn};

use crate::storage::SnapshotStore;

use super::{SubmissionGuard, TickOutcome, TimerState};

/// State owned by one active test session.
///
/// One instance exists per session process; the countdown task, the
/// auto-submit controller, and the status API all share it through an
/// `Arc`.
pub struct SessionState {
    pub test_id: u64,
    /// Countdown state, mutated once per tick
    pub timer: Mutex<TimerState>,
    /// Re-entrancy guard for the submission path
    pub submission: SubmissionGuard,
    /// Side channel the counter is persisted through
    pub store: Arc<dyn SnapshotStore>,
    /// Session metadata
    pub start_time: Instant,
    /// Channel broadcasting timer snapshots to observers
    pub timer_update_tx: watch::Sender<TimerState>,
    /// Keep the receiver alive to prevent channel closure
    _timer_update_rx: watch::Receiver<TimerState>,
    /// Manual-stop signal consumed by the countdown task
    stop_tx: watch::Sender<bool>,
    _stop_rx: watch::Receiver<bool>,
    /// Set once exactly one submission attempt has succeeded; the session
    /// is over when this fires, not when the countdown ends
    submitted_tx: watch::Sender<bool>,
    _submitted_rx: watch::Receiver<bool>,
}

impl SessionState {
    /// Create the session state for a test attempt.
    ///
    /// A persisted snapshot left by a prior run of the same session
    /// overrides the supplied duration as the starting point, so a
    /// restart resumes the clock instead of resetting it.
    pub fn initialize(test_id: u64, duration_seconds: u64, store: Arc<dyn SnapshotStore>) -> Self {
        let timer = match store.load() {
            Some(persisted) => {
                info!(
                    "Resuming test {} from persisted snapshot: {}s remaining (duration {}s)",
                    test_id, persisted, duration_seconds
                );
                TimerState::resume(duration_seconds, persisted)
            }
            None => TimerState::new(duration_seconds),
        };

        let (timer_update_tx, timer_update_rx) = watch::channel(timer.clone());
        let (stop_tx, stop_rx) = watch::channel(false);
        let (submitted_tx, submitted_rx) = watch::channel(false);

        Self {
            test_id,
            timer: Mutex::new(timer),
            submission: SubmissionGuard::new(),
            store,
            start_time: Instant::now(),
            timer_update_tx,
            _timer_update_rx: timer_update_rx,
            stop_tx,
            _stop_rx: stop_rx,
            submitted_tx,
            _submitted_rx: submitted_rx,
        }
    }

    /// Get a snapshot of the current timer state
    pub fn timer_snapshot(&self) -> Result<TimerState, String> {
        self.timer
            .lock()
            .map(|timer| timer.clone())
            .map_err(|e| format!("Failed to lock timer state: {}", e))
    }

    /// Advance the countdown by one tick: decrement, persist, publish.
    ///
    /// Returns `Ok(None)` once the timer is no longer running (stopped or
    /// already expired); the countdown task exits on that. On expiry the
    /// persisted snapshot is erased in place of the final save.
    pub fn advance_tick(&self) -> Result<Option<TickOutcome>, String> {
        let mut timer = self
            .timer
            .lock()
            .map_err(|e| format!("Failed to lock timer state: {}", e))?;

        if !timer.running {
            return Ok(None);
        }

        let outcome = timer.tick();
        let snapshot = timer.clone();
        drop(timer); // Release the lock before touching the store

        if outcome.expired {
            self.store.clear();
        } else {
            self.store.save(outcome.remaining_seconds);
        }

        if let Err(e) = self.timer_update_tx.send(snapshot) {
            warn!("Failed to publish timer update: {}", e);
        }

        Ok(Some(outcome))
    }

    /// Stop the countdown and erase the persisted snapshot. Idempotent;
    /// safe to call after expiry or a previous stop.
    pub fn stop(&self) -> Result<(), String> {
        let mut timer = self
            .timer
            .lock()
            .map_err(|e| format!("Failed to lock timer state: {}", e))?;

        let was_running = timer.running;
        timer.halt();
        let snapshot = timer.clone();
        drop(timer);

        self.store.clear();

        if was_running {
            info!("Timer stopped with {}s remaining", snapshot.remaining_seconds);
            if let Err(e) = self.timer_update_tx.send(snapshot) {
                warn!("Failed to publish timer update: {}", e);
            }
            if let Err(e) = self.stop_tx.send(true) {
                warn!("Failed to signal countdown task: {}", e);
            }
        }

        Ok(())
    }

    /// Receiver for the manual-stop signal
    pub fn subscribe_stop(&self) -> watch::Receiver<bool> {
        self.stop_tx.subscribe()
    }

    /// Record that a submission attempt succeeded. The session is done
    /// once this has been called.
    pub fn mark_submitted(&self) {
        if let Err(e) = self.submitted_tx.send(true) {
            warn!("Failed to signal submission completion: {}", e);
        }
    }

    /// Whether a submission attempt has succeeded for this session
    pub fn is_submitted(&self) -> bool {
        *self.submitted_tx.borrow()
    }

    /// Receiver that resolves once a submission attempt has succeeded
    pub fn subscribe_submitted(&self) -> watch::Receiver<bool> {
        self.submitted_tx.subscribe()
    }

    /// Calculate session uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("test_id", &self.test_id)
            .field("timer", &self.timer)
            .field("submission", &self.submission)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemorySnapshotStore;

    #[test]
    fn initialize_prefers_persisted_snapshot() {
        let store = Arc::new(MemorySnapshotStore::with_value(42));
        let session = SessionState::initialize(7, 600, store);
        let timer = session.timer_snapshot().unwrap();
        assert_eq!(timer.remaining_seconds, 42);
        assert_eq!(timer.total_seconds, 600);
    }

    #[test]
    fn initialize_without_snapshot_uses_full_duration() {
        let store = Arc::new(MemorySnapshotStore::new());
        let session = SessionState::initialize(7, 600, store);
        assert_eq!(session.timer_snapshot().unwrap().remaining_seconds, 600);
    }

    #[test]
    fn advance_tick_persists_and_clears_on_expiry() {
        let store = Arc::new(MemorySnapshotStore::new());
        let session = SessionState::initialize(7, 2, Arc::clone(&store) as Arc<dyn SnapshotStore>);

        let first = session.advance_tick().unwrap().unwrap();
        assert_eq!(first.remaining_seconds, 1);
        assert!(!first.expired);
        assert_eq!(store.load(), Some(1));

        let second = session.advance_tick().unwrap().unwrap();
        assert!(second.expired);
        // Expiry erases the snapshot instead of saving zero
        assert_eq!(store.load(), None);

        // Timer is terminal: further ticks are refused
        assert!(session.advance_tick().unwrap().is_none());
    }

    #[test]
    fn stop_is_idempotent_and_freezes_remaining() {
        let store = Arc::new(MemorySnapshotStore::new());
        let session = SessionState::initialize(7, 10, Arc::clone(&store) as Arc<dyn SnapshotStore>);

        session.advance_tick().unwrap();
        session.stop().unwrap();
        session.stop().unwrap();

        assert_eq!(store.load(), None);
        let frozen = session.timer_snapshot().unwrap().remaining_seconds;
        assert_eq!(frozen, 9);

        // Ticks after stop change nothing
        assert!(session.advance_tick().unwrap().is_none());
        assert_eq!(session.timer_snapshot().unwrap().remaining_seconds, frozen);
    }

    #[tokio::test]
    async fn mark_submitted_wakes_subscribers() {
        let store = Arc::new(MemorySnapshotStore::new());
        let session = SessionState::initialize(7, 10, store);
        assert!(!session.is_submitted());

        let mut submitted_rx = session.subscribe_submitted();
        session.mark_submitted();

        assert!(session.is_submitted());
        submitted_rx.changed().await.unwrap();
        assert!(*submitted_rx.borrow());
    }
}
