//! Persisted remaining-time snapshot
//!
//! The timer writes its counter through a small key-value side channel
//! after every tick so a restarted session resumes instead of resetting.
//! The key is deliberately not scoped to a test id: two sessions running
//! at once overwrite each other, mirroring the single-page origin of this
//! design.

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::{debug, warn};

/// Well-known key the remaining-time snapshot lives under
pub const SNAPSHOT_KEY: &str = "test_timer_remaining";

/// Side channel holding the single persisted remaining-time value.
///
/// Writes are best effort; a failed save is logged and the session keeps
/// ticking. Losing the snapshot only costs reload survival.
pub trait SnapshotStore: Send + Sync {
    /// Load the persisted remaining seconds, if a snapshot exists
    fn load(&self) -> Option<u64>;
    /// Persist the remaining seconds, replacing any previous value
    fn save(&self, remaining_seconds: u64);
    /// Remove the snapshot. Idempotent.
    fn clear(&self);
}

/// Snapshot store backed by a single file in a state directory
#[derive(Debug)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            path: state_dir.into().join(SNAPSHOT_KEY),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> Option<u64> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return None,
        };
        match raw.trim().parse::<u64>() {
            Ok(value) => {
                debug!("Loaded persisted snapshot: {}s remaining", value);
                Some(value)
            }
            Err(e) => {
                warn!("Ignoring unparseable snapshot {:?}: {}", raw, e);
                None
            }
        }
    }

    fn save(&self, remaining_seconds: u64) {
        if let Err(e) = fs::write(&self.path, remaining_seconds.to_string()) {
            warn!("Failed to persist snapshot to {:?}: {}", self.path, e);
        }
    }

    fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!("Cleared persisted snapshot"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to clear snapshot {:?}: {}", self.path, e),
        }
    }
}

/// In-memory snapshot store for tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    value: Mutex<Option<u64>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with a snapshot, as a prior session would have left
    pub fn with_value(remaining_seconds: u64) -> Self {
        Self {
            value: Mutex::new(Some(remaining_seconds)),
        }
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> Option<u64> {
        self.value.lock().ok().and_then(|v| *v)
    }

    fn save(&self, remaining_seconds: u64) {
        if let Ok(mut value) = self.value.lock() {
            *value = Some(remaining_seconds);
        }
    }

    fn clear(&self) {
        if let Ok(mut value) = self.value.lock() {
            *value = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pencils-down-{}-{}", tag, std::process::id()));
        fs::create_dir_all(&dir).ok();
        dir
    }

    #[test]
    fn file_store_round_trip() {
        let store = FileSnapshotStore::new(scratch_dir("round-trip"));
        store.clear();

        assert_eq!(store.load(), None);
        store.save(125);
        assert_eq!(store.load(), Some(125));
        store.save(124);
        assert_eq!(store.load(), Some(124));

        store.clear();
        assert_eq!(store.load(), None);
        // Clearing twice is fine
        store.clear();
    }

    #[test]
    fn file_store_ignores_garbage() {
        let dir = scratch_dir("garbage");
        let store = FileSnapshotStore::new(dir);
        fs::write(store.path(), "not-a-number").unwrap();
        assert_eq!(store.load(), None);
        store.clear();
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemorySnapshotStore::with_value(30);
        assert_eq!(store.load(), Some(30));
        store.save(29);
        assert_eq!(store.load(), Some(29));
        store.clear();
        assert_eq!(store.load(), None);
    }
}
