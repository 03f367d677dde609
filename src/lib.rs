//! Pencils Down - A state-managed countdown daemon for online test sessions
//!
//! This library owns the remaining-time counter for one test attempt,
//! persists it across restarts, and performs exactly one auto-submission
//! against the scoring server when the clock expires.

pub mod api;
pub mod config;
pub mod display;
pub mod services;
pub mod state;
pub mod storage;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::{create_router, ApiContext};
pub use config::Config;
pub use display::{ConsoleDisplay, TimerDisplay};
pub use services::{AutoSubmitController, ConsolePage, SubmitClient};
pub use state::SessionState;
pub use storage::{FileSnapshotStore, MemorySnapshotStore, SnapshotStore};
pub use tasks::{countdown_task, CountdownEnd};
pub use utils::shutdown_signal;
