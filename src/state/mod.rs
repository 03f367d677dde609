//! State management module
//!
//! This module contains all state-related structures and their management logic.

pub mod app_state;
pub mod submission;
pub mod timer_state;

// Re-export main types
pub use app_state::SessionState;
pub use submission::SubmissionGuard;
pub use timer_state::{DisplayPhase, ThresholdAlert, TickOutcome, TimerState};
