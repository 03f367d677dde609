//! Submission services module
//!
//! This module contains the scoring-server client and the auto-submit
//! controller that drives it.

pub mod controller;
pub mod submit;

// Re-export main types
pub use controller::{AutoSubmitController, ConsolePage, ExamPage};
pub use submit::{SubmitClient, SubmitOutcome};
