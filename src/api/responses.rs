//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::DisplayPhase;

/// Response for the manual submission endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub status: String,
    pub message: String,
    /// Destination the user should be routed to, when submission succeeded
    pub location: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl SubmitResponse {
    pub fn submitted(location: String) -> Self {
        Self {
            status: "submitted".to_string(),
            message: "Test submitted".to_string(),
            location: Some(location),
            timestamp: Utc::now(),
        }
    }

    pub fn in_progress() -> Self {
        Self {
            status: "in-progress".to_string(),
            message: "Submit already in progress".to_string(),
            location: None,
            timestamp: Utc::now(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            status: "error".to_string(),
            message,
            location: None,
            timestamp: Utc::now(),
        }
    }
}

/// Timer and submission status for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub test_id: u64,
    pub running: bool,
    pub remaining_seconds: u64,
    pub total_seconds: u64,
    /// Remaining time formatted as shown on the display target
    pub display: String,
    pub phase: DisplayPhase,
    pub submit_in_progress: bool,
    pub uptime: String,
    pub timestamp: DateTime<Utc>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: "0.1.0".to_string(),
        }
    }
}
