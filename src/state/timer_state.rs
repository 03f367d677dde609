//! Countdown timer state and tick logic

use serde::{Deserialize, Serialize};

/// Seconds remaining at which the five-minute warning fires.
pub const WARNING_THRESHOLD_SECS: u64 = 300;
/// Seconds remaining at which the one-minute warning fires.
pub const URGENT_THRESHOLD_SECS: u64 = 60;

/// Presentation phase of the timer display, derived from remaining time.
///
/// Phases only move forward within a session because the counter only
/// decreases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayPhase {
    Normal,
    Warning,
    Urgent,
}

impl DisplayPhase {
    /// Presentation class applied to the display container
    pub fn as_class(&self) -> &'static str {
        match self {
            DisplayPhase::Normal => "timer-display",
            DisplayPhase::Warning => "timer-display warning",
            DisplayPhase::Urgent => "timer-display danger",
        }
    }
}

/// One-shot notification raised when the counter lands exactly on a
/// threshold. Skipped ticks skip the notification; it is not retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdAlert {
    FiveMinutes,
    OneMinute,
}

impl ThresholdAlert {
    pub fn message(&self) -> &'static str {
        match self {
            ThresholdAlert::FiveMinutes => "Warning: 5 minutes remaining!",
            ThresholdAlert::OneMinute => "Warning: Only 1 minute remaining!",
        }
    }
}

/// Result of a single tick
#[derive(Debug, Clone, Copy)]
pub struct TickOutcome {
    pub remaining_seconds: u64,
    pub alert: Option<ThresholdAlert>,
    pub expired: bool,
}

/// Timer state for one test session countdown
#[derive(Debug, Clone, Serialize)]
pub struct TimerState {
    pub total_seconds: u64,
    pub remaining_seconds: u64,
    pub running: bool,
}

impl TimerState {
    /// Create a fresh timer with the full duration remaining
    pub fn new(total_seconds: u64) -> Self {
        Self {
            total_seconds,
            remaining_seconds: total_seconds,
            running: true,
        }
    }

    /// Create a timer resuming from a persisted remaining-time snapshot.
    ///
    /// The snapshot overrides the supplied duration as the starting point;
    /// values above the total are clamped so `remaining <= total` holds.
    pub fn resume(total_seconds: u64, persisted_remaining: u64) -> Self {
        let remaining = if persisted_remaining > total_seconds {
            tracing::warn!(
                "Persisted snapshot {} exceeds total duration {}, clamping",
                persisted_remaining,
                total_seconds
            );
            total_seconds
        } else {
            persisted_remaining
        };
        Self {
            total_seconds,
            remaining_seconds: remaining,
            running: true,
        }
    }

    /// Advance the countdown by one second.
    ///
    /// Decrements with a floor of zero, reports any threshold alert landed
    /// on, and flags expiry when the counter reaches zero. Expiry clears
    /// `running`; the state is terminal after that.
    pub fn tick(&mut self) -> TickOutcome {
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        let expired = self.remaining_seconds == 0;
        if expired {
            self.running = false;
        }
        TickOutcome {
            remaining_seconds: self.remaining_seconds,
            alert: self.threshold_alert(),
            expired,
        }
    }

    /// Alert due at the current counter value, if it sits exactly on a
    /// threshold. Also checked once before the first tick so a session
    /// that starts at a threshold still notifies.
    pub fn threshold_alert(&self) -> Option<ThresholdAlert> {
        match self.remaining_seconds {
            WARNING_THRESHOLD_SECS => Some(ThresholdAlert::FiveMinutes),
            URGENT_THRESHOLD_SECS => Some(ThresholdAlert::OneMinute),
            _ => None,
        }
    }

    /// Stop the countdown. Terminal; there is no restart.
    pub fn halt(&mut self) {
        self.running = false;
    }

    /// Current presentation phase
    pub fn phase(&self) -> DisplayPhase {
        if self.remaining_seconds < URGENT_THRESHOLD_SECS {
            DisplayPhase::Urgent
        } else if self.remaining_seconds < WARNING_THRESHOLD_SECS {
            DisplayPhase::Warning
        } else {
            DisplayPhase::Normal
        }
    }

    /// Format remaining time for the display target.
    ///
    /// `H:MM:SS` while at least a full hour remains, `M:SS` below that
    /// (minutes unpadded, so three seconds left reads `0:03`).
    pub fn format_display(&self) -> String {
        let hours = self.remaining_seconds / 3600;
        let minutes = (self.remaining_seconds % 3600) / 60;
        let seconds = self.remaining_seconds % 60;

        if hours > 0 {
            format!("{}:{:02}:{:02}", hours, minutes, seconds)
        } else {
            format!("{}:{:02}", minutes, seconds)
        }
    }

    /// Human-readable remaining time for logs and status output
    pub fn format_verbose(&self) -> String {
        let hours = self.remaining_seconds / 3600;
        let minutes = (self.remaining_seconds % 3600) / 60;
        let seconds = self.remaining_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
