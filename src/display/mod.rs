//! Timer display targets
//!
//! The countdown renders into an externally supplied target whose content
//! is replaced every tick with the formatted remaining time plus its
//! presentation class. Threshold warnings go to the same target.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use tracing::warn;

use crate::state::{DisplayPhase, ThresholdAlert};

/// Sink for the rendered countdown
pub trait TimerDisplay: Send + Sync {
    /// Replace the displayed time. `time` is already formatted
    /// (`H:MM:SS` or `M:SS`); `phase` selects the presentation class.
    fn render(&self, time: &str, phase: DisplayPhase);

    /// Surface a one-shot threshold warning
    fn notify(&self, alert: ThresholdAlert);
}

enum Target {
    Stdout,
    Stderr,
    File(PathBuf),
}

/// Display bound to a console stream or a file whose content is rewritten
/// in place each tick
pub struct ConsoleDisplay {
    target: Target,
}

impl ConsoleDisplay {
    /// Bind to a display target: `stdout`, `stderr`, or a writable file
    /// path. An unusable target is a configuration error and the timer
    /// must not run.
    pub fn bind(target: &str) -> Result<Self, String> {
        let target = match target {
            "stdout" => Target::Stdout,
            "stderr" => Target::Stderr,
            path => {
                let path = PathBuf::from(path);
                // Probe writability up front so a bad target fails at
                // initialization instead of on the first tick
                fs::write(&path, "")
                    .map_err(|e| format!("Display target {:?} is not writable: {}", path, e))?;
                Target::File(path)
            }
        };
        Ok(Self { target })
    }

    fn write_line(&self, line: &str) {
        match &self.target {
            Target::Stdout => {
                let mut out = io::stdout();
                let _ = write!(out, "\r{}", line);
                let _ = out.flush();
            }
            Target::Stderr => {
                let mut err = io::stderr();
                let _ = write!(err, "\r{}", line);
                let _ = err.flush();
            }
            Target::File(path) => {
                if let Err(e) = fs::write(path, line) {
                    warn!("Failed to write display target {:?}: {}", path, e);
                }
            }
        }
    }
}

impl TimerDisplay for ConsoleDisplay {
    fn render(&self, time: &str, phase: DisplayPhase) {
        self.write_line(&format!("[{}] {}", phase.as_class(), time));
    }

    fn notify(&self, alert: ThresholdAlert) {
        match &self.target {
            Target::File(path) => {
                warn!("{} (display: {:?})", alert.message(), path);
            }
            _ => {
                // Break out of the in-place line before the warning
                eprintln!();
                warn!("{}", alert.message());
            }
        }
    }
}
