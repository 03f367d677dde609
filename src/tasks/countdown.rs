//! Countdown background task

use std::{future::Future, sync::Arc, time::Duration};

use tracing::{debug, error, info};

use crate::{display::TimerDisplay, state::SessionState};

/// How a countdown run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEnd {
    /// The counter reached zero and the expiration hook ran
    Expired,
    /// The session was stopped manually before expiry
    Stopped,
}

/// Drive the countdown for a session: tick at `tick_period`, render each
/// new value, and invoke `on_expire` exactly once when the counter hits
/// zero.
///
/// The tick cadence is nominally one second; tests inject a shorter
/// period. Returns once the timer is terminal.
pub async fn countdown_task<F, Fut>(
    state: Arc<SessionState>,
    display: Arc<dyn TimerDisplay>,
    tick_period: Duration,
    on_expire: F,
) -> CountdownEnd
where
    F: FnOnce() -> Fut + Send,
    Fut: Future<Output = ()> + Send,
{
    info!("Starting countdown task for test {}", state.test_id);

    let mut stop_rx = state.subscribe_stop();

    // Render the starting value before the first decrement, including a
    // threshold warning if the session begins exactly on one
    let initial = match state.timer_snapshot() {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!("Failed to read initial timer state: {}", e);
            return CountdownEnd::Stopped;
        }
    };
    display.render(&initial.format_display(), initial.phase());
    if let Some(alert) = initial.threshold_alert() {
        display.notify(alert);
    }

    // A session that resumes with nothing left expires without ticking
    if initial.remaining_seconds == 0 {
        if let Err(e) = state.stop() {
            error!("Failed to finalize expired timer: {}", e);
        }
        info!("Timer for test {} already expired at start", state.test_id);
        on_expire().await;
        return CountdownEnd::Expired;
    }

    let mut interval = tokio::time::interval(tick_period);
    interval.tick().await; // consume the immediate first fire

    let end = loop {
        tokio::select! {
            _ = interval.tick() => {
                match state.advance_tick() {
                    Ok(Some(outcome)) => {
                        match state.timer_snapshot() {
                            Ok(snapshot) => {
                                display.render(&snapshot.format_display(), snapshot.phase());
                            }
                            Err(e) => error!("Failed to read timer state: {}", e),
                        }
                        if let Some(alert) = outcome.alert {
                            display.notify(alert);
                        }
                        if outcome.expired {
                            break CountdownEnd::Expired;
                        }
                        debug!("Tick: {}s remaining", outcome.remaining_seconds);
                    }
                    Ok(None) => {
                        // Timer no longer running; nothing left to do
                        break CountdownEnd::Stopped;
                    }
                    Err(e) => {
                        error!("Tick failed: {}", e);
                    }
                }
            }
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    info!("Countdown for test {} cancelled", state.test_id);
                    break CountdownEnd::Stopped;
                }
            }
        }
    };

    if end == CountdownEnd::Expired {
        info!("Timer for test {} expired, invoking expiration hook", state.test_id);
        on_expire().await;
    }

    end
}
