//! Signal handling for manual submission and shutdown

use futures::stream::StreamExt;
use signal_hook_tokio::Signals;
use tracing::info;

/// Wait for SIGTERM or SIGINT. The session treats the first signal as a
/// manual-submit request.
pub async fn shutdown_signal() {
    let mut signals = Signals::new([
        signal_hook::consts::SIGTERM,
        signal_hook::consts::SIGINT,
    ])
    .expect("Failed to create signal handler");

    while let Some(signal) = signals.next().await {
        info!("Received signal: {}", signal);
        break;
    }
}
