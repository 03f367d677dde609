//! Pencils Down - countdown daemon for one online test session
//!
//! This is the main entry point for the pencils-down application.

use std::{sync::Arc, time::Duration};

use tokio::net::TcpListener;
use tracing::{error, info};

use pencils_down::{
    api::{create_router, ApiContext},
    config::Config,
    display::{ConsoleDisplay, TimerDisplay},
    services::{AutoSubmitController, ConsolePage, ExamPage, SubmitClient},
    state::SessionState,
    storage::{FileSnapshotStore, SnapshotStore},
    tasks::{countdown_task, CountdownEnd},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "pencils_down={},tower_http=info",
            config.log_level()
        ))
        .init();

    info!("Starting pencils-down v0.1.0");
    info!(
        "Configuration: test={}, duration={}s, server={}",
        config.test_id, config.duration, config.server
    );

    // Bind the display target first; a session without one must not run
    let display: Arc<dyn TimerDisplay> = match ConsoleDisplay::bind(&config.display) {
        Ok(display) => Arc::new(display),
        Err(e) => {
            error!("{}", e);
            return Ok(());
        }
    };

    let store: Arc<dyn SnapshotStore> = Arc::new(FileSnapshotStore::new(&config.state_dir));
    let session = Arc::new(SessionState::initialize(
        config.test_id,
        config.duration,
        store,
    ));

    let client = SubmitClient::new(&config.server, config.test_id).map_err(anyhow::Error::msg)?;
    let page: Arc<dyn ExamPage> = Arc::new(ConsolePage::new());
    let controller = Arc::new(AutoSubmitController::new(
        client,
        Arc::clone(&session),
        page,
    ));

    // Start the countdown background task. Its end does not end the
    // session: the session is over once a submission succeeds, so a
    // failed auto-submit leaves the API up for a manual retry.
    let timer_session = Arc::clone(&session);
    let timer_display = Arc::clone(&display);
    let expire_controller = Arc::clone(&controller);
    tokio::spawn(async move {
        let end = countdown_task(
            Arc::clone(&timer_session),
            timer_display,
            Duration::from_secs(1),
            move || async move {
                expire_controller.on_expire().await;
            },
        )
        .await;
        match end {
            CountdownEnd::Expired if timer_session.is_submitted() => {
                info!("Timer expired and test submitted")
            }
            CountdownEnd::Expired => {
                info!("Timer expired but no submission succeeded yet, waiting for manual retry")
            }
            CountdownEnd::Stopped => info!("Countdown stopped"),
        }
    });

    // Local status and manual-submission API
    let app = create_router(ApiContext {
        session: Arc::clone(&session),
        controller: Arc::clone(&controller),
    });

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Status API running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /submit - Submit the test now");
    info!("  GET  /status - Timer and submission state");
    info!("  GET  /health - Health check");

    // Serve until a submission succeeds; graceful shutdown lets any
    // in-flight handler (and its submission request) run to completion
    let mut submitted_rx = session.subscribe_submitted();
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        while !*submitted_rx.borrow() {
            if submitted_rx.changed().await.is_err() {
                break;
            }
        }
    });

    tokio::select! {
        result = server => {
            match result {
                Ok(()) => info!("Session finished: test submitted"),
                Err(e) => error!("Status API error: {}", e),
            }
        }
        _ = shutdown_signal() => {
            info!("Signal received, submitting test manually");
            if let Err(e) = session.stop() {
                error!("Failed to stop timer: {}", e);
            }
            match controller.submit().await {
                Ok(Some(destination)) => info!("Test submitted, results at {}", destination),
                Ok(None) => info!("Submission already in progress"),
                Err(e) => error!("Manual submission failed: {}", e),
            }
        }
    }

    info!("Session shutdown complete");
    Ok(())
}
