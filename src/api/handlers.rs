//! HTTP endpoint handlers

use axum::{extract::State, http::StatusCode, response::Json};
use chrono::Utc;
use tracing::{error, info, warn};

use super::responses::{HealthResponse, StatusResponse, SubmitResponse};
use super::ApiContext;

/// Handle POST /submit - Manual submission.
///
/// Stops the countdown first (manual submission ends the session either
/// way), then runs the guarded submit path. This is also the retry path
/// after a failed auto-submit.
pub async fn submit_handler(
    State(ctx): State<ApiContext>,
) -> Result<Json<SubmitResponse>, StatusCode> {
    info!("Manual submission requested for test {}", ctx.session.test_id);

    if let Err(e) = ctx.session.stop() {
        warn!("Failed to stop timer for manual submission: {}", e);
    }

    match ctx.controller.submit().await {
        Ok(Some(location)) => Ok(Json(SubmitResponse::submitted(location))),
        Ok(None) => Ok(Json(SubmitResponse::in_progress())),
        Err(e) => {
            error!("Manual submission failed: {}", e);
            Ok(Json(SubmitResponse::error(e)))
        }
    }
}

/// Handle GET /status - Current timer and submission state
pub async fn status_handler(
    State(ctx): State<ApiContext>,
) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match ctx.session.timer_snapshot() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get timer state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    Ok(Json(StatusResponse {
        test_id: ctx.session.test_id,
        running: timer.running,
        remaining_seconds: timer.remaining_seconds,
        total_seconds: timer.total_seconds,
        display: timer.format_display(),
        phase: timer.phase(),
        submit_in_progress: ctx.session.submission.is_in_progress(),
        uptime: ctx.session.get_uptime(),
        timestamp: Utc::now(),
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
