//! HTTP API module
//!
//! Local observation and control surface for one test session: status,
//! health, and manual submission.

pub mod handlers;
pub mod responses;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{services::AutoSubmitController, state::SessionState};
use handlers::*;

/// Shared context behind the API handlers
#[derive(Clone)]
pub struct ApiContext {
    pub session: Arc<SessionState>,
    pub controller: Arc<AutoSubmitController>,
}

/// Create the HTTP router with all endpoints
pub fn create_router(ctx: ApiContext) -> Router {
    Router::new()
        .route("/submit", post(submit_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
