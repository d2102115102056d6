//! Health check endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub tables: usize,
    pub journal_entries: usize,
}

/// GET /health — liveness plus a glance at the stores.
pub async fn check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        tables: state.restaurant.tables().count().await,
        journal_entries: state.restaurant.journal().len().await,
    })
}
