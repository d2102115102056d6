//! Dashboard and activity feed endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use projections::{ActivityItem, DashboardStats};
use serde::Deserialize;

use crate::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    10
}

/// GET /dashboard — floor, kitchen and booking statistics.
#[tracing::instrument(skip(state))]
pub async fn stats(State(state): State<Arc<AppState>>) -> Result<Json<DashboardStats>, ApiError> {
    Ok(Json(state.dashboard.stats().await?))
}

/// GET /activity?limit= — newest reservation, order and seating changes.
#[tracing::instrument(skip(state))]
pub async fn activity(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<Vec<ActivityItem>>, ApiError> {
    Ok(Json(state.dashboard.recent_activity(query.limit).await?))
}
