//! Prometheus metrics endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use domain::TableStatus;
use metrics_exporter_prometheus::PrometheusHandle;

use crate::AppState;

/// State of the metrics router: the recorder handle plus the floor it
/// samples gauges from.
#[derive(Clone)]
pub struct MetricsState {
    pub handle: PrometheusHandle,
    pub app: Arc<AppState>,
}

/// GET /metrics — samples the floor gauges, then renders every metric in
/// the Prometheus text format.
pub async fn get(State(state): State<MetricsState>) -> impl IntoResponse {
    let tables = state.app.restaurant.tables().list().await;
    for status in TableStatus::ALL {
        let count = tables.iter().filter(|t| t.status() == status).count();
        metrics::gauge!("tables_by_status", "status" => status.as_str()).set(count as f64);
    }

    let entries = state.app.restaurant.journal().len().await;
    metrics::gauge!("journal_entries").set(entries as f64);

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        state.handle.render(),
    )
}
