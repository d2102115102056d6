//! HTTP API server with observability for the front-of-house services.
//!
//! Provides REST endpoints for tables, reservations, seating and orders,
//! plus the dashboard and activity feed, with structured logging (tracing)
//! and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use domain::{Restaurant, SeedData};
use metrics_exporter_prometheus::PrometheusHandle;
use projections::Dashboard;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub restaurant: Restaurant,
    pub dashboard: Dashboard,
}

impl AppState {
    /// Wraps a restaurant, with a dashboard over its journal.
    pub fn new(restaurant: Restaurant, activity_capacity: usize) -> Self {
        let dashboard = Dashboard::new(restaurant.clone(), activity_capacity);
        Self {
            restaurant,
            dashboard,
        }
    }
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    use routes::{dashboard, health, orders, reservations, tables};

    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(routes::metrics::MetricsState {
            handle: metrics_handle,
            app: Arc::clone(&state),
        });

    Router::new()
        .route("/health", get(health::check))
        .route("/tables", get(tables::list).post(tables::create))
        .route("/tables/available", get(tables::available))
        .route("/tables/claim", post(tables::claim))
        .route("/tables/{id}", get(tables::get))
        .route("/tables/{id}/status", post(tables::set_status))
        .route("/tables/{id}/release", post(tables::release))
        .route("/tables/{id}/server", post(tables::assign_server))
        .route(
            "/reservations",
            get(reservations::list).post(reservations::create),
        )
        .route(
            "/reservations/{id}",
            get(reservations::get).patch(reservations::update),
        )
        .route("/reservations/{id}/confirm", post(reservations::confirm))
        .route("/reservations/{id}/cancel", post(reservations::cancel))
        .route("/reservations/{id}/seat", post(reservations::seat))
        .route("/walk-ins", post(reservations::walk_in))
        .route("/orders", get(orders::list).post(orders::create))
        .route(
            "/orders/{id}",
            get(orders::get).patch(orders::update).delete(orders::delete),
        )
        .route("/orders/{id}/advance", post(orders::advance))
        .route("/dashboard", get(dashboard::stats))
        .route("/activity", get(dashboard::activity))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state described by the configuration, seeded
/// with the bundled dataset when `seed_data` is set.
pub async fn create_default_state(config: &Config) -> domain::Result<Arc<AppState>> {
    let restaurant = if config.seed_data {
        let seed = SeedData::embedded()?;
        Restaurant::seeded(config.restaurant(), &seed).await?
    } else {
        Restaurant::new(config.restaurant())
    };

    Ok(Arc::new(AppState::new(
        restaurant,
        config.activity_capacity,
    )))
}
