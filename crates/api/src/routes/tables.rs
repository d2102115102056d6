//! Table floor endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::{ServerId, TableId};
use domain::{NewTable, StatusExtra, Table, TableStatus};
use serde::Deserialize;

use crate::AppState;
use crate::error::ApiError;

// -- Request types --

#[derive(Debug, Deserialize)]
pub struct AvailableQuery {
    #[serde(default = "one")]
    pub min_capacity: u32,
}

fn one() -> u32 {
    1
}

/// Body of a status change. `expected` guards the change against a
/// concurrent one.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: TableStatus,
    #[serde(default)]
    pub expected: Option<TableStatus>,
    #[serde(flatten)]
    pub extra: StatusExtra,
}

#[derive(Debug, Deserialize)]
pub struct ClaimRequest {
    pub party_size: u32,
    #[serde(default)]
    pub min_capacity: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ServerRequest {
    pub server_id: ServerId,
}

// -- Handlers --

/// GET /tables — every table, in id order.
#[tracing::instrument(skip(state))]
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<Table>> {
    Json(state.restaurant.tables().list().await)
}

/// GET /tables/{id}
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<Json<Table>, ApiError> {
    state
        .restaurant
        .tables()
        .find_by_id(TableId::new(id))
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Table not found: {id}")))
}

/// GET /tables/available?min_capacity= — first available table that fits.
#[tracing::instrument(skip(state))]
pub async fn available(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AvailableQuery>,
) -> Result<Json<Table>, ApiError> {
    state
        .restaurant
        .tables()
        .find_available(query.min_capacity)
        .await
        .map(Json)
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "No available table for {} guests",
                query.min_capacity
            ))
        })
}

/// POST /tables — register a table.
#[tracing::instrument(skip(state))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewTable>,
) -> Result<(StatusCode, Json<Table>), ApiError> {
    let table = state.restaurant.tables().create(req).await?;
    Ok((StatusCode::CREATED, Json(table)))
}

/// POST /tables/{id}/status — move a table through its occupancy states.
#[tracing::instrument(skip(state, req), fields(status = %req.status))]
pub async fn set_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<Table>, ApiError> {
    let tables = state.restaurant.tables();
    let id = TableId::new(id);
    let table = match req.expected {
        Some(expected) => {
            tables
                .set_status_if(id, expected, req.status, req.extra)
                .await?
        }
        None => tables.set_status(id, req.status, req.extra).await?,
    };
    Ok(Json(table))
}

/// POST /tables/claim — seat a party at the first table that fits.
#[tracing::instrument(skip(state, req), fields(party_size = req.party_size))]
pub async fn claim(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ClaimRequest>,
) -> Result<Json<Table>, ApiError> {
    let min_capacity = req.min_capacity.unwrap_or(req.party_size);
    let table = state
        .restaurant
        .tables()
        .claim(min_capacity, req.party_size)
        .await?;
    Ok(Json(table))
}

/// POST /tables/{id}/release — free an occupied table.
#[tracing::instrument(skip(state))]
pub async fn release(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<Json<Table>, ApiError> {
    let table = state.restaurant.tables().release(TableId::new(id)).await?;
    Ok(Json(table))
}

/// POST /tables/{id}/server — hand the table to a server.
#[tracing::instrument(skip(state, req))]
pub async fn assign_server(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
    Json(req): Json<ServerRequest>,
) -> Result<Json<Table>, ApiError> {
    let table = state
        .restaurant
        .tables()
        .assign_server(TableId::new(id), req.server_id)
        .await?;
    Ok(Json(table))
}
