//! Kitchen order endpoints.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::{OrderId, TableNumber};
use domain::{NewOrder, Order, OrderPatch, OrderStatus};
use serde::Deserialize;

use crate::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Only orders of this table number.
    pub table: Option<u32>,
}

/// Optional body of an advance request.
#[derive(Debug, Default, Deserialize)]
pub struct AdvanceRequest {
    /// Target stage; the next one when omitted.
    pub status: Option<OrderStatus>,
}

/// GET /orders?table= — all orders, or those of one table.
#[tracing::instrument(skip(state))]
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<Order>> {
    let tracker = state.restaurant.orders();
    let orders = match query.table {
        Some(number) => tracker.list_by_table(TableNumber::new(number)).await,
        None => tracker.list_all().await,
    };
    Json(orders)
}

/// GET /orders/{id}
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<Json<Order>, ApiError> {
    state
        .restaurant
        .orders()
        .find_by_id(OrderId::new(id))
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Order not found: {id}")))
}

/// POST /orders — place an order for a table.
#[tracing::instrument(skip(state, req), fields(table_number = %req.table_number))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewOrder>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let order = state.restaurant.orders().create(req).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// PATCH /orders/{id} — correct table, items or total.
#[tracing::instrument(skip(state, req))]
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
    Json(req): Json<OrderPatch>,
) -> Result<Json<Order>, ApiError> {
    let order = state
        .restaurant
        .orders()
        .update(OrderId::new(id), req)
        .await?;
    Ok(Json(order))
}

/// POST /orders/{id}/advance — move to the next stage, or to `status` if
/// given (which must be the next stage).
#[tracing::instrument(skip(state, body))]
pub async fn advance(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
    body: Bytes,
) -> Result<Json<Order>, ApiError> {
    let req: AdvanceRequest = if body.iter().all(u8::is_ascii_whitespace) {
        AdvanceRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::BadRequest(format!("Invalid advance request: {e}")))?
    };

    let tracker = state.restaurant.orders();
    let id = OrderId::new(id);
    let order = match req.status {
        Some(status) => tracker.advance_status(id, status).await?,
        None => tracker.advance(id).await?,
    };
    Ok(Json(order))
}

/// DELETE /orders/{id}
#[tracing::instrument(skip(state))]
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<StatusCode, ApiError> {
    if state.restaurant.orders().delete(OrderId::new(id)).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("Order not found: {id}")))
    }
}
