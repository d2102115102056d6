//! Reservation book and seating endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::NaiveDate;
use common::ReservationId;
use domain::{NewReservation, Reservation, ReservationPatch, WalkIn};
use serde::Deserialize;

use crate::AppState;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Only reservations on this day (`YYYY-MM-DD`, UTC).
    pub date: Option<NaiveDate>,
}

/// GET /reservations?date= — all reservations, or those of one day.
#[tracing::instrument(skip(state))]
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<Reservation>> {
    let book = state.restaurant.reservations();
    let reservations = match query.date {
        Some(date) => book.list_by_date(date).await,
        None => book.list().await,
    };
    Json(reservations)
}

/// GET /reservations/{id}
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<Json<Reservation>, ApiError> {
    state
        .restaurant
        .reservations()
        .find_by_id(ReservationId::new(id))
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Reservation not found: {id}")))
}

/// POST /reservations — book a table.
#[tracing::instrument(skip(state, req), fields(party_size = req.party_size))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewReservation>,
) -> Result<(StatusCode, Json<Reservation>), ApiError> {
    let reservation = state.restaurant.reservations().create(req).await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

/// PATCH /reservations/{id} — correct an open booking.
#[tracing::instrument(skip(state, req))]
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
    Json(req): Json<ReservationPatch>,
) -> Result<Json<Reservation>, ApiError> {
    if req.is_empty() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }
    let reservation = state
        .restaurant
        .reservations()
        .update(ReservationId::new(id), req)
        .await?;
    Ok(Json(reservation))
}

/// POST /reservations/{id}/confirm
#[tracing::instrument(skip(state))]
pub async fn confirm(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<Json<Reservation>, ApiError> {
    let reservation = state
        .restaurant
        .reservations()
        .confirm(ReservationId::new(id))
        .await?;
    Ok(Json(reservation))
}

/// POST /reservations/{id}/cancel
#[tracing::instrument(skip(state))]
pub async fn cancel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<Json<Reservation>, ApiError> {
    let reservation = state
        .restaurant
        .reservations()
        .cancel(ReservationId::new(id))
        .await?;
    Ok(Json(reservation))
}

/// POST /reservations/{id}/seat — seat the party at the first table that fits.
#[tracing::instrument(skip(state))]
pub async fn seat(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
) -> Result<Json<Reservation>, ApiError> {
    let reservation = state
        .restaurant
        .reservations()
        .seat(ReservationId::new(id))
        .await?;
    Ok(Json(reservation))
}

/// POST /walk-ins — seat a party without a booking.
#[tracing::instrument(skip(state, req), fields(party_size = req.party_size))]
pub async fn walk_in(
    State(state): State<Arc<AppState>>,
    Json(req): Json<WalkIn>,
) -> Result<(StatusCode, Json<Reservation>), ApiError> {
    let reservation = state.restaurant.reservations().seat_walk_in(req).await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}
