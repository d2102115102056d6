//! Reservation domain events.

use chrono::{DateTime, Utc};
use common::TableId;
use serde::{Deserialize, Serialize};

use crate::aggregate::DomainEvent;

use super::ReservationStatus;

/// Events that can occur on a reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ReservationEvent {
    /// Reservation was taken.
    ReservationBooked(ReservationBookedData),

    /// Booking details were corrected.
    ReservationUpdated(ReservationUpdatedData),

    /// Guest confirmed the booking.
    ReservationConfirmed(ReservationConfirmedData),

    /// Party was seated at a table.
    ReservationSeated(ReservationSeatedData),

    /// Reservation was called off.
    ReservationCancelled(ReservationCancelledData),
}

impl DomainEvent for ReservationEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ReservationEvent::ReservationBooked(_) => "ReservationBooked",
            ReservationEvent::ReservationUpdated(_) => "ReservationUpdated",
            ReservationEvent::ReservationConfirmed(_) => "ReservationConfirmed",
            ReservationEvent::ReservationSeated(_) => "ReservationSeated",
            ReservationEvent::ReservationCancelled(_) => "ReservationCancelled",
        }
    }
}

/// Data for ReservationBooked event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationBookedData {
    pub customer_name: String,
    pub phone: String,
    pub party_size: u32,
    pub date_time: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,

    /// Status the reservation starts in.
    pub status: ReservationStatus,

    /// Table, for parties seated on arrival.
    #[serde(default)]
    pub table_id: Option<TableId>,
}

/// Data for ReservationUpdated event. Only changed fields are set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReservationUpdatedData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<DateTime<Utc>>,

    /// New notes; `Some(None)` clears them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

/// Data for ReservationConfirmed event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationConfirmedData {
    pub confirmed_at: DateTime<Utc>,
}

/// Data for ReservationSeated event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationSeatedData {
    /// Table the party was seated at.
    pub table_id: TableId,

    /// Party size, copied for turnover and cover counts.
    pub party_size: u32,

    pub seated_at: DateTime<Utc>,
}

/// Data for ReservationCancelled event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCancelledData {
    /// Status before cancelling.
    pub previous_status: ReservationStatus,

    /// Table the party was seated at, when cancelled after seating.
    #[serde(default)]
    pub table_id: Option<TableId>,

    pub cancelled_at: DateTime<Utc>,
}

impl ReservationEvent {
    /// Creates a ReservationConfirmed event.
    pub fn confirmed() -> Self {
        ReservationEvent::ReservationConfirmed(ReservationConfirmedData {
            confirmed_at: Utc::now(),
        })
    }

    /// Creates a ReservationSeated event.
    pub fn seated(table_id: TableId, party_size: u32) -> Self {
        ReservationEvent::ReservationSeated(ReservationSeatedData {
            table_id,
            party_size,
            seated_at: Utc::now(),
        })
    }

    /// Creates a ReservationCancelled event.
    pub fn cancelled(previous_status: ReservationStatus, table_id: Option<TableId>) -> Self {
        ReservationEvent::ReservationCancelled(ReservationCancelledData {
            previous_status,
            table_id,
            cancelled_at: Utc::now(),
        })
    }
}
