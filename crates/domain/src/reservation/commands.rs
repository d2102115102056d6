//! Inputs for reservation operations.

use chrono::{DateTime, Utc};
use common::TableId;
use serde::{Deserialize, Serialize};

use super::ReservationStatus;

/// A booking request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReservation {
    pub customer_name: String,
    pub phone: String,
    pub party_size: u32,
    pub date_time: DateTime<Utc>,

    #[serde(default)]
    pub notes: Option<String>,

    /// Initial status; `Confirmed` when omitted.
    #[serde(default)]
    pub status: Option<ReservationStatus>,

    /// Pre-assigned table, only together with `Seated`.
    #[serde(default)]
    pub table_id: Option<TableId>,
}

impl NewReservation {
    pub fn new(
        customer_name: impl Into<String>,
        phone: impl Into<String>,
        party_size: u32,
        date_time: DateTime<Utc>,
    ) -> Self {
        Self {
            customer_name: customer_name.into(),
            phone: phone.into(),
            party_size,
            date_time,
            notes: None,
            status: None,
            table_id: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn pending(mut self) -> Self {
        self.status = Some(ReservationStatus::Pending);
        self
    }

    pub fn seated_at_table(mut self, table_id: TableId) -> Self {
        self.status = Some(ReservationStatus::Seated);
        self.table_id = Some(table_id);
        self
    }
}

/// Corrections to an open reservation. Unset fields stay as they are.
///
/// Blank `notes` clears the notes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationPatch {
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub party_size: Option<u32>,
    #[serde(default)]
    pub date_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ReservationPatch {
    /// Returns true if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// A party arriving without a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkIn {
    pub customer_name: String,
    pub party_size: u32,
    #[serde(default)]
    pub notes: Option<String>,
}

impl WalkIn {
    pub fn new(customer_name: impl Into<String>, party_size: u32) -> Self {
        Self {
            customer_name: customer_name.into(),
            party_size,
            notes: None,
        }
    }
}
