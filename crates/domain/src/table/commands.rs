//! Inputs for table operations.

use chrono::{DateTime, Utc};
use common::{ServerId, TableNumber};
use serde::{Deserialize, Serialize};

/// A table to add to the floor plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTable {
    /// Display number, unique across the floor.
    pub number: TableNumber,

    /// Seats at the table.
    pub capacity: u32,
}

impl NewTable {
    pub fn new(number: impl Into<TableNumber>, capacity: u32) -> Self {
        Self {
            number: number.into(),
            capacity,
        }
    }
}

/// Extra fields accompanying a status change.
///
/// Only consulted when the table enters `Occupied`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusExtra {
    /// Size of the party being seated.
    #[serde(default)]
    pub current_party_size: Option<u32>,

    /// Seating time; defaults to now.
    #[serde(default)]
    pub seated_at: Option<DateTime<Utc>>,

    /// Server taking the table.
    #[serde(default)]
    pub server_id: Option<ServerId>,
}

impl StatusExtra {
    /// Extra fields for seating a party of the given size.
    pub fn party(party_size: u32) -> Self {
        Self {
            current_party_size: Some(party_size),
            ..Default::default()
        }
    }

    /// Sets the seating time.
    pub fn seated_at(mut self, at: DateTime<Utc>) -> Self {
        self.seated_at = Some(at);
        self
    }

    /// Sets the server.
    pub fn server(mut self, server_id: impl Into<ServerId>) -> Self {
        self.server_id = Some(server_id.into());
        self
    }
}
