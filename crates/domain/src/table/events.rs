//! Table domain events.

use chrono::{DateTime, Utc};
use common::{ServerId, TableNumber};
use serde::{Deserialize, Serialize};

use crate::aggregate::DomainEvent;

use super::TableStatus;

/// Events that can occur on a table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum TableEvent {
    /// Table was added to the floor plan.
    TableRegistered(TableRegisteredData),

    /// Table moved between occupancy states.
    TableStatusChanged(TableStatusChangedData),

    /// A server took over the table.
    ServerAssigned(ServerAssignedData),
}

impl DomainEvent for TableEvent {
    fn event_type(&self) -> &'static str {
        match self {
            TableEvent::TableRegistered(_) => "TableRegistered",
            TableEvent::TableStatusChanged(_) => "TableStatusChanged",
            TableEvent::ServerAssigned(_) => "ServerAssigned",
        }
    }
}

/// Data for TableRegistered event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableRegisteredData {
    /// Display number of the table.
    pub number: TableNumber,

    /// Seats at the table.
    pub capacity: u32,
}

/// Data for TableStatusChanged event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableStatusChangedData {
    /// Status before the change.
    pub from: TableStatus,

    /// Status after the change.
    pub to: TableStatus,

    /// Party seated, when entering occupied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub party_size: Option<u32>,

    /// Seating time, when entering occupied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seated_at: Option<DateTime<Utc>>,

    /// Server assigned together with the change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_id: Option<ServerId>,

    /// When the change happened.
    pub changed_at: DateTime<Utc>,
}

/// Data for ServerAssigned event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerAssignedData {
    /// The server now responsible for the table.
    pub server_id: ServerId,
}

impl TableEvent {
    /// Creates a TableRegistered event.
    pub fn registered(number: TableNumber, capacity: u32) -> Self {
        TableEvent::TableRegistered(TableRegisteredData { number, capacity })
    }

    /// Creates a TableStatusChanged event for a move into a non-occupied state.
    pub fn status_changed(from: TableStatus, to: TableStatus) -> Self {
        TableEvent::TableStatusChanged(TableStatusChangedData {
            from,
            to,
            party_size: None,
            seated_at: None,
            server_id: None,
            changed_at: Utc::now(),
        })
    }

    /// Creates a TableStatusChanged event seating a party.
    pub fn party_seated(
        from: TableStatus,
        party_size: u32,
        seated_at: DateTime<Utc>,
        server_id: Option<ServerId>,
    ) -> Self {
        TableEvent::TableStatusChanged(TableStatusChangedData {
            from,
            to: TableStatus::Occupied,
            party_size: Some(party_size),
            seated_at: Some(seated_at),
            server_id,
            changed_at: Utc::now(),
        })
    }

    /// Creates a ServerAssigned event.
    pub fn server_assigned(server_id: ServerId) -> Self {
        TableEvent::ServerAssigned(ServerAssignedData { server_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let event = TableEvent::party_seated(
            TableStatus::Available,
            4,
            Utc::now(),
            Some(ServerId::new("S1")),
        );
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "TableStatusChanged");
        assert_eq!(json["data"]["from"], "available");
        assert_eq!(json["data"]["to"], "occupied");
        assert_eq!(json["data"]["party_size"], 4);
        assert_eq!(json["data"]["server_id"], "S1");

        let back: TableEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back.event_type(), "TableStatusChanged");
    }

    #[test]
    fn test_plain_status_change_omits_seating_fields() {
        let event = TableEvent::status_changed(TableStatus::Occupied, TableStatus::Cleaning);
        let json = serde_json::to_value(&event).unwrap();

        assert!(json["data"].get("party_size").is_none());
        assert!(json["data"].get("seated_at").is_none());
    }
}
