//! Table entity implementation.

use chrono::{DateTime, Utc};
use common::{ServerId, TableId, TableNumber};
use serde::Serialize;
use store::Record;

use crate::aggregate::Entity;
use crate::error::{DomainError, Result};

use super::{NewTable, StatusExtra, TableEvent, TableStatus, events::TableStatusChangedData};

/// A table on the floor plan.
///
/// Invariant: the table is `Occupied` exactly when a party is seated, i.e.
/// `current_party_size > 0` and `seated_at` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    id: TableId,
    number: TableNumber,
    capacity: u32,
    status: TableStatus,
    current_party_size: u32,
    seated_at: Option<DateTime<Utc>>,
    server_id: Option<ServerId>,
}

impl Record for Table {
    type Id = TableId;

    fn record_type() -> &'static str {
        "Table"
    }

    fn id(&self) -> TableId {
        self.id
    }
}

impl Entity for Table {
    type Event = TableEvent;

    fn apply(&mut self, event: Self::Event) {
        match event {
            TableEvent::TableRegistered(data) => {
                self.number = data.number;
                self.capacity = data.capacity;
                self.status = TableStatus::Available;
            }
            TableEvent::TableStatusChanged(data) => self.apply_status_changed(data),
            TableEvent::ServerAssigned(data) => {
                self.server_id = Some(data.server_id);
            }
        }
    }
}

// Query methods
impl Table {
    pub fn id(&self) -> TableId {
        self.id
    }

    pub fn number(&self) -> TableNumber {
        self.number
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn status(&self) -> TableStatus {
        self.status
    }

    /// Size of the seated party, 0 when nobody is seated.
    pub fn current_party_size(&self) -> u32 {
        self.current_party_size
    }

    pub fn seated_at(&self) -> Option<DateTime<Utc>> {
        self.seated_at
    }

    pub fn server_id(&self) -> Option<&ServerId> {
        self.server_id.as_ref()
    }

    /// Returns true if the table is free and seats at least `min_capacity`.
    pub fn fits(&self, min_capacity: u32) -> bool {
        self.status == TableStatus::Available && self.capacity >= min_capacity
    }
}

// Command methods (return events)
impl Table {
    /// Builds a new table with the given id.
    pub fn register(id: TableId, new: NewTable) -> Result<(Table, Vec<TableEvent>)> {
        if new.capacity == 0 {
            return Err(DomainError::InvalidInput(
                "capacity must be at least 1".to_string(),
            ));
        }

        let table = Table {
            id,
            number: new.number,
            capacity: 0,
            status: TableStatus::Available,
            current_party_size: 0,
            seated_at: None,
            server_id: None,
        };
        Ok((table, vec![TableEvent::registered(new.number, new.capacity)]))
    }

    /// Moves the table to another status.
    ///
    /// Entering `Occupied` requires a party size between 1 and the capacity.
    pub fn set_status(&self, to: TableStatus, extra: &StatusExtra) -> Result<Vec<TableEvent>> {
        if !self.status.can_transition_to(to) {
            return Err(DomainError::invalid_transition(
                Self::record_type(),
                self.status,
                to,
            ));
        }

        if to != TableStatus::Occupied {
            return Ok(vec![TableEvent::status_changed(self.status, to)]);
        }

        let party_size = extra.current_party_size.unwrap_or(0);
        if party_size == 0 {
            return Err(DomainError::InvalidInput(
                "party size is required to seat a table".to_string(),
            ));
        }
        if party_size > self.capacity {
            return Err(DomainError::InvalidInput(format!(
                "party of {party_size} exceeds table {} capacity of {}",
                self.number, self.capacity
            )));
        }

        Ok(vec![TableEvent::party_seated(
            self.status,
            party_size,
            extra.seated_at.unwrap_or_else(Utc::now),
            extra.server_id.clone(),
        )])
    }

    /// Hands the table to a server.
    pub fn assign_server(&self, server_id: ServerId) -> Result<Vec<TableEvent>> {
        if !self.status.can_assign_server() {
            return Err(DomainError::InvalidInput(format!(
                "cannot assign a server to a {} table",
                self.status
            )));
        }
        if self.server_id.as_ref() == Some(&server_id) {
            return Ok(vec![]);
        }

        Ok(vec![TableEvent::server_assigned(server_id)])
    }
}

// Apply event helpers
impl Table {
    fn apply_status_changed(&mut self, data: TableStatusChangedData) {
        self.status = data.to;

        match data.to {
            TableStatus::Occupied => {
                self.current_party_size = data.party_size.unwrap_or(0);
                self.seated_at = data.seated_at;
                if data.server_id.is_some() {
                    self.server_id = data.server_id;
                }
            }
            TableStatus::Available => {
                self.current_party_size = 0;
                self.seated_at = None;
                self.server_id = None;
            }
            TableStatus::Reserved | TableStatus::Cleaning => {
                self.current_party_size = 0;
                self.seated_at = None;
            }
        }
    }
}
