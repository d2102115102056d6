//! Initial floor plan, bookings and orders loaded at startup.
//!
//! Times in the dataset are relative to the moment it is applied, so a
//! freshly started service always shows "tonight".

use chrono::{DateTime, Duration, Utc};
use common::{OrderId, ReservationId, ServerId, TableId, TableNumber};
use serde::{Deserialize, Serialize};
use store::Record;

use crate::aggregate::Entity;
use crate::error::{DomainError, Result};
use crate::order::{Money, NewOrder, Order, OrderItem, OrderStatus};
use crate::reservation::{NewReservation, Reservation, ReservationStatus};
use crate::settings::OperationalSettings;
use crate::table::{NewTable, StatusExtra, Table, TableStatus};

/// The dataset shipped with the crate.
pub const EMBEDDED_SEED: &str = include_str!("../data/seed.json");

/// A seed dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeedData {
    pub tables: Vec<SeedTable>,
    #[serde(default)]
    pub reservations: Vec<SeedReservation>,
    #[serde(default)]
    pub orders: Vec<SeedOrder>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedTable {
    pub number: TableNumber,
    pub capacity: u32,
    #[serde(default)]
    pub status: TableStatus,
    #[serde(default)]
    pub current_party_size: Option<u32>,
    #[serde(default)]
    pub seated_minutes_ago: Option<i64>,
    #[serde(default)]
    pub server_id: Option<ServerId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedReservation {
    pub customer_name: String,
    pub phone: String,
    pub party_size: u32,
    /// Minutes from now; negative for bookings already due.
    pub in_minutes: i64,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: ReservationStatus,
    /// Table of a seated party.
    #[serde(default)]
    pub table_number: Option<TableNumber>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedOrder {
    pub table_number: TableNumber,
    pub minutes_ago: i64,
    #[serde(default)]
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub total: Option<Money>,
}

/// Records built from a dataset, ready to load into the services.
#[derive(Debug, Clone, Default)]
pub struct SeedRecords {
    pub tables: Vec<Table>,
    pub reservations: Vec<Reservation>,
    pub orders: Vec<Order>,
}

impl SeedData {
    /// Parses the dataset shipped with the crate.
    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_SEED)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builds the records, walking each one through its state machine to
    /// reach the status given in the dataset. Ids are assigned from 1 in
    /// dataset order.
    pub fn build(&self, now: DateTime<Utc>, settings: &OperationalSettings) -> Result<SeedRecords> {
        let tables = self
            .tables
            .iter()
            .zip(1..)
            .map(|(seed, id)| seed.build(TableId::new(id), now))
            .collect::<Result<Vec<_>>>()?;

        for (i, table) in tables.iter().enumerate() {
            if tables[..i].iter().any(|t| t.number() == table.number()) {
                return Err(DomainError::InvalidInput(format!(
                    "table number {} appears twice in the seed data",
                    table.number()
                )));
            }
        }

        let reservations = self
            .reservations
            .iter()
            .zip(1..)
            .map(|(seed, id)| seed.build(ReservationId::new(id), &tables, now, settings))
            .collect::<Result<Vec<_>>>()?;

        let orders = self
            .orders
            .iter()
            .zip(1..)
            .map(|(seed, id)| seed.build(OrderId::new(id), &tables, now))
            .collect::<Result<Vec<_>>>()?;

        Ok(SeedRecords {
            tables,
            reservations,
            orders,
        })
    }
}

impl SeedTable {
    fn build(&self, id: TableId, now: DateTime<Utc>) -> Result<Table> {
        let (mut table, events) = Table::register(id, NewTable::new(self.number, self.capacity))?;
        table.apply_events(events);

        let party_size = self.current_party_size.unwrap_or(1);
        let seated_at = now - Duration::minutes(self.seated_minutes_ago.unwrap_or(0));
        let seat = StatusExtra {
            current_party_size: Some(party_size),
            seated_at: Some(seated_at),
            server_id: self.server_id.clone(),
        };

        let path: &[TableStatus] = match self.status {
            TableStatus::Available => &[],
            TableStatus::Occupied => &[TableStatus::Occupied],
            TableStatus::Reserved => &[TableStatus::Reserved],
            TableStatus::Cleaning => &[TableStatus::Occupied, TableStatus::Cleaning],
        };
        for status in path {
            let events = table.set_status(*status, &seat)?;
            table.apply_events(events);
        }

        if self.status == TableStatus::Reserved
            && let Some(server_id) = &self.server_id
        {
            let events = table.assign_server(server_id.clone())?;
            table.apply_events(events);
        }

        Ok(table)
    }
}

impl SeedReservation {
    fn build(
        &self,
        id: ReservationId,
        tables: &[Table],
        now: DateTime<Utc>,
        settings: &OperationalSettings,
    ) -> Result<Reservation> {
        let mut new = NewReservation::new(
            &self.customer_name,
            &self.phone,
            self.party_size,
            now + Duration::minutes(self.in_minutes),
        );
        new.notes = self.notes.clone();
        if self.status == ReservationStatus::Pending {
            new = new.pending();
        }

        let (mut reservation, events) = Reservation::book(id, new, settings)?;
        reservation.apply_events(events);

        let events = match self.status {
            ReservationStatus::Pending | ReservationStatus::Confirmed => vec![],
            ReservationStatus::Cancelled => reservation.cancel()?,
            ReservationStatus::Seated => {
                let number = self.table_number.ok_or_else(|| {
                    DomainError::InvalidInput(format!(
                        "seated reservation for {} has no table",
                        self.customer_name
                    ))
                })?;
                reservation.seat(table_by_number(tables, number)?.id())?
            }
        };
        reservation.apply_events(events);

        Ok(reservation)
    }
}

impl SeedOrder {
    fn build(&self, id: OrderId, tables: &[Table], now: DateTime<Utc>) -> Result<Order> {
        table_by_number(tables, self.table_number)?;

        let mut new = NewOrder::new(self.table_number, self.items.clone());
        new.total = self.total;

        let created_at = now - Duration::minutes(self.minutes_ago);
        let (mut order, events) = Order::place_at(id, new, created_at)?;
        order.apply_events(events);

        while order.status() != self.status {
            let events = order.advance()?;
            order.apply_events(events);
        }

        Ok(order)
    }
}

fn table_by_number(tables: &[Table], number: TableNumber) -> Result<&Table> {
    tables
        .iter()
        .find(|t| t.number() == number)
        .ok_or_else(|| DomainError::not_found(Table::record_type(), number))
}
