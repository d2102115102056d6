//! Recent activity read model: the newest reservation, order and seating
//! changes, newest first.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{
    OrderEvent, ReservationEvent, ReservationStatus, SEATING_RECORD_TYPE, SeatingRun, SeatingState,
};
use serde::Serialize;
use store::{JournalEntry, Sequence};
use tokio::sync::RwLock;

use crate::Result;
use crate::projection::{Projection, ProjectionPosition};
use crate::read_model::ReadModel;

/// Number of items kept when no capacity is given.
pub const DEFAULT_ACTIVITY_CAPACITY: usize = 50;

/// One line of the activity feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityItem {
    pub sequence: Sequence,
    pub timestamp: DateTime<Utc>,
    pub record_type: String,
    pub record_id: u32,
    pub event_type: String,
    pub summary: String,
}

/// Read model view over the most recent guest-facing changes.
///
/// Table entries are skipped; they show up through the seating runs that
/// caused them. Only the newest `capacity` items are kept.
#[derive(Clone)]
pub struct RecentActivityView {
    items: Arc<RwLock<VecDeque<ActivityItem>>>,
    position: Arc<RwLock<ProjectionPosition>>,
    capacity: usize,
}

impl RecentActivityView {
    /// Creates an empty view keeping at most `capacity` items.
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Arc::new(RwLock::new(VecDeque::with_capacity(capacity))),
            position: Arc::new(RwLock::new(ProjectionPosition::zero())),
            capacity,
        }
    }

    /// Returns up to `limit` items, newest first.
    pub async fn recent(&self, limit: usize) -> Vec<ActivityItem> {
        self.items
            .read()
            .await
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect()
    }

    /// Returns the feed entries for one record, newest first.
    pub async fn for_record(&self, record_type: &str, record_id: u32) -> Vec<ActivityItem> {
        self.items
            .read()
            .await
            .iter()
            .rev()
            .filter(|i| i.record_type == record_type && i.record_id == record_id)
            .cloned()
            .collect()
    }
}

impl Default for RecentActivityView {
    fn default() -> Self {
        Self::new(DEFAULT_ACTIVITY_CAPACITY)
    }
}

fn summarize(entry: &JournalEntry) -> Result<Option<String>> {
    let id = entry.record_id;
    let summary = match entry.record_type.as_str() {
        "Reservation" => match entry.decode::<ReservationEvent>()? {
            ReservationEvent::ReservationBooked(data) => match (data.status, data.table_id) {
                (ReservationStatus::Seated, Some(table_id)) => format!(
                    "{} (party of {}) seated at table {}",
                    data.customer_name, data.party_size, table_id
                ),
                _ => format!(
                    "{} booked a table for {} ({})",
                    data.customer_name, data.party_size, data.status
                ),
            },
            ReservationEvent::ReservationUpdated(_) => format!("Reservation {id} updated"),
            ReservationEvent::ReservationConfirmed(_) => format!("Reservation {id} confirmed"),
            ReservationEvent::ReservationSeated(data) => {
                format!("Reservation {id} seated at table {}", data.table_id)
            }
            ReservationEvent::ReservationCancelled(_) => format!("Reservation {id} cancelled"),
        },
        "Order" => match entry.decode::<OrderEvent>()? {
            OrderEvent::OrderPlaced(data) => format!(
                "Order {id} placed for table {} ({})",
                data.table_number, data.total
            ),
            OrderEvent::OrderStatusAdvanced(data) => format!("Order {id} is {}", data.to),
            OrderEvent::OrderCorrected(_) => format!("Order {id} corrected"),
            OrderEvent::OrderRemoved(_) => format!("Order {id} removed"),
        },
        record_type if record_type == SEATING_RECORD_TYPE => {
            let run = entry.decode::<SeatingRun>()?;
            let reason = run.reason.as_deref().unwrap_or("unknown");
            match (run.state, run.table_id) {
                (SeatingState::Started, _) => {
                    format!("Seating {} for party of {}", run.kind.as_str(), run.party_size)
                }
                (SeatingState::TableClaimed, Some(table_id)) => {
                    format!("Table {table_id} claimed for party of {}", run.party_size)
                }
                (SeatingState::Completed, Some(table_id)) => {
                    format!("Party of {} seated at table {table_id}", run.party_size)
                }
                (SeatingState::Compensated, _) => format!("Seating rolled back: {reason}"),
                (SeatingState::Failed, _) => format!("Seating failed: {reason}"),
                (state, None) => format!("Seating {state}"),
            }
        }
        _ => return Ok(None),
    };
    Ok(Some(summary))
}

#[async_trait]
impl Projection for RecentActivityView {
    fn name(&self) -> &'static str {
        "RecentActivityView"
    }

    async fn handle(&self, entry: &JournalEntry) -> Result<()> {
        if let Some(summary) = summarize(entry)? {
            let mut items = self.items.write().await;
            if items.len() == self.capacity {
                items.pop_front();
            }
            if self.capacity > 0 {
                items.push_back(ActivityItem {
                    sequence: entry.sequence,
                    timestamp: entry.timestamp,
                    record_type: entry.record_type.clone(),
                    record_id: entry.record_id,
                    event_type: entry.event_type.clone(),
                    summary,
                });
            }
        }

        let mut pos = self.position.write().await;
        *pos = pos.advance(entry.sequence);

        Ok(())
    }

    async fn position(&self) -> ProjectionPosition {
        *self.position.read().await
    }

    async fn reset(&self) -> Result<()> {
        self.items.write().await.clear();
        *self.position.write().await = ProjectionPosition::zero();
        Ok(())
    }
}

impl ReadModel for RecentActivityView {
    fn name(&self) -> &'static str {
        "RecentActivityView"
    }

    fn count(&self) -> usize {
        self.items.try_read().map(|i| i.len()).unwrap_or(0)
    }
}
