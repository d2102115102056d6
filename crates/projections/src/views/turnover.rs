//! Table turnover read model.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::TableId;
use domain::{TableEvent, TableStatus};
use serde::Serialize;
use store::JournalEntry;
use tokio::sync::RwLock;

use crate::Result;
use crate::projection::{Projection, ProjectionPosition};
use crate::read_model::ReadModel;

/// Completed seatings of one table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TableTurnover {
    pub turns: u32,
    pub occupied_minutes: f64,
}

impl TableTurnover {
    /// Average minutes a party held the table.
    pub fn average_minutes(&self) -> Option<f64> {
        (self.turns > 0).then(|| self.occupied_minutes / f64::from(self.turns))
    }
}

#[derive(Default)]
struct TurnoverState {
    seated: HashMap<TableId, DateTime<Utc>>,
    tables: HashMap<TableId, TableTurnover>,
}

/// Read model view measuring how long parties occupy tables.
///
/// A turn starts when a table becomes occupied and ends when it leaves
/// `Occupied`. Tables already occupied before the journal starts are not
/// counted until their next seating.
#[derive(Clone, Default)]
pub struct TurnoverView {
    state: Arc<RwLock<TurnoverState>>,
    position: Arc<RwLock<ProjectionPosition>>,
}

impl TurnoverView {
    /// Creates an empty turnover view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the turnover of one table.
    pub async fn for_table(&self, table_id: TableId) -> TableTurnover {
        self.state
            .read()
            .await
            .tables
            .get(&table_id)
            .copied()
            .unwrap_or_default()
    }

    /// Returns the number of completed turns across all tables.
    pub async fn completed_turns(&self) -> u32 {
        self.state.read().await.tables.values().map(|t| t.turns).sum()
    }

    /// Average minutes per completed turn across all tables.
    pub async fn average_minutes(&self) -> Option<f64> {
        let state = self.state.read().await;
        let total = state
            .tables
            .values()
            .fold(TableTurnover::default(), |acc, t| TableTurnover {
                turns: acc.turns + t.turns,
                occupied_minutes: acc.occupied_minutes + t.occupied_minutes,
            });
        total.average_minutes()
    }
}

#[async_trait]
impl Projection for TurnoverView {
    fn name(&self) -> &'static str {
        "TurnoverView"
    }

    async fn handle(&self, entry: &JournalEntry) -> Result<()> {
        if entry.record_type == "Table"
            && let TableEvent::TableStatusChanged(data) = entry.decode::<TableEvent>()?
        {
            let table_id = TableId::new(entry.record_id);
            let mut state = self.state.write().await;

            if data.to == TableStatus::Occupied {
                state
                    .seated
                    .insert(table_id, data.seated_at.unwrap_or(data.changed_at));
            } else if data.from == TableStatus::Occupied
                && let Some(seated_at) = state.seated.remove(&table_id)
            {
                let minutes = (data.changed_at - seated_at).num_seconds().max(0) as f64 / 60.0;
                let turnover = state.tables.entry(table_id).or_default();
                turnover.turns += 1;
                turnover.occupied_minutes += minutes;
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
        *self.state.write().await = TurnoverState::default();
        *self.position.write().await = ProjectionPosition::zero();
        Ok(())
    }
}

impl ReadModel for TurnoverView {
    fn name(&self) -> &'static str {
        "TurnoverView"
    }

    fn count(&self) -> usize {
        self.state.try_read().map(|s| s.tables.len()).unwrap_or(0)
    }
}
