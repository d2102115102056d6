//! Table registry service.

use common::{ServerId, TableId, TableNumber};
use store::{InMemoryCollection, Journal, JournalEntry, SimulatedLatency};

use crate::aggregate::commit;
use crate::error::{DomainError, Result};

use super::{NewTable, StatusExtra, Table, TableStatus};

/// Service owning the tables and their occupancy state machine.
///
/// Clones share the same tables and journal.
#[derive(Clone, Default)]
pub struct TableRegistry {
    tables: InMemoryCollection<Table>,
    journal: Journal,
}

impl TableRegistry {
    /// Creates an empty registry writing to the given journal.
    pub fn new(journal: Journal, latency: SimulatedLatency) -> Self {
        Self {
            tables: InMemoryCollection::new(latency),
            journal,
        }
    }

    /// Returns the journal this registry writes to.
    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub(crate) async fn seed(&self, tables: Vec<Table>) {
        self.tables.seed(tables).await;
    }

    /// Returns every table in floor order.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Vec<Table> {
        self.tables.all().await
    }

    /// Returns the number of tables, without simulated latency.
    pub async fn count(&self) -> usize {
        self.tables.len().await
    }

    #[tracing::instrument(skip(self))]
    pub async fn find_by_id(&self, id: TableId) -> Option<Table> {
        self.tables.get(id).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn find_by_number(&self, number: TableNumber) -> Option<Table> {
        self.tables.find(|t| t.number() == number).await
    }

    /// Returns the first available table, in floor order, seating at least
    /// `min_capacity`.
    #[tracing::instrument(skip(self))]
    pub async fn find_available(&self, min_capacity: u32) -> Option<Table> {
        self.tables.find(|t| t.fits(min_capacity)).await
    }

    /// Adds a table to the floor plan.
    #[tracing::instrument(skip(self))]
    pub async fn create(&self, new: NewTable) -> Result<Table> {
        let table = self
            .tables
            .insert_journaled(&self.journal, |id, existing| {
                if existing.iter().any(|t| t.number() == new.number) {
                    return Err(DomainError::InvalidInput(format!(
                        "table number {} already exists",
                        new.number
                    )));
                }

                let (mut table, events) = Table::register(id, new)?;
                let entries = commit(&mut table, events)?;
                Ok((table.clone(), table, entries))
            })
            .await?;

        tracing::info!(table_id = %table.id(), number = %table.number(), "table registered");
        Ok(table)
    }

    /// Moves a table to a new status.
    #[tracing::instrument(skip(self))]
    pub async fn set_status(
        &self,
        id: TableId,
        status: TableStatus,
        extra: StatusExtra,
    ) -> Result<Table> {
        self.change(id, |table| table.set_status(status, &extra))
            .await
    }

    /// Moves a table to a new status only if it is still in `expected`.
    #[tracing::instrument(skip(self))]
    pub async fn set_status_if(
        &self,
        id: TableId,
        expected: TableStatus,
        status: TableStatus,
        extra: StatusExtra,
    ) -> Result<Table> {
        self.change(id, |table| {
            if table.status() != expected {
                return Err(DomainError::StaleStatus {
                    table_id: id,
                    expected,
                    actual: table.status(),
                });
            }
            table.set_status(status, &extra)
        })
        .await
    }

    /// Finds an available table and seats the party at it in one step.
    ///
    /// Selection and the move to `Occupied` happen under the same lock, so
    /// two claims never get the same table.
    #[tracing::instrument(skip(self))]
    pub async fn claim(&self, min_capacity: u32, party_size: u32) -> Result<Table> {
        let claimed = self
            .tables
            .update_first_journaled(
                |t| t.fits(min_capacity),
                &self.journal,
                |table| {
                    let events =
                        table.set_status(TableStatus::Occupied, &StatusExtra::party(party_size))?;
                    let entries = commit(table, events)?;
                    log_change(table, &entries);
                    Ok::<_, DomainError>((table.clone(), entries))
                },
            )
            .await?;

        let Some(table) = claimed else {
            tracing::warn!(party_size, min_capacity, "no table available");
            metrics::counter!("tables_claim_failed_total").increment(1);
            return Err(DomainError::NoCapacity { party_size });
        };

        Ok(table)
    }

    /// Frees an occupied table again.
    #[tracing::instrument(skip(self))]
    pub async fn release(&self, id: TableId) -> Result<Table> {
        self.set_status_if(
            id,
            TableStatus::Occupied,
            TableStatus::Available,
            StatusExtra::default(),
        )
        .await
    }

    /// Hands an occupied or reserved table to a server.
    #[tracing::instrument(skip(self))]
    pub async fn assign_server(&self, id: TableId, server_id: ServerId) -> Result<Table> {
        self.change(id, |table| table.assign_server(server_id)).await
    }

    async fn change<F>(&self, id: TableId, command: F) -> Result<Table>
    where
        F: FnOnce(&Table) -> Result<Vec<super::TableEvent>>,
    {
        self.tables
            .update_journaled(id, &self.journal, |table| {
                let events = command(table)?;
                let entries = commit(table, events)?;
                log_change(table, &entries);
                Ok::<_, DomainError>((table.clone(), entries))
            })
            .await
    }
}

fn log_change(table: &Table, entries: &[JournalEntry]) {
    if entries.is_empty() {
        return;
    }

    tracing::info!(
        table_id = %table.id(),
        status = %table.status(),
        party_size = table.current_party_size(),
        "table updated"
    );
    metrics::counter!("table_status_changes_total", "status" => table.status().as_str())
        .increment(1);
}
