//! The table surface the seating flows depend on.

use async_trait::async_trait;
use common::TableId;

use crate::error::Result;
use crate::table::{Table, TableRegistry};

/// Table lookups and commands used when seating a party.
#[async_trait]
pub trait TableDirectory: Send + Sync {
    /// Returns the first available table seating at least `min_capacity`.
    async fn find_available(&self, min_capacity: u32) -> Option<Table>;

    /// Occupies the first available table that fits the party.
    ///
    /// Fails with `NoCapacity` when no table fits.
    async fn claim(&self, party_size: u32) -> Result<Table>;

    /// Frees a table claimed by [`claim`](Self::claim).
    async fn release(&self, table_id: TableId) -> Result<Table>;
}

#[async_trait]
impl TableDirectory for TableRegistry {
    async fn find_available(&self, min_capacity: u32) -> Option<Table> {
        TableRegistry::find_available(self, min_capacity).await
    }

    async fn claim(&self, party_size: u32) -> Result<Table> {
        TableRegistry::claim(self, party_size, party_size).await
    }

    async fn release(&self, table_id: TableId) -> Result<Table> {
        TableRegistry::release(self, table_id).await
    }
}
