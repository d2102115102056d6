//! Order tracker service.

use common::{OrderId, TableNumber};
use store::{InMemoryCollection, Journal, JournalEntry, Record, SimulatedLatency};

use crate::aggregate::{commit, journal_entries};
use crate::error::{DomainError, Result};
use crate::table::{Table, TableRegistry};

use super::{NewOrder, Order, OrderEvent, OrderPatch, OrderStatus};

/// Service owning orders and their preparation pipeline.
///
/// Table numbers are checked against the registry when an order is placed
/// or moved. Clones share the same orders.
#[derive(Clone)]
pub struct OrderTracker {
    orders: InMemoryCollection<Order>,
    tables: TableRegistry,
    journal: Journal,
}

impl OrderTracker {
    /// Creates an empty tracker writing to the registry's journal.
    pub fn new(tables: TableRegistry, latency: SimulatedLatency) -> Self {
        let journal = tables.journal().clone();
        Self {
            orders: InMemoryCollection::new(latency),
            tables,
            journal,
        }
    }

    /// Returns the journal this tracker writes to.
    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub(crate) async fn seed(&self, orders: Vec<Order>) {
        self.orders.seed(orders).await;
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_all(&self) -> Vec<Order> {
        self.orders.all().await
    }

    /// Returns the orders of one table, oldest first.
    #[tracing::instrument(skip(self))]
    pub async fn list_by_table(&self, table_number: TableNumber) -> Vec<Order> {
        self.orders
            .filter(|o| o.table_number() == table_number)
            .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn find_by_id(&self, id: OrderId) -> Option<Order> {
        self.orders.get(id).await
    }

    /// Places a new order. It always starts `Ordered`.
    #[tracing::instrument(skip(self))]
    pub async fn create(&self, new: NewOrder) -> Result<Order> {
        self.require_table(new.table_number).await?;

        let order = self
            .orders
            .insert_journaled(&self.journal, |id, _| {
                let (mut order, events) = Order::place(id, new)?;
                let entries = commit(&mut order, events)?;
                log_change(&order, &entries);
                Ok::<_, DomainError>((order.clone(), order, entries))
            })
            .await?;

        metrics::counter!("orders_created_total").increment(1);
        Ok(order)
    }

    /// Moves an order to `target`, which must be its immediate next stage.
    #[tracing::instrument(skip(self))]
    pub async fn advance_status(&self, id: OrderId, target: OrderStatus) -> Result<Order> {
        self.change(id, |order| order.advance_to(target)).await
    }

    /// Moves an order to its next stage.
    #[tracing::instrument(skip(self))]
    pub async fn advance(&self, id: OrderId) -> Result<Order> {
        self.change(id, Order::advance).await
    }

    /// Corrects an order. The total is kept as given, not recomputed.
    #[tracing::instrument(skip(self))]
    pub async fn update(&self, id: OrderId, patch: OrderPatch) -> Result<Order> {
        if let Some(table_number) = patch.table_number {
            self.require_table(table_number).await?;
        }

        self.change(id, |order| order.correct(patch)).await
    }

    /// Deletes an order. Returns false if there was nothing to delete.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: OrderId) -> Result<bool> {
        let removed = self
            .orders
            .remove_journaled(id, &self.journal, |order| {
                journal_entries::<Order>(id, &order.remove())
            })
            .await?;

        let Some(order) = removed else {
            return Ok(false);
        };

        tracing::info!(order_id = %id, status = %order.status(), "order deleted");
        Ok(true)
    }

    async fn require_table(&self, table_number: TableNumber) -> Result<Table> {
        self.tables
            .find_by_number(table_number)
            .await
            .ok_or_else(|| DomainError::not_found(Table::record_type(), table_number))
    }

    async fn change<F>(&self, id: OrderId, command: F) -> Result<Order>
    where
        F: FnOnce(&Order) -> Result<Vec<OrderEvent>>,
    {
        self.orders
            .update_journaled(id, &self.journal, |order| {
                let events = command(order)?;
                let entries = commit(order, events)?;
                log_change(order, &entries);
                Ok::<_, DomainError>((order.clone(), entries))
            })
            .await
    }
}

fn log_change(order: &Order, entries: &[JournalEntry]) {
    if entries.is_empty() {
        return;
    }

    tracing::info!(
        order_id = %order.id(),
        table_number = %order.table_number(),
        status = %order.status(),
        "order updated"
    );
    metrics::counter!("order_status_total", "status" => order.status().as_str()).increment(1);
}
