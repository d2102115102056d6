//! Inputs for order operations.

use common::TableNumber;
use serde::{Deserialize, Serialize};

use super::{Money, OrderItem, OrderStatus};

/// An order taken at a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub table_number: TableNumber,
    pub items: Vec<OrderItem>,

    /// Defaults to the sum of item subtotals.
    #[serde(default)]
    pub total: Option<Money>,

    /// Ignored: new orders always start `Ordered`.
    #[serde(default)]
    pub status: Option<OrderStatus>,
}

impl NewOrder {
    pub fn new(table_number: impl Into<TableNumber>, items: Vec<OrderItem>) -> Self {
        Self {
            table_number: table_number.into(),
            items,
            total: None,
            status: None,
        }
    }
}

/// Corrections to an order. The total is not recomputed from the items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPatch {
    #[serde(default)]
    pub table_number: Option<TableNumber>,
    #[serde(default)]
    pub items: Option<Vec<OrderItem>>,
    #[serde(default)]
    pub total: Option<Money>,
}
