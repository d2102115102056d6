//! Order domain events.

use chrono::{DateTime, Utc};
use common::TableNumber;
use serde::{Deserialize, Serialize};

use crate::aggregate::DomainEvent;

use super::{Money, OrderItem, OrderStatus};

/// Events that can occur on an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum OrderEvent {
    /// Order was taken at a table.
    OrderPlaced(OrderPlacedData),

    /// Order moved to the next preparation stage.
    OrderStatusAdvanced(OrderStatusAdvancedData),

    /// Order details were corrected.
    OrderCorrected(OrderCorrectedData),

    /// Order was deleted.
    OrderRemoved(OrderRemovedData),
}

impl DomainEvent for OrderEvent {
    fn event_type(&self) -> &'static str {
        match self {
            OrderEvent::OrderPlaced(_) => "OrderPlaced",
            OrderEvent::OrderStatusAdvanced(_) => "OrderStatusAdvanced",
            OrderEvent::OrderCorrected(_) => "OrderCorrected",
            OrderEvent::OrderRemoved(_) => "OrderRemoved",
        }
    }
}

/// Data for OrderPlaced event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPlacedData {
    pub table_number: TableNumber,
    pub items: Vec<OrderItem>,
    pub total: Money,
    pub created_at: DateTime<Utc>,
}

/// Data for OrderStatusAdvanced event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusAdvancedData {
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub advanced_at: DateTime<Utc>,
}

/// Data for OrderCorrected event. Only changed fields are set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderCorrectedData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_number: Option<TableNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<OrderItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Money>,
}

impl OrderCorrectedData {
    fn is_empty(&self) -> bool {
        self.table_number.is_none() && self.items.is_none() && self.total.is_none()
    }
}

/// Data for OrderRemoved event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRemovedData {
    /// Stage the order was in when deleted.
    pub status: OrderStatus,
    pub removed_at: DateTime<Utc>,
}

impl OrderEvent {
    /// Creates an OrderStatusAdvanced event.
    pub fn status_advanced(from: OrderStatus, to: OrderStatus) -> Self {
        OrderEvent::OrderStatusAdvanced(OrderStatusAdvancedData {
            from,
            to,
            advanced_at: Utc::now(),
        })
    }

    /// Creates an OrderCorrected event, or nothing if no field changed.
    pub fn corrected(data: OrderCorrectedData) -> Option<Self> {
        (!data.is_empty()).then_some(OrderEvent::OrderCorrected(data))
    }

    /// Creates an OrderRemoved event.
    pub fn removed(status: OrderStatus) -> Self {
        OrderEvent::OrderRemoved(OrderRemovedData {
            status,
            removed_at: Utc::now(),
        })
    }
}
