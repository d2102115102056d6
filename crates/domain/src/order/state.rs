//! Order preparation pipeline.

use serde::{Deserialize, Serialize};

/// The preparation stage of an order.
///
/// State transitions:
/// ```text
/// Ordered ──► Preparing ──► Ready ──► Served ──► Completed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Taken at the table, not yet started.
    #[default]
    Ordered,

    /// Being cooked.
    Preparing,

    /// Waiting at the pass.
    Ready,

    /// Delivered to the table.
    Served,

    /// Paid and closed (terminal state).
    Completed,
}

impl OrderStatus {
    /// All statuses, in pipeline order.
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Ordered,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Served,
        OrderStatus::Completed,
    ];

    /// Returns the next stage, if any.
    pub fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Ordered => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::Ready),
            OrderStatus::Ready => Some(OrderStatus::Served),
            OrderStatus::Served => Some(OrderStatus::Completed),
            OrderStatus::Completed => None,
        }
    }

    /// Returns true if `to` is the immediate next stage.
    pub fn can_advance_to(&self, to: OrderStatus) -> bool {
        self.next() == Some(to)
    }

    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed)
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Ordered => "ordered",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Served => "served",
            OrderStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
