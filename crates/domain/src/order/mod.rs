//! Orders and the preparation pipeline.

mod aggregate;
mod commands;
mod events;
mod state;
mod tracker;
mod value_objects;

pub use aggregate::Order;
pub use commands::{NewOrder, OrderPatch};
pub use events::{
    OrderCorrectedData, OrderEvent, OrderPlacedData, OrderRemovedData, OrderStatusAdvancedData,
};
pub use state::OrderStatus;
pub use tracker::OrderTracker;
pub use value_objects::{MAX_PRICE, MAX_QUANTITY, MAX_TOTAL, Money, OrderItem};
