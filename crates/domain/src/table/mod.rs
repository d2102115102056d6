//! Tables and their occupancy state machine.

mod aggregate;
mod commands;
mod events;
mod registry;
mod state;

pub use aggregate::Table;
pub use commands::{NewTable, StatusExtra};
pub use events::{ServerAssignedData, TableEvent, TableRegisteredData, TableStatusChangedData};
pub use registry::TableRegistry;
pub use state::TableStatus;
