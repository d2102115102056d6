//! Seating parties at tables across the table and reservation stores.

mod directory;
mod saga;

pub use directory::TableDirectory;
pub use saga::{SEATING_RECORD_TYPE, SeatingKind, SeatingRun, SeatingSaga, SeatingState};
