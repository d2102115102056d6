//! Shared identifier types.
//!
//! Every record kind gets its own identifier type so a table id can never be
//! passed where a reservation id is expected.

pub mod types;

pub use types::{OrderId, RecordId, ReservationId, ServerId, TableId, TableNumber};
