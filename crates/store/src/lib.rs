//! In-memory storage for the front-of-house services.
//!
//! - [`InMemoryCollection`] holds one kind of record, keyed by an integer id
//!   and kept in insertion order.
//! - [`Journal`] is an append-only log of everything the services changed.
//! - [`SimulatedLatency`] delays each store operation to mimic a remote backend.

pub mod collection;
pub mod error;
pub mod journal;
pub mod latency;
pub mod query;
pub mod record;

pub use collection::InMemoryCollection;
pub use error::{Result, StoreError};
pub use journal::{EntryId, Journal, JournalEntry, JournalStream, Sequence};
pub use latency::SimulatedLatency;
pub use query::JournalQuery;
pub use record::Record;
