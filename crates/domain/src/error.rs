//! Domain error types.

use common::TableId;
use store::StoreError;
use thiserror::Error;

use crate::table::TableStatus;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The referenced record does not exist in its owning collection.
    #[error("{record} not found: {id}")]
    NotFound { record: &'static str, id: String },

    /// No available table can hold the party.
    #[error("No available table for a party of {party_size}")]
    NoCapacity { party_size: u32 },

    /// A required field is missing or out of range.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The requested status change is not in the record's transition table.
    #[error("Invalid {record} transition: {from} -> {to}")]
    InvalidTransition {
        record: &'static str,
        from: String,
        to: String,
    },

    /// A guarded table update found a different status than expected.
    #[error("Table {table_id} is {actual}, expected {expected}")]
    StaleStatus {
        table_id: TableId,
        expected: TableStatus,
        actual: TableStatus,
    },

    /// The record changed underneath an operation that depended on it.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// An event could not be serialized into the journal.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DomainError {
    pub(crate) fn not_found(record: &'static str, id: impl std::fmt::Display) -> Self {
        DomainError::NotFound {
            record,
            id: id.to_string(),
        }
    }

    pub(crate) fn invalid_transition(
        record: &'static str,
        from: impl std::fmt::Display,
        to: impl std::fmt::Display,
    ) -> Self {
        DomainError::InvalidTransition {
            record,
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

impl From<StoreError> for DomainError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { record_type, id } => DomainError::NotFound {
                record: record_type,
                id,
            },
            StoreError::Serialization(e) => DomainError::Serialization(e),
        }
    }
}

/// Convenience type alias for domain results.
pub type Result<T> = std::result::Result<T, DomainError>;
