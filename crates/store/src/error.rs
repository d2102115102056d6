use thiserror::Error;

/// Errors that can occur when interacting with a store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record with the given id exists in the collection.
    #[error("{record_type} not found: {id}")]
    NotFound {
        record_type: &'static str,
        id: String,
    },

    /// A journal payload could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
