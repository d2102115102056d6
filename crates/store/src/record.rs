use common::RecordId;

/// A record owned by exactly one [`InMemoryCollection`](crate::InMemoryCollection).
pub trait Record: Clone + Send + Sync + 'static {
    /// The identifier type of this record kind.
    type Id: RecordId;

    /// Returns the record type name, used in errors and journal entries.
    fn record_type() -> &'static str;

    /// Returns the record's identifier.
    fn id(&self) -> Self::Id;
}
