//! Read model trait for query-side views.

/// A read model answering queries from data folded out of the journal.
pub trait ReadModel: Send + Sync {
    /// Returns the name of this read model.
    fn name(&self) -> &'static str;

    /// Returns the number of entries held, or 0 while a writer holds the lock.
    fn count(&self) -> usize;
}
