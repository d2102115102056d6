use crate::{JournalEntry, Sequence};

/// Filter over journal entries.
///
/// Every field that is set must match; unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct JournalQuery {
    /// Filter by record type.
    pub record_type: Option<String>,

    /// Filter by raw record id (only meaningful together with a record type).
    pub record_id: Option<u32>,

    /// Filter by event types (any of these types).
    pub event_types: Option<Vec<String>>,

    /// Only entries appended after this sequence number.
    pub after: Option<Sequence>,

    /// Return newest entries first.
    pub newest_first: bool,

    /// Maximum number of entries to return.
    pub limit: Option<usize>,
}

impl JournalQuery {
    /// Creates a new empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a query for one record.
    pub fn for_record(record_type: impl Into<String>, record_id: u32) -> Self {
        Self {
            record_type: Some(record_type.into()),
            record_id: Some(record_id),
            ..Default::default()
        }
    }

    /// Filters by record type.
    pub fn record_type(mut self, record_type: impl Into<String>) -> Self {
        self.record_type = Some(record_type.into());
        self
    }

    /// Filters by event type.
    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_types = Some(vec![event_type.into()]);
        self
    }

    /// Only entries appended after the given sequence number.
    pub fn after(mut self, sequence: Sequence) -> Self {
        self.after = Some(sequence);
        self
    }

    /// Returns newest entries first.
    pub fn newest_first(mut self) -> Self {
        self.newest_first = true;
        self
    }

    /// Limits the number of results.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns true if the entry passes every filter of this query.
    pub fn matches(&self, entry: &JournalEntry) -> bool {
        if let Some(ref record_type) = self.record_type
            && &entry.record_type != record_type
        {
            return false;
        }
        if let Some(record_id) = self.record_id
            && entry.record_id != record_id
        {
            return false;
        }
        if let Some(ref types) = self.event_types
            && !types.contains(&entry.event_type)
        {
            return false;
        }
        if let Some(after) = self.after
            && entry.sequence <= after
        {
            return false;
        }
        true
    }
}
