use std::pin::Pin;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures_core::Stream;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::JournalQuery;

/// Unique identifier for a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Creates a new random entry ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of an entry in the journal.
///
/// The first appended entry has sequence 1; 0 means "nothing yet".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Sequence(u64);

impl Sequence {
    /// Creates a sequence number from a raw value.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// The position before the first entry.
    pub fn start() -> Self {
        Self(0)
    }

    /// Returns the next sequence number.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the raw value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A recorded change to one record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier for this entry.
    pub entry_id: EntryId,

    /// Position in the journal, assigned on append.
    pub sequence: Sequence,

    /// The kind of record that changed (e.g. "Table", "Order").
    pub record_type: String,

    /// Raw id of the record that changed.
    pub record_id: u32,

    /// The type of the event (e.g. "TableStatusChanged").
    pub event_type: String,

    /// When the change happened.
    pub timestamp: DateTime<Utc>,

    /// The event payload as JSON.
    pub payload: serde_json::Value,
}

impl JournalEntry {
    /// Creates an entry stamped with the current time.
    pub fn new(
        record_type: impl Into<String>,
        record_id: u32,
        event_type: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            entry_id: EntryId::new(),
            sequence: Sequence::start(),
            record_type: record_type.into(),
            record_id,
            event_type: event_type.into(),
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Creates an entry from a serializable event.
    pub fn from_event<T: Serialize>(
        record_type: impl Into<String>,
        record_id: u32,
        event_type: impl Into<String>,
        event: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::new(
            record_type,
            record_id,
            event_type,
            serde_json::to_value(event)?,
        ))
    }

    /// Overrides the timestamp.
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Deserializes the payload into an event type.
    pub fn decode<T: for<'de> Deserialize<'de>>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }
}

/// A stream of journal entries.
pub type JournalStream = Pin<Box<dyn Stream<Item = JournalEntry> + Send>>;

/// Append-only, in-memory log of changes made by the services.
///
/// Clones share the same log.
#[derive(Clone, Default)]
pub struct Journal {
    entries: Arc<RwLock<Vec<JournalEntry>>>,
}

impl Journal {
    /// Creates an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends entries in order, assigning sequence numbers.
    ///
    /// Returns the sequence of the last appended entry.
    pub async fn append(&self, entries: Vec<JournalEntry>) -> Sequence {
        let mut log = self.entries.write().await;
        let mut sequence = log.last().map(|e| e.sequence).unwrap_or_default();

        for mut entry in entries {
            sequence = sequence.next();
            entry.sequence = sequence;
            tracing::debug!(
                record_type = %entry.record_type,
                record_id = entry.record_id,
                event_type = %entry.event_type,
                %sequence,
                "journal entry appended"
            );
            metrics::counter!("journal_entries_appended_total").increment(1);
            log.push(entry);
        }

        sequence
    }

    /// Returns the number of entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true if nothing has been appended.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Returns the sequence of the newest entry.
    pub async fn last_sequence(&self) -> Sequence {
        self.entries
            .read()
            .await
            .last()
            .map(|e| e.sequence)
            .unwrap_or_default()
    }

    /// Returns every entry, oldest first.
    pub async fn entries(&self) -> Vec<JournalEntry> {
        self.entries.read().await.clone()
    }

    /// Returns the entries matching the query.
    pub async fn query(&self, query: &JournalQuery) -> Vec<JournalEntry> {
        let log = self.entries.read().await;
        let matching = log.iter().filter(|e| query.matches(e)).cloned();

        let limit = query.limit.unwrap_or(usize::MAX);
        if query.newest_first {
            let mut newest: Vec<_> = matching.collect();
            newest.reverse();
            newest.truncate(limit);
            newest
        } else {
            matching.take(limit).collect()
        }
    }

    /// Streams entries appended after the given sequence, oldest first.
    pub async fn stream_after(&self, after: Sequence) -> JournalStream {
        use futures_util::stream;

        let pending: Vec<_> = self
            .entries
            .read()
            .await
            .iter()
            .filter(|e| e.sequence > after)
            .cloned()
            .collect();

        Box::pin(stream::iter(pending))
    }
}
