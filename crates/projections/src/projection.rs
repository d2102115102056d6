//! Core projection trait and position tracking.

use async_trait::async_trait;
use store::{JournalEntry, Sequence};

use crate::Result;

/// Tracks how far into the journal a projection has read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectionPosition {
    /// Sequence of the last entry handled.
    pub last_sequence: Sequence,

    /// Number of entries handled since the last reset.
    pub events_processed: u64,
}

impl ProjectionPosition {
    /// Creates a position before the first entry.
    pub fn zero() -> Self {
        Self {
            last_sequence: Sequence::start(),
            events_processed: 0,
        }
    }

    /// Advances the position past the given entry.
    pub fn advance(&self, sequence: Sequence) -> Self {
        Self {
            last_sequence: sequence,
            events_processed: self.events_processed + 1,
        }
    }

    /// Returns true if the entry at `sequence` has not been handled yet.
    pub fn is_behind(&self, sequence: Sequence) -> bool {
        self.last_sequence < sequence
    }
}

impl std::fmt::Display for ProjectionPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "position({})", self.last_sequence)
    }
}

/// A projection that folds journal entries into a read model.
///
/// Entries of record types a projection does not care about must still
/// advance its position, otherwise catch-up would hand them over again.
#[async_trait]
pub trait Projection: Send + Sync {
    /// Returns the name of this projection.
    fn name(&self) -> &'static str;

    /// Handles a single journal entry, updating the read model.
    async fn handle(&self, entry: &JournalEntry) -> Result<()>;

    /// Returns the current position of this projection.
    async fn position(&self) -> ProjectionPosition;

    /// Resets the projection to its initial state.
    async fn reset(&self) -> Result<()>;
}
