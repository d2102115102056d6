//! Core entity and domain event traits.

use common::RecordId;
use serde::{Serialize, de::DeserializeOwned};
use store::{JournalEntry, Record};

/// Trait for domain events.
///
/// Domain events represent facts that have happened in the domain.
/// They are immutable and should be named in past tense.
pub trait DomainEvent: Serialize + DeserializeOwned + Send + Sync + Clone {
    /// Returns the event type name, as recorded in the journal.
    fn event_type(&self) -> &'static str;
}

/// Trait for records whose changes are expressed as events.
///
/// Command methods on an entity validate against current state and return
/// the events describing the change; [`apply`](Entity::apply) folds an event
/// into the record. `apply` must be pure and must not fail, because the
/// command already validated the change.
pub trait Entity: Record {
    /// The type of events this entity produces and consumes.
    type Event: DomainEvent;

    /// Applies an event to the entity, updating its state.
    fn apply(&mut self, event: Self::Event);

    /// Applies multiple events in sequence.
    fn apply_events(&mut self, events: impl IntoIterator<Item = Self::Event>) {
        for event in events {
            self.apply(event);
        }
    }
}

/// Serializes events into journal entries, then applies them.
///
/// Serialization happens first so a failure leaves the entity untouched.
pub(crate) fn commit<E: Entity>(
    entity: &mut E,
    events: Vec<E::Event>,
) -> Result<Vec<JournalEntry>, serde_json::Error> {
    let entries = journal_entries::<E>(entity.id(), &events)?;
    entity.apply_events(events);
    Ok(entries)
}

/// Serializes events of one entity into journal entries.
pub(crate) fn journal_entries<E: Entity>(
    id: E::Id,
    events: &[E::Event],
) -> Result<Vec<JournalEntry>, serde_json::Error> {
    events
        .iter()
        .map(|event| JournalEntry::from_event(E::record_type(), id.as_raw(), event.event_type(), event))
        .collect()
}
