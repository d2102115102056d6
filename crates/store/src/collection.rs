use std::sync::Arc;

use common::RecordId;
use tokio::sync::RwLock;

use crate::{Journal, JournalEntry, Record, SimulatedLatency, StoreError};

/// In-memory collection of one record kind.
///
/// Records are kept in insertion order, which is also id order because new
/// ids are always "largest existing + 1". Clones share the same storage.
///
/// Every read-modify-write runs under a single write lock, so a closure
/// passed to [`update`](Self::update) sees and commits a consistent record.
pub struct InMemoryCollection<R: Record> {
    records: Arc<RwLock<Vec<R>>>,
    latency: SimulatedLatency,
}

impl<R: Record> Clone for InMemoryCollection<R> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
            latency: self.latency,
        }
    }
}

impl<R: Record> Default for InMemoryCollection<R> {
    fn default() -> Self {
        Self::new(SimulatedLatency::none())
    }
}

impl<R: Record> InMemoryCollection<R> {
    /// Creates an empty collection with the given latency profile.
    pub fn new(latency: SimulatedLatency) -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
            latency,
        }
    }

    /// Loads records as-is, keeping their ids. No latency is applied.
    pub async fn seed(&self, seed: impl IntoIterator<Item = R>) {
        let mut records = self.records.write().await;
        records.extend(seed);
        records.sort_by_key(|r| r.id());
    }

    /// Returns the number of records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Returns true if the collection holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Returns a snapshot of every record.
    pub async fn all(&self) -> Vec<R> {
        self.latency.before_read().await;
        self.records.read().await.clone()
    }

    /// Returns the record with the given id.
    pub async fn get(&self, id: R::Id) -> Option<R> {
        self.latency.before_read().await;
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.id() == id)
            .cloned()
    }

    /// Returns the first record, in id order, matching the predicate.
    pub async fn find<P>(&self, predicate: P) -> Option<R>
    where
        P: Fn(&R) -> bool,
    {
        self.latency.before_read().await;
        self.records
            .read()
            .await
            .iter()
            .find(|r| predicate(r))
            .cloned()
    }

    /// Returns every record matching the predicate, in id order.
    pub async fn filter<P>(&self, predicate: P) -> Vec<R>
    where
        P: Fn(&R) -> bool,
    {
        self.latency.before_read().await;
        self.records
            .read()
            .await
            .iter()
            .filter(|r| predicate(r))
            .cloned()
            .collect()
    }

    /// Allocates a fresh id and inserts the record built for it.
    ///
    /// `build` receives the new id and the current records (for uniqueness
    /// checks). Nothing is inserted if it fails.
    pub async fn insert_with<T, E, F>(&self, build: F) -> Result<T, E>
    where
        F: FnOnce(R::Id, &[R]) -> Result<(R, T), E>,
    {
        self.insert_in(None, |id, records| {
            build(id, records).map(|(record, output)| (record, output, Vec::new()))
        })
        .await
    }

    /// Like [`insert_with`](Self::insert_with), also appending the entries
    /// `build` returns to `journal` before the write lock is released.
    pub async fn insert_journaled<T, E, F>(&self, journal: &Journal, build: F) -> Result<T, E>
    where
        F: FnOnce(R::Id, &[R]) -> Result<(R, T, Vec<JournalEntry>), E>,
    {
        self.insert_in(Some(journal), build).await
    }

    /// Mutates the record with the given id.
    ///
    /// The closure works on a copy; the copy replaces the stored record only
    /// if the closure succeeds.
    pub async fn update<T, E, F>(&self, id: R::Id, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut R) -> Result<T, E>,
        E: From<StoreError>,
    {
        self.update_in(id, None, |record| f(record).map(|output| (output, Vec::new())))
            .await
    }

    /// Like [`update`](Self::update), also appending the entries `f` returns
    /// to `journal` before the write lock is released.
    ///
    /// Writers of one collection therefore reach the journal in the order
    /// their changes were made.
    pub async fn update_journaled<T, E, F>(
        &self,
        id: R::Id,
        journal: &Journal,
        f: F,
    ) -> Result<T, E>
    where
        F: FnOnce(&mut R) -> Result<(T, Vec<JournalEntry>), E>,
        E: From<StoreError>,
    {
        self.update_in(id, Some(journal), f).await
    }

    /// Mutates the first record, in id order, matching the predicate.
    ///
    /// Selection and mutation happen under the same lock. Returns `Ok(None)`
    /// when no record matches.
    pub async fn update_first<T, E, P, F>(&self, predicate: P, f: F) -> Result<Option<T>, E>
    where
        P: Fn(&R) -> bool,
        F: FnOnce(&mut R) -> Result<T, E>,
    {
        self.update_first_in(predicate, None, |record| {
            f(record).map(|output| (output, Vec::new()))
        })
        .await
    }

    /// Like [`update_first`](Self::update_first), also appending the entries
    /// `f` returns to `journal` before the write lock is released.
    pub async fn update_first_journaled<T, E, P, F>(
        &self,
        predicate: P,
        journal: &Journal,
        f: F,
    ) -> Result<Option<T>, E>
    where
        P: Fn(&R) -> bool,
        F: FnOnce(&mut R) -> Result<(T, Vec<JournalEntry>), E>,
    {
        self.update_first_in(predicate, Some(journal), f).await
    }

    /// Removes the record with the given id, returning it.
    ///
    /// `entries` describes the removal for the journal; if it fails the
    /// record stays. Returns `Ok(None)` when there is no such record.
    pub async fn remove_journaled<E, F>(
        &self,
        id: R::Id,
        journal: &Journal,
        entries: F,
    ) -> Result<Option<R>, E>
    where
        F: FnOnce(&R) -> Result<Vec<JournalEntry>, E>,
    {
        self.latency.before_write().await;
        let mut records = self.records.write().await;
        let Some(position) = records.iter().position(|r| r.id() == id) else {
            return Ok(None);
        };

        let entries = entries(&records[position])?;
        let record = records.remove(position);
        append_locked(Some(journal), entries).await;

        Ok(Some(record))
    }

    async fn insert_in<T, E, F>(&self, journal: Option<&Journal>, build: F) -> Result<T, E>
    where
        F: FnOnce(R::Id, &[R]) -> Result<(R, T, Vec<JournalEntry>), E>,
    {
        self.latency.before_write().await;
        let mut records = self.records.write().await;

        let id = next_id(&records);
        let (record, output, entries) = build(id, &records)?;
        records.push(record);
        append_locked(journal, entries).await;

        tracing::trace!(record_type = R::record_type(), %id, "record inserted");
        Ok(output)
    }

    async fn update_in<T, E, F>(
        &self,
        id: R::Id,
        journal: Option<&Journal>,
        f: F,
    ) -> Result<T, E>
    where
        F: FnOnce(&mut R) -> Result<(T, Vec<JournalEntry>), E>,
        E: From<StoreError>,
    {
        self.latency.before_write().await;
        let mut records = self.records.write().await;

        let position = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| StoreError::NotFound {
                record_type: R::record_type(),
                id: id.to_string(),
            })?;

        let mut draft = records[position].clone();
        let (output, entries) = f(&mut draft)?;
        records[position] = draft;
        append_locked(journal, entries).await;

        Ok(output)
    }

    async fn update_first_in<T, E, P, F>(
        &self,
        predicate: P,
        journal: Option<&Journal>,
        f: F,
    ) -> Result<Option<T>, E>
    where
        P: Fn(&R) -> bool,
        F: FnOnce(&mut R) -> Result<(T, Vec<JournalEntry>), E>,
    {
        self.latency.before_write().await;
        let mut records = self.records.write().await;

        let Some(position) = records.iter().position(|r| predicate(r)) else {
            return Ok(None);
        };

        let mut draft = records[position].clone();
        let (output, entries) = f(&mut draft)?;
        records[position] = draft;
        append_locked(journal, entries).await;

        Ok(Some(output))
    }
}

/// Appends while the caller still holds the collection's write lock.
async fn append_locked(journal: Option<&Journal>, entries: Vec<JournalEntry>) {
    if let Some(journal) = journal
        && !entries.is_empty()
    {
        journal.append(entries).await;
    }
}

fn next_id<R: Record>(records: &[R]) -> R::Id {
    records
        .iter()
        .map(|r| r.id())
        .max()
        .map(|id| id.next())
        .unwrap_or_else(R::Id::first)
}
