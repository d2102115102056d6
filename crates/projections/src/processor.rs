//! Projection processor for feeding journal entries to projections.

use futures_util::StreamExt;
use store::{Journal, JournalEntry, Sequence};
use tokio::sync::Mutex;

use crate::Result;
use crate::projection::Projection;

/// Reads the journal and delivers entries to projections.
///
/// The processor supports:
/// - Catch-up: streams the entries each projection has not seen yet
/// - Single entry delivery: hands one entry to every projection
/// - Rebuild: resets all projections and replays the journal from the start
///
/// Catch-up runs are serialized, so two callers refreshing at once never
/// deliver the same entry twice.
pub struct ProjectionProcessor {
    journal: Journal,
    projections: Vec<Box<dyn Projection>>,
    catch_up: Mutex<()>,
}

impl ProjectionProcessor {
    /// Creates a new processor reading the given journal.
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            projections: Vec::new(),
            catch_up: Mutex::new(()),
        }
    }

    /// Registers a projection with this processor.
    pub fn register(&mut self, projection: Box<dyn Projection>) {
        self.projections.push(projection);
    }

    /// Returns the number of registered projections.
    pub fn projection_count(&self) -> usize {
        self.projections.len()
    }

    /// Streams journal entries newer than the slowest projection and delivers
    /// each to every projection still behind it.
    #[tracing::instrument(skip(self))]
    pub async fn run_catch_up(&self) -> Result<()> {
        let _guard = self.catch_up.lock().await;

        let mut from: Option<Sequence> = None;
        for projection in &self.projections {
            let position = projection.position().await.last_sequence;
            from = Some(from.map_or(position, |f| f.min(position)));
        }
        let Some(from) = from else {
            return Ok(());
        };

        let mut stream = self.journal.stream_after(from).await;
        let mut delivered: u64 = 0;

        while let Some(entry) = stream.next().await {
            for projection in &self.projections {
                if projection.position().await.is_behind(entry.sequence) {
                    projection.handle(&entry).await?;
                    metrics::counter!("projections_events_processed", "projection" => projection.name())
                        .increment(1);
                    delivered += 1;
                }
            }
        }

        if delivered > 0 {
            tracing::debug!(delivered, %from, "catch-up complete");
        }

        Ok(())
    }

    /// Delivers a single entry to all registered projections.
    #[tracing::instrument(skip(self, entry), fields(event_type = %entry.event_type))]
    pub async fn process_event(&self, entry: &JournalEntry) -> Result<()> {
        for projection in &self.projections {
            projection.handle(entry).await?;
        }
        Ok(())
    }

    /// Resets all projections and replays the whole journal.
    #[tracing::instrument(skip(self))]
    pub async fn rebuild_all(&self) -> Result<()> {
        for projection in &self.projections {
            projection.reset().await?;
        }
        tracing::info!(projections = self.projections.len(), "rebuilding projections");
        self.run_catch_up().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::ProjectionPosition;
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// A simple counting projection for testing.
    struct CountingProjection {
        count: Arc<RwLock<u64>>,
        position: Arc<RwLock<ProjectionPosition>>,
    }

    impl CountingProjection {
        fn new() -> Self {
            Self {
                count: Arc::new(RwLock::new(0)),
                position: Arc::new(RwLock::new(ProjectionPosition::zero())),
            }
        }
    }

    #[async_trait]
    impl Projection for CountingProjection {
        fn name(&self) -> &'static str {
            "CountingProjection"
        }

        async fn handle(&self, entry: &JournalEntry) -> Result<()> {
            *self.count.write().await += 1;
            let mut pos = self.position.write().await;
            *pos = pos.advance(entry.sequence);
            Ok(())
        }

        async fn position(&self) -> ProjectionPosition {
            *self.position.read().await
        }

        async fn reset(&self) -> Result<()> {
            *self.count.write().await = 0;
            *self.position.write().await = ProjectionPosition::zero();
            Ok(())
        }
    }

    fn entry(record_id: u32) -> JournalEntry {
        JournalEntry::new(
            "Table",
            record_id,
            "TableStatusChanged",
            serde_json::json!({"test": true}),
        )
    }

    async fn journal_with(count: u32) -> Journal {
        let journal = Journal::new();
        journal.append((1..=count).map(entry).collect()).await;
        journal
    }

    #[tokio::test]
    async fn test_catch_up_processes_all_entries() {
        let journal = journal_with(3).await;

        let projection = CountingProjection::new();
        let count_ref = Arc::clone(&projection.count);
        let mut processor = ProjectionProcessor::new(journal);
        processor.register(Box::new(projection));

        processor.run_catch_up().await.unwrap();

        assert_eq!(*count_ref.read().await, 3);
    }

    #[tokio::test]
    async fn test_process_single_entry() {
        let projection = CountingProjection::new();
        let count_ref = Arc::clone(&projection.count);

        let mut processor = ProjectionProcessor::new(Journal::new());
        processor.register(Box::new(projection));

        processor.process_event(&entry(1)).await.unwrap();

        assert_eq!(*count_ref.read().await, 1);
    }

    #[tokio::test]
    async fn test_rebuild_resets_and_replays() {
        let journal = journal_with(2).await;

        let projection = CountingProjection::new();
        let count_ref = Arc::clone(&projection.count);
        let pos_ref = Arc::clone(&projection.position);

        let mut processor = ProjectionProcessor::new(journal);
        processor.register(Box::new(projection));

        processor.run_catch_up().await.unwrap();
        assert_eq!(*count_ref.read().await, 2);

        processor.rebuild_all().await.unwrap();
        assert_eq!(*count_ref.read().await, 2);
        assert_eq!(pos_ref.read().await.events_processed, 2);
    }

    #[tokio::test]
    async fn test_catch_up_picks_up_only_new_entries() {
        let journal = journal_with(3).await;

        let projection = CountingProjection::new();
        let count_ref = Arc::clone(&projection.count);

        let mut processor = ProjectionProcessor::new(journal.clone());
        processor.register(Box::new(projection));

        processor.run_catch_up().await.unwrap();
        processor.run_catch_up().await.unwrap();
        assert_eq!(*count_ref.read().await, 3);

        journal.append(vec![entry(9)]).await;
        processor.run_catch_up().await.unwrap();
        assert_eq!(*count_ref.read().await, 4);
    }

    #[tokio::test]
    async fn test_empty_journal_catch_up() {
        let projection = CountingProjection::new();
        let count_ref = Arc::clone(&projection.count);

        let mut processor = ProjectionProcessor::new(Journal::new());
        processor.register(Box::new(projection));

        processor.run_catch_up().await.unwrap();
        assert_eq!(*count_ref.read().await, 0);
    }

    #[tokio::test]
    async fn test_late_registered_projection_replays_from_start() {
        let journal = journal_with(2).await;

        let early = CountingProjection::new();
        let early_count = Arc::clone(&early.count);
        let mut processor = ProjectionProcessor::new(journal.clone());
        processor.register(Box::new(early));
        processor.run_catch_up().await.unwrap();

        let late = CountingProjection::new();
        let late_count = Arc::clone(&late.count);
        processor.register(Box::new(late));
        journal.append(vec![entry(3)]).await;
        processor.run_catch_up().await.unwrap();

        assert_eq!(processor.projection_count(), 2);
        assert_eq!(*early_count.read().await, 3);
        assert_eq!(*late_count.read().await, 3);
    }

    #[tokio::test]
    async fn test_concurrent_catch_up_delivers_once() {
        let journal = journal_with(50).await;

        let projection = CountingProjection::new();
        let count_ref = Arc::clone(&projection.count);
        let mut processor = ProjectionProcessor::new(journal);
        processor.register(Box::new(projection));
        let processor = Arc::new(processor);

        let a = tokio::spawn({
            let processor = Arc::clone(&processor);
            async move { processor.run_catch_up().await }
        });
        let b = tokio::spawn({
            let processor = Arc::clone(&processor);
            async move { processor.run_catch_up().await }
        });
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        assert_eq!(*count_ref.read().await, 50);
    }
}
