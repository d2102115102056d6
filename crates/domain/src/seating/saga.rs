//! Seating saga: claim a table, then commit the reservation, releasing the
//! table again if the commit fails.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{DateTime, Utc};
use common::{ReservationId, TableId};
use serde::{Deserialize, Serialize};
use store::{Journal, JournalEntry};

use crate::error::{DomainError, Result};
use crate::reservation::Reservation;

use super::TableDirectory;

/// Record type of seating runs in the journal.
pub const SEATING_RECORD_TYPE: &str = "Seating";

/// How the party arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatingKind {
    /// Seating an existing reservation.
    Reservation,

    /// Seating a party without a booking.
    WalkIn,
}

impl SeatingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeatingKind::Reservation => "reservation",
            SeatingKind::WalkIn => "walk_in",
        }
    }
}

/// The state of a seating run.
///
/// State transitions:
/// ```text
/// Started ──► TableClaimed ──┬──► Completed
///    │                       ├──► Compensated
///    │                       └──► Failed
///    └──► Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SeatingState {
    /// Run began, no table yet.
    #[default]
    Started,

    /// A table is occupied for the party.
    TableClaimed,

    /// Reservation committed (terminal state).
    Completed,

    /// Reservation commit failed and the table was released (terminal state).
    Compensated,

    /// No table was claimed, or releasing it failed (terminal state).
    Failed,
}

impl SeatingState {
    /// Returns true if a table can be claimed.
    pub fn can_claim(&self) -> bool {
        matches!(self, SeatingState::Started)
    }

    /// Returns true if the run can complete or compensate.
    pub fn has_table(&self) -> bool {
        matches!(self, SeatingState::TableClaimed)
    }

    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SeatingState::Completed | SeatingState::Compensated | SeatingState::Failed
        )
    }

    /// Journal event type recorded on entering this state.
    pub fn event_type(&self) -> &'static str {
        match self {
            SeatingState::Started => "SeatingStarted",
            SeatingState::TableClaimed => "SeatingTableClaimed",
            SeatingState::Completed => "SeatingCompleted",
            SeatingState::Compensated => "SeatingCompensated",
            SeatingState::Failed => "SeatingFailed",
        }
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            SeatingState::Started => "Started",
            SeatingState::TableClaimed => "TableClaimed",
            SeatingState::Completed => "Completed",
            SeatingState::Compensated => "Compensated",
            SeatingState::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for SeatingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Progress of one seating attempt, journaled at every step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatingRun {
    pub run_id: u32,
    pub kind: SeatingKind,
    pub party_size: u32,
    pub state: SeatingState,

    /// Reservation being seated; set on completion for walk-ins.
    #[serde(default)]
    pub reservation_id: Option<ReservationId>,

    #[serde(default)]
    pub table_id: Option<TableId>,

    /// Why the run did not complete.
    #[serde(default)]
    pub reason: Option<String>,

    pub started_at: DateTime<Utc>,

    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
}

impl SeatingRun {
    fn start(
        run_id: u32,
        kind: SeatingKind,
        party_size: u32,
        reservation_id: Option<ReservationId>,
    ) -> Self {
        Self {
            run_id,
            kind,
            party_size,
            state: SeatingState::Started,
            reservation_id,
            table_id: None,
            reason: None,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    fn table_claimed(&mut self, table_id: TableId) {
        debug_assert!(self.state.can_claim());
        self.state = SeatingState::TableClaimed;
        self.table_id = Some(table_id);
    }

    fn completed(&mut self, reservation_id: ReservationId) {
        debug_assert!(self.state.has_table());
        self.state = SeatingState::Completed;
        self.reservation_id = Some(reservation_id);
        self.finished_at = Some(Utc::now());
    }

    fn compensated(&mut self, reason: String) {
        debug_assert!(self.state.has_table());
        self.state = SeatingState::Compensated;
        self.reason = Some(reason);
        self.finished_at = Some(Utc::now());
    }

    fn failed(&mut self, reason: String) {
        debug_assert!(!self.state.is_terminal());
        self.state = SeatingState::Failed;
        self.reason = Some(reason);
        self.finished_at = Some(Utc::now());
    }
}

/// Drives seating runs against a table directory.
///
/// Each run claims a table, then hands its id to a commit step that writes
/// the reservation. If the commit fails, the claimed table is released and
/// the commit error is returned.
#[derive(Clone)]
pub struct SeatingSaga<D: TableDirectory> {
    directory: D,
    journal: Journal,
    runs: Arc<AtomicU32>,
}

impl<D: TableDirectory> SeatingSaga<D> {
    pub fn new(directory: D, journal: Journal) -> Self {
        Self {
            directory,
            journal,
            runs: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Returns the table directory.
    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// Seats a party of `party_size`, committing the reservation with
    /// `commit` once a table is held.
    #[tracing::instrument(skip(self, commit))]
    pub async fn run<F, Fut>(
        &self,
        kind: SeatingKind,
        reservation_id: Option<ReservationId>,
        party_size: u32,
        commit: F,
    ) -> Result<Reservation>
    where
        F: FnOnce(TableId) -> Fut,
        Fut: Future<Output = Result<Reservation>>,
    {
        metrics::counter!("seating_attempts_total", "kind" => kind.as_str()).increment(1);
        let started = std::time::Instant::now();

        let run_id = self.runs.fetch_add(1, Ordering::Relaxed) + 1;
        let mut run = SeatingRun::start(run_id, kind, party_size, reservation_id);
        self.record(&run).await;

        let table = match self.directory.claim(party_size).await {
            Ok(table) => table,
            Err(e) => {
                if matches!(e, DomainError::NoCapacity { .. }) {
                    metrics::counter!("seating_no_capacity_total").increment(1);
                }
                tracing::warn!(party_size, error = %e, "seating failed: no table claimed");
                run.failed(e.to_string());
                self.finish(&run, started).await;
                return Err(e);
            }
        };

        let table_id = table.id();
        tracing::info!(%table_id, party_size, "table claimed");
        run.table_claimed(table_id);
        self.record(&run).await;

        match commit(table_id).await {
            Ok(reservation) => {
                run.completed(reservation.id());
                tracing::info!(
                    %table_id,
                    reservation_id = %reservation.id(),
                    "party seated"
                );
                self.finish(&run, started).await;
                Ok(reservation)
            }
            Err(e) => {
                tracing::warn!(%table_id, error = %e, "reservation commit failed, releasing table");
                match self.directory.release(table_id).await {
                    Ok(_) => {
                        metrics::counter!("seating_compensations_total").increment(1);
                        run.compensated(e.to_string());
                    }
                    Err(release_error) => {
                        tracing::error!(
                            %table_id,
                            error = %release_error,
                            "failed to release claimed table"
                        );
                        run.failed(format!("{e}; release failed: {release_error}"));
                    }
                }
                self.finish(&run, started).await;
                Err(e)
            }
        }
    }

    async fn finish(&self, run: &SeatingRun, started: std::time::Instant) {
        metrics::histogram!("seating_duration_seconds").record(started.elapsed().as_secs_f64());
        self.record(run).await;
    }

    async fn record(&self, run: &SeatingRun) {
        match JournalEntry::from_event(SEATING_RECORD_TYPE, run.run_id, run.state.event_type(), run)
        {
            Ok(entry) => {
                self.journal.append(vec![entry]).await;
            }
            Err(e) => {
                tracing::error!(run_id = run.run_id, error = %e, "failed to journal seating run");
            }
        }
    }
}
