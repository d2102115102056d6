//! Reservation book service.

use chrono::NaiveDate;
use common::{ReservationId, TableId};
use store::{InMemoryCollection, Journal, JournalEntry, Record, SimulatedLatency};

use crate::aggregate::commit;
use crate::error::{DomainError, Result};
use crate::seating::{SeatingKind, SeatingSaga, TableDirectory};
use crate::settings::OperationalSettings;
use crate::table::TableRegistry;
use crate::validation::{require_party_size, require_text};

use super::{
    NewReservation, Reservation, ReservationEvent, ReservationPatch, ReservationStatus, WalkIn,
};

/// Service owning reservations and the seating flows.
///
/// Tables are reached only through the [`TableDirectory`]. Clones share the
/// same reservations.
#[derive(Clone)]
pub struct ReservationBook<D: TableDirectory = TableRegistry> {
    reservations: InMemoryCollection<Reservation>,
    seating: SeatingSaga<D>,
    journal: Journal,
    settings: OperationalSettings,
}

impl ReservationBook<TableRegistry> {
    /// Creates an empty book seating parties at the registry's tables.
    ///
    /// Writes to the registry's journal.
    pub fn new(
        tables: TableRegistry,
        settings: OperationalSettings,
        latency: SimulatedLatency,
    ) -> Self {
        let journal = tables.journal().clone();
        Self::with_parts(InMemoryCollection::new(latency), tables, journal, settings)
    }
}

impl<D: TableDirectory> ReservationBook<D> {
    /// Creates a book over an existing reservation collection.
    pub fn with_parts(
        reservations: InMemoryCollection<Reservation>,
        directory: D,
        journal: Journal,
        settings: OperationalSettings,
    ) -> Self {
        Self {
            reservations,
            seating: SeatingSaga::new(directory, journal.clone()),
            journal,
            settings,
        }
    }

    pub fn settings(&self) -> &OperationalSettings {
        &self.settings
    }

    /// Returns the table directory used for seating.
    pub fn tables(&self) -> &D {
        self.seating.directory()
    }

    pub(crate) async fn seed(&self, reservations: Vec<Reservation>) {
        self.reservations.seed(reservations).await;
    }

    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Vec<Reservation> {
        self.reservations.all().await
    }

    #[tracing::instrument(skip(self))]
    pub async fn find_by_id(&self, id: ReservationId) -> Option<Reservation> {
        self.reservations.get(id).await
    }

    /// Returns the reservations booked on the given day, in storage order.
    #[tracing::instrument(skip(self))]
    pub async fn list_by_date(&self, date: NaiveDate) -> Vec<Reservation> {
        self.reservations.filter(|r| r.is_on(date)).await
    }

    /// Takes a new booking.
    #[tracing::instrument(skip(self))]
    pub async fn create(&self, new: NewReservation) -> Result<Reservation> {
        let settings = self.settings;
        let reservation = self
            .insert(|id| Reservation::book(id, new, &settings))
            .await?;

        metrics::counter!("reservations_created_total").increment(1);
        Ok(reservation)
    }

    /// Corrects the details of an open reservation.
    #[tracing::instrument(skip(self))]
    pub async fn update(&self, id: ReservationId, patch: ReservationPatch) -> Result<Reservation> {
        let settings = self.settings;
        self.change(id, |r| r.update(patch, &settings)).await
    }

    /// Confirms a pending reservation.
    #[tracing::instrument(skip(self))]
    pub async fn confirm(&self, id: ReservationId) -> Result<Reservation> {
        self.change(id, Reservation::confirm).await
    }

    /// Cancels a reservation. Cancelling a cancelled reservation succeeds
    /// without changes.
    ///
    /// The table of a seated party is left as it is: the party may still be
    /// sitting there, and it is freed through the table's own release.
    #[tracing::instrument(skip(self))]
    pub async fn cancel(&self, id: ReservationId) -> Result<Reservation> {
        let reservation = self.change(id, Reservation::cancel).await?;
        metrics::counter!("reservations_cancelled_total").increment(1);
        Ok(reservation)
    }

    /// Seats a booked party at the first available table that fits.
    ///
    /// Fails with `NoCapacity`, leaving everything unchanged, when no table
    /// fits. If the reservation cannot be marked seated after the table was
    /// taken (it was cancelled, or its party size changed meanwhile), the
    /// table is released again.
    #[tracing::instrument(skip(self))]
    pub async fn seat(&self, id: ReservationId) -> Result<Reservation> {
        let reservation = self
            .reservations
            .get(id)
            .await
            .ok_or_else(|| DomainError::not_found(Reservation::record_type(), id))?;

        if !reservation.status().can_seat() {
            return Err(DomainError::invalid_transition(
                Reservation::record_type(),
                reservation.status(),
                ReservationStatus::Seated,
            ));
        }

        let party_size = reservation.party_size();
        self.seating
            .run(SeatingKind::Reservation, Some(id), party_size, |table_id| {
                self.change(id, move |r| {
                    if r.party_size() != party_size {
                        return Err(DomainError::Conflict(format!(
                            "party size changed from {party_size} to {} while seating",
                            r.party_size()
                        )));
                    }
                    r.seat(table_id)
                })
            })
            .await
    }

    /// Seats a party without a booking, recording it as a seated
    /// reservation with the walk-in phone placeholder.
    #[tracing::instrument(skip(self))]
    pub async fn seat_walk_in(&self, walk_in: WalkIn) -> Result<Reservation> {
        require_text("customer name", &walk_in.customer_name)?;
        let party_size = require_party_size(walk_in.party_size, &self.settings)?;

        self.seating
            .run(SeatingKind::WalkIn, None, party_size, |table_id| {
                self.insert_walk_in(walk_in, table_id)
            })
            .await
    }

    async fn insert_walk_in(&self, walk_in: WalkIn, table_id: TableId) -> Result<Reservation> {
        let settings = self.settings;
        self.insert(|id| Reservation::walk_in(id, walk_in, table_id, &settings))
            .await
    }

    async fn insert<F>(&self, build: F) -> Result<Reservation>
    where
        F: FnOnce(ReservationId) -> Result<(Reservation, Vec<ReservationEvent>)>,
    {
        self.reservations
            .insert_journaled(&self.journal, |id, _| {
                let (mut reservation, events) = build(id)?;
                let entries = commit(&mut reservation, events)?;
                log_change(&reservation, &entries);
                Ok::<_, DomainError>((reservation.clone(), reservation, entries))
            })
            .await
    }

    async fn change<F>(&self, id: ReservationId, command: F) -> Result<Reservation>
    where
        F: FnOnce(&Reservation) -> Result<Vec<ReservationEvent>>,
    {
        self.reservations
            .update_journaled(id, &self.journal, |reservation| {
                let events = command(reservation)?;
                let entries = commit(reservation, events)?;
                log_change(reservation, &entries);
                Ok::<_, DomainError>((reservation.clone(), entries))
            })
            .await
    }
}

fn log_change(reservation: &Reservation, entries: &[JournalEntry]) {
    if entries.is_empty() {
        return;
    }

    tracing::info!(
        reservation_id = %reservation.id(),
        status = %reservation.status(),
        "reservation updated"
    );
}
