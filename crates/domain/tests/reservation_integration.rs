//! Integration tests for the reservation book and the seating flows.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use common::{ReservationId, TableId};
use domain::{
    DomainError, Entity, NewReservation, NewTable, OperationalSettings, Reservation,
    ReservationBook, ReservationEvent, ReservationPatch, ReservationStatus, Result, SeatingRun,
    SeatingState, Table, TableDirectory, TableRegistry, TableStatus, WALK_IN_PHONE, WalkIn,
};
use store::{InMemoryCollection, Journal, JournalQuery, SimulatedLatency};

async fn registry(capacities: &[u32]) -> TableRegistry {
    let registry = TableRegistry::default();
    for (n, capacity) in capacities.iter().enumerate() {
        registry
            .create(NewTable::new(n as u32 + 1, *capacity))
            .await
            .unwrap();
    }
    registry
}

async fn book(capacities: &[u32]) -> ReservationBook {
    ReservationBook::new(
        registry(capacities).await,
        OperationalSettings::default(),
        SimulatedLatency::none(),
    )
}

fn booking(party_size: u32) -> NewReservation {
    NewReservation::new(
        "Ada Lovelace",
        "555-0101",
        party_size,
        Utc::now() + Duration::hours(1),
    )
}

async fn seating_runs(journal: &Journal, state: SeatingState) -> Vec<SeatingRun> {
    journal
        .query(&JournalQuery::new().record_type("Seating").event_type(state.event_type()))
        .await
        .iter()
        .map(|e| e.decode().unwrap())
        .collect()
}

mod lifecycle {
    use super::*;

    #[tokio::test]
    async fn create_update_confirm() {
        let book = book(&[]).await;
        let reservation = book.create(booking(2).pending()).await.unwrap();
        assert_eq!(reservation.status(), ReservationStatus::Pending);

        let reservation = book
            .update(
                reservation.id(),
                ReservationPatch {
                    party_size: Some(3),
                    notes: Some("high chair".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(reservation.party_size(), 3);
        assert_eq!(reservation.notes(), Some("high chair"));

        let reservation = book.confirm(reservation.id()).await.unwrap();
        assert_eq!(reservation.status(), ReservationStatus::Confirmed);
    }

    #[tokio::test]
    async fn notes_are_trimmed() {
        let book = book(&[]).await;

        let reservation = book
            .create(booking(2).with_notes("  window seat "))
            .await
            .unwrap();
        assert_eq!(reservation.notes(), Some("window seat"));

        let reservation = book.create(booking(2).with_notes("   ")).await.unwrap();
        assert_eq!(reservation.notes(), None);
    }

    #[tokio::test]
    async fn cancelling_twice_is_idempotent() {
        let book = book(&[]).await;
        let reservation = book.create(booking(2)).await.unwrap();

        let first = book.cancel(reservation.id()).await.unwrap();
        let second = book.cancel(reservation.id()).await.unwrap();

        assert_eq!(first.status(), ReservationStatus::Cancelled);
        assert_eq!(second.status(), ReservationStatus::Cancelled);
        let entries = book
            .tables()
            .journal()
            .query(&JournalQuery::for_record("Reservation", 1))
            .await;
        let event_types: Vec<_> = entries.iter().map(|e| e.event_type.as_str()).collect();
        assert_eq!(event_types, vec!["ReservationBooked", "ReservationCancelled"]);
    }

    #[tokio::test]
    async fn missing_reservation_is_not_found() {
        let book = book(&[4]).await;
        let id = ReservationId::new(42);

        assert!(matches!(
            book.update(id, ReservationPatch::default()).await,
            Err(DomainError::NotFound { record: "Reservation", .. })
        ));
        assert!(matches!(book.cancel(id).await, Err(DomainError::NotFound { .. })));
        assert!(matches!(book.seat(id).await, Err(DomainError::NotFound { .. })));

        let table = book.tables().find_by_id(TableId::new(1)).await.unwrap();
        assert_eq!(table.status(), TableStatus::Available);
    }

    #[tokio::test]
    async fn party_size_limit_follows_settings() {
        let book = ReservationBook::new(
            registry(&[]).await,
            OperationalSettings { max_party_size: 6 },
            SimulatedLatency::none(),
        );

        assert!(book.create(booking(6)).await.is_ok());
        assert!(matches!(
            book.create(booking(7)).await,
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn list_by_date_ignores_time_of_day() {
        let book = book(&[]).await;
        let day = |d, h| Utc.with_ymd_and_hms(2024, 6, d, h, 0, 0).unwrap();

        for date_time in [day(1, 12), day(2, 9), day(1, 23), day(2, 0)] {
            book.create(NewReservation::new("Guest", "555", 2, date_time))
                .await
                .unwrap();
        }

        let ids: Vec<_> = book
            .list_by_date(NaiveDate::from_ymd_opt(2024, 6, 2).unwrap())
            .await
            .iter()
            .map(|r| r.id())
            .collect();
        assert_eq!(ids, vec![ReservationId::new(2), ReservationId::new(4)]);
    }
}

mod seating {
    use super::*;

    #[tokio::test]
    async fn seat_reservation_occupies_fitting_table() {
        let book = book(&[2, 4]).await;
        let reservation = book.create(booking(3)).await.unwrap();

        let seated = book.seat(reservation.id()).await.unwrap();
        assert_eq!(seated.status(), ReservationStatus::Seated);
        assert_eq!(seated.table_id(), Some(TableId::new(2)));

        let table = book.tables().find_by_id(TableId::new(2)).await.unwrap();
        assert_eq!(table.status(), TableStatus::Occupied);
        assert_eq!(table.current_party_size(), 3);

        let journal = book.tables().journal();
        let completed = seating_runs(journal, SeatingState::Completed).await;
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].reservation_id, Some(reservation.id()));
        assert_eq!(completed[0].table_id, Some(TableId::new(2)));
    }

    #[tokio::test]
    async fn no_capacity_leaves_everything_unchanged() {
        let book = book(&[1]).await;
        for _ in 0..4 {
            book.create(booking(2)).await.unwrap();
        }
        let reservation = book.create(booking(2)).await.unwrap();
        assert_eq!(reservation.id(), ReservationId::new(5));
        let tables_before = book.tables().list().await;

        let result = book.seat(reservation.id()).await;
        assert!(matches!(result, Err(DomainError::NoCapacity { party_size: 2 })));

        let reservation = book.find_by_id(reservation.id()).await.unwrap();
        assert_eq!(reservation.status(), ReservationStatus::Confirmed);
        assert!(reservation.table_id().is_none());
        assert_eq!(book.tables().list().await, tables_before);

        let failed = seating_runs(book.tables().journal(), SeatingState::Failed).await;
        assert_eq!(failed.len(), 1);
    }

    #[tokio::test]
    async fn seated_reservation_cannot_be_seated_again() {
        let book = book(&[4, 4]).await;
        let reservation = book.create(booking(2)).await.unwrap();
        book.seat(reservation.id()).await.unwrap();

        let result = book.seat(reservation.id()).await;
        assert!(matches!(result, Err(DomainError::InvalidTransition { .. })));
        let table = book.tables().find_by_id(TableId::new(2)).await.unwrap();
        assert_eq!(table.status(), TableStatus::Available);
    }

    #[tokio::test]
    async fn pending_reservation_is_not_seated() {
        let book = book(&[4]).await;
        let reservation = book.create(booking(2).pending()).await.unwrap();

        let result = book.seat(reservation.id()).await;
        assert!(matches!(result, Err(DomainError::InvalidTransition { .. })));

        let table = book.tables().find_by_id(TableId::new(1)).await.unwrap();
        assert_eq!(table.status(), TableStatus::Available);
        assert!(seating_runs(book.tables().journal(), SeatingState::Started)
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn cancelling_seated_reservation_leaves_table_to_floor_staff() {
        let book = book(&[4]).await;
        let reservation = book.create(booking(3)).await.unwrap();
        book.seat(reservation.id()).await.unwrap();

        let cancelled = book.cancel(reservation.id()).await.unwrap();
        assert_eq!(cancelled.status(), ReservationStatus::Cancelled);
        assert!(cancelled.table_id().is_none());

        let table = book.tables().find_by_id(TableId::new(1)).await.unwrap();
        assert_eq!(table.status(), TableStatus::Occupied);
        assert_eq!(table.current_party_size(), 3);

        let entries = book
            .tables()
            .journal()
            .query(&JournalQuery::for_record("Reservation", 1).event_type("ReservationCancelled"))
            .await;
        assert_eq!(entries.len(), 1);
        match entries[0].decode::<ReservationEvent>().unwrap() {
            ReservationEvent::ReservationCancelled(data) => {
                assert_eq!(data.previous_status, ReservationStatus::Seated);
                assert_eq!(data.table_id, Some(TableId::new(1)));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn walk_in_is_recorded_as_seated_reservation() {
        let book = book(&[2, 6]).await;

        let reservation = book
            .seat_walk_in(WalkIn::new("Grace Hopper", 5))
            .await
            .unwrap();
        assert_eq!(reservation.phone(), WALK_IN_PHONE);
        assert_eq!(reservation.status(), ReservationStatus::Seated);
        assert_eq!(reservation.table_id(), Some(TableId::new(2)));
        assert!(reservation.is_walk_in());

        let table = book.tables().find_by_id(TableId::new(2)).await.unwrap();
        assert_eq!(table.current_party_size(), 5);
    }

    #[tokio::test]
    async fn walk_in_validates_before_claiming() {
        let book = book(&[4]).await;
        let result = book.seat_walk_in(WalkIn::new("  ", 2)).await;

        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
        let table = book.tables().find_by_id(TableId::new(1)).await.unwrap();
        assert_eq!(table.status(), TableStatus::Available);
    }

    #[tokio::test]
    async fn racing_walk_ins_never_share_a_table() {
        let book = book(&[4, 4, 4]).await;

        let attempts: Vec<_> = (0..5)
            .map(|n| {
                let book = book.clone();
                tokio::spawn(async move { book.seat_walk_in(WalkIn::new(format!("Party {n}"), 2)).await })
            })
            .collect();

        let mut tables = Vec::new();
        let mut no_capacity = 0;
        for attempt in attempts {
            match attempt.await.unwrap() {
                Ok(reservation) => tables.push(reservation.table_id().unwrap()),
                Err(DomainError::NoCapacity { .. }) => no_capacity += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        tables.sort();
        tables.dedup();
        assert_eq!(tables.len(), 3);
        assert_eq!(no_capacity, 2);
    }
}

mod compensation {
    use super::*;

    /// Directory that changes the guest's reservation right after the claim,
    /// before the reservation is marked seated.
    #[derive(Clone)]
    struct InterferingDirectory {
        tables: TableRegistry,
        reservations: InMemoryCollection<Reservation>,
        guest: ReservationId,
        interference: fn(&Reservation) -> Result<Vec<ReservationEvent>>,
    }

    #[async_trait]
    impl TableDirectory for InterferingDirectory {
        async fn find_available(&self, min_capacity: u32) -> Option<Table> {
            self.tables.find_available(min_capacity).await
        }

        async fn claim(&self, party_size: u32) -> Result<Table> {
            let table = self.tables.claim(party_size, party_size).await?;
            let interference = self.interference;
            self.reservations
                .update(self.guest, |r| {
                    let events = interference(r)?;
                    r.apply_events(events);
                    Ok::<_, DomainError>(())
                })
                .await?;
            Ok(table)
        }

        async fn release(&self, table_id: TableId) -> Result<Table> {
            self.tables.release(table_id).await
        }
    }

    fn interfering_book(
        tables: &TableRegistry,
        interference: fn(&Reservation) -> Result<Vec<ReservationEvent>>,
    ) -> ReservationBook<InterferingDirectory> {
        let reservations = InMemoryCollection::default();
        let directory = InterferingDirectory {
            tables: tables.clone(),
            reservations: reservations.clone(),
            guest: ReservationId::new(1),
            interference,
        };
        ReservationBook::with_parts(
            reservations,
            directory,
            tables.journal().clone(),
            OperationalSettings::default(),
        )
    }

    #[tokio::test]
    async fn failed_commit_releases_claimed_table() {
        let tables = registry(&[4]).await;
        let journal = tables.journal().clone();
        let book = interfering_book(&tables, Reservation::cancel);

        let reservation = book.create(booking(2)).await.unwrap();
        let result = book.seat(reservation.id()).await;
        assert!(matches!(result, Err(DomainError::InvalidTransition { .. })));

        let table = tables.find_by_id(TableId::new(1)).await.unwrap();
        assert_eq!(table.status(), TableStatus::Available);
        assert_eq!(table.current_party_size(), 0);

        let reservation = book.find_by_id(reservation.id()).await.unwrap();
        assert_eq!(reservation.status(), ReservationStatus::Cancelled);
        assert!(reservation.table_id().is_none());

        let compensated = seating_runs(&journal, SeatingState::Compensated).await;
        assert_eq!(compensated.len(), 1);
        assert_eq!(compensated[0].table_id, Some(TableId::new(1)));
        assert!(compensated[0].reason.is_some());
    }

    #[tokio::test]
    async fn party_resized_during_seating_is_rolled_back() {
        let tables = registry(&[2, 8]).await;
        let journal = tables.journal().clone();
        let book = interfering_book(&tables, |r| {
            r.update(
                ReservationPatch {
                    party_size: Some(6),
                    ..Default::default()
                },
                &OperationalSettings::default(),
            )
        });

        let reservation = book.create(booking(2)).await.unwrap();
        let result = book.seat(reservation.id()).await;
        assert!(matches!(result, Err(DomainError::Conflict(_))));

        let table = tables.find_by_id(TableId::new(1)).await.unwrap();
        assert_eq!(table.status(), TableStatus::Available);

        let reservation = book.find_by_id(reservation.id()).await.unwrap();
        assert_eq!(reservation.status(), ReservationStatus::Confirmed);
        assert_eq!(reservation.party_size(), 6);
        assert!(reservation.table_id().is_none());

        let compensated = seating_runs(&journal, SeatingState::Compensated).await;
        assert_eq!(compensated.len(), 1);
    }
}
