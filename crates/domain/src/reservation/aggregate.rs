//! Reservation entity implementation.

use chrono::{DateTime, NaiveDate, Utc};
use common::{ReservationId, TableId};
use serde::Serialize;
use store::Record;

use crate::aggregate::Entity;
use crate::error::{DomainError, Result};
use crate::settings::OperationalSettings;
use crate::validation::{optional_text, require_party_size, require_text};

use super::{
    NewReservation, ReservationEvent, ReservationPatch, ReservationStatus, WalkIn,
    events::{ReservationBookedData, ReservationUpdatedData},
};

/// Phone placeholder marking reservations created for walk-in guests.
pub const WALK_IN_PHONE: &str = "Walk-in";

/// A booking, or a walk-in party recorded as one.
///
/// Invariant: the reservation is `Seated` exactly when `table_id` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reservation {
    id: ReservationId,
    customer_name: String,
    phone: String,
    party_size: u32,
    date_time: DateTime<Utc>,
    notes: Option<String>,
    status: ReservationStatus,
    table_id: Option<TableId>,
}

impl Record for Reservation {
    type Id = ReservationId;

    fn record_type() -> &'static str {
        "Reservation"
    }

    fn id(&self) -> ReservationId {
        self.id
    }
}

impl Entity for Reservation {
    type Event = ReservationEvent;

    fn apply(&mut self, event: Self::Event) {
        match event {
            ReservationEvent::ReservationBooked(data) => self.apply_booked(data),
            ReservationEvent::ReservationUpdated(data) => self.apply_updated(data),
            ReservationEvent::ReservationConfirmed(_) => {
                self.status = ReservationStatus::Confirmed;
            }
            ReservationEvent::ReservationSeated(data) => {
                self.status = ReservationStatus::Seated;
                self.table_id = Some(data.table_id);
            }
            ReservationEvent::ReservationCancelled(_) => {
                self.status = ReservationStatus::Cancelled;
                self.table_id = None;
            }
        }
    }
}

// Query methods
impl Reservation {
    pub fn id(&self) -> ReservationId {
        self.id
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn party_size(&self) -> u32 {
        self.party_size
    }

    pub fn date_time(&self) -> DateTime<Utc> {
        self.date_time
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn status(&self) -> ReservationStatus {
        self.status
    }

    pub fn table_id(&self) -> Option<TableId> {
        self.table_id
    }

    /// Returns true if this records a walk-in party.
    pub fn is_walk_in(&self) -> bool {
        self.phone == WALK_IN_PHONE
    }

    /// Returns true if the booking falls on the given calendar day (UTC).
    pub fn is_on(&self, date: NaiveDate) -> bool {
        self.date_time.date_naive() == date
    }
}

// Command methods (return events)
impl Reservation {
    /// Builds a new reservation with the given id.
    ///
    /// Starts `Confirmed` unless `Pending` is requested. `Seated` is only
    /// accepted together with a table.
    pub fn book(
        id: ReservationId,
        new: NewReservation,
        settings: &OperationalSettings,
    ) -> Result<(Reservation, Vec<ReservationEvent>)> {
        let customer_name = require_text("customer name", &new.customer_name)?;
        let phone = require_text("phone", &new.phone)?;
        let party_size = require_party_size(new.party_size, settings)?;

        let status = new.status.unwrap_or_default();
        match (status, new.table_id) {
            (ReservationStatus::Pending | ReservationStatus::Confirmed, None) => {}
            (ReservationStatus::Seated, Some(_)) => {}
            (ReservationStatus::Seated, None) => {
                return Err(DomainError::InvalidInput(
                    "a seated reservation needs a table".to_string(),
                ));
            }
            (ReservationStatus::Cancelled, _) => {
                return Err(DomainError::InvalidInput(
                    "a reservation cannot be created cancelled".to_string(),
                ));
            }
            (_, Some(_)) => {
                return Err(DomainError::InvalidInput(
                    "a table is only assigned when seating".to_string(),
                ));
            }
        }

        let reservation = Reservation {
            id,
            customer_name: String::new(),
            phone: String::new(),
            party_size: 0,
            date_time: new.date_time,
            notes: None,
            status,
            table_id: None,
        };
        let event = ReservationEvent::ReservationBooked(ReservationBookedData {
            customer_name,
            phone,
            party_size,
            date_time: new.date_time,
            notes: optional_text(new.notes),
            status,
            table_id: new.table_id,
        });

        Ok((reservation, vec![event]))
    }

    /// Builds the seated reservation recording a walk-in party.
    pub fn walk_in(
        id: ReservationId,
        walk_in: WalkIn,
        table_id: TableId,
        settings: &OperationalSettings,
    ) -> Result<(Reservation, Vec<ReservationEvent>)> {
        let mut new = NewReservation::new(
            walk_in.customer_name,
            WALK_IN_PHONE,
            walk_in.party_size,
            Utc::now(),
        )
        .seated_at_table(table_id);
        new.notes = walk_in.notes;

        Self::book(id, new, settings)
    }

    /// Corrects booking details while the reservation is still open.
    pub fn update(
        &self,
        patch: ReservationPatch,
        settings: &OperationalSettings,
    ) -> Result<Vec<ReservationEvent>> {
        if !self.status.is_open() {
            return Err(DomainError::invalid_transition(
                Self::record_type(),
                self.status,
                "updated",
            ));
        }

        let mut data = ReservationUpdatedData::default();
        if let Some(name) = patch.customer_name {
            let name = require_text("customer name", &name)?;
            if name != self.customer_name {
                data.customer_name = Some(name);
            }
        }
        if let Some(phone) = patch.phone {
            let phone = require_text("phone", &phone)?;
            if phone != self.phone {
                data.phone = Some(phone);
            }
        }
        if let Some(party_size) = patch.party_size {
            let party_size = require_party_size(party_size, settings)?;
            if party_size != self.party_size {
                data.party_size = Some(party_size);
            }
        }
        if let Some(date_time) = patch.date_time
            && date_time != self.date_time
        {
            data.date_time = Some(date_time);
        }
        if let Some(notes) = patch.notes {
            let notes = optional_text(Some(notes));
            if notes != self.notes {
                data.notes = Some(notes);
            }
        }

        let unchanged = data.customer_name.is_none()
            && data.phone.is_none()
            && data.party_size.is_none()
            && data.date_time.is_none()
            && data.notes.is_none();
        if unchanged {
            return Ok(vec![]);
        }

        Ok(vec![ReservationEvent::ReservationUpdated(data)])
    }

    /// Confirms a pending reservation. Confirming twice is a no-op.
    pub fn confirm(&self) -> Result<Vec<ReservationEvent>> {
        if self.status == ReservationStatus::Confirmed {
            return Ok(vec![]);
        }
        if !self.status.can_confirm() {
            return Err(DomainError::invalid_transition(
                Self::record_type(),
                self.status,
                ReservationStatus::Confirmed,
            ));
        }

        Ok(vec![ReservationEvent::confirmed()])
    }

    /// Marks the confirmed party as seated at the given table.
    pub fn seat(&self, table_id: TableId) -> Result<Vec<ReservationEvent>> {
        if !self.status.can_seat() {
            return Err(DomainError::invalid_transition(
                Self::record_type(),
                self.status,
                ReservationStatus::Seated,
            ));
        }

        Ok(vec![ReservationEvent::seated(table_id, self.party_size)])
    }

    /// Cancels the reservation, seated ones included. Cancelling twice is a
    /// no-op. The table of a seated party is recorded in the event and
    /// cleared from the reservation.
    pub fn cancel(&self) -> Result<Vec<ReservationEvent>> {
        if self.status == ReservationStatus::Cancelled {
            return Ok(vec![]);
        }
        if !self.status.can_cancel() {
            return Err(DomainError::invalid_transition(
                Self::record_type(),
                self.status,
                ReservationStatus::Cancelled,
            ));
        }

        Ok(vec![ReservationEvent::cancelled(self.status, self.table_id)])
    }
}

// Apply event helpers
impl Reservation {
    fn apply_booked(&mut self, data: ReservationBookedData) {
        self.customer_name = data.customer_name;
        self.phone = data.phone;
        self.party_size = data.party_size;
        self.date_time = data.date_time;
        self.notes = data.notes;
        self.status = data.status;
        self.table_id = data.table_id;
    }

    fn apply_updated(&mut self, data: ReservationUpdatedData) {
        if let Some(name) = data.customer_name {
            self.customer_name = name;
        }
        if let Some(phone) = data.phone {
            self.phone = phone;
        }
        if let Some(party_size) = data.party_size {
            self.party_size = party_size;
        }
        if let Some(date_time) = data.date_time {
            self.date_time = date_time;
        }
        if let Some(notes) = data.notes {
            self.notes = notes;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn settings() -> OperationalSettings {
        OperationalSettings::default()
    }

    fn dinner() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 14, 19, 30, 0).unwrap()
    }

    fn booked(new: NewReservation) -> Reservation {
        let (mut reservation, events) =
            Reservation::book(ReservationId::new(5), new, &settings()).unwrap();
        reservation.apply_events(events);
        reservation
    }

    fn confirmed() -> Reservation {
        booked(NewReservation::new("Ada Lovelace", "555-0101", 2, dinner()))
    }

    #[test]
    fn test_book_defaults_to_confirmed() {
        let reservation = confirmed();
        assert_eq!(reservation.id(), ReservationId::new(5));
        assert_eq!(reservation.customer_name(), "Ada Lovelace");
        assert_eq!(reservation.party_size(), 2);
        assert_eq!(reservation.status(), ReservationStatus::Confirmed);
        assert!(reservation.table_id().is_none());
    }

    #[test]
    fn test_book_pending() {
        let reservation =
            booked(NewReservation::new("Ada", "555-0101", 2, dinner()).pending());
        assert_eq!(reservation.status(), ReservationStatus::Pending);
    }

    #[test]
    fn test_book_validates_required_fields() {
        for new in [
            NewReservation::new(" ", "555-0101", 2, dinner()),
            NewReservation::new("Ada", "", 2, dinner()),
            NewReservation::new("Ada", "555-0101", 0, dinner()),
            NewReservation::new("Ada", "555-0101", 13, dinner()),
        ] {
            let result = Reservation::book(ReservationId::new(1), new, &settings());
            assert!(matches!(result, Err(DomainError::InvalidInput(_))));
        }
    }

    #[test]
    fn test_book_seated_requires_table() {
        let mut new = NewReservation::new("Ada", "555-0101", 2, dinner());
        new.status = Some(ReservationStatus::Seated);
        let result = Reservation::book(ReservationId::new(1), new, &settings());
        assert!(matches!(result, Err(DomainError::InvalidInput(_))));

        let reservation = booked(
            NewReservation::new("Ada", "555-0101", 2, dinner()).seated_at_table(TableId::new(3)),
        );
        assert_eq!(reservation.status(), ReservationStatus::Seated);
        assert_eq!(reservation.table_id(), Some(TableId::new(3)));
    }

    #[test]
    fn test_walk_in() {
        let (mut reservation, events) = Reservation::walk_in(
            ReservationId::new(9),
            WalkIn::new("Grace", 3),
            TableId::new(2),
            &settings(),
        )
        .unwrap();
        reservation.apply_events(events);

        assert!(reservation.is_walk_in());
        assert_eq!(reservation.phone(), WALK_IN_PHONE);
        assert_eq!(reservation.status(), ReservationStatus::Seated);
        assert_eq!(reservation.table_id(), Some(TableId::new(2)));
    }

    #[test]
    fn test_update_changes_only_given_fields() {
        let mut reservation = confirmed();
        let patch = ReservationPatch {
            party_size: Some(4),
            notes: Some("window seat".to_string()),
            ..Default::default()
        };

        let events = reservation.update(patch, &settings()).unwrap();
        reservation.apply_events(events);

        assert_eq!(reservation.party_size(), 4);
        assert_eq!(reservation.notes(), Some("window seat"));
        assert_eq!(reservation.customer_name(), "Ada Lovelace");

        let events = reservation
            .update(
                ReservationPatch {
                    notes: Some(" ".to_string()),
                    ..Default::default()
                },
                &settings(),
            )
            .unwrap();
        reservation.apply_events(events);
        assert_eq!(reservation.notes(), None);
    }

    #[test]
    fn test_update_with_same_values_is_noop() {
        let reservation = confirmed();
        let patch = ReservationPatch {
            party_size: Some(2),
            ..Default::default()
        };
        assert!(reservation.update(patch, &settings()).unwrap().is_empty());
    }

    #[test]
    fn test_update_after_seating_fails() {
        let mut reservation = confirmed();
        let events = reservation.seat(TableId::new(1)).unwrap();
        reservation.apply_events(events);

        let result = reservation.update(ReservationPatch::default(), &settings());
        assert!(matches!(result, Err(DomainError::InvalidTransition { .. })));
    }

    #[test]
    fn test_confirm() {
        let mut reservation =
            booked(NewReservation::new("Ada", "555-0101", 2, dinner()).pending());
        let events = reservation.confirm().unwrap();
        reservation.apply_events(events);
        assert_eq!(reservation.status(), ReservationStatus::Confirmed);
        assert!(reservation.confirm().unwrap().is_empty());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut reservation = confirmed();
        let events = reservation.cancel().unwrap();
        reservation.apply_events(events);
        assert_eq!(reservation.status(), ReservationStatus::Cancelled);

        assert!(reservation.cancel().unwrap().is_empty());
        assert_eq!(reservation.status(), ReservationStatus::Cancelled);
    }

    #[test]
    fn test_cancelled_cannot_be_seated_or_confirmed() {
        let mut reservation = confirmed();
        let events = reservation.cancel().unwrap();
        reservation.apply_events(events);

        assert!(reservation.seat(TableId::new(1)).is_err());
        assert!(reservation.confirm().is_err());
    }

    #[test]
    fn test_seated_can_be_cancelled() {
        let mut reservation = confirmed();
        let events = reservation.seat(TableId::new(1)).unwrap();
        reservation.apply_events(events);

        let events = reservation.cancel().unwrap();
        reservation.apply_events(events);
        assert_eq!(reservation.status(), ReservationStatus::Cancelled);
        assert_eq!(reservation.table_id(), None);
    }

    #[test]
    fn test_pending_cannot_be_seated() {
        let reservation =
            booked(NewReservation::new("Ada", "555-0101", 2, dinner()).pending());

        let result = reservation.seat(TableId::new(1));
        assert!(matches!(
            result,
            Err(DomainError::InvalidTransition { ref from, ref to, .. })
                if from == "pending" && to == "seated"
        ));
    }

    #[test]
    fn test_is_on_compares_calendar_day() {
        let reservation = confirmed();
        assert!(reservation.is_on(NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()));
        assert!(!reservation.is_on(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()));
    }
}
