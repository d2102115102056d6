//! Reservation lifecycle.

use serde::{Deserialize, Serialize};

/// The status of a reservation.
///
/// State transitions:
/// ```text
/// Pending ──► Confirmed ──► Seated
///    │            │            │
///    └────────────┴────────────┴──► Cancelled
/// ```
///
/// Only a confirmed party is seated. Nothing leaves `Cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    /// Booked but not yet confirmed with the guest.
    Pending,

    /// Confirmed with the guest.
    #[default]
    Confirmed,

    /// The party sits at a table.
    Seated,

    /// Called off (terminal state).
    Cancelled,
}

impl ReservationStatus {
    /// All statuses, in display order.
    pub const ALL: [ReservationStatus; 4] = [
        ReservationStatus::Pending,
        ReservationStatus::Confirmed,
        ReservationStatus::Seated,
        ReservationStatus::Cancelled,
    ];

    /// Returns true if booking details may still change.
    pub fn is_open(&self) -> bool {
        matches!(self, ReservationStatus::Pending | ReservationStatus::Confirmed)
    }

    /// Returns true if the reservation can be confirmed.
    pub fn can_confirm(&self) -> bool {
        matches!(self, ReservationStatus::Pending)
    }

    /// Returns true if the party can be seated.
    pub fn can_seat(&self) -> bool {
        matches!(self, ReservationStatus::Confirmed)
    }

    /// Returns true if the reservation can be cancelled.
    pub fn can_cancel(&self) -> bool {
        !matches!(self, ReservationStatus::Cancelled)
    }

    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReservationStatus::Cancelled)
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Seated => "seated",
            ReservationStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ReservationStatus::*;

    #[test]
    fn test_default_is_confirmed() {
        assert_eq!(ReservationStatus::default(), Confirmed);
    }

    #[test]
    fn test_can_seat() {
        assert!(!Pending.can_seat());
        assert!(Confirmed.can_seat());
        assert!(!Seated.can_seat());
        assert!(!Cancelled.can_seat());
    }

    #[test]
    fn test_can_confirm() {
        assert!(Pending.can_confirm());
        assert!(!Confirmed.can_confirm());
        assert!(!Seated.can_confirm());
        assert!(!Cancelled.can_confirm());
    }

    #[test]
    fn test_can_cancel() {
        assert!(Pending.can_cancel());
        assert!(Confirmed.can_cancel());
        assert!(Seated.can_cancel());
        assert!(!Cancelled.can_cancel());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!Pending.is_terminal());
        assert!(!Confirmed.is_terminal());
        assert!(!Seated.is_terminal());
        assert!(Cancelled.is_terminal());
    }

    #[test]
    fn test_serialization() {
        assert_eq!(serde_json::to_string(&Seated).unwrap(), "\"seated\"");
        let status: ReservationStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(status, Pending);
    }
}
