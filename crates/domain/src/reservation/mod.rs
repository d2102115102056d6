//! Reservations, their lifecycle, and the seating flows.

mod aggregate;
mod book;
mod commands;
mod events;
mod state;

pub use aggregate::{Reservation, WALK_IN_PHONE};
pub use book::ReservationBook;
pub use commands::{NewReservation, ReservationPatch, WalkIn};
pub use events::{
    ReservationBookedData, ReservationCancelledData, ReservationConfirmedData, ReservationEvent,
    ReservationSeatedData, ReservationUpdatedData,
};
pub use state::ReservationStatus;
