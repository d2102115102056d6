//! Domain layer for the front-of-house services.
//!
//! This crate provides:
//! - [`TableRegistry`]: tables and their occupancy state machine
//! - [`ReservationBook`]: reservations, their lifecycle, and the seating flows
//! - [`OrderTracker`]: orders and their preparation pipeline
//! - [`Restaurant`]: the three services wired to one journal, optionally seeded

pub mod aggregate;
pub mod error;
pub mod order;
pub mod reservation;
pub mod restaurant;
pub mod seating;
pub mod seed;
pub mod settings;
pub mod table;
mod validation;

pub use aggregate::{DomainEvent, Entity};
pub use error::{DomainError, Result};
pub use order::{
    MAX_PRICE, MAX_QUANTITY, MAX_TOTAL, Money, NewOrder, Order, OrderEvent, OrderItem, OrderPatch,
    OrderStatus, OrderTracker,
};
pub use reservation::{
    NewReservation, Reservation, ReservationBook, ReservationEvent, ReservationPatch,
    ReservationStatus, WALK_IN_PHONE, WalkIn,
};
pub use restaurant::{Restaurant, RestaurantConfig};
pub use seating::{
    SEATING_RECORD_TYPE, SeatingKind, SeatingRun, SeatingSaga, SeatingState, TableDirectory,
};
pub use seed::{EMBEDDED_SEED, SeedData, SeedRecords};
pub use settings::OperationalSettings;
pub use table::{NewTable, StatusExtra, Table, TableEvent, TableRegistry, TableStatus};
