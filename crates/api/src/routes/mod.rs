//! HTTP handlers, one module per resource.

pub mod dashboard;
pub mod health;
pub mod metrics;
pub mod orders;
pub mod reservations;
pub mod tables;
