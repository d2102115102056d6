//! Read models and dashboard statistics fed by the activity journal.
//!
//! This crate provides the query side of the front-of-house services:
//! - [`Projection`] trait for folding journal entries into read models
//! - [`ReadModel`] trait for query access to folded data
//! - [`ProjectionProcessor`] for feeding journal entries to projections
//! - Two views: recent activity and table turnover
//! - [`DashboardStats`] and the [`Dashboard`] service that serves them

pub mod dashboard;
pub mod error;
pub mod processor;
pub mod projection;
pub mod read_model;
pub mod stats;
pub mod views;

pub use dashboard::Dashboard;
pub use error::{ProjectionError, Result};
pub use processor::ProjectionProcessor;
pub use projection::{Projection, ProjectionPosition};
pub use read_model::ReadModel;
pub use stats::DashboardStats;
pub use views::{
    ActivityItem, DEFAULT_ACTIVITY_CAPACITY, RecentActivityView, TableTurnover, TurnoverView,
};
