//! Journal-fed read model views.

pub mod activity;
pub mod turnover;

pub use activity::{ActivityItem, DEFAULT_ACTIVITY_CAPACITY, RecentActivityView};
pub use turnover::{TableTurnover, TurnoverView};
