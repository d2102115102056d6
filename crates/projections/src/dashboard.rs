//! Dashboard service: record snapshots plus journal-fed views.

use std::sync::Arc;

use chrono::Utc;
use domain::Restaurant;

use crate::Result;
use crate::processor::ProjectionProcessor;
use crate::stats::DashboardStats;
use crate::views::{ActivityItem, RecentActivityView, TurnoverView};

/// Answers the dashboard and activity queries for one restaurant.
///
/// Each query first catches the views up with the journal, so answers
/// include every change committed before the call. Clones share the views.
#[derive(Clone)]
pub struct Dashboard {
    restaurant: Restaurant,
    processor: Arc<ProjectionProcessor>,
    activity: RecentActivityView,
    turnover: TurnoverView,
}

impl Dashboard {
    /// Creates a dashboard over the restaurant's journal.
    pub fn new(restaurant: Restaurant, activity_capacity: usize) -> Self {
        let activity = RecentActivityView::new(activity_capacity);
        let turnover = TurnoverView::new();

        let mut processor = ProjectionProcessor::new(restaurant.journal().clone());
        processor.register(Box::new(activity.clone()));
        processor.register(Box::new(turnover.clone()));

        Self {
            restaurant,
            processor: Arc::new(processor),
            activity,
            turnover,
        }
    }

    pub fn restaurant(&self) -> &Restaurant {
        &self.restaurant
    }

    pub fn turnover(&self) -> &TurnoverView {
        &self.turnover
    }

    /// Feeds journal entries the views have not seen yet.
    pub async fn refresh(&self) -> Result<()> {
        self.processor.run_catch_up().await
    }

    /// Resets the views and replays the whole journal.
    pub async fn rebuild(&self) -> Result<()> {
        self.processor.rebuild_all().await
    }

    /// Computes the floor statistics.
    #[tracing::instrument(skip(self))]
    pub async fn stats(&self) -> Result<DashboardStats> {
        self.refresh().await?;

        let tables = self.restaurant.tables().list().await;
        let reservations = self.restaurant.reservations().list().await;
        let orders = self.restaurant.orders().list_all().await;
        let turnover = self.turnover.average_minutes().await;

        let stats = DashboardStats::compute(&tables, &reservations, &orders, turnover, Utc::now());
        metrics::gauge!("dashboard_occupancy_rate").set(f64::from(stats.occupancy_rate));
        tracing::debug!(
            occupancy_rate = stats.occupancy_rate,
            covers_served = stats.covers_served,
            "dashboard computed"
        );

        Ok(stats)
    }

    /// Returns up to `limit` feed items, newest first.
    #[tracing::instrument(skip(self))]
    pub async fn recent_activity(&self, limit: usize) -> Result<Vec<ActivityItem>> {
        self.refresh().await?;
        Ok(self.activity.recent(limit).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::DEFAULT_ACTIVITY_CAPACITY;
    use domain::{NewTable, RestaurantConfig, TableStatus, WalkIn};

    async fn dashboard() -> Dashboard {
        let restaurant = Restaurant::new(RestaurantConfig::default());
        for (number, capacity) in [(1, 2), (2, 4), (3, 4), (4, 6)] {
            restaurant
                .tables()
                .create(NewTable::new(number, capacity))
                .await
                .unwrap();
        }
        Dashboard::new(restaurant, DEFAULT_ACTIVITY_CAPACITY)
    }

    #[tokio::test]
    async fn test_stats_follow_walk_ins() {
        let dashboard = dashboard().await;
        assert_eq!(dashboard.stats().await.unwrap().occupancy_rate, 0);

        dashboard
            .restaurant()
            .reservations()
            .seat_walk_in(WalkIn::new("Bo", 3))
            .await
            .unwrap();

        let stats = dashboard.stats().await.unwrap();
        assert_eq!(stats.occupied_tables, 1);
        assert_eq!(stats.occupancy_rate, 25);
        assert_eq!(stats.covers_served, 3);
        assert_eq!(stats.reservations_by_status["seated"], 1);
    }

    #[tokio::test]
    async fn test_turnover_from_journal() {
        let dashboard = dashboard().await;
        let reservation = dashboard
            .restaurant()
            .reservations()
            .seat_walk_in(WalkIn::new("Bo", 2))
            .await
            .unwrap();
        let table_id = reservation.table_id().unwrap();
        dashboard
            .restaurant()
            .tables()
            .release(table_id)
            .await
            .unwrap();

        dashboard.stats().await.unwrap();

        assert_eq!(dashboard.turnover().completed_turns().await, 1);
        assert_eq!(
            dashboard
                .restaurant()
                .tables()
                .find_by_id(table_id)
                .await
                .unwrap()
                .status(),
            TableStatus::Available
        );
    }

    #[tokio::test]
    async fn test_activity_is_refreshed_per_query() {
        let dashboard = dashboard().await;
        assert!(dashboard.recent_activity(5).await.unwrap().is_empty());

        dashboard
            .restaurant()
            .reservations()
            .seat_walk_in(WalkIn::new("Bo", 2))
            .await
            .unwrap();

        let recent = dashboard.recent_activity(5).await.unwrap();
        assert_eq!(recent[0].event_type, "SeatingCompleted");
        assert_eq!(recent.len(), 4);
    }

    #[tokio::test]
    async fn test_rebuild_keeps_the_same_feed() {
        let dashboard = dashboard().await;
        dashboard
            .restaurant()
            .reservations()
            .seat_walk_in(WalkIn::new("Bo", 2))
            .await
            .unwrap();

        let before = dashboard.recent_activity(10).await.unwrap();
        dashboard.rebuild().await.unwrap();
        let after = dashboard.recent_activity(10).await.unwrap();

        assert_eq!(before, after);
    }
}
