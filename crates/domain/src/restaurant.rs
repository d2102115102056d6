//! The three front-of-house services wired to one journal.

use chrono::Utc;
use store::{Journal, SimulatedLatency};

use crate::error::Result;
use crate::order::OrderTracker;
use crate::reservation::ReservationBook;
use crate::seed::SeedData;
use crate::settings::OperationalSettings;
use crate::table::TableRegistry;

/// Settings applied when assembling a [`Restaurant`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestaurantConfig {
    pub settings: OperationalSettings,
    pub latency: SimulatedLatency,
}

/// Tables, reservations and orders sharing one journal.
///
/// Each instance owns its own stores, so independent instances never see
/// each other's changes.
#[derive(Clone)]
pub struct Restaurant {
    tables: TableRegistry,
    reservations: ReservationBook,
    orders: OrderTracker,
    journal: Journal,
}

impl Restaurant {
    /// Creates a restaurant with no tables, bookings or orders.
    pub fn new(config: RestaurantConfig) -> Self {
        let journal = Journal::new();
        let tables = TableRegistry::new(journal.clone(), config.latency);
        let reservations = ReservationBook::new(tables.clone(), config.settings, config.latency);
        let orders = OrderTracker::new(tables.clone(), config.latency);

        Self {
            tables,
            reservations,
            orders,
            journal,
        }
    }

    /// Creates a restaurant loaded with the given dataset.
    ///
    /// Seeding bypasses latency and leaves the journal empty.
    pub async fn seeded(config: RestaurantConfig, seed: &SeedData) -> Result<Self> {
        let records = seed.build(Utc::now(), &config.settings)?;
        let restaurant = Self::new(config);

        tracing::info!(
            tables = records.tables.len(),
            reservations = records.reservations.len(),
            orders = records.orders.len(),
            "loading seed data"
        );
        restaurant.tables.seed(records.tables).await;
        restaurant.reservations.seed(records.reservations).await;
        restaurant.orders.seed(records.orders).await;

        Ok(restaurant)
    }

    pub fn tables(&self) -> &TableRegistry {
        &self.tables
    }

    pub fn reservations(&self) -> &ReservationBook {
        &self.reservations
    }

    pub fn orders(&self) -> &OrderTracker {
        &self.orders
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn settings(&self) -> &OperationalSettings {
        self.reservations.settings()
    }
}
