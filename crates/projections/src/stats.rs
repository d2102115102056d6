//! Floor statistics for the dashboard.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use domain::{
    Money, Order, OrderStatus, Reservation, ReservationStatus, Table, TableStatus,
};
use serde::Serialize;

/// Snapshot of the floor, the kitchen pipeline and the reservation book.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_tables: usize,
    pub occupied_tables: usize,
    /// Share of occupied tables, rounded to a whole percent.
    pub occupancy_rate: u32,
    /// Sum of completed order totals.
    pub daily_revenue: Money,
    /// Guests of reservations seated on the day.
    pub covers_served: u32,
    /// Average minutes a party holds a table, rounded.
    pub avg_turnover_minutes: u32,
    pub tables_by_status: BTreeMap<&'static str, usize>,
    pub orders_by_status: BTreeMap<&'static str, usize>,
    pub reservations_by_status: BTreeMap<&'static str, usize>,
}

impl DashboardStats {
    /// Computes the statistics from record snapshots.
    ///
    /// `completed_turnover` is the journal-measured average of finished
    /// seatings. Without one, the time the currently occupied tables have
    /// been held so far is averaged instead.
    pub fn compute(
        tables: &[Table],
        reservations: &[Reservation],
        orders: &[Order],
        completed_turnover: Option<f64>,
        now: DateTime<Utc>,
    ) -> Self {
        let occupied: Vec<&Table> = tables
            .iter()
            .filter(|t| t.status().is_occupied())
            .collect();

        let occupancy_rate = if tables.is_empty() {
            0
        } else {
            (occupied.len() as f64 * 100.0 / tables.len() as f64).round() as u32
        };

        let daily_revenue = orders
            .iter()
            .filter(|o| o.status() == OrderStatus::Completed)
            .map(Order::total)
            .sum();

        let today = now.date_naive();
        let covers_served = reservations
            .iter()
            .filter(|r| r.status() == ReservationStatus::Seated && r.is_on(today))
            .map(Reservation::party_size)
            .sum();

        let avg_turnover_minutes = completed_turnover
            .or_else(|| ongoing_minutes(&occupied, now))
            .map(|m| m.round() as u32)
            .unwrap_or(0);

        Self {
            total_tables: tables.len(),
            occupied_tables: occupied.len(),
            occupancy_rate,
            daily_revenue,
            covers_served,
            avg_turnover_minutes,
            tables_by_status: count_by(TableStatus::ALL, tables, |s| s.as_str(), Table::status),
            orders_by_status: count_by(OrderStatus::ALL, orders, |s| s.as_str(), Order::status),
            reservations_by_status: count_by(
                ReservationStatus::ALL,
                reservations,
                |s| s.as_str(),
                Reservation::status,
            ),
        }
    }
}

fn ongoing_minutes(occupied: &[&Table], now: DateTime<Utc>) -> Option<f64> {
    let held: Vec<f64> = occupied
        .iter()
        .filter_map(|t| t.seated_at())
        .map(|seated_at| (now - seated_at).num_seconds().max(0) as f64 / 60.0)
        .collect();
    (!held.is_empty()).then(|| held.iter().sum::<f64>() / held.len() as f64)
}

/// Counts records per status, listing every status even when zero.
fn count_by<S, R, const N: usize>(
    all: [S; N],
    records: &[R],
    label: impl Fn(&S) -> &'static str,
    status: impl Fn(&R) -> S,
) -> BTreeMap<&'static str, usize>
where
    S: PartialEq,
{
    all.iter()
        .map(|s| (label(s), records.iter().filter(|r| status(r) == *s).count()))
        .collect()
}
