//! Operational settings shared by the services.

use serde::{Deserialize, Serialize};

/// Limits applied when booking and seating guests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationalSettings {
    /// Largest party accepted for a reservation or walk-in.
    pub max_party_size: u32,
}

impl Default for OperationalSettings {
    fn default() -> Self {
        Self { max_party_size: 12 }
    }
}
