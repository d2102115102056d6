//! Table occupancy state machine.

use serde::{Deserialize, Serialize};

/// The occupancy status of a table.
///
/// State transitions:
/// ```text
///              ┌──────────► Reserved ──────┐
///              │               │           ▼
/// Available ◄──┴───────────────┘       Occupied ──► Cleaning
///    ▲  │                                ▲  │          │
///    │  └────────────────────────────────┘  │          │
///    └──────────────────────────────────────┴──────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    /// Free to seat a party.
    #[default]
    Available,

    /// A party is seated.
    Occupied,

    /// Held for an upcoming reservation.
    Reserved,

    /// Being reset after a party left.
    Cleaning,
}

impl TableStatus {
    /// All statuses, in display order.
    pub const ALL: [TableStatus; 4] = [
        TableStatus::Available,
        TableStatus::Occupied,
        TableStatus::Reserved,
        TableStatus::Cleaning,
    ];

    /// Returns true if the transition table allows moving to `to`.
    pub fn can_transition_to(&self, to: TableStatus) -> bool {
        use TableStatus::*;

        matches!(
            (self, to),
            (Available, Occupied)
                | (Available, Reserved)
                | (Reserved, Occupied)
                | (Reserved, Available)
                | (Occupied, Cleaning)
                | (Occupied, Available)
                | (Cleaning, Available)
        )
    }

    /// Returns true if a party is seated in this state.
    pub fn is_occupied(&self) -> bool {
        matches!(self, TableStatus::Occupied)
    }

    /// Returns true if a server may be assigned in this state.
    pub fn can_assign_server(&self) -> bool {
        matches!(self, TableStatus::Occupied | TableStatus::Reserved)
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            TableStatus::Available => "available",
            TableStatus::Occupied => "occupied",
            TableStatus::Reserved => "reserved",
            TableStatus::Cleaning => "cleaning",
        }
    }
}

impl std::fmt::Display for TableStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
