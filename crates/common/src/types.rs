use serde::{Deserialize, Serialize};

/// Integer identifier assigned by an owning collection.
///
/// Fresh identifiers are allocated as "largest existing + 1", starting at 1
/// for an empty collection.
pub trait RecordId:
    Copy + Eq + Ord + std::hash::Hash + std::fmt::Debug + std::fmt::Display + Send + Sync + 'static
{
    /// Wraps a raw value.
    fn from_raw(raw: u32) -> Self;

    /// Returns the raw value.
    fn as_raw(&self) -> u32;

    /// Returns the first identifier handed out by an empty collection.
    fn first() -> Self {
        Self::from_raw(1)
    }

    /// Returns the identifier following this one.
    fn next(&self) -> Self {
        Self::from_raw(self.as_raw() + 1)
    }
}

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Creates an identifier from a raw value.
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }
        }

        impl RecordId for $name {
            fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            fn as_raw(&self) -> u32 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

record_id!(
    /// Identity of a physical table.
    TableId
);

record_id!(
    /// Identity of a reservation (booked or walk-in).
    ReservationId
);

record_id!(
    /// Identity of an order.
    OrderId
);

/// Display label of a table, unique per restaurant.
///
/// Orders reference their table by this label rather than by [`TableId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableNumber(u32);

impl TableNumber {
    /// Creates a table number.
    pub const fn new(number: u32) -> Self {
        Self(number)
    }
}

impl std::fmt::Display for TableNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TableNumber {
    fn from(number: u32) -> Self {
        Self(number)
    }
}

/// Reference to the staff member serving a table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerId(String);

impl ServerId {
    /// Creates a server reference.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the reference as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ServerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ServerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ServerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
