use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

macro_rules! record_id {
    ($(#[$doc:meta])* $name:ident, $label:literal) => {
        $(#[$doc])*
        ///
        /// Assigned by the store on insertion, monotonically increasing, and
        /// never reused within one store. The value `0` is reserved and never
        /// assigned.
        #[derive(
            Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wrap a raw id value.
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            /// The raw id value.
            pub const fn value(self) -> u64 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "#{}"), self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl FromStr for $name {
            type Err = TypeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<u64>()
                    .map(Self)
                    .map_err(|_| TypeError::InvalidRecordId(s.to_string()))
            }
        }
    };
}

record_id!(
    /// Identifier of a book row.
    BookId,
    "book"
);
record_id!(
    /// Identifier of a waypoint row (one narrative node of a book).
    WaypointId,
    "wp"
);
record_id!(
    /// Identifier of a content row (one-to-one with a waypoint).
    ContentId,
    "content"
);
record_id!(
    /// Identifier of a choice row (a labeled edge between two waypoints).
    ChoiceId,
    "choice"
);
