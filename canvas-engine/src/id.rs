//! Identifier generation.
//!
//! Element and document ids are version 7 UUIDs: unique, and ordered by
//! creation time within a process. Ordering ids therefore orders records by
//! when they were created, which the element store relies on for stable
//! iteration.

use std::fmt;
use std::str::FromStr;
#[cfg(not(all(target_arch = "wasm32", feature = "wasm")))]
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! time_ordered_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a new id, ordered after every id generated before it.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Create from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// The underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Parse an id from its hyphenated string form.
            ///
            /// # Errors
            ///
            /// Returns an error if `s` is not a valid UUID.
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }
    };
}

time_ordered_id! {
    /// Unique identifier for a canvas element.
    ElementId
}

time_ordered_id! {
    /// Unique identifier for a persisted canvas document.
    DocumentId
}

/// Current Unix timestamp in milliseconds.
#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

/// Current Unix timestamp in milliseconds.
#[cfg(not(all(target_arch = "wasm32", feature = "wasm")))]
#[must_use]
pub fn now_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| {
        // Timestamp will not exceed u64 max for millennia
        #[allow(clippy::cast_possible_truncation)]
        {
            d.as_millis() as u64
        }
    })
}
