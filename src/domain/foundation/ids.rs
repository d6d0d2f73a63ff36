//! Strongly-typed identifier value objects.
//!
//! Houses and residents are keyed by the chat workspace's own identifiers,
//! so they wrap validated strings. Everything the engine creates itself is
//! keyed by a random UUID.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Declares a UUID-backed identifier with the usual constructors and traits.
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            #[doc = concat!("Creates a new random ", stringify!($name), ".")]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            #[doc = concat!("Creates a ", stringify!($name), " from an existing UUID.")]
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
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
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

/// Declares a string-backed identifier that rejects empty values.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[doc = concat!("Creates a new ", stringify!($name), ", returning error if empty.")]
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(ValidationError::empty_field($field));
                }
                Ok(Self(id))
            }

            /// Returns the inner string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id!(
    /// Identifier of a house (one chat workspace).
    HouseId,
    "house_id"
);

string_id!(
    /// Identifier of a resident within a house.
    ResidentId,
    "resident_id"
);

uuid_id!(
    /// Unique identifier for a poll.
    PollId
);

uuid_id!(
    /// Unique identifier for a chore.
    ChoreId
);

uuid_id!(
    /// Unique identifier for a chore valuation ledger entry.
    ChoreValueId
);

uuid_id!(
    /// Unique identifier for a chore claim.
    ChoreClaimId
);

uuid_id!(
    /// Unique identifier for a point gift between residents.
    ChoreGiftId
);

uuid_id!(
    /// Unique identifier for a resident's chore break.
    ChoreBreakId
);

uuid_id!(
    /// Unique identifier for a chore proposal.
    ChoreProposalId
);

uuid_id!(
    /// Unique identifier for a hearts ledger entry.
    HeartId
);

uuid_id!(
    /// Unique identifier for a hearts challenge.
    ChallengeId
);
