//! Hearts - the household reputation ledger.
//!
//! Hearts are append-only signed entries; a resident's total is always the
//! sum of their entries. Challenges let one resident ask the house to take
//! hearts from another, settled by a poll.

mod challenge;
mod errors;
mod heart;

pub use challenge::{ChallengeOutcome, HeartChallenge};
pub use errors::HeartError;
pub use heart::{Heart, HeartKind, HeartsBoardEntry};
