//! Poll engine - time-boxed yes/no voting with an affirmative quorum.
//!
//! Polls know nothing about what they ratify. Consumers (claims, proposals,
//! challenges) keep their own resolution markers and only ask a closed poll
//! whether it passed.
//!
//! # State machine
//!
//! ```text
//! Open ──(closes_at reached)──► Closed
//! ```
//!
//! Votes are accepted while open. Validity can only be asked once closed.

mod errors;
mod poll;
mod vote;

pub use errors::PollError;
pub use poll::Poll;
pub use vote::{PollResults, PollVote, VoteChoice};
