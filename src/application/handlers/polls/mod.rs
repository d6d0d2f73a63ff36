//! Poll handlers.
//!
//! ## Commands
//! - Create a poll
//! - Submit (or withdraw) a vote
//! - Merge metadata into a poll
//!
//! ## Queries
//! - Vote counts
//! - Validity of a closed poll

mod create_poll;
mod get_poll_results;
mod submit_vote;
mod update_poll_metadata;

pub use create_poll::{CreatePollCommand, CreatePollHandler};
pub(crate) use get_poll_results::is_poll_valid;
pub use get_poll_results::{
    GetPollResultsHandler, GetPollResultsQuery, IsPollValidHandler, IsPollValidQuery,
};
pub use submit_vote::{SubmitVoteCommand, SubmitVoteHandler};
pub use update_poll_metadata::{UpdatePollMetadataCommand, UpdatePollMetadataHandler};
