//! Poll repository port.
//!
//! Votes are keyed by (poll, resident): submitting again replaces the
//! earlier vote, so only the latest choice is ever stored.

use crate::domain::foundation::{DomainError, Metadata, PollId};
use crate::domain::polls::{Poll, PollResults, PollVote};
use async_trait::async_trait;

#[async_trait]
pub trait PollRepository: Send + Sync {
    async fn save(&self, poll: &Poll) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &PollId) -> Result<Option<Poll>, DomainError>;

    /// Inserts the vote or overwrites the resident's previous vote on the poll.
    async fn upsert_vote(&self, vote: &PollVote) -> Result<(), DomainError>;

    async fn list_votes(&self, poll_id: &PollId) -> Result<Vec<PollVote>, DomainError>;

    /// Counts non-null votes by value.
    async fn count_votes(&self, poll_id: &PollId) -> Result<PollResults, DomainError>;

    /// Shallow-merges `patch` into the poll's metadata and returns the updated poll.
    ///
    /// Returns `None` if the poll does not exist.
    async fn merge_metadata(
        &self,
        poll_id: &PollId,
        patch: &Metadata,
    ) -> Result<Option<Poll>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn PollRepository) {}
    }
}
