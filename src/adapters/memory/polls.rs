use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::lock;
use crate::domain::foundation::{merge_metadata, DomainError, Metadata, PollId, ResidentId};
use crate::domain::polls::{Poll, PollResults, PollVote};
use crate::ports::PollRepository;

#[derive(Default)]
struct PollState {
    polls: HashMap<PollId, Poll>,
    votes: HashMap<(PollId, ResidentId), PollVote>,
}

/// In-memory implementation of the PollRepository port.
#[derive(Default)]
pub struct InMemoryPollRepository {
    state: Mutex<PollState>,
}

impl InMemoryPollRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PollRepository for InMemoryPollRepository {
    async fn save(&self, poll: &Poll) -> Result<(), DomainError> {
        lock(&self.state)?.polls.insert(poll.id, poll.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &PollId) -> Result<Option<Poll>, DomainError> {
        Ok(lock(&self.state)?.polls.get(id).cloned())
    }

    async fn upsert_vote(&self, vote: &PollVote) -> Result<(), DomainError> {
        lock(&self.state)?
            .votes
            .insert((vote.poll_id, vote.resident_id.clone()), vote.clone());
        Ok(())
    }

    async fn list_votes(&self, poll_id: &PollId) -> Result<Vec<PollVote>, DomainError> {
        let mut votes: Vec<PollVote> = lock(&self.state)?
            .votes
            .values()
            .filter(|v| &v.poll_id == poll_id)
            .cloned()
            .collect();
        votes.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at));
        Ok(votes)
    }

    async fn count_votes(&self, poll_id: &PollId) -> Result<PollResults, DomainError> {
        let state = lock(&self.state)?;
        Ok(PollResults::tally(
            state.votes.values().filter(|v| &v.poll_id == poll_id),
        ))
    }

    async fn merge_metadata(
        &self,
        poll_id: &PollId,
        patch: &Metadata,
    ) -> Result<Option<Poll>, DomainError> {
        let mut state = lock(&self.state)?;
        Ok(state.polls.get_mut(poll_id).map(|poll| {
            merge_metadata(&mut poll.metadata, patch.clone());
            poll.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use crate::domain::polls::VoteChoice;
    use chrono::Duration;
    use serde_json::json;

    fn resident(id: &str) -> ResidentId {
        ResidentId::new(id).unwrap()
    }

    #[tokio::test]
    async fn later_vote_replaces_earlier_one() {
        let repo = InMemoryPollRepository::new();
        let now = Timestamp::now();
        let poll = Poll::new(now, Duration::hours(1), 1).unwrap();
        repo.save(&poll).await.unwrap();

        repo.upsert_vote(&PollVote::new(poll.id, resident("U1"), VoteChoice::Yay, now))
            .await
            .unwrap();
        repo.upsert_vote(&PollVote::new(poll.id, resident("U1"), VoteChoice::Nay, now))
            .await
            .unwrap();

        let votes = repo.list_votes(&poll.id).await.unwrap();
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].vote, Some(false));
        assert_eq!(
            repo.count_votes(&poll.id).await.unwrap(),
            PollResults { yays: 0, nays: 1 }
        );
    }

    #[tokio::test]
    async fn counts_are_scoped_to_poll() {
        let repo = InMemoryPollRepository::new();
        let now = Timestamp::now();
        let a = Poll::new(now, Duration::hours(1), 1).unwrap();
        let b = Poll::new(now, Duration::hours(1), 1).unwrap();

        repo.upsert_vote(&PollVote::new(a.id, resident("U1"), VoteChoice::Yay, now))
            .await
            .unwrap();
        repo.upsert_vote(&PollVote::new(b.id, resident("U1"), VoteChoice::Yay, now))
            .await
            .unwrap();
        repo.upsert_vote(&PollVote::new(b.id, resident("U2"), VoteChoice::Cancel, now))
            .await
            .unwrap();

        assert_eq!(repo.count_votes(&b.id).await.unwrap(), PollResults { yays: 1, nays: 0 });
    }

    #[tokio::test]
    async fn merge_metadata_on_missing_poll_returns_none() {
        let repo = InMemoryPollRepository::new();
        let patch = json!({"k": 1}).as_object().cloned().unwrap();
        assert!(repo.merge_metadata(&PollId::new(), &patch).await.unwrap().is_none());
    }
}
