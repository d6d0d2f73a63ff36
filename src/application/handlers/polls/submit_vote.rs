//! SubmitVoteHandler - records or replaces a resident's vote.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{PollId, ResidentId, Timestamp};
use crate::domain::polls::{PollError, PollVote, VoteChoice};
use crate::ports::PollRepository;

#[derive(Debug, Clone)]
pub struct SubmitVoteCommand {
    pub poll_id: PollId,
    pub resident_id: ResidentId,
    pub choice: VoteChoice,
    pub now: Timestamp,
}

pub struct SubmitVoteHandler {
    polls: Arc<dyn PollRepository>,
}

impl SubmitVoteHandler {
    pub fn new(polls: Arc<dyn PollRepository>) -> Self {
        Self { polls }
    }

    /// # Errors
    ///
    /// - `NotFound` if the poll does not exist
    /// - `Closed` if `now` is at or past the closing time
    pub async fn handle(&self, cmd: SubmitVoteCommand) -> Result<PollVote, PollError> {
        let poll = self
            .polls
            .find_by_id(&cmd.poll_id)
            .await?
            .ok_or(PollError::NotFound(cmd.poll_id))?;
        poll.ensure_open(cmd.now)?;

        let vote = PollVote::new(cmd.poll_id, cmd.resident_id, cmd.choice, cmd.now);
        self.polls.upsert_vote(&vote).await?;

        info!(
            poll_id = %vote.poll_id,
            resident_id = %vote.resident_id,
            choice = ?cmd.choice,
            "Vote submitted"
        );
        Ok(vote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryPollRepository;
    use crate::domain::polls::{Poll, PollResults};
    use chrono::Duration;

    async fn setup() -> (Arc<InMemoryPollRepository>, Poll) {
        let polls = Arc::new(InMemoryPollRepository::new());
        let poll = Poll::new(Timestamp::from_ymd(2024, 4, 1).unwrap(), Duration::hours(24), 2).unwrap();
        polls.save(&poll).await.unwrap();
        (polls, poll)
    }

    fn vote(poll: &Poll, resident: &str, choice: VoteChoice, now: Timestamp) -> SubmitVoteCommand {
        SubmitVoteCommand {
            poll_id: poll.id,
            resident_id: ResidentId::new(resident).unwrap(),
            choice,
            now,
        }
    }

    #[tokio::test]
    async fn revote_replaces_previous_choice() {
        let (polls, poll) = setup().await;
        let handler = SubmitVoteHandler::new(polls.clone());
        let now = poll.created_at.add_hours(1);

        handler.handle(vote(&poll, "U1", VoteChoice::Yay, now)).await.unwrap();
        handler.handle(vote(&poll, "U1", VoteChoice::Nay, now)).await.unwrap();

        let results = polls.count_votes(&poll.id).await.unwrap();
        assert_eq!(results, PollResults { yays: 0, nays: 1 });
    }

    #[tokio::test]
    async fn cancel_withdraws_vote() {
        let (polls, poll) = setup().await;
        let handler = SubmitVoteHandler::new(polls.clone());
        let now = poll.created_at.add_hours(1);

        handler.handle(vote(&poll, "U1", VoteChoice::Yay, now)).await.unwrap();
        handler.handle(vote(&poll, "U1", VoteChoice::Cancel, now)).await.unwrap();

        let results = polls.count_votes(&poll.id).await.unwrap();
        assert_eq!(results, PollResults { yays: 0, nays: 0 });
    }

    #[tokio::test]
    async fn vote_at_close_is_rejected() {
        let (polls, poll) = setup().await;
        let handler = SubmitVoteHandler::new(polls);

        let err = handler
            .handle(vote(&poll, "U1", VoteChoice::Yay, poll.closes_at))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Poll has closed");
    }

    #[tokio::test]
    async fn unknown_poll_is_not_found() {
        let (polls, _) = setup().await;
        let handler = SubmitVoteHandler::new(polls);
        let missing = PollId::new();

        let err = handler
            .handle(SubmitVoteCommand {
                poll_id: missing,
                resident_id: ResidentId::new("U1").unwrap(),
                choice: VoteChoice::Yay,
                now: Timestamp::now(),
            })
            .await
            .unwrap_err();
        assert_eq!(err, PollError::NotFound(missing));
    }
}
