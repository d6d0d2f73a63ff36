//! CreatePollHandler - opens a time-boxed poll.

use std::sync::Arc;

use chrono::Duration;
use tracing::debug;

use crate::domain::foundation::{Metadata, Timestamp};
use crate::domain::polls::{Poll, PollError};
use crate::ports::PollRepository;

#[derive(Debug, Clone)]
pub struct CreatePollCommand {
    pub now: Timestamp,
    pub duration: Duration,
    pub min_votes: u32,
    pub metadata: Metadata,
}

pub struct CreatePollHandler {
    polls: Arc<dyn PollRepository>,
}

impl CreatePollHandler {
    pub fn new(polls: Arc<dyn PollRepository>) -> Self {
        Self { polls }
    }

    pub async fn handle(&self, cmd: CreatePollCommand) -> Result<Poll, PollError> {
        let poll = Poll::new(cmd.now, cmd.duration, cmd.min_votes)?.with_metadata(cmd.metadata);
        self.polls.save(&poll).await?;
        debug!(poll_id = %poll.id, closes_at = %poll.closes_at, "Poll opened");
        Ok(poll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryPollRepository;

    #[tokio::test]
    async fn created_poll_is_persisted() {
        let polls = Arc::new(InMemoryPollRepository::new());
        let handler = CreatePollHandler::new(polls.clone());
        let now = Timestamp::from_ymd(2024, 4, 1).unwrap();

        let poll = handler
            .handle(CreatePollCommand {
                now,
                duration: Duration::hours(24),
                min_votes: 2,
                metadata: Metadata::new(),
            })
            .await
            .unwrap();

        let stored = polls.find_by_id(&poll.id).await.unwrap().unwrap();
        assert_eq!(stored.closes_at, now.add_hours(24));
        assert_eq!(stored.min_votes, 2);
    }

    #[tokio::test]
    async fn zero_duration_is_rejected() {
        let handler = CreatePollHandler::new(Arc::new(InMemoryPollRepository::new()));
        let result = handler
            .handle(CreatePollCommand {
                now: Timestamp::now(),
                duration: Duration::zero(),
                min_votes: 1,
                metadata: Metadata::new(),
            })
            .await;
        assert_eq!(result.unwrap_err(), PollError::InvalidDuration);
    }
}
