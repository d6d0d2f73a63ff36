//! Poll queries - vote counts and validity.

use std::sync::Arc;

use crate::domain::foundation::{PollId, Timestamp};
use crate::domain::polls::{PollError, PollResults};
use crate::ports::PollRepository;

#[derive(Debug, Clone)]
pub struct GetPollResultsQuery {
    pub poll_id: PollId,
}

pub struct GetPollResultsHandler {
    polls: Arc<dyn PollRepository>,
}

impl GetPollResultsHandler {
    pub fn new(polls: Arc<dyn PollRepository>) -> Self {
        Self { polls }
    }

    /// Counts yays and nays; withdrawn votes count toward neither.
    pub async fn handle(&self, query: GetPollResultsQuery) -> Result<PollResults, PollError> {
        Ok(self.polls.count_votes(&query.poll_id).await?)
    }
}

#[derive(Debug, Clone)]
pub struct IsPollValidQuery {
    pub poll_id: PollId,
    pub now: Timestamp,
}

pub struct IsPollValidHandler {
    polls: Arc<dyn PollRepository>,
}

impl IsPollValidHandler {
    pub fn new(polls: Arc<dyn PollRepository>) -> Self {
        Self { polls }
    }

    /// # Errors
    ///
    /// - `NotFound` if the poll does not exist
    /// - `NotClosed` while the poll is still open
    pub async fn handle(&self, query: IsPollValidQuery) -> Result<bool, PollError> {
        is_poll_valid(self.polls.as_ref(), &query.poll_id, query.now).await
    }
}

/// Shared by every workflow that ratifies through a poll.
pub(crate) async fn is_poll_valid(
    polls: &dyn PollRepository,
    poll_id: &PollId,
    now: Timestamp,
) -> Result<bool, PollError> {
    let poll = polls
        .find_by_id(poll_id)
        .await?
        .ok_or(PollError::NotFound(*poll_id))?;
    if !poll.is_closed_at(now) {
        return Err(PollError::NotClosed {
            poll_id: poll.id,
            closes_at: poll.closes_at,
        });
    }
    let results = polls.count_votes(poll_id).await?;
    poll.is_valid(results, now)
}
