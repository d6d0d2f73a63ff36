use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::{PollError, PollResults};
use crate::domain::foundation::{merge_metadata, Metadata, PollId, Timestamp};

/// A time-boxed vote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poll {
    pub id: PollId,
    pub created_at: Timestamp,
    pub closes_at: Timestamp,
    /// Minimum affirmative votes for the poll to pass.
    pub min_votes: u32,
    pub metadata: Metadata,
}

impl Poll {
    /// Opens a poll at `created_at` lasting `duration`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDuration` if `duration` is not positive.
    pub fn new(created_at: Timestamp, duration: Duration, min_votes: u32) -> Result<Self, PollError> {
        if duration <= Duration::zero() {
            return Err(PollError::InvalidDuration);
        }
        Ok(Self {
            id: PollId::new(),
            created_at,
            closes_at: created_at.plus(duration),
            min_votes,
            metadata: Metadata::new(),
        })
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn duration(&self) -> Duration {
        self.closes_at.duration_since(&self.created_at)
    }

    /// Returns true once `at` has reached the closing time.
    pub fn is_closed_at(&self, at: Timestamp) -> bool {
        at >= self.closes_at
    }

    /// Rejects votes cast at or after the closing time.
    pub fn ensure_open(&self, at: Timestamp) -> Result<(), PollError> {
        if self.is_closed_at(at) {
            return Err(PollError::Closed {
                poll_id: self.id,
                closed_at: self.closes_at,
            });
        }
        Ok(())
    }

    /// Decides a closed poll: enough yays for quorum and strictly more yays than nays.
    ///
    /// # Errors
    ///
    /// Returns `NotClosed` while the poll is still open at `now`.
    pub fn is_valid(&self, results: PollResults, now: Timestamp) -> Result<bool, PollError> {
        if !self.is_closed_at(now) {
            return Err(PollError::NotClosed {
                poll_id: self.id,
                closes_at: self.closes_at,
            });
        }
        Ok(results.passes(self.min_votes))
    }

    pub fn merge_metadata(&mut self, patch: Metadata) {
        merge_metadata(&mut self.metadata, patch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn open_poll(min_votes: u32) -> (Poll, Timestamp) {
        let now = Timestamp::from_ymd(2024, 4, 1).unwrap();
        (Poll::new(now, Duration::hours(24), min_votes).unwrap(), now)
    }

    #[test]
    fn closes_at_is_creation_plus_duration() {
        let (poll, now) = open_poll(1);
        assert_eq!(poll.closes_at, now.add_hours(24));
        assert_eq!(poll.duration(), Duration::hours(24));
    }

    #[test]
    fn rejects_non_positive_duration() {
        let now = Timestamp::now();
        assert_eq!(Poll::new(now, Duration::zero(), 1), Err(PollError::InvalidDuration));
        assert_eq!(Poll::new(now, Duration::hours(-1), 1), Err(PollError::InvalidDuration));
    }

    #[test]
    fn ensure_open_rejects_at_closing_instant() {
        let (poll, now) = open_poll(1);
        assert!(poll.ensure_open(now.add_hours(23)).is_ok());
        assert!(matches!(
            poll.ensure_open(now.add_hours(24)),
            Err(PollError::Closed { .. })
        ));
    }

    #[test]
    fn is_valid_requires_closed_poll() {
        let (poll, now) = open_poll(1);
        let results = PollResults { yays: 3, nays: 0 };
        assert!(matches!(
            poll.is_valid(results, now.add_hours(1)),
            Err(PollError::NotClosed { .. })
        ));
        assert_eq!(poll.is_valid(results, now.add_hours(24)), Ok(true));
    }

    #[test]
    fn quorum_and_majority_both_required() {
        let (quorum_two, now) = open_poll(2);
        let closed = now.add_hours(48);
        assert_eq!(quorum_two.is_valid(PollResults { yays: 2, nays: 0 }, closed), Ok(true));

        let (quorum_three, _) = open_poll(3);
        assert_eq!(quorum_three.is_valid(PollResults { yays: 2, nays: 0 }, closed), Ok(false));

        let (quorum_one, _) = open_poll(1);
        assert_eq!(quorum_one.is_valid(PollResults { yays: 1, nays: 1 }, closed), Ok(false));
    }

    #[test]
    fn merge_metadata_is_last_write_wins() {
        let (mut poll, _) = open_poll(1);
        poll.merge_metadata(json!({"a": 1, "b": 1}).as_object().cloned().unwrap());
        poll.merge_metadata(json!({"b": 2}).as_object().cloned().unwrap());
        assert_eq!(poll.metadata.get("a"), Some(&json!(1)));
        assert_eq!(poll.metadata.get("b"), Some(&json!(2)));
    }
}
