use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PollId, ResidentId, Timestamp};

/// A resident's choice when voting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteChoice {
    Yay,
    Nay,
    /// Withdraws an earlier vote; stored as a null vote.
    Cancel,
}

impl VoteChoice {
    /// The stored value: `Some(true)` for yay, `Some(false)` for nay, `None` when withdrawn.
    pub fn as_vote(&self) -> Option<bool> {
        match self {
            VoteChoice::Yay => Some(true),
            VoteChoice::Nay => Some(false),
            VoteChoice::Cancel => None,
        }
    }
}

/// The latest vote of one resident on one poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollVote {
    pub poll_id: PollId,
    pub resident_id: ResidentId,
    pub vote: Option<bool>,
    pub submitted_at: Timestamp,
}

impl PollVote {
    pub fn new(poll_id: PollId, resident_id: ResidentId, choice: VoteChoice, at: Timestamp) -> Self {
        Self {
            poll_id,
            resident_id,
            vote: choice.as_vote(),
            submitted_at: at,
        }
    }
}

/// Affirmative and negative vote counts; withdrawn votes count toward neither.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollResults {
    pub yays: u32,
    pub nays: u32,
}

impl PollResults {
    pub fn tally<'a>(votes: impl IntoIterator<Item = &'a PollVote>) -> Self {
        votes.into_iter().fold(Self::default(), |mut acc, vote| {
            match vote.vote {
                Some(true) => acc.yays += 1,
                Some(false) => acc.nays += 1,
                None => {}
            }
            acc
        })
    }

    /// Quorum of affirmative votes and a strict majority over nays.
    pub fn passes(&self, min_votes: u32) -> bool {
        self.yays >= min_votes && self.yays > self.nays
    }
}
