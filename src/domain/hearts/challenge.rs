use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ChallengeId, HeartId, HouseId, PollId, ResidentId, Timestamp};
use crate::domain::polls::PollResults;

/// A request to the house to take hearts from a resident.
///
/// `heart_id` is the resolution marker: it links the single ledger entry the
/// challenge produced and is only ever set once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartChallenge {
    pub id: ChallengeId,
    pub house_id: HouseId,
    pub challenger: ResidentId,
    pub challengee: ResidentId,
    pub value: f64,
    pub poll_id: PollId,
    pub circumstance: Option<String>,
    pub created_at: Timestamp,
    pub heart_id: Option<HeartId>,
    pub resolved_at: Option<Timestamp>,
}

/// Who lost a challenge, and the vote that decided it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeOutcome {
    pub loser: ResidentId,
    pub results: PollResults,
    pub upheld: bool,
}

impl HeartChallenge {
    pub fn new(
        house_id: HouseId,
        challenger: ResidentId,
        challengee: ResidentId,
        value: f64,
        poll_id: PollId,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id: ChallengeId::new(),
            house_id,
            challenger,
            challengee,
            value,
            poll_id,
            circumstance: None,
            created_at,
            heart_id: None,
            resolved_at: None,
        }
    }

    pub fn with_circumstance(mut self, circumstance: impl Into<String>) -> Self {
        self.circumstance = Some(circumstance.into());
        self
    }

    pub fn is_resolved(&self) -> bool {
        self.heart_id.is_some()
    }

    /// The challengee loses only if the house upholds the challenge with at
    /// least `min_votes` yays and more yays than nays; otherwise the
    /// challenger pays for the failed challenge.
    pub fn decide(&self, results: PollResults, min_votes: u32) -> ChallengeOutcome {
        let upheld = results.passes(min_votes);
        let loser = if upheld {
            self.challengee.clone()
        } else {
            self.challenger.clone()
        };
        ChallengeOutcome {
            loser,
            results,
            upheld,
        }
    }
}
