//! ClaimChoreHandler - asserts a chore was done and asks the house to agree.

use std::sync::Arc;

use chrono::Duration;
use tracing::info;

use super::accounting::unclaimed_value;
use crate::domain::chores::{ChoreClaim, ChoreError};
use crate::domain::foundation::{ChoreId, HouseId, ResidentId, Timestamp};
use crate::domain::polls::Poll;
use crate::ports::{ChoreLedger, ChoreRepository, PollRepository};

#[derive(Debug, Clone)]
pub struct ClaimChoreCommand {
    pub house_id: HouseId,
    pub chore_id: ChoreId,
    pub resident_id: ResidentId,
    pub now: Timestamp,
}

pub struct ClaimChoreHandler {
    chores: Arc<dyn ChoreRepository>,
    polls: Arc<dyn PollRepository>,
    ledger: Arc<dyn ChoreLedger>,
    poll_duration: Duration,
    min_votes: u32,
}

impl ClaimChoreHandler {
    pub fn new(
        chores: Arc<dyn ChoreRepository>,
        polls: Arc<dyn PollRepository>,
        ledger: Arc<dyn ChoreLedger>,
        poll_duration: Duration,
        min_votes: u32,
    ) -> Self {
        Self {
            chores,
            polls,
            ledger,
            poll_duration,
            min_votes,
        }
    }

    /// Claims everything accrued on the chore since its last standing claim.
    ///
    /// # Errors
    ///
    /// - `ChoreNotFound` if the chore is unknown, inactive, or in another house
    /// - `ZeroValueClaim` if nothing has accrued
    pub async fn handle(&self, cmd: ClaimChoreCommand) -> Result<ChoreClaim, ChoreError> {
        let chore = self
            .chores
            .find_by_id(&cmd.chore_id)
            .await?
            .filter(|c| c.active && c.house_id == cmd.house_id)
            .ok_or(ChoreError::ChoreNotFound(cmd.chore_id))?;

        let value = unclaimed_value(self.ledger.as_ref(), &chore.id, cmd.now, None).await?;
        if value <= 0.0 {
            return Err(ChoreError::ZeroValueClaim(chore.id));
        }

        let poll = Poll::new(cmd.now, self.poll_duration, self.min_votes)?;
        self.polls.save(&poll).await?;

        let claim = ChoreClaim::new(cmd.house_id, chore.id, cmd.resident_id, cmd.now, value, poll.id);
        self.ledger.save_claim(&claim).await?;

        info!(
            claim_id = %claim.id,
            chore = %chore.name,
            claimed_by = %claim.claimed_by,
            value = claim.value,
            poll_id = %poll.id,
            "Chore claimed"
        );
        Ok(claim)
    }
}
