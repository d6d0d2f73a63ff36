//! Claim lookups and poll-gated claim resolution.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::accounting::unclaimed_value;
use crate::application::handlers::polls::is_poll_valid;
use crate::domain::chores::{ChoreClaim, ChoreError};
use crate::domain::foundation::{ChoreClaimId, ChoreId, HouseId, Timestamp};
use crate::ports::{ChoreLedger, PollRepository};

#[derive(Debug, Clone)]
pub struct GetChoreClaimQuery {
    pub claim_id: ChoreClaimId,
}

pub struct GetChoreClaimHandler {
    ledger: Arc<dyn ChoreLedger>,
}

impl GetChoreClaimHandler {
    pub fn new(ledger: Arc<dyn ChoreLedger>) -> Self {
        Self { ledger }
    }

    pub async fn handle(&self, query: GetChoreClaimQuery) -> Result<ChoreClaim, ChoreError> {
        self.ledger
            .find_claim(&query.claim_id)
            .await?
            .ok_or(ChoreError::ClaimNotFound(query.claim_id))
    }
}

#[derive(Debug, Clone)]
pub struct GetLatestChoreClaimQuery {
    pub chore_id: ChoreId,
}

pub struct GetLatestChoreClaimHandler {
    ledger: Arc<dyn ChoreLedger>,
}

impl GetLatestChoreClaimHandler {
    pub fn new(ledger: Arc<dyn ChoreLedger>) -> Self {
        Self { ledger }
    }

    pub async fn handle(&self, query: GetLatestChoreClaimQuery) -> Result<Option<ChoreClaim>, ChoreError> {
        Ok(self.ledger.latest_claim(&query.chore_id).await?)
    }
}

#[derive(Debug, Clone)]
pub struct GetLargestChoreClaimQuery {
    pub house_id: HouseId,
    pub start: Timestamp,
    pub end: Timestamp,
}

pub struct GetLargestChoreClaimHandler {
    ledger: Arc<dyn ChoreLedger>,
}

impl GetLargestChoreClaimHandler {
    pub fn new(ledger: Arc<dyn ChoreLedger>) -> Self {
        Self { ledger }
    }

    /// Highest-valued claim that was not denied, made in `[start, end]`.
    pub async fn handle(&self, query: GetLargestChoreClaimQuery) -> Result<Option<ChoreClaim>, ChoreError> {
        Ok(self
            .ledger
            .largest_claim(&query.house_id, query.start, query.end)
            .await?)
    }
}

#[derive(Debug, Clone)]
pub struct ResolveChoreClaimCommand {
    pub claim_id: ChoreClaimId,
    pub now: Timestamp,
}

pub struct ResolveChoreClaimHandler {
    ledger: Arc<dyn ChoreLedger>,
    polls: Arc<dyn PollRepository>,
}

impl ResolveChoreClaimHandler {
    pub fn new(ledger: Arc<dyn ChoreLedger>, polls: Arc<dyn PollRepository>) -> Self {
        Self { ledger, polls }
    }

    /// Settles the claim from its poll.
    ///
    /// An approved claim is revalued over everything accrued since the
    /// previous standing claim, which picks up value left behind by denied
    /// claims. A denied claim keeps its value for the record but no longer
    /// counts as points or as a baseline.
    ///
    /// Returns `Ok(None)` if the claim was already resolved.
    ///
    /// # Errors
    ///
    /// - `ClaimNotFound` if the claim does not exist
    /// - `Poll(NotClosed)` while the poll is open
    pub async fn handle(&self, cmd: ResolveChoreClaimCommand) -> Result<Option<ChoreClaim>, ChoreError> {
        let mut claim = self
            .ledger
            .find_claim(&cmd.claim_id)
            .await?
            .ok_or(ChoreError::ClaimNotFound(cmd.claim_id))?;
        if claim.is_resolved() {
            debug!(claim_id = %claim.id, "Claim already resolved");
            return Ok(None);
        }

        let valid = is_poll_valid(self.polls.as_ref(), &claim.poll_id, cmd.now).await?;
        let value = if valid {
            unclaimed_value(
                self.ledger.as_ref(),
                &claim.chore_id,
                claim.claimed_at,
                Some(&claim.id),
            )
            .await?
        } else {
            claim.value
        };

        claim.resolve(valid, value, cmd.now);
        if !self.ledger.resolve_claim(&claim).await? {
            debug!(claim_id = %claim.id, "Claim resolved concurrently");
            return Ok(None);
        }

        info!(
            claim_id = %claim.id,
            chore_id = %claim.chore_id,
            valid = claim.valid,
            value = claim.value,
            "Chore claim resolved"
        );
        Ok(Some(claim))
    }
}

#[derive(Debug, Clone)]
pub struct ResolveChoreClaimsCommand {
    pub house_id: HouseId,
    pub now: Timestamp,
}

pub struct ResolveChoreClaimsHandler {
    ledger: Arc<dyn ChoreLedger>,
    resolver: ResolveChoreClaimHandler,
}

impl ResolveChoreClaimsHandler {
    pub fn new(ledger: Arc<dyn ChoreLedger>, resolver: ResolveChoreClaimHandler) -> Self {
        Self { ledger, resolver }
    }

    /// Resolves every claim whose poll has closed, oldest first. A claim
    /// that fails is logged and retried on the next pass.
    pub async fn handle(&self, cmd: ResolveChoreClaimsCommand) -> Result<Vec<ChoreClaim>, ChoreError> {
        let mut resolved = Vec::new();
        for claim in self.ledger.list_unresolved_claims(&cmd.house_id).await? {
            let result = self
                .resolver
                .handle(ResolveChoreClaimCommand {
                    claim_id: claim.id,
                    now: cmd.now,
                })
                .await;
            match result {
                Ok(Some(claim)) => resolved.push(claim),
                Ok(None) => {}
                Err(err) if err.is_not_ready() => {
                    debug!(claim_id = %claim.id, "Claim poll still open");
                }
                Err(err) => {
                    warn!(claim_id = %claim.id, error = %err, "Claim resolution failed");
                }
            }
        }
        Ok(resolved)
    }
}
