//! RunGovernanceSweepHandler - the periodic pass an external scheduler runs
//! for each house.
//!
//! Order matters: claims settle before values are emitted so a claim's
//! revaluation sees exactly the value that existed when it was made, and
//! penalties run last so they see every claim resolved this pass.

use serde::Serialize;
use tracing::info;

use super::chores::{
    AddChorePenaltiesCommand, AddChorePenaltiesHandler, ResolveChoreClaimsCommand,
    ResolveChoreClaimsHandler, UpdateChoreValuesCommand, UpdateChoreValuesHandler,
};
use super::hearts::{ResolveChallengesCommand, ResolveChallengesHandler};
use super::proposals::{ResolveChoreProposalsCommand, ResolveChoreProposalsHandler};
use crate::domain::foundation::{DomainError, HouseId, Timestamp};

#[derive(Debug, Clone)]
pub struct RunGovernanceSweepCommand {
    pub house_id: HouseId,
    pub now: Timestamp,
}

/// What one sweep did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SweepSummary {
    pub claims_resolved: usize,
    pub proposals_resolved: usize,
    pub challenges_resolved: usize,
    pub values_emitted: usize,
    pub penalties_applied: usize,
}

pub struct RunGovernanceSweepHandler {
    claims: ResolveChoreClaimsHandler,
    proposals: ResolveChoreProposalsHandler,
    challenges: ResolveChallengesHandler,
    values: UpdateChoreValuesHandler,
    penalties: AddChorePenaltiesHandler,
}

impl RunGovernanceSweepHandler {
    pub fn new(
        claims: ResolveChoreClaimsHandler,
        proposals: ResolveChoreProposalsHandler,
        challenges: ResolveChallengesHandler,
        values: UpdateChoreValuesHandler,
        penalties: AddChorePenaltiesHandler,
    ) -> Self {
        Self {
            claims,
            proposals,
            challenges,
            values,
            penalties,
        }
    }

    /// Safe to run repeatedly: every step is idempotent for a given `now`.
    pub async fn handle(&self, cmd: RunGovernanceSweepCommand) -> Result<SweepSummary, DomainError> {
        let house_id = cmd.house_id;
        let now = cmd.now;

        let claims = self
            .claims
            .handle(ResolveChoreClaimsCommand { house_id: house_id.clone(), now })
            .await?;
        let proposals = self
            .proposals
            .handle(ResolveChoreProposalsCommand { house_id: house_id.clone(), now })
            .await?;
        let challenges = self
            .challenges
            .handle(ResolveChallengesCommand { house_id: house_id.clone(), now })
            .await?;
        let values = self
            .values
            .handle(UpdateChoreValuesCommand { house_id: house_id.clone(), now })
            .await?;
        let penalties = self
            .penalties
            .handle(AddChorePenaltiesCommand { house_id: house_id.clone(), at: now })
            .await?;

        let summary = SweepSummary {
            claims_resolved: claims.len(),
            proposals_resolved: proposals.len(),
            challenges_resolved: challenges.len(),
            values_emitted: values.len(),
            penalties_applied: penalties.len(),
        };
        info!(
            house_id = %house_id,
            claims = summary.claims_resolved,
            proposals = summary.proposals_resolved,
            challenges = summary.challenges_resolved,
            values = summary.values_emitted,
            penalties = summary.penalties_applied,
            "Governance sweep complete"
        );
        Ok(summary)
    }
}
