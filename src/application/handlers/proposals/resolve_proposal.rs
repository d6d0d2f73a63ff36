//! ResolveChoreProposalHandler and the bulk ResolveChoreProposalsHandler.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::application::handlers::polls::is_poll_valid;
use crate::domain::chores::{Chore, ChoreError, ChoreProposal};
use crate::domain::foundation::{ChoreProposalId, HouseId, Timestamp};
use crate::ports::{ChoreProposalRepository, ChoreRepository, PollRepository};

/// How a proposal was settled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProposalOutcome {
    pub proposal: ChoreProposal,
    pub approved: bool,
    /// The chore as written. `None` when rejected, or when approved but the
    /// change no longer applies (the target chore is gone or the new name is
    /// taken).
    pub chore: Option<Chore>,
}

#[derive(Debug, Clone)]
pub struct GetChoreProposalQuery {
    pub proposal_id: ChoreProposalId,
}

pub struct GetChoreProposalHandler {
    proposals: Arc<dyn ChoreProposalRepository>,
}

impl GetChoreProposalHandler {
    pub fn new(proposals: Arc<dyn ChoreProposalRepository>) -> Self {
        Self { proposals }
    }

    pub async fn handle(&self, query: GetChoreProposalQuery) -> Result<ChoreProposal, ChoreError> {
        self.proposals
            .find_by_id(&query.proposal_id)
            .await?
            .ok_or(ChoreError::ProposalNotFound(query.proposal_id))
    }
}

#[derive(Debug, Clone)]
pub struct ResolveChoreProposalCommand {
    pub proposal_id: ChoreProposalId,
    pub now: Timestamp,
}

pub struct ResolveChoreProposalHandler {
    proposals: Arc<dyn ChoreProposalRepository>,
    polls: Arc<dyn PollRepository>,
    chores: Arc<dyn ChoreRepository>,
}

impl ResolveChoreProposalHandler {
    pub fn new(
        proposals: Arc<dyn ChoreProposalRepository>,
        polls: Arc<dyn PollRepository>,
        chores: Arc<dyn ChoreRepository>,
    ) -> Self {
        Self {
            proposals,
            polls,
            chores,
        }
    }

    /// Settles the proposal and, if approved, writes the chore change.
    ///
    /// The proposal is marked resolved before the chore is written, so a
    /// concurrent resolution can never apply it twice. An approved change
    /// that no longer fits the house is resolved without being applied.
    ///
    /// # Errors
    ///
    /// - `ProposalNotFound` if the proposal does not exist
    /// - `AlreadyResolved` if it was settled before
    /// - `Poll(NotClosed)` while the poll is open
    pub async fn handle(&self, cmd: ResolveChoreProposalCommand) -> Result<ProposalOutcome, ChoreError> {
        let mut proposal = self
            .proposals
            .find_by_id(&cmd.proposal_id)
            .await?
            .ok_or(ChoreError::ProposalNotFound(cmd.proposal_id))?;
        if proposal.is_resolved() {
            return Err(ChoreError::AlreadyResolved(proposal.id));
        }

        let approved = is_poll_valid(self.polls.as_ref(), &proposal.poll_id, cmd.now).await?;
        let chore = if approved {
            self.proposed_chore(&proposal, cmd.now).await?
        } else {
            None
        };

        if !self.proposals.mark_resolved(&proposal.id, cmd.now).await? {
            return Err(ChoreError::AlreadyResolved(proposal.id));
        }
        proposal.resolved_at = Some(cmd.now);

        if let Some(chore) = &chore {
            self.chores.save(chore).await?;
        }

        info!(
            proposal_id = %proposal.id,
            approved,
            chore_id = ?chore.as_ref().map(|c| c.id),
            "Chore proposal resolved"
        );
        Ok(ProposalOutcome {
            proposal,
            approved,
            chore,
        })
    }

    /// The chore as it would look with the proposal applied: the chore with
    /// the given id, else the one with the given name, else a new one.
    /// `None` if the targeted chore is gone or another chore holds the name.
    async fn proposed_chore(
        &self,
        proposal: &ChoreProposal,
        now: Timestamp,
    ) -> Result<Option<Chore>, ChoreError> {
        let patch = proposal.metadata.clone();

        if let Some(chore_id) = proposal.chore_id {
            let target = self
                .chores
                .find_by_id(&chore_id)
                .await?
                .filter(|c| c.house_id == proposal.house_id);
            let Some(mut chore) = target else {
                warn!(proposal_id = %proposal.id, chore_id = %chore_id, "Proposal target no longer exists");
                return Ok(None);
            };
            chore.apply_edit(proposal.name.clone(), patch, proposal.active)?;

            if let Some(other) = self.chores.find_by_name(&chore.house_id, &chore.name).await? {
                if other.id != chore.id {
                    warn!(
                        proposal_id = %proposal.id,
                        name = %chore.name,
                        "Proposed name belongs to another chore"
                    );
                    return Ok(None);
                }
            }
            return Ok(Some(chore));
        }

        let name = proposal
            .name
            .clone()
            .ok_or_else(|| ChoreError::InvalidProposal("a proposal needs a chore or a name".to_string()))?;
        match self.chores.find_by_name(&proposal.house_id, &name).await? {
            Some(mut chore) => {
                chore.apply_edit(None, patch, proposal.active)?;
                Ok(Some(chore))
            }
            None => {
                let mut chore = Chore::new(proposal.house_id.clone(), name, patch, now)?;
                chore.active = proposal.active;
                Ok(Some(chore))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolveChoreProposalsCommand {
    pub house_id: HouseId,
    pub now: Timestamp,
}

pub struct ResolveChoreProposalsHandler {
    proposals: Arc<dyn ChoreProposalRepository>,
    resolver: ResolveChoreProposalHandler,
}

impl ResolveChoreProposalsHandler {
    pub fn new(proposals: Arc<dyn ChoreProposalRepository>, resolver: ResolveChoreProposalHandler) -> Self {
        Self { proposals, resolver }
    }

    /// Resolves every proposal whose poll has closed. A proposal that fails
    /// to resolve is logged and left for the next pass; it never stops the
    /// others.
    pub async fn handle(&self, cmd: ResolveChoreProposalsCommand) -> Result<Vec<ProposalOutcome>, ChoreError> {
        let mut resolved = Vec::new();
        for proposal in self.proposals.list_unresolved(&cmd.house_id).await? {
            let result = self
                .resolver
                .handle(ResolveChoreProposalCommand {
                    proposal_id: proposal.id,
                    now: cmd.now,
                })
                .await;
            match result {
                Ok(outcome) => resolved.push(outcome),
                Err(err) if err.is_not_ready() => {
                    debug!(proposal_id = %proposal.id, "Proposal poll still open");
                }
                Err(ChoreError::AlreadyResolved(_)) => {
                    debug!(proposal_id = %proposal.id, "Proposal already resolved");
                }
                Err(err) => {
                    warn!(proposal_id = %proposal.id, error = %err, "Proposal resolution failed");
                }
            }
        }
        Ok(resolved)
    }
}
