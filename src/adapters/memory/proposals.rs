use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::lock;
use crate::domain::chores::ChoreProposal;
use crate::domain::foundation::{ChoreProposalId, DomainError, HouseId, Timestamp};
use crate::ports::ChoreProposalRepository;

/// In-memory implementation of the ChoreProposalRepository port.
#[derive(Default)]
pub struct InMemoryChoreProposalRepository {
    proposals: Mutex<HashMap<ChoreProposalId, ChoreProposal>>,
}

impl InMemoryChoreProposalRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChoreProposalRepository for InMemoryChoreProposalRepository {
    async fn save(&self, proposal: &ChoreProposal) -> Result<(), DomainError> {
        lock(&self.proposals)?.insert(proposal.id, proposal.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ChoreProposalId) -> Result<Option<ChoreProposal>, DomainError> {
        Ok(lock(&self.proposals)?.get(id).cloned())
    }

    async fn list_unresolved(&self, house_id: &HouseId) -> Result<Vec<ChoreProposal>, DomainError> {
        let mut proposals: Vec<ChoreProposal> = lock(&self.proposals)?
            .values()
            .filter(|p| &p.house_id == house_id && !p.is_resolved())
            .cloned()
            .collect();
        proposals.sort_by_key(|p| p.created_at);
        Ok(proposals)
    }

    async fn mark_resolved(&self, id: &ChoreProposalId, at: Timestamp) -> Result<bool, DomainError> {
        let mut proposals = lock(&self.proposals)?;
        match proposals.get_mut(id) {
            Some(p) if !p.is_resolved() => {
                p.resolved_at = Some(at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
