//! Chore proposal repository port.

use crate::domain::chores::ChoreProposal;
use crate::domain::foundation::{ChoreProposalId, DomainError, HouseId, Timestamp};
use async_trait::async_trait;

#[async_trait]
pub trait ChoreProposalRepository: Send + Sync {
    async fn save(&self, proposal: &ChoreProposal) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &ChoreProposalId) -> Result<Option<ChoreProposal>, DomainError>;

    async fn list_unresolved(&self, house_id: &HouseId) -> Result<Vec<ChoreProposal>, DomainError>;

    /// Sets `resolved_at` only if unset. Returns false if already resolved.
    async fn mark_resolved(&self, id: &ChoreProposalId, at: Timestamp) -> Result<bool, DomainError>;
}
