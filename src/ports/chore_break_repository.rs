//! Chore break repository port.

use crate::domain::chores::ChoreBreak;
use crate::domain::foundation::{ChoreBreakId, DomainError, HouseId, ResidentId, Timestamp};
use async_trait::async_trait;

#[async_trait]
pub trait ChoreBreakRepository: Send + Sync {
    async fn save(&self, chore_break: &ChoreBreak) -> Result<(), DomainError>;

    /// Returns false if no such break exists.
    async fn delete(&self, id: &ChoreBreakId) -> Result<bool, DomainError>;

    /// The resident's breaks overlapping `[start, end)`.
    async fn list_for_resident(
        &self,
        house_id: &HouseId,
        resident_id: &ResidentId,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<ChoreBreak>, DomainError>;

    /// The house's breaks covering `at`.
    async fn list_covering(&self, house_id: &HouseId, at: Timestamp) -> Result<Vec<ChoreBreak>, DomainError>;
}
