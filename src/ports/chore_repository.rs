//! Chore repository port - chores and residents' preferences between them.

use crate::domain::chores::{Chore, ChorePreference};
use crate::domain::foundation::{ChoreId, DomainError, HouseId};
use async_trait::async_trait;

#[async_trait]
pub trait ChoreRepository: Send + Sync {
    /// Inserts the chore or replaces the stored one with the same id.
    async fn save(&self, chore: &Chore) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &ChoreId) -> Result<Option<Chore>, DomainError>;

    /// Looks a chore up by exact name within a house, active or not.
    async fn find_by_name(&self, house_id: &HouseId, name: &str) -> Result<Option<Chore>, DomainError>;

    /// Active chores ordered by name.
    async fn list_active(&self, house_id: &HouseId) -> Result<Vec<Chore>, DomainError>;

    /// Inserts or replaces the preference keyed by (resident, alpha, beta).
    async fn upsert_preference(&self, preference: &ChorePreference) -> Result<(), DomainError>;

    async fn list_preferences(&self, house_id: &HouseId) -> Result<Vec<ChorePreference>, DomainError>;
}
