//! House and resident repository ports.
//!
//! Houses and residents are administered outside the governance engine; the
//! engine reads them to decide who is working and who may vote or be
//! challenged, and the admin surface writes them through these traits.

use crate::domain::foundation::{DomainError, HouseId, ResidentId};
use crate::domain::houses::{House, Resident};
use async_trait::async_trait;

/// Persistence for houses.
#[async_trait]
pub trait HouseRepository: Send + Sync {
    /// Inserts the house, or replaces its name and metadata if it exists.
    async fn upsert(&self, house: &House) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &HouseId) -> Result<Option<House>, DomainError>;

    /// Sets the claims channel. Returns false if the house does not exist.
    async fn set_chores_channel(&self, id: &HouseId, channel: &str) -> Result<bool, DomainError>;

    /// All houses, for periodic sweeps.
    async fn list(&self) -> Result<Vec<House>, DomainError>;
}

/// Persistence for residents.
#[async_trait]
pub trait ResidentRepository: Send + Sync {
    /// Inserts or replaces the resident keyed by (house, id).
    async fn upsert(&self, resident: &Resident) -> Result<(), DomainError>;

    async fn find(&self, house_id: &HouseId, id: &ResidentId) -> Result<Option<Resident>, DomainError>;

    /// Every resident ever added to the house, active or not.
    async fn list_by_house(&self, house_id: &HouseId) -> Result<Vec<Resident>, DomainError>;
}
