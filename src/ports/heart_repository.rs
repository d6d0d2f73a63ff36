//! Hearts repository port.
//!
//! Covers the append-only hearts ledger and the challenges that write to it.
//! Both live behind one port because resolving a challenge must insert its
//! heart and set the challenge's marker atomically.

use crate::domain::foundation::{ChallengeId, DomainError, HouseId, ResidentId, Timestamp};
use crate::domain::hearts::{Heart, HeartChallenge, HeartsBoardEntry};
use async_trait::async_trait;

#[async_trait]
pub trait HeartRepository: Send + Sync {
    async fn insert(&self, heart: &Heart) -> Result<(), DomainError>;

    /// Inserts `heart` unless the resident already has an entry of the same
    /// kind generated in `[since, heart.generated_at]`, or at any time when
    /// `since` is `None`. Returns true if the heart was inserted.
    ///
    /// Implementations must make the check and insert atomic.
    async fn insert_unless_exists(
        &self,
        heart: &Heart,
        since: Option<Timestamp>,
    ) -> Result<bool, DomainError>;

    /// Sum of the resident's entries, or `None` if they have none.
    async fn sum_for_resident(
        &self,
        house_id: &HouseId,
        resident_id: &ResidentId,
    ) -> Result<Option<f64>, DomainError>;

    async fn list_for_resident(
        &self,
        house_id: &HouseId,
        resident_id: &ResidentId,
    ) -> Result<Vec<Heart>, DomainError>;

    /// Per-resident totals for the house, highest first.
    async fn totals_by_house(&self, house_id: &HouseId) -> Result<Vec<HeartsBoardEntry>, DomainError>;

    async fn save_challenge(&self, challenge: &HeartChallenge) -> Result<(), DomainError>;

    async fn find_challenge(&self, id: &ChallengeId) -> Result<Option<HeartChallenge>, DomainError>;

    async fn list_unresolved_challenges(
        &self,
        house_id: &HouseId,
    ) -> Result<Vec<HeartChallenge>, DomainError>;

    /// Inserts `heart` and links it to the challenge, only if the challenge
    /// has no heart yet. Returns false (writing nothing) if it was already
    /// resolved.
    async fn resolve_challenge(
        &self,
        challenge_id: &ChallengeId,
        heart: &Heart,
    ) -> Result<bool, DomainError>;
}
