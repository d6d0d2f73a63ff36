//! Chore ledger port - valuations, claims, and gifts.
//!
//! Valuations and gifts are append-only. Claims are written once and then
//! resolved at most once through a conditional update.
//!
//! Time windows are inclusive on both ends unless stated otherwise.

use crate::domain::chores::{ChoreClaim, ChoreGift, ChoreValue};
use crate::domain::foundation::{ChoreClaimId, ChoreId, DomainError, HouseId, ResidentId, Timestamp};
use async_trait::async_trait;

#[async_trait]
pub trait ChoreLedger: Send + Sync {
    async fn insert_values(&self, values: &[ChoreValue]) -> Result<(), DomainError>;

    /// Most recent valuation time across the house's chores.
    async fn last_valued_at(&self, house_id: &HouseId) -> Result<Option<Timestamp>, DomainError>;

    /// Sum of the chore's valuations in `(after, until]`; `after = None` means from the beginning.
    async fn sum_values(
        &self,
        chore_id: &ChoreId,
        after: Option<Timestamp>,
        until: Timestamp,
    ) -> Result<f64, DomainError>;

    /// Sum of all the house's valuations in `(after, until]`.
    async fn sum_house_values(
        &self,
        house_id: &HouseId,
        after: Timestamp,
        until: Timestamp,
    ) -> Result<f64, DomainError>;

    async fn save_claim(&self, claim: &ChoreClaim) -> Result<(), DomainError>;

    async fn find_claim(&self, id: &ChoreClaimId) -> Result<Option<ChoreClaim>, DomainError>;

    /// Latest claim on the chore made at or before `until` that was not
    /// denied, skipping `excluding`.
    async fn latest_standing_claim(
        &self,
        chore_id: &ChoreId,
        until: Timestamp,
        excluding: Option<&ChoreClaimId>,
    ) -> Result<Option<ChoreClaim>, DomainError>;

    /// Latest claim on the chore regardless of outcome.
    async fn latest_claim(&self, chore_id: &ChoreId) -> Result<Option<ChoreClaim>, DomainError>;

    async fn list_unresolved_claims(&self, house_id: &HouseId) -> Result<Vec<ChoreClaim>, DomainError>;

    /// Writes `valid`, `value`, and `resolved_at` only if the stored claim is
    /// still unresolved. Returns false if another resolution won.
    async fn resolve_claim(&self, claim: &ChoreClaim) -> Result<bool, DomainError>;

    /// Sum of the resident's standing claims (optionally for one chore) made
    /// in `[start, end]`, or `None` if there are none.
    async fn sum_claimed_points(
        &self,
        house_id: &HouseId,
        resident_id: &ResidentId,
        chore_id: Option<&ChoreId>,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Option<f64>, DomainError>;

    /// Highest-valued standing claim in the house made in `[start, end]`.
    async fn largest_claim(
        &self,
        house_id: &HouseId,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Option<ChoreClaim>, DomainError>;

    async fn save_gift(&self, gift: &ChoreGift) -> Result<(), DomainError>;

    /// Gifts received minus gifts given in `[start, end]`, or `None` if the
    /// resident neither gave nor received any.
    async fn sum_gifted_points(
        &self,
        house_id: &HouseId,
        resident_id: &ResidentId,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Option<f64>, DomainError>;
}
