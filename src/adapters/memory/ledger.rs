use async_trait::async_trait;
use std::sync::Mutex;

use super::lock;
use crate::domain::chores::{ChoreClaim, ChoreGift, ChoreValue};
use crate::domain::foundation::{
    ChoreClaimId, ChoreId, DomainError, ErrorCode, HouseId, ResidentId, Timestamp,
};
use crate::ports::ChoreLedger;

#[derive(Default)]
struct LedgerState {
    values: Vec<ChoreValue>,
    claims: Vec<ChoreClaim>,
    gifts: Vec<ChoreGift>,
}

/// In-memory implementation of the ChoreLedger port.
#[derive(Default)]
pub struct InMemoryChoreLedger {
    state: Mutex<LedgerState>,
}

impl InMemoryChoreLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// All valuation entries, oldest first.
    pub fn values(&self) -> Vec<ChoreValue> {
        self.state
            .lock()
            .map(|s| s.values.clone())
            .unwrap_or_default()
    }
}

fn sum_option(values: impl Iterator<Item = f64>) -> Option<f64> {
    values.fold(None, |acc, v| Some(acc.unwrap_or(0.0) + v))
}

#[async_trait]
impl ChoreLedger for InMemoryChoreLedger {
    async fn insert_values(&self, values: &[ChoreValue]) -> Result<(), DomainError> {
        lock(&self.state)?.values.extend_from_slice(values);
        Ok(())
    }

    async fn last_valued_at(&self, house_id: &HouseId) -> Result<Option<Timestamp>, DomainError> {
        Ok(lock(&self.state)?
            .values
            .iter()
            .filter(|v| &v.house_id == house_id)
            .map(|v| v.valued_at)
            .max())
    }

    async fn sum_values(
        &self,
        chore_id: &ChoreId,
        after: Option<Timestamp>,
        until: Timestamp,
    ) -> Result<f64, DomainError> {
        Ok(lock(&self.state)?
            .values
            .iter()
            .filter(|v| &v.chore_id == chore_id)
            .filter(|v| after.map_or(true, |after| v.valued_at > after) && v.valued_at <= until)
            .map(|v| v.value)
            .sum())
    }

    async fn sum_house_values(
        &self,
        house_id: &HouseId,
        after: Timestamp,
        until: Timestamp,
    ) -> Result<f64, DomainError> {
        Ok(lock(&self.state)?
            .values
            .iter()
            .filter(|v| &v.house_id == house_id && v.valued_at > after && v.valued_at <= until)
            .map(|v| v.value)
            .sum())
    }

    async fn save_claim(&self, claim: &ChoreClaim) -> Result<(), DomainError> {
        lock(&self.state)?.claims.push(claim.clone());
        Ok(())
    }

    async fn find_claim(&self, id: &ChoreClaimId) -> Result<Option<ChoreClaim>, DomainError> {
        Ok(lock(&self.state)?.claims.iter().find(|c| &c.id == id).cloned())
    }

    async fn latest_standing_claim(
        &self,
        chore_id: &ChoreId,
        until: Timestamp,
        excluding: Option<&ChoreClaimId>,
    ) -> Result<Option<ChoreClaim>, DomainError> {
        Ok(lock(&self.state)?
            .claims
            .iter()
            .filter(|c| &c.chore_id == chore_id && c.valid && c.claimed_at <= until)
            .filter(|c| excluding.map_or(true, |id| &c.id != id))
            .max_by_key(|c| c.claimed_at)
            .cloned())
    }

    async fn latest_claim(&self, chore_id: &ChoreId) -> Result<Option<ChoreClaim>, DomainError> {
        Ok(lock(&self.state)?
            .claims
            .iter()
            .filter(|c| &c.chore_id == chore_id)
            .max_by_key(|c| c.claimed_at)
            .cloned())
    }

    async fn list_unresolved_claims(&self, house_id: &HouseId) -> Result<Vec<ChoreClaim>, DomainError> {
        let mut claims: Vec<ChoreClaim> = lock(&self.state)?
            .claims
            .iter()
            .filter(|c| &c.house_id == house_id && !c.is_resolved())
            .cloned()
            .collect();
        claims.sort_by_key(|c| c.claimed_at);
        Ok(claims)
    }

    async fn resolve_claim(&self, claim: &ChoreClaim) -> Result<bool, DomainError> {
        let resolved_at = claim.resolved_at.ok_or_else(|| {
            DomainError::new(ErrorCode::InternalError, "Claim resolution requires resolved_at")
        })?;
        let mut state = lock(&self.state)?;
        match state.claims.iter_mut().find(|c| c.id == claim.id) {
            Some(stored) if !stored.is_resolved() => {
                stored.resolve(claim.valid, claim.value, resolved_at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn sum_claimed_points(
        &self,
        house_id: &HouseId,
        resident_id: &ResidentId,
        chore_id: Option<&ChoreId>,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Option<f64>, DomainError> {
        let state = lock(&self.state)?;
        Ok(sum_option(
            state
                .claims
                .iter()
                .filter(|c| &c.house_id == house_id && &c.claimed_by == resident_id && c.valid)
                .filter(|c| chore_id.map_or(true, |id| &c.chore_id == id))
                .filter(|c| c.claimed_at >= start && c.claimed_at <= end)
                .map(|c| c.value),
        ))
    }

    async fn largest_claim(
        &self,
        house_id: &HouseId,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Option<ChoreClaim>, DomainError> {
        Ok(lock(&self.state)?
            .claims
            .iter()
            .filter(|c| &c.house_id == house_id && c.valid)
            .filter(|c| c.claimed_at >= start && c.claimed_at <= end)
            .max_by(|a, b| a.value.total_cmp(&b.value))
            .cloned())
    }

    async fn save_gift(&self, gift: &ChoreGift) -> Result<(), DomainError> {
        lock(&self.state)?.gifts.push(gift.clone());
        Ok(())
    }

    async fn sum_gifted_points(
        &self,
        house_id: &HouseId,
        resident_id: &ResidentId,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Option<f64>, DomainError> {
        let state = lock(&self.state)?;
        Ok(sum_option(
            state
                .gifts
                .iter()
                .filter(|g| &g.house_id == house_id && g.gifted_at >= start && g.gifted_at <= end)
                .filter_map(|g| {
                    if &g.recipient == resident_id {
                        Some(g.value)
                    } else if &g.giver == resident_id {
                        Some(-g.value)
                    } else {
                        None
                    }
                }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chores::ValuationParams;
    use crate::domain::foundation::PollId;

    fn house() -> HouseId {
        HouseId::new("T1").unwrap()
    }

    fn resident(id: &str) -> ResidentId {
        ResidentId::new(id).unwrap()
    }

    fn value(chore_id: ChoreId, at: Timestamp, points: f64) -> ChoreValue {
        let params = ValuationParams {
            points_per_resident: points,
            inflation_factor: 1.0,
            working_residents: 1,
            interval_scalar: 1.0,
        };
        ChoreValue::new(house(), chore_id, at, &params, 1.0)
    }

    fn claim(chore_id: ChoreId, by: &str, at: Timestamp, points: f64) -> ChoreClaim {
        ChoreClaim::new(house(), chore_id, resident(by), at, points, PollId::new())
    }

    #[tokio::test]
    async fn sum_values_window_is_open_then_closed() {
        let ledger = InMemoryChoreLedger::new();
        let chore = ChoreId::new();
        let t0 = Timestamp::from_ymd(2024, 4, 1).unwrap();
        ledger
            .insert_values(&[value(chore, t0, 5.0), value(chore, t0.add_hours(1), 7.0)])
            .await
            .unwrap();

        assert_eq!(ledger.sum_values(&chore, None, t0.add_hours(1)).await.unwrap(), 12.0);
        assert_eq!(ledger.sum_values(&chore, Some(t0), t0.add_hours(1)).await.unwrap(), 7.0);
        assert_eq!(ledger.sum_values(&chore, Some(t0), t0).await.unwrap(), 0.0);
        assert_eq!(ledger.last_valued_at(&house()).await.unwrap(), Some(t0.add_hours(1)));
    }

    #[tokio::test]
    async fn latest_standing_claim_skips_denied_and_excluded() {
        let ledger = InMemoryChoreLedger::new();
        let chore = ChoreId::new();
        let t0 = Timestamp::from_ymd(2024, 4, 1).unwrap();
        let approved = claim(chore, "U1", t0, 5.0);
        let mut denied = claim(chore, "U1", t0.add_hours(1), 5.0);
        denied.resolve(false, 5.0, t0.add_hours(2));
        let pending = claim(chore, "U2", t0.add_hours(3), 5.0);
        for c in [&approved, &denied, &pending] {
            ledger.save_claim(c).await.unwrap();
        }

        let latest = ledger
            .latest_standing_claim(&chore, t0.add_hours(3), Some(&pending.id))
            .await
            .unwrap();
        assert_eq!(latest.map(|c| c.id), Some(approved.id));

        let latest_any = ledger.latest_claim(&chore).await.unwrap();
        assert_eq!(latest_any.map(|c| c.id), Some(pending.id));
    }

    #[tokio::test]
    async fn resolve_claim_is_conditional() {
        let ledger = InMemoryChoreLedger::new();
        let t0 = Timestamp::now();
        let mut c = claim(ChoreId::new(), "U1", t0, 5.0);
        ledger.save_claim(&c).await.unwrap();

        c.resolve(true, 6.0, t0.add_hours(1));
        assert!(ledger.resolve_claim(&c).await.unwrap());
        c.resolve(false, 0.0, t0.add_hours(2));
        assert!(!ledger.resolve_claim(&c).await.unwrap());

        let stored = ledger.find_claim(&c.id).await.unwrap().unwrap();
        assert!(stored.valid);
        assert_eq!(stored.value, 6.0);
    }

    #[tokio::test]
    async fn points_and_gifts_distinguish_absent_from_zero() {
        let ledger = InMemoryChoreLedger::new();
        let t0 = Timestamp::from_ymd(2024, 4, 1).unwrap();
        let end = t0.add_days(29);

        assert_eq!(
            ledger.sum_claimed_points(&house(), &resident("U1"), None, t0, end).await.unwrap(),
            None
        );

        ledger.save_claim(&claim(ChoreId::new(), "U1", t0.add_days(1), 10.0)).await.unwrap();
        let gift = ChoreGift::new(house(), resident("U1"), resident("U2"), 4.0, t0.add_days(2)).unwrap();
        ledger.save_gift(&gift).await.unwrap();

        assert_eq!(
            ledger.sum_claimed_points(&house(), &resident("U1"), None, t0, end).await.unwrap(),
            Some(10.0)
        );
        assert_eq!(
            ledger.sum_gifted_points(&house(), &resident("U1"), t0, end).await.unwrap(),
            Some(-4.0)
        );
        assert_eq!(
            ledger.sum_gifted_points(&house(), &resident("U2"), t0, end).await.unwrap(),
            Some(4.0)
        );
        assert_eq!(
            ledger.sum_gifted_points(&house(), &resident("U3"), t0, end).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn largest_claim_ignores_denied() {
        let ledger = InMemoryChoreLedger::new();
        let t0 = Timestamp::from_ymd(2024, 4, 1).unwrap();
        let mut big = claim(ChoreId::new(), "U1", t0, 50.0);
        big.resolve(false, 50.0, t0.add_hours(1));
        let medium = claim(ChoreId::new(), "U2", t0, 20.0);
        ledger.save_claim(&big).await.unwrap();
        ledger.save_claim(&medium).await.unwrap();

        let largest = ledger.largest_claim(&house(), t0, t0.add_days(1)).await.unwrap();
        assert_eq!(largest.map(|c| c.id), Some(medium.id));
    }
}
