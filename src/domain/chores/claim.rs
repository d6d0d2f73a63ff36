use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ChoreClaimId, ChoreId, HouseId, PollId, ResidentId, Timestamp};

/// Where a claim stands in its ratification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimStatus {
    Pending,
    Approved,
    Denied,
}

/// A resident's claim to the value accrued on a chore.
///
/// A claim stands (counts toward points and closes the books on earlier
/// value) until its poll denies it. `resolved_at` is the resolution marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoreClaim {
    pub id: ChoreClaimId,
    pub house_id: HouseId,
    pub chore_id: ChoreId,
    pub claimed_by: ResidentId,
    pub claimed_at: Timestamp,
    pub value: f64,
    pub poll_id: PollId,
    pub valid: bool,
    pub resolved_at: Option<Timestamp>,
}

impl ChoreClaim {
    pub fn new(
        house_id: HouseId,
        chore_id: ChoreId,
        claimed_by: ResidentId,
        claimed_at: Timestamp,
        value: f64,
        poll_id: PollId,
    ) -> Self {
        Self {
            id: ChoreClaimId::new(),
            house_id,
            chore_id,
            claimed_by,
            claimed_at,
            value,
            poll_id,
            valid: true,
            resolved_at: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved_at.is_some()
    }

    pub fn status(&self) -> ClaimStatus {
        match (self.resolved_at, self.valid) {
            (None, _) => ClaimStatus::Pending,
            (Some(_), true) => ClaimStatus::Approved,
            (Some(_), false) => ClaimStatus::Denied,
        }
    }

    /// Records the poll's verdict and the value the claim finally covers.
    pub fn resolve(&mut self, valid: bool, value: f64, resolved_at: Timestamp) {
        self.valid = valid;
        self.value = value;
        self.resolved_at = Some(resolved_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim() -> ChoreClaim {
        ChoreClaim::new(
            HouseId::new("T1").unwrap(),
            ChoreId::new(),
            ResidentId::new("U1").unwrap(),
            Timestamp::now(),
            10.0,
            PollId::new(),
        )
    }

    #[test]
    fn new_claim_is_pending_and_standing() {
        let c = claim();
        assert_eq!(c.status(), ClaimStatus::Pending);
        assert!(c.valid);
        assert!(!c.is_resolved());
    }

    #[test]
    fn resolve_sets_status() {
        let mut approved = claim();
        approved.resolve(true, 12.0, Timestamp::now());
        assert_eq!(approved.status(), ClaimStatus::Approved);
        assert_eq!(approved.value, 12.0);

        let mut denied = claim();
        denied.resolve(false, 10.0, Timestamp::now());
        assert_eq!(denied.status(), ClaimStatus::Denied);
    }
}
