use serde::{Deserialize, Serialize};

use crate::domain::foundation::{HouseId, ResidentId, Timestamp};

/// A member of a house.
///
/// `active_at` marks when the resident joined; a resident without one is
/// deactivated. `exempt_at` suspends chore obligations and challenge
/// eligibility from that instant onward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resident {
    pub house_id: HouseId,
    pub id: ResidentId,
    pub active_at: Option<Timestamp>,
    pub exempt_at: Option<Timestamp>,
}

impl Resident {
    /// Creates a resident that is active from `active_at`.
    pub fn active(house_id: HouseId, id: ResidentId, active_at: Timestamp) -> Self {
        Self {
            house_id,
            id,
            active_at: Some(active_at),
            exempt_at: None,
        }
    }

    /// Returns true if the resident had joined by `at`.
    pub fn is_active_at(&self, at: Timestamp) -> bool {
        self.active_at.map_or(false, |active_at| active_at <= at)
    }

    /// Returns true if an exemption had taken effect by `at`.
    pub fn is_exempt_at(&self, at: Timestamp) -> bool {
        self.exempt_at.map_or(false, |exempt_at| exempt_at <= at)
    }

    /// Active and not exempt: owes chores and may take part in challenges.
    pub fn is_eligible_at(&self, at: Timestamp) -> bool {
        self.is_active_at(at) && !self.is_exempt_at(at)
    }

    /// Marks the resident active from `at`; an existing exemption is kept.
    ///
    /// Re-activating an already active resident keeps the original join time.
    pub fn activate(&mut self, at: Timestamp) {
        if self.active_at.is_none() {
            self.active_at = Some(at);
        }
    }

    pub fn deactivate(&mut self) {
        self.active_at = None;
    }

    pub fn exempt(&mut self, at: Timestamp) {
        self.exempt_at = Some(at);
    }

    pub fn unexempt(&mut self) {
        self.exempt_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resident(active_at: Option<Timestamp>) -> Resident {
        Resident {
            house_id: HouseId::new("T1").unwrap(),
            id: ResidentId::new("U1").unwrap(),
            active_at,
            exempt_at: None,
        }
    }

    #[test]
    fn resident_without_activation_is_never_active() {
        let r = resident(None);
        assert!(!r.is_active_at(Timestamp::now()));
        assert!(!r.is_eligible_at(Timestamp::now()));
    }

    #[test]
    fn activation_takes_effect_at_its_timestamp() {
        let now = Timestamp::now();
        let r = resident(Some(now));
        assert!(!r.is_active_at(now.add_hours(-1)));
        assert!(r.is_active_at(now));
    }

    #[test]
    fn exemption_applies_from_its_timestamp_onward() {
        let now = Timestamp::now();
        let mut r = resident(Some(now.add_days(-10)));
        r.exempt(now);

        assert!(r.is_eligible_at(now.add_hours(-1)));
        assert!(!r.is_eligible_at(now));
        assert!(r.is_active_at(now));
    }

    #[test]
    fn unexempt_restores_eligibility() {
        let now = Timestamp::now();
        let mut r = resident(Some(now.add_days(-10)));
        r.exempt(now.add_days(-5));
        r.unexempt();
        assert!(r.is_eligible_at(now));
    }

    #[test]
    fn deactivate_clears_activation() {
        let now = Timestamp::now();
        let mut r = resident(Some(now.add_days(-1)));
        r.deactivate();
        assert!(r.active_at.is_none());
        assert!(!r.is_active_at(now));
    }

    #[test]
    fn activate_keeps_existing_join_time_and_exemption() {
        let now = Timestamp::now();
        let joined = now.add_days(-3);
        let mut r = resident(Some(joined));
        r.exempt(now.add_days(-1));
        r.activate(now);

        assert_eq!(r.active_at, Some(joined));
        assert!(r.exempt_at.is_some());
    }
}
