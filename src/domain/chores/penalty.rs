//! Monthly chore penalties.
//!
//! Shortly after a month begins, each resident's points for the month just
//! ended are compared with what they owed. Every full `penalty_increment`
//! points of shortfall costs `hearts_per_increment` hearts.

use chrono::Duration;

use super::breaks::Interval;
use crate::domain::foundation::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PenaltyPolicy {
    pub points_per_resident: f64,
    pub penalty_increment: f64,
    pub hearts_per_increment: f64,
    pub penalty_delay: Duration,
}

impl PenaltyPolicy {
    /// Points a resident owed for a month they worked `working_pct` of.
    pub fn owed(&self, working_pct: f64) -> f64 {
        self.points_per_resident * working_pct
    }

    /// Hearts to deduct (non-negative) for earning `points` against the owed share.
    pub fn calculate(&self, points: f64, working_pct: f64) -> f64 {
        let deficit = (self.owed(working_pct) - points).max(0.0);
        if self.penalty_increment <= 0.0 {
            return 0.0;
        }
        (deficit / self.penalty_increment).floor() * self.hearts_per_increment
    }

    /// Earliest instant in `at`'s month at which penalties may be applied.
    pub fn due_at(&self, at: Timestamp) -> Timestamp {
        at.month_start().plus(self.penalty_delay)
    }

    pub fn is_due(&self, at: Timestamp) -> bool {
        at >= self.due_at(at)
    }

    /// The month a penalty applied at `at` settles: the one before it.
    pub fn assessed_month(at: Timestamp) -> Interval {
        Interval::new(at.previous_month_start(), at.month_start())
    }

    /// Window searched for an existing penalty before applying a new one.
    pub fn idempotency_window(at: Timestamp) -> Interval {
        Interval::new(at.month_start(), at)
    }
}
