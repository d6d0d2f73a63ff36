//! Chore valuation - how much of the monthly budget each chore earns per update.
//!
//! Every valuation emits one ledger entry per active chore:
//!
//! ```text
//! value = points_per_resident × working_residents × interval_scalar × inflation × ranking
//! ```
//!
//! where the interval scalar is the fraction of the month elapsed since the
//! previous valuation. Summed over a month, the scalars add to one, so the
//! house emits `points_per_resident × residents × inflation` points.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ChoreId, ChoreValueId, HouseId, Timestamp};

/// Inputs shared by every chore in one valuation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuationParams {
    pub points_per_resident: f64,
    pub inflation_factor: f64,
    pub working_residents: usize,
    pub interval_scalar: f64,
}

impl ValuationParams {
    /// Points emitted for a chore holding `ranking` of the budget.
    pub fn value_for(&self, ranking: f64) -> f64 {
        self.points_per_resident
            * self.working_residents as f64
            * self.interval_scalar
            * self.inflation_factor
            * ranking
    }
}

/// What a valuation entry was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuationSnapshot {
    pub ranking: f64,
    pub residents: usize,
    pub scalar: f64,
}

/// One append-only valuation entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoreValue {
    pub id: ChoreValueId,
    pub house_id: HouseId,
    pub chore_id: ChoreId,
    pub valued_at: Timestamp,
    pub value: f64,
    pub snapshot: ValuationSnapshot,
}

impl ChoreValue {
    pub fn new(
        house_id: HouseId,
        chore_id: ChoreId,
        valued_at: Timestamp,
        params: &ValuationParams,
        ranking: f64,
    ) -> Self {
        Self {
            id: ChoreValueId::new(),
            house_id,
            chore_id,
            valued_at,
            value: params.value_for(ranking),
            snapshot: ValuationSnapshot {
                ranking,
                residents: params.working_residents,
                scalar: params.interval_scalar,
            },
        }
    }
}

/// Fraction of the month elapsed since the later of the last valuation and
/// the start of the month, counted in whole hours.
///
/// The month is the one containing the instant just before `now`, so a
/// valuation exactly at midnight on the first closes out the month that just
/// ended rather than starting an empty new one.
pub fn interval_scalar(last_valued_at: Option<Timestamp>, now: Timestamp) -> f64 {
    let reference = now.minus(Duration::milliseconds(1));
    let month_start = reference.month_start();
    let start = match last_valued_at {
        Some(last) if last > month_start => last,
        _ => month_start,
    };

    let elapsed_hours = now.duration_since(&start).num_hours().max(0);
    elapsed_hours as f64 / reference.hours_in_month() as f64
}
