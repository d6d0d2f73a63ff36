//! Chore breaks and break-adjusted participation.
//!
//! Time off is expressed as half-open intervals `[start, end)`. A resident's
//! uncovered share of a month is computed by merging every break-like
//! interval (explicit breaks, time before joining, time after exemption)
//! clipped to the month, so overlaps never count twice.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    ChoreBreakId, HouseId, Metadata, ResidentId, Timestamp, ValidationError,
};
use crate::domain::houses::Resident;

/// A half-open span of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl Interval {
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains(&self, at: Timestamp) -> bool {
        self.start <= at && at < self.end
    }

    pub fn duration(&self) -> Duration {
        if self.is_empty() {
            Duration::zero()
        } else {
            self.end.duration_since(&self.start)
        }
    }

    /// The part of this interval inside `bounds`, if any.
    pub fn clip(&self, bounds: &Interval) -> Option<Interval> {
        let clipped = Interval::new(self.start.max(bounds.start), self.end.min(bounds.end));
        (!clipped.is_empty()).then_some(clipped)
    }
}

/// Sorts and merges overlapping or touching intervals; empty ones are dropped.
pub fn merge_intervals(mut intervals: Vec<Interval>) -> Vec<Interval> {
    intervals.retain(|i| !i.is_empty());
    intervals.sort_by_key(|i| i.start);

    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for interval in intervals {
        match merged.last_mut() {
            Some(last) if interval.start <= last.end => {
                last.end = last.end.max(interval.end);
            }
            _ => merged.push(interval),
        }
    }
    merged
}

/// Total time covered by the union of `intervals`.
pub fn covered_duration(intervals: Vec<Interval>) -> Duration {
    merge_intervals(intervals)
        .iter()
        .fold(Duration::zero(), |acc, i| acc + i.duration())
}

/// A resident's time off from chores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoreBreak {
    pub id: ChoreBreakId,
    pub house_id: HouseId,
    pub resident_id: ResidentId,
    pub start: Timestamp,
    pub end: Timestamp,
    pub metadata: Metadata,
}

impl ChoreBreak {
    /// # Errors
    ///
    /// Returns `InvalidFormat` unless `start < end`.
    pub fn new(
        house_id: HouseId,
        resident_id: ResidentId,
        start: Timestamp,
        end: Timestamp,
        metadata: Metadata,
    ) -> Result<Self, ValidationError> {
        if end <= start {
            return Err(ValidationError::invalid_format(
                "end",
                "a break must end after it starts",
            ));
        }
        Ok(Self {
            id: ChoreBreakId::new(),
            house_id,
            resident_id,
            start,
            end,
            metadata,
        })
    }

    pub fn interval(&self) -> Interval {
        Interval::new(self.start, self.end)
    }

    pub fn covers(&self, at: Timestamp) -> bool {
        self.interval().contains(at)
    }
}

/// Share of the month containing `at` during which `resident` owed chores.
///
/// Residents that were never activated owe nothing (0.0). Breaks belonging
/// to other residents are ignored.
pub fn working_percentage(resident: &Resident, breaks: &[ChoreBreak], at: Timestamp) -> f64 {
    let Some(active_at) = resident.active_at else {
        return 0.0;
    };

    let month = Interval::new(at.month_start(), at.next_month_start());

    let mut off: Vec<Interval> = breaks
        .iter()
        .filter(|b| b.resident_id == resident.id)
        .map(ChoreBreak::interval)
        .collect();
    off.push(Interval::new(month.start, active_at));
    if let Some(exempt_at) = resident.exempt_at {
        off.push(Interval::new(exempt_at, month.end));
    }

    let clipped: Vec<Interval> = off.iter().filter_map(|i| i.clip(&month)).collect();
    let covered = covered_duration(clipped).num_seconds() as f64;
    let total = month.duration().num_seconds() as f64;

    (1.0 - covered / total).clamp(0.0, 1.0)
}
