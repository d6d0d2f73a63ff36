//! Monthly chore penalties.
//!
//! After `penalty_delay` into a month, each resident is assessed on the
//! month that just ended: the points they earned against the share they
//! owed given their breaks. Every full `penalty_increment` of shortfall costs
//! `hearts_per_increment` hearts. A penalty entry is written once per month
//! even when it is zero, which marks the resident as assessed.

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, info};

use super::accounting::resident_points;
use crate::domain::chores::{working_percentage, ChoreError, PenaltyPolicy};
use crate::domain::foundation::{HouseId, ResidentId, Timestamp};
use crate::domain::hearts::{Heart, HeartKind};
use crate::ports::{ChoreBreakRepository, ChoreLedger, HeartRepository, ResidentRepository};

#[derive(Debug, Clone)]
pub struct CalculatePenaltyQuery {
    pub house_id: HouseId,
    pub resident_id: ResidentId,
    pub at: Timestamp,
}

pub struct CalculatePenaltyHandler {
    residents: Arc<dyn ResidentRepository>,
    breaks: Arc<dyn ChoreBreakRepository>,
    ledger: Arc<dyn ChoreLedger>,
    policy: PenaltyPolicy,
}

impl CalculatePenaltyHandler {
    pub fn new(
        residents: Arc<dyn ResidentRepository>,
        breaks: Arc<dyn ChoreBreakRepository>,
        ledger: Arc<dyn ChoreLedger>,
        policy: PenaltyPolicy,
    ) -> Self {
        Self {
            residents,
            breaks,
            ledger,
            policy,
        }
    }

    /// Hearts owed for the month before `at`, as a non-negative amount.
    pub async fn handle(&self, query: CalculatePenaltyQuery) -> Result<f64, ChoreError> {
        let Some(resident) = self
            .residents
            .find(&query.house_id, &query.resident_id)
            .await?
        else {
            return Ok(0.0);
        };

        let month = PenaltyPolicy::assessed_month(query.at);
        let breaks = self
            .breaks
            .list_for_resident(&query.house_id, &query.resident_id, month.start, month.end)
            .await?;
        let pct = working_percentage(&resident, &breaks, month.start);

        let points = resident_points(
            self.ledger.as_ref(),
            &query.house_id,
            &query.resident_id,
            month.start,
            month.end.minus(Duration::milliseconds(1)),
        )
        .await?
        .unwrap_or(0.0);

        let penalty = self.policy.calculate(points, pct);
        debug!(
            resident_id = %query.resident_id,
            points,
            working_pct = pct,
            owed = self.policy.owed(pct),
            penalty,
            "Penalty calculated"
        );
        Ok(penalty)
    }
}

#[derive(Debug, Clone)]
pub struct AddChorePenaltyCommand {
    pub house_id: HouseId,
    pub resident_id: ResidentId,
    pub at: Timestamp,
}

pub struct AddChorePenaltyHandler {
    hearts: Arc<dyn HeartRepository>,
    calculator: CalculatePenaltyHandler,
    policy: PenaltyPolicy,
}

impl AddChorePenaltyHandler {
    pub fn new(
        hearts: Arc<dyn HeartRepository>,
        calculator: CalculatePenaltyHandler,
        policy: PenaltyPolicy,
    ) -> Self {
        Self {
            hearts,
            calculator,
            policy,
        }
    }

    /// Applies last month's penalty as a negative heart entry.
    ///
    /// Returns `None` without writing anything if the resident has no hearts
    /// yet, the penalty is not due, or this month's assessment already ran.
    pub async fn handle(&self, cmd: AddChorePenaltyCommand) -> Result<Option<Heart>, ChoreError> {
        if self
            .hearts
            .sum_for_resident(&cmd.house_id, &cmd.resident_id)
            .await?
            .is_none()
        {
            debug!(resident_id = %cmd.resident_id, "No hearts, skipping penalty");
            return Ok(None);
        }
        if !self.policy.is_due(cmd.at) {
            debug!(resident_id = %cmd.resident_id, due_at = %self.policy.due_at(cmd.at), "Penalty not due");
            return Ok(None);
        }

        let penalty = self
            .calculator
            .handle(CalculatePenaltyQuery {
                house_id: cmd.house_id.clone(),
                resident_id: cmd.resident_id.clone(),
                at: cmd.at,
            })
            .await?;

        // A zero penalty still records the month as assessed.
        let value = if penalty == 0.0 { 0.0 } else { -penalty };
        let heart = Heart::new(
            cmd.house_id,
            cmd.resident_id,
            value,
            HeartKind::Penalty,
            cmd.at,
        );
        let window = PenaltyPolicy::idempotency_window(cmd.at);
        if !self.hearts.insert_unless_exists(&heart, Some(window.start)).await? {
            debug!(resident_id = %heart.resident_id, "Penalty already applied this month");
            return Ok(None);
        }

        info!(
            house_id = %heart.house_id,
            resident_id = %heart.resident_id,
            penalty,
            "Chore penalty applied"
        );
        Ok(Some(heart))
    }
}

#[derive(Debug, Clone)]
pub struct AddChorePenaltiesCommand {
    pub house_id: HouseId,
    pub at: Timestamp,
}

pub struct AddChorePenaltiesHandler {
    residents: Arc<dyn ResidentRepository>,
    penalty: AddChorePenaltyHandler,
}

impl AddChorePenaltiesHandler {
    pub fn new(residents: Arc<dyn ResidentRepository>, penalty: AddChorePenaltyHandler) -> Self {
        Self { residents, penalty }
    }

    /// Assesses every resident of the house; returns the entries written.
    pub async fn handle(&self, cmd: AddChorePenaltiesCommand) -> Result<Vec<Heart>, ChoreError> {
        let mut applied = Vec::new();
        for resident in self.residents.list_by_house(&cmd.house_id).await? {
            let heart = self
                .penalty
                .handle(AddChorePenaltyCommand {
                    house_id: cmd.house_id.clone(),
                    resident_id: resident.id,
                    at: cmd.at,
                })
                .await?;
            applied.extend(heart);
        }
        Ok(applied)
    }
}
