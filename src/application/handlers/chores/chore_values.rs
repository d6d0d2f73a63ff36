//! Chore valuation: emitting points into the ledger and reading them back.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use super::accounting::{chore_rankings, unclaimed_value};
use crate::application::handlers::houses::working_residents;
use crate::config::GovernanceConfig;
use crate::domain::chores::{interval_scalar, ChoreError, ChoreValue, ValuationParams};
use crate::domain::foundation::{ChoreId, HouseId, Timestamp};
use crate::ports::{ChoreBreakRepository, ChoreLedger, ChoreRepository, ResidentRepository};

#[derive(Debug, Clone)]
pub struct GetChoreValueIntervalScalarQuery {
    pub house_id: HouseId,
    pub now: Timestamp,
}

pub struct GetChoreValueIntervalScalarHandler {
    ledger: Arc<dyn ChoreLedger>,
}

impl GetChoreValueIntervalScalarHandler {
    pub fn new(ledger: Arc<dyn ChoreLedger>) -> Self {
        Self { ledger }
    }

    pub async fn handle(&self, query: GetChoreValueIntervalScalarQuery) -> Result<f64, ChoreError> {
        let last = self.ledger.last_valued_at(&query.house_id).await?;
        Ok(interval_scalar(last, query.now))
    }
}

#[derive(Debug, Clone)]
pub struct GetUpdatedChoreValuesQuery {
    pub house_id: HouseId,
    pub now: Timestamp,
}

/// Computes the next valuation without writing it.
pub struct GetUpdatedChoreValuesHandler {
    chores: Arc<dyn ChoreRepository>,
    residents: Arc<dyn ResidentRepository>,
    breaks: Arc<dyn ChoreBreakRepository>,
    ledger: Arc<dyn ChoreLedger>,
    config: GovernanceConfig,
}

impl GetUpdatedChoreValuesHandler {
    pub fn new(
        chores: Arc<dyn ChoreRepository>,
        residents: Arc<dyn ResidentRepository>,
        breaks: Arc<dyn ChoreBreakRepository>,
        ledger: Arc<dyn ChoreLedger>,
        config: GovernanceConfig,
    ) -> Self {
        Self {
            chores,
            residents,
            breaks,
            ledger,
            config,
        }
    }

    /// One entry per active chore for the time since the last valuation.
    ///
    /// Returns nothing until at least a whole hour has passed, so sub-hour
    /// time is carried to the next valuation instead of being dropped.
    pub async fn handle(&self, query: GetUpdatedChoreValuesQuery) -> Result<Vec<ChoreValue>, ChoreError> {
        let last = self.ledger.last_valued_at(&query.house_id).await?;
        let scalar = interval_scalar(last, query.now);
        if scalar <= 0.0 {
            return Ok(Vec::new());
        }

        let working = working_residents(
            self.residents.as_ref(),
            self.breaks.as_ref(),
            &query.house_id,
            query.now,
        )
        .await?;
        let params = ValuationParams {
            points_per_resident: self.config.points_per_resident,
            inflation_factor: self.config.inflation_factor,
            working_residents: working.len(),
            interval_scalar: scalar,
        };

        let rankings = chore_rankings(
            self.chores.as_ref(),
            self.residents.as_ref(),
            &self.config.ranker(),
            &query.house_id,
            query.now,
        )
        .await?;

        Ok(rankings
            .into_iter()
            .map(|r| {
                ChoreValue::new(
                    query.house_id.clone(),
                    r.chore_id,
                    query.now,
                    &params,
                    r.ranking,
                )
            })
            .collect())
    }
}

#[derive(Debug, Clone)]
pub struct UpdateChoreValuesCommand {
    pub house_id: HouseId,
    pub now: Timestamp,
}

pub struct UpdateChoreValuesHandler {
    updated: GetUpdatedChoreValuesHandler,
    ledger: Arc<dyn ChoreLedger>,
}

impl UpdateChoreValuesHandler {
    pub fn new(updated: GetUpdatedChoreValuesHandler, ledger: Arc<dyn ChoreLedger>) -> Self {
        Self { updated, ledger }
    }

    /// Appends the next valuation to the ledger and returns it.
    pub async fn handle(&self, cmd: UpdateChoreValuesCommand) -> Result<Vec<ChoreValue>, ChoreError> {
        let values = self
            .updated
            .handle(GetUpdatedChoreValuesQuery {
                house_id: cmd.house_id.clone(),
                now: cmd.now,
            })
            .await?;
        if values.is_empty() {
            debug!(house_id = %cmd.house_id, "No chore values to emit");
            return Ok(values);
        }

        self.ledger.insert_values(&values).await?;
        info!(
            house_id = %cmd.house_id,
            chores = values.len(),
            total = values.iter().map(|v| v.value).sum::<f64>(),
            "Chore values updated"
        );
        Ok(values)
    }
}

/// A chore and the value a claim on it would receive now.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentChoreValue {
    pub chore_id: ChoreId,
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone)]
pub struct GetCurrentChoreValuesQuery {
    pub house_id: HouseId,
    pub now: Timestamp,
}

pub struct GetCurrentChoreValuesHandler {
    chores: Arc<dyn ChoreRepository>,
    ledger: Arc<dyn ChoreLedger>,
}

impl GetCurrentChoreValuesHandler {
    pub fn new(chores: Arc<dyn ChoreRepository>, ledger: Arc<dyn ChoreLedger>) -> Self {
        Self { chores, ledger }
    }

    /// Unclaimed value of every active chore, in name order.
    pub async fn handle(&self, query: GetCurrentChoreValuesQuery) -> Result<Vec<CurrentChoreValue>, ChoreError> {
        let mut current = Vec::new();
        for chore in self.chores.list_active(&query.house_id).await? {
            let value = unclaimed_value(self.ledger.as_ref(), &chore.id, query.now, None).await?;
            current.push(CurrentChoreValue {
                chore_id: chore.id,
                name: chore.name,
                value,
            });
        }
        Ok(current)
    }
}
