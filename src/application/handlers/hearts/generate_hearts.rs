//! GenerateHeartsHandler and InitialiseResidentHandler.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{HouseId, ResidentId, Timestamp};
use crate::domain::hearts::{Heart, HeartError, HeartKind};
use crate::ports::HeartRepository;

/// Appends a signed entry; fractional and negative values are allowed.
#[derive(Debug, Clone)]
pub struct GenerateHeartsCommand {
    pub house_id: HouseId,
    pub resident_id: ResidentId,
    pub value: f64,
    pub now: Timestamp,
}

pub struct GenerateHeartsHandler {
    hearts: Arc<dyn HeartRepository>,
}

impl GenerateHeartsHandler {
    pub fn new(hearts: Arc<dyn HeartRepository>) -> Self {
        Self { hearts }
    }

    pub async fn handle(&self, cmd: GenerateHeartsCommand) -> Result<Heart, HeartError> {
        let heart = Heart::new(cmd.house_id, cmd.resident_id, cmd.value, HeartKind::Manual, cmd.now);
        self.hearts.insert(&heart).await?;
        info!(
            house_id = %heart.house_id,
            resident_id = %heart.resident_id,
            value = heart.value,
            "Hearts generated"
        );
        Ok(heart)
    }
}

#[derive(Debug, Clone)]
pub struct InitialiseResidentCommand {
    pub house_id: HouseId,
    pub resident_id: ResidentId,
    pub now: Timestamp,
}

pub struct InitialiseResidentHandler {
    hearts: Arc<dyn HeartRepository>,
    baseline: f64,
}

impl InitialiseResidentHandler {
    pub fn new(hearts: Arc<dyn HeartRepository>, baseline: f64) -> Self {
        Self { hearts, baseline }
    }

    /// Grants the baseline once; returns `None` if the resident already has it.
    pub async fn handle(&self, cmd: InitialiseResidentCommand) -> Result<Option<Heart>, HeartError> {
        let heart = Heart::new(
            cmd.house_id,
            cmd.resident_id,
            self.baseline,
            HeartKind::Initial,
            cmd.now,
        );
        if !self.hearts.insert_unless_exists(&heart, None).await? {
            return Ok(None);
        }
        info!(house_id = %heart.house_id, resident_id = %heart.resident_id, "Resident initialised");
        Ok(Some(heart))
    }
}
