//! UpsertHouseHandler and SetChoresChannelHandler.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{DomainError, ErrorCode, HouseId, Metadata, Timestamp};
use crate::domain::houses::House;
use crate::ports::HouseRepository;

#[derive(Debug, Clone)]
pub struct UpsertHouseCommand {
    pub house_id: HouseId,
    pub name: Option<String>,
    pub metadata: Metadata,
    pub now: Timestamp,
}

pub struct UpsertHouseHandler {
    houses: Arc<dyn HouseRepository>,
}

impl UpsertHouseHandler {
    pub fn new(houses: Arc<dyn HouseRepository>) -> Self {
        Self { houses }
    }

    pub async fn handle(&self, cmd: UpsertHouseCommand) -> Result<House, DomainError> {
        let existing = self.houses.find_by_id(&cmd.house_id).await?;

        let mut house = match existing {
            Some(mut house) => {
                house.name = cmd.name;
                house
            }
            None => House::new(cmd.house_id, cmd.name, cmd.now),
        };
        house.metadata = cmd.metadata;

        self.houses.upsert(&house).await?;
        info!(house_id = %house.id, "House saved");
        Ok(house)
    }
}

#[derive(Debug, Clone)]
pub struct SetChoresChannelCommand {
    pub house_id: HouseId,
    pub channel: String,
}

pub struct SetChoresChannelHandler {
    houses: Arc<dyn HouseRepository>,
}

impl SetChoresChannelHandler {
    pub fn new(houses: Arc<dyn HouseRepository>) -> Self {
        Self { houses }
    }

    /// # Errors
    ///
    /// Returns `HouseNotFound` if the house was never saved.
    pub async fn handle(&self, cmd: SetChoresChannelCommand) -> Result<(), DomainError> {
        let updated = self
            .houses
            .set_chores_channel(&cmd.house_id, &cmd.channel)
            .await?;
        if !updated {
            return Err(DomainError::new(
                ErrorCode::HouseNotFound,
                format!("House not found: {}", cmd.house_id),
            ));
        }
        info!(house_id = %cmd.house_id, channel = %cmd.channel, "Chores channel set");
        Ok(())
    }
}
