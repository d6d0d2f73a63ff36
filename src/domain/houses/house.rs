use serde::{Deserialize, Serialize};

use crate::domain::foundation::{HouseId, Metadata, Timestamp};

/// A household, created when the bot is installed into a workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct House {
    pub id: HouseId,
    pub name: Option<String>,
    /// Channel where chore claims are announced.
    pub chores_channel: Option<String>,
    pub metadata: Metadata,
    pub created_at: Timestamp,
}

impl House {
    pub fn new(id: HouseId, name: Option<String>, created_at: Timestamp) -> Self {
        Self {
            id,
            name,
            chores_channel: None,
            metadata: Metadata::new(),
            created_at,
        }
    }

    pub fn with_chores_channel(mut self, channel: impl Into<String>) -> Self {
        self.chores_channel = Some(channel.into());
        self
    }
}
