use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    merge_metadata, ChoreId, HouseId, Metadata, Timestamp, ValidationError,
};

/// A recurring household task.
///
/// Chores are never deleted; removal clears `active`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chore {
    pub id: ChoreId,
    pub house_id: HouseId,
    pub name: String,
    pub active: bool,
    pub metadata: Metadata,
    pub created_at: Timestamp,
}

impl Chore {
    /// Creates an active chore.
    ///
    /// # Errors
    ///
    /// Returns `EmptyField` if `name` is blank.
    pub fn new(
        house_id: HouseId,
        name: impl Into<String>,
        metadata: Metadata,
        created_at: Timestamp,
    ) -> Result<Self, ValidationError> {
        let name = normalize_name(name.into())?;
        Ok(Self {
            id: ChoreId::new(),
            house_id,
            name,
            active: true,
            metadata,
            created_at,
        })
    }

    /// Applies an edit in place, keeping the chore's identity.
    pub fn apply_edit(
        &mut self,
        name: Option<String>,
        patch: Metadata,
        active: bool,
    ) -> Result<(), ValidationError> {
        if let Some(name) = name {
            self.name = normalize_name(name)?;
        }
        merge_metadata(&mut self.metadata, patch);
        self.active = active;
        Ok(())
    }
}

fn normalize_name(name: String) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field("name"));
    }
    Ok(trimmed.to_string())
}
