//! Chore administration: add, edit, delete (soft), and list.

use std::sync::Arc;

use tracing::info;

use crate::domain::chores::{Chore, ChoreError};
use crate::domain::foundation::{merge_metadata, ChoreId, HouseId, Metadata, Timestamp};
use crate::ports::ChoreRepository;

#[derive(Debug, Clone)]
pub struct AddChoreCommand {
    pub house_id: HouseId,
    pub name: String,
    pub metadata: Metadata,
    pub now: Timestamp,
}

pub struct AddChoreHandler {
    chores: Arc<dyn ChoreRepository>,
}

impl AddChoreHandler {
    pub fn new(chores: Arc<dyn ChoreRepository>) -> Self {
        Self { chores }
    }

    /// Creates the chore, or reactivates the existing one with that name and
    /// merges the metadata into it.
    pub async fn handle(&self, cmd: AddChoreCommand) -> Result<Chore, ChoreError> {
        let fresh = Chore::new(cmd.house_id, cmd.name, cmd.metadata, cmd.now)?;

        let chore = match self.chores.find_by_name(&fresh.house_id, &fresh.name).await? {
            Some(mut existing) => {
                merge_metadata(&mut existing.metadata, fresh.metadata);
                existing.active = true;
                existing
            }
            None => fresh,
        };

        self.chores.save(&chore).await?;
        info!(chore_id = %chore.id, name = %chore.name, "Chore added");
        Ok(chore)
    }
}

#[derive(Debug, Clone)]
pub struct EditChoreCommand {
    pub chore_id: ChoreId,
    pub name: Option<String>,
    pub metadata: Metadata,
    /// `None` keeps the current flag.
    pub active: Option<bool>,
}

pub struct EditChoreHandler {
    chores: Arc<dyn ChoreRepository>,
}

impl EditChoreHandler {
    pub fn new(chores: Arc<dyn ChoreRepository>) -> Self {
        Self { chores }
    }

    /// Edits in place; the chore keeps its id, so its value history and
    /// preferences carry over.
    ///
    /// # Errors
    ///
    /// - `ChoreNotFound` if the chore does not exist
    /// - `Validation` if the new name is blank
    /// - `DuplicateName` if another chore in the house has the new name
    pub async fn handle(&self, cmd: EditChoreCommand) -> Result<Chore, ChoreError> {
        let mut chore = self
            .chores
            .find_by_id(&cmd.chore_id)
            .await?
            .ok_or(ChoreError::ChoreNotFound(cmd.chore_id))?;

        let active = cmd.active.unwrap_or(chore.active);
        chore.apply_edit(cmd.name, cmd.metadata, active)?;

        if let Some(other) = self.chores.find_by_name(&chore.house_id, &chore.name).await? {
            if other.id != chore.id {
                return Err(ChoreError::DuplicateName(chore.name));
            }
        }

        self.chores.save(&chore).await?;
        info!(chore_id = %chore.id, name = %chore.name, active = chore.active, "Chore edited");
        Ok(chore)
    }
}

#[derive(Debug, Clone)]
pub struct DeleteChoreCommand {
    pub chore_id: ChoreId,
}

pub struct DeleteChoreHandler {
    chores: Arc<dyn ChoreRepository>,
}

impl DeleteChoreHandler {
    pub fn new(chores: Arc<dyn ChoreRepository>) -> Self {
        Self { chores }
    }

    /// Clears the active flag. The chore and its history stay.
    pub async fn handle(&self, cmd: DeleteChoreCommand) -> Result<Chore, ChoreError> {
        let mut chore = self
            .chores
            .find_by_id(&cmd.chore_id)
            .await?
            .ok_or(ChoreError::ChoreNotFound(cmd.chore_id))?;
        chore.active = false;
        self.chores.save(&chore).await?;
        info!(chore_id = %chore.id, "Chore deleted");
        Ok(chore)
    }
}

#[derive(Debug, Clone)]
pub struct ListChoresQuery {
    pub house_id: HouseId,
}

pub struct ListChoresHandler {
    chores: Arc<dyn ChoreRepository>,
}

impl ListChoresHandler {
    pub fn new(chores: Arc<dyn ChoreRepository>) -> Self {
        Self { chores }
    }

    pub async fn handle(&self, query: ListChoresQuery) -> Result<Vec<Chore>, ChoreError> {
        Ok(self.chores.list_active(&query.house_id).await?)
    }
}
