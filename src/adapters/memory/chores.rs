use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::lock;
use crate::domain::chores::{Chore, ChorePreference};
use crate::domain::foundation::{ChoreId, DomainError, ErrorCode, HouseId};
use crate::ports::ChoreRepository;

#[derive(Default)]
struct ChoreState {
    chores: HashMap<ChoreId, Chore>,
    preferences: Vec<ChorePreference>,
}

/// In-memory implementation of the ChoreRepository port.
#[derive(Default)]
pub struct InMemoryChoreRepository {
    state: Mutex<ChoreState>,
}

impl InMemoryChoreRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChoreRepository for InMemoryChoreRepository {
    async fn save(&self, chore: &Chore) -> Result<(), DomainError> {
        let mut state = lock(&self.state)?;
        let taken = state
            .chores
            .values()
            .any(|c| c.house_id == chore.house_id && c.name == chore.name && c.id != chore.id);
        if taken {
            return Err(DomainError::new(
                ErrorCode::DuplicateName,
                format!("Chore name already in use: {}", chore.name),
            )
            .with_detail("name", chore.name.clone()));
        }
        state.chores.insert(chore.id, chore.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ChoreId) -> Result<Option<Chore>, DomainError> {
        Ok(lock(&self.state)?.chores.get(id).cloned())
    }

    async fn find_by_name(&self, house_id: &HouseId, name: &str) -> Result<Option<Chore>, DomainError> {
        Ok(lock(&self.state)?
            .chores
            .values()
            .find(|c| &c.house_id == house_id && c.name == name)
            .cloned())
    }

    async fn list_active(&self, house_id: &HouseId) -> Result<Vec<Chore>, DomainError> {
        let mut chores: Vec<Chore> = lock(&self.state)?
            .chores
            .values()
            .filter(|c| &c.house_id == house_id && c.active)
            .cloned()
            .collect();
        chores.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(chores)
    }

    async fn upsert_preference(&self, preference: &ChorePreference) -> Result<(), DomainError> {
        let mut state = lock(&self.state)?;
        let existing = state.preferences.iter_mut().find(|p| {
            p.house_id == preference.house_id
                && p.resident_id == preference.resident_id
                && p.alpha_chore_id == preference.alpha_chore_id
                && p.beta_chore_id == preference.beta_chore_id
        });
        match existing {
            Some(p) => {
                p.preference = preference.preference;
                p.updated_at = preference.updated_at;
            }
            None => state.preferences.push(preference.clone()),
        }
        Ok(())
    }

    async fn list_preferences(&self, house_id: &HouseId) -> Result<Vec<ChorePreference>, DomainError> {
        Ok(lock(&self.state)?
            .preferences
            .iter()
            .filter(|p| &p.house_id == house_id)
            .cloned()
            .collect())
    }
}
