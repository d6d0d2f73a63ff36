use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::lock;
use crate::domain::foundation::{DomainError, HouseId, ResidentId};
use crate::domain::houses::{House, Resident};
use crate::ports::{HouseRepository, ResidentRepository};

/// In-memory implementation of the HouseRepository port.
#[derive(Default)]
pub struct InMemoryHouseRepository {
    houses: Mutex<HashMap<HouseId, House>>,
}

impl InMemoryHouseRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HouseRepository for InMemoryHouseRepository {
    async fn upsert(&self, house: &House) -> Result<(), DomainError> {
        let mut houses = lock(&self.houses)?;
        match houses.get_mut(&house.id) {
            Some(existing) => {
                existing.name = house.name.clone();
                existing.metadata = house.metadata.clone();
                if house.chores_channel.is_some() {
                    existing.chores_channel = house.chores_channel.clone();
                }
            }
            None => {
                houses.insert(house.id.clone(), house.clone());
            }
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &HouseId) -> Result<Option<House>, DomainError> {
        Ok(lock(&self.houses)?.get(id).cloned())
    }

    async fn set_chores_channel(&self, id: &HouseId, channel: &str) -> Result<bool, DomainError> {
        let mut houses = lock(&self.houses)?;
        Ok(houses
            .get_mut(id)
            .map(|house| house.chores_channel = Some(channel.to_string()))
            .is_some())
    }

    async fn list(&self) -> Result<Vec<House>, DomainError> {
        let mut houses: Vec<House> = lock(&self.houses)?.values().cloned().collect();
        houses.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(houses)
    }
}

/// In-memory implementation of the ResidentRepository port.
#[derive(Default)]
pub struct InMemoryResidentRepository {
    residents: Mutex<HashMap<(HouseId, ResidentId), Resident>>,
}

impl InMemoryResidentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResidentRepository for InMemoryResidentRepository {
    async fn upsert(&self, resident: &Resident) -> Result<(), DomainError> {
        lock(&self.residents)?.insert(
            (resident.house_id.clone(), resident.id.clone()),
            resident.clone(),
        );
        Ok(())
    }

    async fn find(&self, house_id: &HouseId, id: &ResidentId) -> Result<Option<Resident>, DomainError> {
        Ok(lock(&self.residents)?
            .get(&(house_id.clone(), id.clone()))
            .cloned())
    }

    async fn list_by_house(&self, house_id: &HouseId) -> Result<Vec<Resident>, DomainError> {
        let mut residents: Vec<Resident> = lock(&self.residents)?
            .values()
            .filter(|r| &r.house_id == house_id)
            .cloned()
            .collect();
        residents.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(residents)
    }
}
