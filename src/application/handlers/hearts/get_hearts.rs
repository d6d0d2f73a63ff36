//! Hearts queries.

use std::sync::Arc;

use crate::domain::foundation::{ChallengeId, HouseId, ResidentId};
use crate::domain::hearts::{HeartChallenge, HeartError, HeartsBoardEntry};
use crate::ports::HeartRepository;

#[derive(Debug, Clone)]
pub struct GetResidentHeartsQuery {
    pub house_id: HouseId,
    pub resident_id: ResidentId,
}

pub struct GetResidentHeartsHandler {
    hearts: Arc<dyn HeartRepository>,
}

impl GetResidentHeartsHandler {
    pub fn new(hearts: Arc<dyn HeartRepository>) -> Self {
        Self { hearts }
    }

    /// The resident's total, or `None` if they have no entries at all.
    pub async fn handle(&self, query: GetResidentHeartsQuery) -> Result<Option<f64>, HeartError> {
        Ok(self
            .hearts
            .sum_for_resident(&query.house_id, &query.resident_id)
            .await?)
    }
}

#[derive(Debug, Clone)]
pub struct GetHouseHeartsQuery {
    pub house_id: HouseId,
}

pub struct GetHouseHeartsHandler {
    hearts: Arc<dyn HeartRepository>,
}

impl GetHouseHeartsHandler {
    pub fn new(hearts: Arc<dyn HeartRepository>) -> Self {
        Self { hearts }
    }

    pub async fn handle(&self, query: GetHouseHeartsQuery) -> Result<Vec<HeartsBoardEntry>, HeartError> {
        Ok(self.hearts.totals_by_house(&query.house_id).await?)
    }
}

#[derive(Debug, Clone)]
pub struct GetChallengeQuery {
    pub challenge_id: ChallengeId,
}

pub struct GetChallengeHandler {
    hearts: Arc<dyn HeartRepository>,
}

impl GetChallengeHandler {
    pub fn new(hearts: Arc<dyn HeartRepository>) -> Self {
        Self { hearts }
    }

    pub async fn handle(&self, query: GetChallengeQuery) -> Result<HeartChallenge, HeartError> {
        self.hearts
            .find_challenge(&query.challenge_id)
            .await?
            .ok_or(HeartError::ChallengeNotFound(query.challenge_id))
    }
}
