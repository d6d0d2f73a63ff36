use async_trait::async_trait;
use std::sync::Mutex;

use super::lock;
use crate::domain::chores::ChoreBreak;
use crate::domain::foundation::{ChoreBreakId, DomainError, HouseId, ResidentId, Timestamp};
use crate::ports::ChoreBreakRepository;

/// In-memory implementation of the ChoreBreakRepository port.
#[derive(Default)]
pub struct InMemoryChoreBreakRepository {
    breaks: Mutex<Vec<ChoreBreak>>,
}

impl InMemoryChoreBreakRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChoreBreakRepository for InMemoryChoreBreakRepository {
    async fn save(&self, chore_break: &ChoreBreak) -> Result<(), DomainError> {
        lock(&self.breaks)?.push(chore_break.clone());
        Ok(())
    }

    async fn delete(&self, id: &ChoreBreakId) -> Result<bool, DomainError> {
        let mut breaks = lock(&self.breaks)?;
        let before = breaks.len();
        breaks.retain(|b| &b.id != id);
        Ok(breaks.len() < before)
    }

    async fn list_for_resident(
        &self,
        house_id: &HouseId,
        resident_id: &ResidentId,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<ChoreBreak>, DomainError> {
        let mut breaks: Vec<ChoreBreak> = lock(&self.breaks)?
            .iter()
            .filter(|b| &b.house_id == house_id && &b.resident_id == resident_id)
            .filter(|b| b.start < end && b.end > start)
            .cloned()
            .collect();
        breaks.sort_by_key(|b| b.start);
        Ok(breaks)
    }

    async fn list_covering(&self, house_id: &HouseId, at: Timestamp) -> Result<Vec<ChoreBreak>, DomainError> {
        let mut breaks: Vec<ChoreBreak> = lock(&self.breaks)?
            .iter()
            .filter(|b| &b.house_id == house_id && b.covers(at))
            .cloned()
            .collect();
        breaks.sort_by_key(|b| b.start);
        Ok(breaks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Metadata;

    fn chore_break(resident: &str, start: Timestamp, end: Timestamp) -> ChoreBreak {
        ChoreBreak::new(
            HouseId::new("T1").unwrap(),
            ResidentId::new(resident).unwrap(),
            start,
            end,
            Metadata::new(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn list_for_resident_returns_overlapping_breaks() {
        let repo = InMemoryChoreBreakRepository::new();
        let t0 = Timestamp::from_ymd(2024, 4, 1).unwrap();
        repo.save(&chore_break("U1", t0.add_days(-10), t0)).await.unwrap();
        repo.save(&chore_break("U1", t0.add_days(-2), t0.add_days(2))).await.unwrap();
        repo.save(&chore_break("U2", t0, t0.add_days(2))).await.unwrap();

        let found = repo
            .list_for_resident(
                &HouseId::new("T1").unwrap(),
                &ResidentId::new("U1").unwrap(),
                t0,
                t0.add_days(30),
            )
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn delete_removes_break() {
        let repo = InMemoryChoreBreakRepository::new();
        let t0 = Timestamp::now();
        let b = chore_break("U1", t0, t0.add_days(1));
        repo.save(&b).await.unwrap();

        assert!(repo.delete(&b.id).await.unwrap());
        assert!(!repo.delete(&b.id).await.unwrap());
        assert!(repo
            .list_covering(&HouseId::new("T1").unwrap(), t0)
            .await
            .unwrap()
            .is_empty());
    }
}
