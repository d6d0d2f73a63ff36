use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::lock;
use crate::domain::foundation::{ChallengeId, DomainError, HouseId, ResidentId, Timestamp};
use crate::domain::hearts::{Heart, HeartChallenge, HeartsBoardEntry};
use crate::ports::HeartRepository;

#[derive(Default)]
struct HeartState {
    hearts: Vec<Heart>,
    challenges: HashMap<ChallengeId, HeartChallenge>,
}

/// In-memory implementation of the HeartRepository port.
///
/// Hearts and challenges share one lock so challenge resolution is atomic.
#[derive(Default)]
pub struct InMemoryHeartRepository {
    state: Mutex<HeartState>,
}

impl InMemoryHeartRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ledger entries, for assertions.
    pub fn len(&self) -> usize {
        self.state.lock().map(|s| s.hearts.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl HeartRepository for InMemoryHeartRepository {
    async fn insert(&self, heart: &Heart) -> Result<(), DomainError> {
        lock(&self.state)?.hearts.push(heart.clone());
        Ok(())
    }

    async fn insert_unless_exists(
        &self,
        heart: &Heart,
        since: Option<Timestamp>,
    ) -> Result<bool, DomainError> {
        let mut state = lock(&self.state)?;
        let exists = state.hearts.iter().any(|h| {
            h.house_id == heart.house_id
                && h.resident_id == heart.resident_id
                && h.kind == heart.kind
                && since.map_or(true, |since| {
                    h.generated_at >= since && h.generated_at <= heart.generated_at
                })
        });
        if exists {
            return Ok(false);
        }
        state.hearts.push(heart.clone());
        Ok(true)
    }

    async fn sum_for_resident(
        &self,
        house_id: &HouseId,
        resident_id: &ResidentId,
    ) -> Result<Option<f64>, DomainError> {
        let state = lock(&self.state)?;
        Ok(state
            .hearts
            .iter()
            .filter(|h| &h.house_id == house_id && &h.resident_id == resident_id)
            .fold(None, |acc, h| Some(acc.unwrap_or(0.0) + h.value)))
    }

    async fn list_for_resident(
        &self,
        house_id: &HouseId,
        resident_id: &ResidentId,
    ) -> Result<Vec<Heart>, DomainError> {
        let state = lock(&self.state)?;
        let mut hearts: Vec<Heart> = state
            .hearts
            .iter()
            .filter(|h| &h.house_id == house_id && &h.resident_id == resident_id)
            .cloned()
            .collect();
        hearts.sort_by(|a, b| a.generated_at.cmp(&b.generated_at));
        Ok(hearts)
    }

    async fn totals_by_house(&self, house_id: &HouseId) -> Result<Vec<HeartsBoardEntry>, DomainError> {
        let state = lock(&self.state)?;
        let mut totals: HashMap<ResidentId, f64> = HashMap::new();
        for heart in state.hearts.iter().filter(|h| &h.house_id == house_id) {
            *totals.entry(heart.resident_id.clone()).or_insert(0.0) += heart.value;
        }
        let mut board: Vec<HeartsBoardEntry> = totals
            .into_iter()
            .map(|(resident_id, hearts)| HeartsBoardEntry { resident_id, hearts })
            .collect();
        board.sort_by(|a, b| {
            b.hearts
                .total_cmp(&a.hearts)
                .then_with(|| a.resident_id.cmp(&b.resident_id))
        });
        Ok(board)
    }

    async fn save_challenge(&self, challenge: &HeartChallenge) -> Result<(), DomainError> {
        lock(&self.state)?
            .challenges
            .insert(challenge.id, challenge.clone());
        Ok(())
    }

    async fn find_challenge(&self, id: &ChallengeId) -> Result<Option<HeartChallenge>, DomainError> {
        Ok(lock(&self.state)?.challenges.get(id).cloned())
    }

    async fn list_unresolved_challenges(
        &self,
        house_id: &HouseId,
    ) -> Result<Vec<HeartChallenge>, DomainError> {
        let state = lock(&self.state)?;
        let mut challenges: Vec<HeartChallenge> = state
            .challenges
            .values()
            .filter(|c| &c.house_id == house_id && !c.is_resolved())
            .cloned()
            .collect();
        challenges.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(challenges)
    }

    async fn resolve_challenge(
        &self,
        challenge_id: &ChallengeId,
        heart: &Heart,
    ) -> Result<bool, DomainError> {
        let mut state = lock(&self.state)?;
        let Some(challenge) = state.challenges.get_mut(challenge_id) else {
            return Ok(false);
        };
        if challenge.is_resolved() {
            return Ok(false);
        }
        challenge.heart_id = Some(heart.id);
        challenge.resolved_at = Some(heart.generated_at);
        state.hearts.push(heart.clone());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::PollId;
    use crate::domain::hearts::HeartKind;

    fn house() -> HouseId {
        HouseId::new("T1").unwrap()
    }

    fn resident(id: &str) -> ResidentId {
        ResidentId::new(id).unwrap()
    }

    fn heart(id: &str, value: f64, kind: HeartKind, at: Timestamp) -> Heart {
        Heart::new(house(), resident(id), value, kind, at)
    }

    #[tokio::test]
    async fn sum_is_none_without_entries() {
        let repo = InMemoryHeartRepository::new();
        assert_eq!(repo.sum_for_resident(&house(), &resident("U1")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn sum_adds_signed_fractional_entries() {
        let repo = InMemoryHeartRepository::new();
        let now = Timestamp::now();
        repo.insert(&heart("U1", 5.0, HeartKind::Initial, now)).await.unwrap();
        repo.insert(&heart("U1", -1.5, HeartKind::Penalty, now)).await.unwrap();
        repo.insert(&heart("U2", 2.0, HeartKind::Manual, now)).await.unwrap();

        assert_eq!(
            repo.sum_for_resident(&house(), &resident("U1")).await.unwrap(),
            Some(3.5)
        );
    }

    #[tokio::test]
    async fn insert_unless_exists_respects_window() {
        let repo = InMemoryHeartRepository::new();
        let now = Timestamp::now();
        assert!(repo
            .insert_unless_exists(&heart("U1", -1.0, HeartKind::Penalty, now), Some(now.add_days(-1)))
            .await
            .unwrap());
        assert!(!repo
            .insert_unless_exists(&heart("U1", -1.0, HeartKind::Penalty, now.add_hours(1)), Some(now.add_days(-1)))
            .await
            .unwrap());
        assert!(repo
            .insert_unless_exists(&heart("U1", -1.0, HeartKind::Penalty, now.add_days(40)), Some(now.add_days(35)))
            .await
            .unwrap());
        assert_eq!(repo.len(), 2);
    }

    #[tokio::test]
    async fn board_is_sorted_highest_first() {
        let repo = InMemoryHeartRepository::new();
        let now = Timestamp::now();
        repo.insert(&heart("U1", 3.0, HeartKind::Initial, now)).await.unwrap();
        repo.insert(&heart("U2", 5.0, HeartKind::Initial, now)).await.unwrap();

        let board = repo.totals_by_house(&house()).await.unwrap();
        assert_eq!(board[0].resident_id.as_str(), "U2");
        assert_eq!(board[1].hearts, 3.0);
    }

    #[tokio::test]
    async fn challenge_resolves_only_once() {
        let repo = InMemoryHeartRepository::new();
        let now = Timestamp::now();
        let challenge = HeartChallenge::new(house(), resident("U1"), resident("U2"), 1.0, PollId::new(), now);
        repo.save_challenge(&challenge).await.unwrap();

        let first = heart("U2", -1.0, HeartKind::Challenge, now).for_challenge(challenge.id);
        let second = heart("U1", -1.0, HeartKind::Challenge, now).for_challenge(challenge.id);

        assert!(repo.resolve_challenge(&challenge.id, &first).await.unwrap());
        assert!(!repo.resolve_challenge(&challenge.id, &second).await.unwrap());

        assert_eq!(repo.len(), 1);
        let stored = repo.find_challenge(&challenge.id).await.unwrap().unwrap();
        assert_eq!(stored.heart_id, Some(first.id));
        assert!(repo.list_unresolved_challenges(&house()).await.unwrap().is_empty());
    }
}
