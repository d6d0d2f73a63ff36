//! Pairwise chore preferences and the rankings derived from them.

use std::sync::Arc;

use tracing::info;

use super::accounting::{active_preferences, chore_rankings};
use crate::domain::chores::{ChoreError, ChorePreference, ChoreRanker, ChoreRanking};
use crate::domain::foundation::{ChoreId, HouseId, ResidentId, Timestamp};
use crate::ports::{ChoreRepository, ResidentRepository};

/// `preference` is how strongly the resident prefers `target` over `source`;
/// 0.5 is indifference.
#[derive(Debug, Clone)]
pub struct SetChorePreferenceCommand {
    pub house_id: HouseId,
    pub resident_id: ResidentId,
    pub target_chore_id: ChoreId,
    pub source_chore_id: ChoreId,
    pub preference: f64,
    pub now: Timestamp,
}

pub struct SetChorePreferenceHandler {
    chores: Arc<dyn ChoreRepository>,
}

impl SetChorePreferenceHandler {
    pub fn new(chores: Arc<dyn ChoreRepository>) -> Self {
        Self { chores }
    }

    /// Replaces the resident's previous preference for the pair.
    pub async fn handle(&self, cmd: SetChorePreferenceCommand) -> Result<ChorePreference, ChoreError> {
        let preference = ChorePreference::new(
            cmd.house_id,
            cmd.resident_id,
            cmd.target_chore_id,
            cmd.source_chore_id,
            cmd.preference,
            cmd.now,
        )?;

        for chore_id in [preference.alpha_chore_id, preference.beta_chore_id] {
            let found = self
                .chores
                .find_by_id(&chore_id)
                .await?
                .filter(|c| c.active && c.house_id == preference.house_id);
            if found.is_none() {
                return Err(ChoreError::ChoreNotFound(chore_id));
            }
        }

        self.chores.upsert_preference(&preference).await?;
        info!(
            resident_id = %preference.resident_id,
            alpha = %preference.alpha_chore_id,
            beta = %preference.beta_chore_id,
            preference = preference.preference,
            "Chore preference set"
        );
        Ok(preference)
    }
}

#[derive(Debug, Clone)]
pub struct GetActiveChorePreferencesQuery {
    pub house_id: HouseId,
    pub now: Timestamp,
}

pub struct GetActiveChorePreferencesHandler {
    chores: Arc<dyn ChoreRepository>,
    residents: Arc<dyn ResidentRepository>,
}

impl GetActiveChorePreferencesHandler {
    pub fn new(chores: Arc<dyn ChoreRepository>, residents: Arc<dyn ResidentRepository>) -> Self {
        Self { chores, residents }
    }

    /// Preferences of residents who are active and not exempt at `now`,
    /// between chores that are still active.
    pub async fn handle(
        &self,
        query: GetActiveChorePreferencesQuery,
    ) -> Result<Vec<ChorePreference>, ChoreError> {
        let (preferences, _) = active_preferences(
            self.chores.as_ref(),
            self.residents.as_ref(),
            &query.house_id,
            query.now,
        )
        .await?;
        Ok(preferences)
    }
}

#[derive(Debug, Clone)]
pub struct GetChoreRankingsQuery {
    pub house_id: HouseId,
    pub now: Timestamp,
}

pub struct GetChoreRankingsHandler {
    chores: Arc<dyn ChoreRepository>,
    residents: Arc<dyn ResidentRepository>,
    ranker: ChoreRanker,
}

impl GetChoreRankingsHandler {
    pub fn new(
        chores: Arc<dyn ChoreRepository>,
        residents: Arc<dyn ResidentRepository>,
        ranker: ChoreRanker,
    ) -> Self {
        Self {
            chores,
            residents,
            ranker,
        }
    }

    /// Rankings sum to one across active chores, highest first.
    pub async fn handle(&self, query: GetChoreRankingsQuery) -> Result<Vec<ChoreRanking>, ChoreError> {
        Ok(chore_rankings(
            self.chores.as_ref(),
            self.residents.as_ref(),
            &self.ranker,
            &query.house_id,
            query.now,
        )
        .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryChoreRepository, InMemoryResidentRepository};
    use crate::domain::chores::Chore;
    use crate::domain::foundation::Metadata;
    use crate::domain::houses::Resident;

    fn house() -> HouseId {
        HouseId::new("T1").unwrap()
    }

    fn start() -> Timestamp {
        Timestamp::from_ymd(2024, 1, 1).unwrap()
    }

    fn now() -> Timestamp {
        Timestamp::from_ymd(2024, 4, 10).unwrap()
    }

    struct Fixture {
        chores: Arc<InMemoryChoreRepository>,
        residents: Arc<InMemoryResidentRepository>,
        ids: Vec<ChoreId>,
    }

    async fn fixture(names: &[&str], residents: &[&str]) -> Fixture {
        let chores = Arc::new(InMemoryChoreRepository::new());
        let repo = Arc::new(InMemoryResidentRepository::new());
        let mut ids = Vec::new();
        for name in names {
            let chore = Chore::new(house(), *name, Metadata::new(), start()).unwrap();
            chores.save(&chore).await.unwrap();
            ids.push(chore.id);
        }
        for raw in residents {
            let resident = Resident::active(house(), ResidentId::new(*raw).unwrap(), start());
            repo.upsert(&resident).await.unwrap();
        }
        Fixture {
            chores,
            residents: repo,
            ids,
        }
    }

    impl Fixture {
        async fn prefer(&self, resident: &str, target: ChoreId, source: ChoreId, value: f64) {
            SetChorePreferenceHandler::new(self.chores.clone())
                .handle(SetChorePreferenceCommand {
                    house_id: house(),
                    resident_id: ResidentId::new(resident).unwrap(),
                    target_chore_id: target,
                    source_chore_id: source,
                    preference: value,
                    now: start(),
                })
                .await
                .unwrap();
        }

        async fn rankings(&self) -> Vec<ChoreRanking> {
            GetChoreRankingsHandler::new(
                self.chores.clone(),
                self.residents.clone(),
                ChoreRanker::new(0.99),
            )
            .handle(GetChoreRankingsQuery {
                house_id: house(),
                now: now(),
            })
            .await
            .unwrap()
        }
    }

    #[tokio::test]
    async fn no_preferences_rank_uniformly() {
        let f = fixture(&["dishes", "sweeping", "trash"], &["U1", "U2"]).await;

        let rankings = f.rankings().await;

        assert_eq!(rankings.len(), 3);
        for r in &rankings {
            assert!((r.ranking - 1.0 / 3.0).abs() < 1e-9);
        }
    }

    #[tokio::test]
    async fn preferred_chore_ranks_first() {
        let f = fixture(&["dishes", "sweeping", "trash"], &["U1", "U2"]).await;
        f.prefer("U1", f.ids[0], f.ids[1], 1.0).await;
        f.prefer("U2", f.ids[0], f.ids[2], 1.0).await;

        let rankings = f.rankings().await;

        assert_eq!(rankings[0].name, "dishes");
        let total: f64 = rankings.iter().map(|r| r.ranking).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn restating_preference_replaces_it() {
        let f = fixture(&["dishes", "sweeping"], &["U1"]).await;
        f.prefer("U1", f.ids[0], f.ids[1], 1.0).await;
        f.prefer("U1", f.ids[1], f.ids[0], 0.5).await;

        let prefs = GetActiveChorePreferencesHandler::new(f.chores.clone(), f.residents.clone())
            .handle(GetActiveChorePreferencesQuery {
                house_id: house(),
                now: now(),
            })
            .await
            .unwrap();

        assert_eq!(prefs.len(), 1);
        assert_eq!(prefs[0].preference, 0.5);
    }

    #[tokio::test]
    async fn exempt_residents_preferences_are_ignored() {
        let f = fixture(&["dishes", "sweeping"], &["U1", "U2"]).await;
        f.prefer("U1", f.ids[0], f.ids[1], 1.0).await;
        let mut exempt = f
            .residents
            .find(&house(), &ResidentId::new("U1").unwrap())
            .await
            .unwrap()
            .unwrap();
        exempt.exempt(start());
        f.residents.upsert(&exempt).await.unwrap();

        let rankings = f.rankings().await;

        for r in &rankings {
            assert!((r.ranking - 0.5).abs() < 1e-9);
        }
    }

    #[tokio::test]
    async fn preference_between_unknown_chores_is_rejected() {
        let f = fixture(&["dishes"], &["U1"]).await;
        let err = SetChorePreferenceHandler::new(f.chores.clone())
            .handle(SetChorePreferenceCommand {
                house_id: house(),
                resident_id: ResidentId::new("U1").unwrap(),
                target_chore_id: f.ids[0],
                source_chore_id: ChoreId::new(),
                preference: 0.7,
                now: start(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ChoreError::ChoreNotFound(_)));
    }

    #[tokio::test]
    async fn out_of_range_preference_is_rejected() {
        let f = fixture(&["dishes", "sweeping"], &["U1"]).await;
        let err = SetChorePreferenceHandler::new(f.chores.clone())
            .handle(SetChorePreferenceCommand {
                house_id: house(),
                resident_id: ResidentId::new("U1").unwrap(),
                target_chore_id: f.ids[0],
                source_chore_id: f.ids[1],
                preference: 1.5,
                now: start(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ChoreError::Validation(_)));
    }
}
