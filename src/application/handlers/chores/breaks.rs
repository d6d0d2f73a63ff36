//! Chore breaks and working-resident accounting.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use crate::application::handlers::houses::working_residents;
use crate::domain::chores::{working_percentage, ChoreBreak, ChoreError};
use crate::domain::foundation::{ChoreBreakId, HouseId, Metadata, ResidentId, Timestamp};
use crate::ports::{ChoreBreakRepository, ResidentRepository};

#[derive(Debug, Clone)]
pub struct AddChoreBreakCommand {
    pub house_id: HouseId,
    pub resident_id: ResidentId,
    pub start: Timestamp,
    pub end: Timestamp,
    pub metadata: Metadata,
}

pub struct AddChoreBreakHandler {
    breaks: Arc<dyn ChoreBreakRepository>,
}

impl AddChoreBreakHandler {
    pub fn new(breaks: Arc<dyn ChoreBreakRepository>) -> Self {
        Self { breaks }
    }

    /// Records `[start, end)` as time off. Overlapping breaks are allowed.
    pub async fn handle(&self, cmd: AddChoreBreakCommand) -> Result<ChoreBreak, ChoreError> {
        let chore_break =
            ChoreBreak::new(cmd.house_id, cmd.resident_id, cmd.start, cmd.end, cmd.metadata)?;
        self.breaks.save(&chore_break).await?;
        info!(
            break_id = %chore_break.id,
            resident_id = %chore_break.resident_id,
            start = %chore_break.start,
            end = %chore_break.end,
            "Chore break added"
        );
        Ok(chore_break)
    }
}

#[derive(Debug, Clone)]
pub struct DeleteChoreBreakCommand {
    pub break_id: ChoreBreakId,
}

pub struct DeleteChoreBreakHandler {
    breaks: Arc<dyn ChoreBreakRepository>,
}

impl DeleteChoreBreakHandler {
    pub fn new(breaks: Arc<dyn ChoreBreakRepository>) -> Self {
        Self { breaks }
    }

    /// Returns false if there was no such break.
    pub async fn handle(&self, cmd: DeleteChoreBreakCommand) -> Result<bool, ChoreError> {
        let deleted = self.breaks.delete(&cmd.break_id).await?;
        if deleted {
            info!(break_id = %cmd.break_id, "Chore break deleted");
        } else {
            debug!(break_id = %cmd.break_id, "No chore break to delete");
        }
        Ok(deleted)
    }
}

#[derive(Debug, Clone)]
pub struct GetChoreBreaksQuery {
    pub house_id: HouseId,
    pub at: Timestamp,
}

pub struct GetChoreBreaksHandler {
    breaks: Arc<dyn ChoreBreakRepository>,
    residents: Arc<dyn ResidentRepository>,
}

impl GetChoreBreaksHandler {
    pub fn new(breaks: Arc<dyn ChoreBreakRepository>, residents: Arc<dyn ResidentRepository>) -> Self {
        Self { breaks, residents }
    }

    /// Breaks covering `at` taken by residents who would otherwise owe chores.
    pub async fn handle(&self, query: GetChoreBreaksQuery) -> Result<Vec<ChoreBreak>, ChoreError> {
        let eligible: HashSet<ResidentId> = self
            .residents
            .list_by_house(&query.house_id)
            .await?
            .into_iter()
            .filter(|r| r.is_eligible_at(query.at))
            .map(|r| r.id)
            .collect();

        Ok(self
            .breaks
            .list_covering(&query.house_id, query.at)
            .await?
            .into_iter()
            .filter(|b| eligible.contains(&b.resident_id))
            .collect())
    }
}

#[derive(Debug, Clone)]
pub struct GetWorkingResidentCountQuery {
    pub house_id: HouseId,
    pub at: Timestamp,
}

pub struct GetWorkingResidentCountHandler {
    residents: Arc<dyn ResidentRepository>,
    breaks: Arc<dyn ChoreBreakRepository>,
}

impl GetWorkingResidentCountHandler {
    pub fn new(residents: Arc<dyn ResidentRepository>, breaks: Arc<dyn ChoreBreakRepository>) -> Self {
        Self { residents, breaks }
    }

    pub async fn handle(&self, query: GetWorkingResidentCountQuery) -> Result<usize, ChoreError> {
        let working = working_residents(
            self.residents.as_ref(),
            self.breaks.as_ref(),
            &query.house_id,
            query.at,
        )
        .await?;
        Ok(working.len())
    }
}

#[derive(Debug, Clone)]
pub struct GetWorkingResidentPercentageQuery {
    pub house_id: HouseId,
    pub resident_id: ResidentId,
    /// Any instant in the month being measured.
    pub at: Timestamp,
}

pub struct GetWorkingResidentPercentageHandler {
    residents: Arc<dyn ResidentRepository>,
    breaks: Arc<dyn ChoreBreakRepository>,
}

impl GetWorkingResidentPercentageHandler {
    pub fn new(residents: Arc<dyn ResidentRepository>, breaks: Arc<dyn ChoreBreakRepository>) -> Self {
        Self { residents, breaks }
    }

    /// Share of the month the resident owed chores; 0.0 for unknown residents.
    pub async fn handle(&self, query: GetWorkingResidentPercentageQuery) -> Result<f64, ChoreError> {
        let Some(resident) = self
            .residents
            .find(&query.house_id, &query.resident_id)
            .await?
        else {
            return Ok(0.0);
        };

        let breaks = self
            .breaks
            .list_for_resident(
                &query.house_id,
                &query.resident_id,
                query.at.month_start(),
                query.at.next_month_start(),
            )
            .await?;
        Ok(working_percentage(&resident, &breaks, query.at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryChoreBreakRepository, InMemoryResidentRepository};
    use crate::domain::houses::Resident;

    fn house() -> HouseId {
        HouseId::new("T1").unwrap()
    }

    fn id(raw: &str) -> ResidentId {
        ResidentId::new(raw).unwrap()
    }

    fn april(day: u32) -> Timestamp {
        Timestamp::from_ymd(2024, 4, day).unwrap()
    }

    struct Fixture {
        residents: Arc<InMemoryResidentRepository>,
        breaks: Arc<InMemoryChoreBreakRepository>,
    }

    impl Fixture {
        async fn new(residents: &[&str]) -> Self {
            let repo = Arc::new(InMemoryResidentRepository::new());
            for raw in residents {
                repo.upsert(&Resident::active(house(), id(raw), Timestamp::from_ymd(2024, 1, 1).unwrap()))
                    .await
                    .unwrap();
            }
            Self {
                residents: repo,
                breaks: Arc::new(InMemoryChoreBreakRepository::new()),
            }
        }

        async fn add_break(&self, resident: &str, start: Timestamp, end: Timestamp) -> ChoreBreak {
            AddChoreBreakHandler::new(self.breaks.clone())
                .handle(AddChoreBreakCommand {
                    house_id: house(),
                    resident_id: id(resident),
                    start,
                    end,
                    metadata: Metadata::new(),
                })
                .await
                .unwrap()
        }

        async fn count(&self, at: Timestamp) -> usize {
            GetWorkingResidentCountHandler::new(self.residents.clone(), self.breaks.clone())
                .handle(GetWorkingResidentCountQuery { house_id: house(), at })
                .await
                .unwrap()
        }

        async fn percentage(&self, resident: &str, at: Timestamp) -> f64 {
            GetWorkingResidentPercentageHandler::new(self.residents.clone(), self.breaks.clone())
                .handle(GetWorkingResidentPercentageQuery {
                    house_id: house(),
                    resident_id: id(resident),
                    at,
                })
                .await
                .unwrap()
        }
    }

    #[tokio::test]
    async fn overlapping_breaks_exclude_resident_once() {
        let f = Fixture::new(&["U1", "U2", "U3"]).await;
        f.add_break("U1", april(1), april(10)).await;
        f.add_break("U1", april(5), april(15)).await;

        assert_eq!(f.count(april(7)).await, 2);
        assert_eq!(f.count(april(15)).await, 3);
    }

    #[tokio::test]
    async fn overlapping_breaks_reduce_percentage_by_union() {
        let f = Fixture::new(&["U1"]).await;
        f.add_break("U1", april(1), april(10)).await;
        f.add_break("U1", april(7), april(16)).await;

        assert!((f.percentage("U1", april(20)).await - 0.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn unknown_resident_has_zero_percentage() {
        let f = Fixture::new(&[]).await;
        assert_eq!(f.percentage("U9", april(20)).await, 0.0);
    }

    #[tokio::test]
    async fn break_must_end_after_start() {
        let f = Fixture::new(&["U1"]).await;
        let err = AddChoreBreakHandler::new(f.breaks.clone())
            .handle(AddChoreBreakCommand {
                house_id: house(),
                resident_id: id("U1"),
                start: april(10),
                end: april(1),
                metadata: Metadata::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ChoreError::Validation(_)));
    }

    #[tokio::test]
    async fn deleted_break_no_longer_counts() {
        let f = Fixture::new(&["U1", "U2"]).await;
        let chore_break = f.add_break("U1", april(1), april(10)).await;
        let delete = DeleteChoreBreakHandler::new(f.breaks.clone());

        assert!(delete.handle(DeleteChoreBreakCommand { break_id: chore_break.id }).await.unwrap());
        assert!(!delete.handle(DeleteChoreBreakCommand { break_id: chore_break.id }).await.unwrap());
        assert_eq!(f.count(april(5)).await, 2);
    }

    #[tokio::test]
    async fn breaks_of_exempt_residents_are_not_listed() {
        let f = Fixture::new(&["U1", "U2"]).await;
        f.add_break("U1", april(1), april(10)).await;
        f.add_break("U2", april(1), april(10)).await;
        let mut exempt = f.residents.find(&house(), &id("U2")).await.unwrap().unwrap();
        exempt.exempt(april(2));
        f.residents.upsert(&exempt).await.unwrap();

        let listed = GetChoreBreaksHandler::new(f.breaks.clone(), f.residents.clone())
            .handle(GetChoreBreaksQuery { house_id: house(), at: april(5) })
            .await
            .unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].resident_id, id("U1"));
    }
}
