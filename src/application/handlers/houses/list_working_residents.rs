//! ListWorkingResidentsHandler - who owes chores at an instant.

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::foundation::{DomainError, HouseId, ResidentId, Timestamp};
use crate::domain::houses::Resident;
use crate::ports::{ChoreBreakRepository, ResidentRepository};

/// Residents active and not exempt at `at`, excluding anyone on a break.
///
/// Several overlapping breaks exclude a resident once.
pub async fn working_residents(
    residents: &dyn ResidentRepository,
    breaks: &dyn ChoreBreakRepository,
    house_id: &HouseId,
    at: Timestamp,
) -> Result<Vec<Resident>, DomainError> {
    let on_break: HashSet<ResidentId> = breaks
        .list_covering(house_id, at)
        .await?
        .into_iter()
        .map(|b| b.resident_id)
        .collect();

    Ok(residents
        .list_by_house(house_id)
        .await?
        .into_iter()
        .filter(|r| r.is_eligible_at(at) && !on_break.contains(&r.id))
        .collect())
}

#[derive(Debug, Clone)]
pub struct ListWorkingResidentsQuery {
    pub house_id: HouseId,
    pub at: Timestamp,
}

pub struct ListWorkingResidentsHandler {
    residents: Arc<dyn ResidentRepository>,
    breaks: Arc<dyn ChoreBreakRepository>,
}

impl ListWorkingResidentsHandler {
    pub fn new(
        residents: Arc<dyn ResidentRepository>,
        breaks: Arc<dyn ChoreBreakRepository>,
    ) -> Self {
        Self { residents, breaks }
    }

    pub async fn handle(&self, query: ListWorkingResidentsQuery) -> Result<Vec<Resident>, DomainError> {
        working_residents(
            self.residents.as_ref(),
            self.breaks.as_ref(),
            &query.house_id,
            query.at,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryChoreBreakRepository, InMemoryResidentRepository};
    use crate::domain::chores::ChoreBreak;
    use crate::domain::foundation::Metadata;

    fn day(d: u32) -> Timestamp {
        Timestamp::from_ymd(2024, 4, d).unwrap()
    }

    #[tokio::test]
    async fn excludes_inactive_exempt_and_on_break() {
        let house = HouseId::new("T1").unwrap();
        let residents = Arc::new(InMemoryResidentRepository::new());
        let breaks = Arc::new(InMemoryChoreBreakRepository::new());

        for id in ["U1", "U2", "U3", "U4"] {
            residents
                .upsert(&Resident::active(house.clone(), ResidentId::new(id).unwrap(), day(1)))
                .await
                .unwrap();
        }
        let mut exempt = Resident::active(house.clone(), ResidentId::new("U2").unwrap(), day(1));
        exempt.exempt(day(2));
        residents.upsert(&exempt).await.unwrap();
        residents
            .upsert(&Resident::active(house.clone(), ResidentId::new("U5").unwrap(), day(20)))
            .await
            .unwrap();

        for (start, end) in [(day(5), day(15)), (day(8), day(12))] {
            let chore_break = ChoreBreak::new(
                house.clone(),
                ResidentId::new("U3").unwrap(),
                start,
                end,
                Metadata::new(),
            )
            .unwrap();
            breaks.save(&chore_break).await.unwrap();
        }

        let handler = ListWorkingResidentsHandler::new(residents, breaks);
        let working = handler
            .handle(ListWorkingResidentsQuery { house_id: house, at: day(10) })
            .await
            .unwrap();

        let ids: Vec<&str> = working.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["U1", "U4"]);
    }
}
