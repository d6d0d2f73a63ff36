//! CreateChoreProposalHandler - puts a chore change to a house vote.

use std::sync::Arc;

use chrono::Duration;
use tracing::{info, warn};

use crate::domain::chores::{proposal_quorum, ChoreError, ChoreProposal, ProposalChange};
use crate::domain::foundation::{ChoreId, HouseId, Metadata, ResidentId, Timestamp};
use crate::domain::polls::Poll;
use crate::ports::{ChoreProposalRepository, ChoreRepository, PollRepository, ResidentRepository};

/// Targets an existing chore by id, or any chore (new or old) by name.
#[derive(Debug, Clone)]
pub struct CreateChoreProposalCommand {
    pub house_id: HouseId,
    pub proposed_by: ResidentId,
    pub chore_id: Option<ChoreId>,
    pub name: Option<String>,
    pub metadata: Metadata,
    /// False proposes removing the chore.
    pub active: bool,
    pub now: Timestamp,
}

pub struct CreateChoreProposalHandler {
    proposals: Arc<dyn ChoreProposalRepository>,
    polls: Arc<dyn PollRepository>,
    residents: Arc<dyn ResidentRepository>,
    chores: Arc<dyn ChoreRepository>,
    poll_duration: Duration,
    min_pct: f64,
}

impl CreateChoreProposalHandler {
    pub fn new(
        proposals: Arc<dyn ChoreProposalRepository>,
        polls: Arc<dyn PollRepository>,
        residents: Arc<dyn ResidentRepository>,
        chores: Arc<dyn ChoreRepository>,
        poll_duration: Duration,
        min_pct: f64,
    ) -> Self {
        Self {
            proposals,
            polls,
            residents,
            chores,
            poll_duration,
            min_pct,
        }
    }

    /// Opens a poll whose quorum is `min_pct` of the residents active and
    /// not exempt at `now`, rounded up.
    ///
    /// # Errors
    ///
    /// Returns `InvalidProposal` if neither a chore id nor a name is given,
    /// or if the chore id does not name a chore of this house.
    pub async fn handle(&self, cmd: CreateChoreProposalCommand) -> Result<ChoreProposal, ChoreError> {
        let change = ProposalChange {
            chore_id: cmd.chore_id,
            name: cmd.name,
            metadata: cmd.metadata,
            active: cmd.active,
        }
        .validate()?;

        if let Some(chore_id) = change.chore_id {
            let known = self
                .chores
                .find_by_id(&chore_id)
                .await?
                .is_some_and(|c| c.house_id == cmd.house_id);
            if !known {
                warn!(chore_id = %chore_id, house_id = %cmd.house_id, "Proposal targets an unknown chore");
                return Err(ChoreError::InvalidProposal(format!(
                    "no chore {} in this house",
                    chore_id
                )));
            }
        }

        let eligible = self
            .residents
            .list_by_house(&cmd.house_id)
            .await?
            .iter()
            .filter(|r| r.is_eligible_at(cmd.now))
            .count();
        let quorum = proposal_quorum(eligible, self.min_pct);

        let poll = Poll::new(cmd.now, self.poll_duration, quorum)?;
        self.polls.save(&poll).await?;

        let proposal = ChoreProposal::new(cmd.house_id, cmd.proposed_by, change, poll.id, cmd.now)?;
        self.proposals.save(&proposal).await?;

        info!(
            proposal_id = %proposal.id,
            proposed_by = %proposal.proposed_by,
            name = ?proposal.name,
            quorum,
            "Chore proposal opened"
        );
        Ok(proposal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryChoreProposalRepository, InMemoryChoreRepository, InMemoryPollRepository,
        InMemoryResidentRepository,
    };
    use crate::domain::chores::Chore;
    use crate::domain::houses::Resident;

    fn house() -> HouseId {
        HouseId::new("T1").unwrap()
    }

    async fn handler(residents: usize) -> (CreateChoreProposalHandler, Arc<InMemoryPollRepository>) {
        let (handler, polls, _) = handler_with_chores(residents).await;
        (handler, polls)
    }

    async fn handler_with_chores(
        residents: usize,
    ) -> (CreateChoreProposalHandler, Arc<InMemoryPollRepository>, Arc<InMemoryChoreRepository>) {
        let polls = Arc::new(InMemoryPollRepository::new());
        let chores = Arc::new(InMemoryChoreRepository::new());
        let repo = Arc::new(InMemoryResidentRepository::new());
        for i in 0..residents {
            let id = ResidentId::new(format!("U{}", i)).unwrap();
            repo.upsert(&Resident::active(house(), id, Timestamp::from_ymd(2024, 1, 1).unwrap()))
                .await
                .unwrap();
        }
        let handler = CreateChoreProposalHandler::new(
            Arc::new(InMemoryChoreProposalRepository::new()),
            polls.clone(),
            repo,
            chores.clone(),
            Duration::hours(48),
            0.4,
        );
        (handler, polls, chores)
    }

    fn command(chore_id: Option<ChoreId>, name: Option<&str>) -> CreateChoreProposalCommand {
        CreateChoreProposalCommand {
            house_id: house(),
            proposed_by: ResidentId::new("U0").unwrap(),
            chore_id,
            name: name.map(String::from),
            metadata: Metadata::new(),
            active: true,
            now: Timestamp::from_ymd(2024, 4, 1).unwrap(),
        }
    }

    #[tokio::test]
    async fn quorum_is_forty_percent_rounded_up() {
        let (handler, polls) = handler(5).await;

        let proposal = handler.handle(command(None, Some("dishes"))).await.unwrap();

        let poll = polls.find_by_id(&proposal.poll_id).await.unwrap().unwrap();
        assert_eq!(poll.min_votes, 2);
        assert_eq!(poll.duration(), Duration::hours(48));
    }

    #[tokio::test]
    async fn proposal_without_target_is_invalid() {
        let (handler, _) = handler(3).await;
        let err = handler.handle(command(None, None)).await.unwrap_err();
        assert!(matches!(err, ChoreError::InvalidProposal(_)));
    }

    #[tokio::test]
    async fn unknown_chore_is_invalid() {
        let (handler, _) = handler(3).await;
        let err = handler.handle(command(Some(ChoreId::new()), None)).await.unwrap_err();
        assert!(matches!(err, ChoreError::InvalidProposal(_)));
    }

    #[tokio::test]
    async fn chore_of_another_house_is_invalid() {
        let (handler, _, chores) = handler_with_chores(3).await;
        let elsewhere = Chore::new(
            HouseId::new("T2").unwrap(),
            "dishes",
            Metadata::new(),
            Timestamp::from_ymd(2024, 1, 1).unwrap(),
        )
        .unwrap();
        chores.save(&elsewhere).await.unwrap();

        let err = handler.handle(command(Some(elsewhere.id), None)).await.unwrap_err();
        assert!(matches!(err, ChoreError::InvalidProposal(_)));
    }

    #[tokio::test]
    async fn known_chore_can_be_targeted() {
        let (handler, _, chores) = handler_with_chores(3).await;
        let dishes = Chore::new(house(), "dishes", Metadata::new(), Timestamp::from_ymd(2024, 1, 1).unwrap()).unwrap();
        chores.save(&dishes).await.unwrap();

        let proposal = handler.handle(command(Some(dishes.id), None)).await.unwrap();
        assert_eq!(proposal.chore_id, Some(dishes.id));
    }
}
