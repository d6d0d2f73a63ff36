//! Shared application state.
//!
//! `GovernanceState` bundles one implementation of every port with the house
//! rules and builds handlers on demand, so callers (the sweep binary, tests)
//! never wire handlers by hand.

use std::sync::Arc;

use crate::application::handlers::chores::{
    AddChoreBreakHandler, AddChoreHandler, AddChorePenaltiesHandler, AddChorePenaltyHandler,
    CalculatePenaltyHandler, ClaimChoreHandler, DeleteChoreBreakHandler, DeleteChoreHandler,
    EditChoreHandler, GetActiveChorePreferencesHandler, GetChoreBreaksHandler,
    GetChoreClaimHandler, GetChorePointsHandler, GetChoreRankingsHandler,
    GetChoreValueIntervalScalarHandler, GetCurrentChoreValuesHandler,
    GetLargestChoreClaimHandler, GetLatestChoreClaimHandler, GetUpdatedChoreValuesHandler,
    GetWorkingResidentCountHandler, GetWorkingResidentPercentageHandler, GiftChorePointsHandler,
    ListChoresHandler, ResolveChoreClaimHandler, ResolveChoreClaimsHandler,
    SetChorePreferenceHandler, UpdateChoreValuesHandler,
};
use crate::application::handlers::hearts::{
    GenerateHeartsHandler, GetChallengeHandler, GetHouseHeartsHandler, GetResidentHeartsHandler,
    InitialiseResidentHandler, InitiateChallengeHandler, ResolveChallengeHandler,
    ResolveChallengesHandler,
};
use crate::application::handlers::houses::{
    ListWorkingResidentsHandler, SetChoresChannelHandler, UpdateResidentHandler,
    UpsertHouseHandler,
};
use crate::application::handlers::polls::{
    CreatePollHandler, GetPollResultsHandler, IsPollValidHandler, SubmitVoteHandler,
    UpdatePollMetadataHandler,
};
use crate::application::handlers::proposals::{
    CreateChoreProposalHandler, GetChoreProposalHandler, ResolveChoreProposalHandler,
    ResolveChoreProposalsHandler,
};
use crate::application::handlers::RunGovernanceSweepHandler;
use crate::config::GovernanceConfig;
use crate::ports::{
    ChoreBreakRepository, ChoreLedger, ChoreProposalRepository, ChoreRepository,
    HeartRepository, HouseRepository, PollRepository, ResidentRepository,
};

#[derive(Clone)]
pub struct GovernanceState {
    pub houses: Arc<dyn HouseRepository>,
    pub residents: Arc<dyn ResidentRepository>,
    pub polls: Arc<dyn PollRepository>,
    pub hearts: Arc<dyn HeartRepository>,
    pub chores: Arc<dyn ChoreRepository>,
    pub ledger: Arc<dyn ChoreLedger>,
    pub breaks: Arc<dyn ChoreBreakRepository>,
    pub proposals: Arc<dyn ChoreProposalRepository>,
    pub config: GovernanceConfig,
}

impl GovernanceState {
    // Houses and residents

    pub fn upsert_house_handler(&self) -> UpsertHouseHandler {
        UpsertHouseHandler::new(self.houses.clone())
    }

    pub fn set_chores_channel_handler(&self) -> SetChoresChannelHandler {
        SetChoresChannelHandler::new(self.houses.clone())
    }

    pub fn update_resident_handler(&self) -> UpdateResidentHandler {
        UpdateResidentHandler::new(self.residents.clone())
    }

    pub fn list_working_residents_handler(&self) -> ListWorkingResidentsHandler {
        ListWorkingResidentsHandler::new(self.residents.clone(), self.breaks.clone())
    }

    // Polls

    pub fn create_poll_handler(&self) -> CreatePollHandler {
        CreatePollHandler::new(self.polls.clone())
    }

    pub fn submit_vote_handler(&self) -> SubmitVoteHandler {
        SubmitVoteHandler::new(self.polls.clone())
    }

    pub fn get_poll_results_handler(&self) -> GetPollResultsHandler {
        GetPollResultsHandler::new(self.polls.clone())
    }

    pub fn is_poll_valid_handler(&self) -> IsPollValidHandler {
        IsPollValidHandler::new(self.polls.clone())
    }

    pub fn update_poll_metadata_handler(&self) -> UpdatePollMetadataHandler {
        UpdatePollMetadataHandler::new(self.polls.clone())
    }

    // Hearts

    pub fn generate_hearts_handler(&self) -> GenerateHeartsHandler {
        GenerateHeartsHandler::new(self.hearts.clone())
    }

    pub fn initialise_resident_handler(&self) -> InitialiseResidentHandler {
        InitialiseResidentHandler::new(self.hearts.clone(), self.config.hearts_baseline)
    }

    pub fn get_resident_hearts_handler(&self) -> GetResidentHeartsHandler {
        GetResidentHeartsHandler::new(self.hearts.clone())
    }

    pub fn get_house_hearts_handler(&self) -> GetHouseHeartsHandler {
        GetHouseHeartsHandler::new(self.hearts.clone())
    }

    pub fn initiate_challenge_handler(&self) -> InitiateChallengeHandler {
        InitiateChallengeHandler::new(
            self.hearts.clone(),
            self.polls.clone(),
            self.residents.clone(),
            self.config.challenge_min_votes,
        )
    }

    pub fn get_challenge_handler(&self) -> GetChallengeHandler {
        GetChallengeHandler::new(self.hearts.clone())
    }

    pub fn resolve_challenge_handler(&self) -> ResolveChallengeHandler {
        ResolveChallengeHandler::new(
            self.hearts.clone(),
            self.polls.clone(),
            self.config.challenge_min_votes,
        )
    }

    pub fn resolve_challenges_handler(&self) -> ResolveChallengesHandler {
        ResolveChallengesHandler::new(self.hearts.clone(), self.resolve_challenge_handler())
    }

    // Chores

    pub fn add_chore_handler(&self) -> AddChoreHandler {
        AddChoreHandler::new(self.chores.clone())
    }

    pub fn edit_chore_handler(&self) -> EditChoreHandler {
        EditChoreHandler::new(self.chores.clone())
    }

    pub fn delete_chore_handler(&self) -> DeleteChoreHandler {
        DeleteChoreHandler::new(self.chores.clone())
    }

    pub fn list_chores_handler(&self) -> ListChoresHandler {
        ListChoresHandler::new(self.chores.clone())
    }

    pub fn set_chore_preference_handler(&self) -> SetChorePreferenceHandler {
        SetChorePreferenceHandler::new(self.chores.clone())
    }

    pub fn get_active_chore_preferences_handler(&self) -> GetActiveChorePreferencesHandler {
        GetActiveChorePreferencesHandler::new(self.chores.clone(), self.residents.clone())
    }

    pub fn get_chore_rankings_handler(&self) -> GetChoreRankingsHandler {
        GetChoreRankingsHandler::new(
            self.chores.clone(),
            self.residents.clone(),
            self.config.ranker(),
        )
    }

    pub fn get_working_resident_count_handler(&self) -> GetWorkingResidentCountHandler {
        GetWorkingResidentCountHandler::new(self.residents.clone(), self.breaks.clone())
    }

    pub fn get_working_resident_percentage_handler(&self) -> GetWorkingResidentPercentageHandler {
        GetWorkingResidentPercentageHandler::new(self.residents.clone(), self.breaks.clone())
    }

    pub fn add_chore_break_handler(&self) -> AddChoreBreakHandler {
        AddChoreBreakHandler::new(self.breaks.clone())
    }

    pub fn delete_chore_break_handler(&self) -> DeleteChoreBreakHandler {
        DeleteChoreBreakHandler::new(self.breaks.clone())
    }

    pub fn get_chore_breaks_handler(&self) -> GetChoreBreaksHandler {
        GetChoreBreaksHandler::new(self.breaks.clone(), self.residents.clone())
    }

    pub fn get_chore_value_interval_scalar_handler(&self) -> GetChoreValueIntervalScalarHandler {
        GetChoreValueIntervalScalarHandler::new(self.ledger.clone())
    }

    pub fn get_updated_chore_values_handler(&self) -> GetUpdatedChoreValuesHandler {
        GetUpdatedChoreValuesHandler::new(
            self.chores.clone(),
            self.residents.clone(),
            self.breaks.clone(),
            self.ledger.clone(),
            self.config.clone(),
        )
    }

    pub fn update_chore_values_handler(&self) -> UpdateChoreValuesHandler {
        UpdateChoreValuesHandler::new(self.get_updated_chore_values_handler(), self.ledger.clone())
    }

    pub fn get_current_chore_values_handler(&self) -> GetCurrentChoreValuesHandler {
        GetCurrentChoreValuesHandler::new(self.chores.clone(), self.ledger.clone())
    }

    pub fn claim_chore_handler(&self) -> ClaimChoreHandler {
        ClaimChoreHandler::new(
            self.chores.clone(),
            self.polls.clone(),
            self.ledger.clone(),
            self.config.chore_poll_duration(),
            self.config.claim_min_votes,
        )
    }

    pub fn get_chore_claim_handler(&self) -> GetChoreClaimHandler {
        GetChoreClaimHandler::new(self.ledger.clone())
    }

    pub fn get_latest_chore_claim_handler(&self) -> GetLatestChoreClaimHandler {
        GetLatestChoreClaimHandler::new(self.ledger.clone())
    }

    pub fn get_largest_chore_claim_handler(&self) -> GetLargestChoreClaimHandler {
        GetLargestChoreClaimHandler::new(self.ledger.clone())
    }

    pub fn resolve_chore_claim_handler(&self) -> ResolveChoreClaimHandler {
        ResolveChoreClaimHandler::new(self.ledger.clone(), self.polls.clone())
    }

    pub fn resolve_chore_claims_handler(&self) -> ResolveChoreClaimsHandler {
        ResolveChoreClaimsHandler::new(self.ledger.clone(), self.resolve_chore_claim_handler())
    }

    pub fn get_chore_points_handler(&self) -> GetChorePointsHandler {
        GetChorePointsHandler::new(self.ledger.clone())
    }

    pub fn gift_chore_points_handler(&self) -> GiftChorePointsHandler {
        GiftChorePointsHandler::new(self.ledger.clone())
    }

    pub fn calculate_penalty_handler(&self) -> CalculatePenaltyHandler {
        CalculatePenaltyHandler::new(
            self.residents.clone(),
            self.breaks.clone(),
            self.ledger.clone(),
            self.config.penalty_policy(),
        )
    }

    pub fn add_chore_penalty_handler(&self) -> AddChorePenaltyHandler {
        AddChorePenaltyHandler::new(
            self.hearts.clone(),
            self.calculate_penalty_handler(),
            self.config.penalty_policy(),
        )
    }

    pub fn add_chore_penalties_handler(&self) -> AddChorePenaltiesHandler {
        AddChorePenaltiesHandler::new(self.residents.clone(), self.add_chore_penalty_handler())
    }

    // Proposals

    pub fn create_chore_proposal_handler(&self) -> CreateChoreProposalHandler {
        CreateChoreProposalHandler::new(
            self.proposals.clone(),
            self.polls.clone(),
            self.residents.clone(),
            self.chores.clone(),
            self.config.proposal_poll_duration(),
            self.config.proposal_min_pct,
        )
    }

    pub fn get_chore_proposal_handler(&self) -> GetChoreProposalHandler {
        GetChoreProposalHandler::new(self.proposals.clone())
    }

    pub fn resolve_chore_proposal_handler(&self) -> ResolveChoreProposalHandler {
        ResolveChoreProposalHandler::new(
            self.proposals.clone(),
            self.polls.clone(),
            self.chores.clone(),
        )
    }

    pub fn resolve_chore_proposals_handler(&self) -> ResolveChoreProposalsHandler {
        ResolveChoreProposalsHandler::new(
            self.proposals.clone(),
            self.resolve_chore_proposal_handler(),
        )
    }

    // Sweep

    pub fn run_governance_sweep_handler(&self) -> RunGovernanceSweepHandler {
        RunGovernanceSweepHandler::new(
            self.resolve_chore_claims_handler(),
            self.resolve_chore_proposals_handler(),
            self.resolve_challenges_handler(),
            self.update_chore_values_handler(),
            self.add_chore_penalties_handler(),
        )
    }
}
