//! Chore handlers.
//!
//! ## Commands
//! - Add, edit, and delete chores; set pairwise preferences
//! - Add and delete breaks
//! - Update chore values
//! - Claim a chore, resolve claims (one or all)
//! - Gift points
//! - Apply monthly penalties (one resident or all)
//!
//! ## Queries
//! - Chores, active preferences, rankings
//! - Working resident count and percentage, breaks
//! - Interval scalar, pending and current chore values
//! - Claims (by id, latest, largest), points, penalty amount

mod accounting;
mod breaks;
mod chore_values;
mod claim_chore;
mod claims;
mod manage_chores;
mod penalties;
mod points;
mod preferences;

pub use breaks::{
    AddChoreBreakCommand, AddChoreBreakHandler, DeleteChoreBreakCommand, DeleteChoreBreakHandler,
    GetChoreBreaksHandler, GetChoreBreaksQuery, GetWorkingResidentCountHandler,
    GetWorkingResidentCountQuery, GetWorkingResidentPercentageHandler,
    GetWorkingResidentPercentageQuery,
};
pub use chore_values::{
    CurrentChoreValue, GetChoreValueIntervalScalarHandler, GetChoreValueIntervalScalarQuery,
    GetCurrentChoreValuesHandler, GetCurrentChoreValuesQuery, GetUpdatedChoreValuesHandler,
    GetUpdatedChoreValuesQuery, UpdateChoreValuesCommand, UpdateChoreValuesHandler,
};
pub use claim_chore::{ClaimChoreCommand, ClaimChoreHandler};
pub use claims::{
    GetChoreClaimHandler, GetChoreClaimQuery, GetLargestChoreClaimHandler,
    GetLargestChoreClaimQuery, GetLatestChoreClaimHandler, GetLatestChoreClaimQuery,
    ResolveChoreClaimCommand, ResolveChoreClaimHandler, ResolveChoreClaimsCommand,
    ResolveChoreClaimsHandler,
};
pub use manage_chores::{
    AddChoreCommand, AddChoreHandler, DeleteChoreCommand, DeleteChoreHandler, EditChoreCommand,
    EditChoreHandler, ListChoresHandler, ListChoresQuery,
};
pub use penalties::{
    AddChorePenaltiesCommand, AddChorePenaltiesHandler, AddChorePenaltyCommand,
    AddChorePenaltyHandler, CalculatePenaltyHandler, CalculatePenaltyQuery,
};
pub use points::{
    GetChorePointsHandler, GetChorePointsQuery, GiftChorePointsCommand, GiftChorePointsHandler,
};
pub use preferences::{
    GetActiveChorePreferencesHandler, GetActiveChorePreferencesQuery, GetChoreRankingsHandler,
    GetChoreRankingsQuery, SetChorePreferenceCommand, SetChorePreferenceHandler,
};
