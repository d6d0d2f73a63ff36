//! House and resident administration handlers.
//!
//! ## Commands
//! - Upsert a house, set its chore-claims channel
//! - Activate, deactivate, exempt, or unexempt a resident
//!
//! ## Queries
//! - List residents working at an instant

mod list_working_residents;
mod update_resident;
mod upsert_house;

pub use list_working_residents::{
    working_residents, ListWorkingResidentsHandler, ListWorkingResidentsQuery,
};
pub use update_resident::{ResidentChange, UpdateResidentCommand, UpdateResidentHandler};
pub use upsert_house::{
    SetChoresChannelCommand, SetChoresChannelHandler, UpsertHouseCommand, UpsertHouseHandler,
};
