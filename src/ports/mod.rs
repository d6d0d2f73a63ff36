//! Ports - the interfaces the application layer needs from storage.
//!
//! Every port is an object-safe `async_trait` so handlers can hold
//! `Arc<dyn Port>` and tests can swap in the in-memory adapters.

mod chore_break_repository;
mod chore_ledger;
mod chore_proposal_repository;
mod chore_repository;
mod heart_repository;
mod house_repository;
mod poll_repository;

pub use chore_break_repository::ChoreBreakRepository;
pub use chore_ledger::ChoreLedger;
pub use chore_proposal_repository::ChoreProposalRepository;
pub use chore_repository::ChoreRepository;
pub use heart_repository::HeartRepository;
pub use house_repository::{HouseRepository, ResidentRepository};
pub use poll_repository::PollRepository;
