//! In-memory adapters.
//!
//! Mutex-backed implementations of every port. They hold the same
//! invariants as the PostgreSQL adapters (upserts, conditional resolution,
//! inclusive time windows) and back the test suites and local runs.
//! Nothing persists across restarts.

mod breaks;
mod chores;
mod hearts;
mod houses;
mod ledger;
mod polls;
mod proposals;

pub use breaks::InMemoryChoreBreakRepository;
pub use chores::InMemoryChoreRepository;
pub use hearts::InMemoryHeartRepository;
pub use houses::{InMemoryHouseRepository, InMemoryResidentRepository};
pub use ledger::InMemoryChoreLedger;
pub use polls::InMemoryPollRepository;
pub use proposals::InMemoryChoreProposalRepository;

use std::sync::{Arc, Mutex, MutexGuard};

use crate::application::GovernanceState;
use crate::config::GovernanceConfig;
use crate::domain::foundation::{DomainError, ErrorCode};

/// Locks `mutex`, reporting a poisoned lock as an internal error.
fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, DomainError> {
    mutex
        .lock()
        .map_err(|_| DomainError::new(ErrorCode::InternalError, "In-memory store lock poisoned"))
}

/// A `GovernanceState` backed entirely by fresh in-memory adapters.
pub fn governance_state(config: GovernanceConfig) -> GovernanceState {
    GovernanceState {
        houses: Arc::new(InMemoryHouseRepository::new()),
        residents: Arc::new(InMemoryResidentRepository::new()),
        polls: Arc::new(InMemoryPollRepository::new()),
        hearts: Arc::new(InMemoryHeartRepository::new()),
        chores: Arc::new(InMemoryChoreRepository::new()),
        ledger: Arc::new(InMemoryChoreLedger::new()),
        breaks: Arc::new(InMemoryChoreBreakRepository::new()),
        proposals: Arc::new(InMemoryChoreProposalRepository::new()),
        config,
    }
}
