//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresHouseRepository` / `PostgresResidentRepository` - houses and residents
//! - `PostgresPollRepository` - polls and votes
//! - `PostgresHeartRepository` - hearts ledger and challenges
//! - `PostgresChoreRepository` - chores and preferences
//! - `PostgresChoreLedger` - valuations, claims, and gifts
//! - `PostgresChoreBreakRepository` - breaks
//! - `PostgresChoreProposalRepository` - chore proposals
//!
//! Schema lives in `migrations/` and is applied with `sqlx::migrate!`.

mod break_repository;
mod chore_ledger;
mod chore_repository;
mod heart_repository;
mod house_repository;
mod poll_repository;
mod proposal_repository;

pub use break_repository::PostgresChoreBreakRepository;
pub use chore_ledger::PostgresChoreLedger;
pub use chore_repository::PostgresChoreRepository;
pub use heart_repository::PostgresHeartRepository;
pub use house_repository::{PostgresHouseRepository, PostgresResidentRepository};
pub use poll_repository::PostgresPollRepository;
pub use proposal_repository::PostgresChoreProposalRepository;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;

use crate::application::GovernanceState;
use crate::config::GovernanceConfig;
use crate::domain::foundation::{
    DomainError, ErrorCode, HouseId, Metadata, ResidentId, Timestamp,
};

/// A `GovernanceState` whose ports all share `pool`.
pub fn governance_state(pool: PgPool, config: GovernanceConfig) -> GovernanceState {
    GovernanceState {
        houses: Arc::new(PostgresHouseRepository::new(pool.clone())),
        residents: Arc::new(PostgresResidentRepository::new(pool.clone())),
        polls: Arc::new(PostgresPollRepository::new(pool.clone())),
        hearts: Arc::new(PostgresHeartRepository::new(pool.clone())),
        chores: Arc::new(PostgresChoreRepository::new(pool.clone())),
        ledger: Arc::new(PostgresChoreLedger::new(pool.clone())),
        breaks: Arc::new(PostgresChoreBreakRepository::new(pool.clone())),
        proposals: Arc::new(PostgresChoreProposalRepository::new(pool)),
        config,
    }
}

fn house_id(raw: String) -> Result<HouseId, DomainError> {
    HouseId::new(raw).map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Invalid house_id: {}", e))
    })
}

fn resident_id(raw: String) -> Result<ResidentId, DomainError> {
    ResidentId::new(raw).map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Invalid resident_id: {}", e))
    })
}

fn timestamp(dt: DateTime<Utc>) -> Timestamp {
    Timestamp::from_datetime(dt)
}

/// JSONB column to metadata; anything but an object reads as empty.
fn metadata(value: Value) -> Metadata {
    match value {
        Value::Object(map) => map,
        _ => Metadata::new(),
    }
}

fn metadata_value(metadata: &Metadata) -> Value {
    Value::Object(metadata.clone())
}

fn count_to_i32(value: u32, field: &str) -> Result<i32, DomainError> {
    i32::try_from(value).map_err(|_| {
        DomainError::new(ErrorCode::OutOfRange, format!("{} too large: {}", field, value))
    })
}

fn count_from_i32(value: i32, field: &str) -> Result<u32, DomainError> {
    u32::try_from(value).map_err(|_| {
        DomainError::new(ErrorCode::DatabaseError, format!("Negative {}: {}", field, value))
    })
}
