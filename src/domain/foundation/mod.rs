//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, and error types that form the
//! vocabulary of the household governance domain.

mod errors;
mod ids;
mod metadata;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{
    ChallengeId, ChoreBreakId, ChoreClaimId, ChoreGiftId, ChoreId, ChoreProposalId, ChoreValueId,
    HeartId, HouseId, PollId, ResidentId,
};
pub use metadata::{merge_metadata, Metadata};
pub use timestamp::Timestamp;
