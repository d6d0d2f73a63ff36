//! Chore-specific error types.
//!
//! | Error | Meaning |
//! |-------|---------|
//! | ZeroValueClaim | Nothing has accrued on the chore since the last claim |
//! | InsufficientBalance | Gift exceeds the giver's points this month |
//! | InvalidProposal | Proposal names neither a chore nor a name, or a chore outside the house |
//! | DuplicateName | Another chore in the house already has the name |
//! | AlreadyResolved | Proposal was already settled |
//! | Poll | The underlying poll refused the operation |

use thiserror::Error;

use crate::domain::foundation::{
    ChoreClaimId, ChoreId, ChoreProposalId, DomainError, ErrorCode, ValidationError,
};
use crate::domain::polls::PollError;

/// Errors raised by the chore engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChoreError {
    #[error("Chore not found: {0}")]
    ChoreNotFound(ChoreId),

    #[error("Chore claim not found: {0}")]
    ClaimNotFound(ChoreClaimId),

    #[error("Chore proposal not found: {0}")]
    ProposalNotFound(ChoreProposalId),

    #[error("Cannot claim a zero-value chore")]
    ZeroValueClaim(ChoreId),

    #[error("Insufficient points: balance {balance}, requested {requested}")]
    InsufficientBalance { balance: f64, requested: f64 },

    #[error("Invalid proposal: {0}")]
    InvalidProposal(String),

    #[error("Chore name already in use: {0}")]
    DuplicateName(String),

    #[error("Proposal {0} already resolved")]
    AlreadyResolved(ChoreProposalId),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Poll(#[from] PollError),

    #[error("Chore storage error: {0}")]
    Infrastructure(String),
}

impl ChoreError {
    pub fn infrastructure(message: impl Into<String>) -> Self {
        ChoreError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ChoreError::ChoreNotFound(_) => ErrorCode::ChoreNotFound,
            ChoreError::ClaimNotFound(_) => ErrorCode::ClaimNotFound,
            ChoreError::ProposalNotFound(_) => ErrorCode::ProposalNotFound,
            ChoreError::ZeroValueClaim(_) => ErrorCode::ZeroValueClaim,
            ChoreError::InsufficientBalance { .. } => ErrorCode::InsufficientBalance,
            ChoreError::InvalidProposal(_) => ErrorCode::InvalidProposal,
            ChoreError::DuplicateName(_) => ErrorCode::DuplicateName,
            ChoreError::AlreadyResolved(_) => ErrorCode::AlreadyResolved,
            ChoreError::Validation(_) => ErrorCode::ValidationFailed,
            ChoreError::Poll(err) => err.code(),
            ChoreError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// True when a sweep should skip the item and try again later.
    pub fn is_not_ready(&self) -> bool {
        matches!(self, ChoreError::Poll(PollError::NotClosed { .. }))
    }
}

impl From<DomainError> for ChoreError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat => ChoreError::Validation(ValidationError::invalid_format(
                err.details.get("field").cloned().unwrap_or_else(|| "unknown".to_string()),
                err.message,
            )),
            ErrorCode::DuplicateName => ChoreError::DuplicateName(
                err.details.get("name").cloned().unwrap_or(err.message),
            ),
            _ => ChoreError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ChoreError> for DomainError {
    fn from(err: ChoreError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}
