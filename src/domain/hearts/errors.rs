//! Hearts-specific error types.

use thiserror::Error;

use crate::domain::foundation::{ChallengeId, DomainError, ErrorCode, ResidentId};
use crate::domain::polls::PollError;

/// Errors raised by the hearts engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HeartError {
    #[error("Challenge not found: {0}")]
    ChallengeNotFound(ChallengeId),

    #[error("Challenge {0} already resolved")]
    AlreadyResolved(ChallengeId),

    #[error("Resident {0} cannot take part in a challenge")]
    IneligibleResident(ResidentId),

    #[error("Invalid challenge: {0}")]
    InvalidChallenge(String),

    #[error(transparent)]
    Poll(#[from] PollError),

    #[error("Hearts storage error: {0}")]
    Infrastructure(String),
}

impl HeartError {
    pub fn infrastructure(message: impl Into<String>) -> Self {
        HeartError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            HeartError::ChallengeNotFound(_) => ErrorCode::ChallengeNotFound,
            HeartError::AlreadyResolved(_) => ErrorCode::AlreadyResolved,
            HeartError::IneligibleResident(_) => ErrorCode::IneligibleResident,
            HeartError::InvalidChallenge(_) => ErrorCode::ValidationFailed,
            HeartError::Poll(err) => err.code(),
            HeartError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Duplicate resolutions are expected when sweeps overlap.
    pub fn is_already_resolved(&self) -> bool {
        matches!(self, HeartError::AlreadyResolved(_))
    }
}

impl From<DomainError> for HeartError {
    fn from(err: DomainError) -> Self {
        HeartError::Infrastructure(err.to_string())
    }
}

impl From<HeartError> for DomainError {
    fn from(err: HeartError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}
