//! Poll-specific error types.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, PollId, Timestamp};

/// Errors raised by the poll engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PollError {
    #[error("Poll not found: {0}")]
    NotFound(PollId),

    #[error("Poll has closed")]
    Closed { poll_id: PollId, closed_at: Timestamp },

    #[error("Poll not closed!")]
    NotClosed { poll_id: PollId, closes_at: Timestamp },

    #[error("Poll duration must be positive")]
    InvalidDuration,

    #[error("Poll storage error: {0}")]
    Infrastructure(String),
}

impl PollError {
    pub fn not_found(id: PollId) -> Self {
        PollError::NotFound(id)
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        PollError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            PollError::NotFound(_) => ErrorCode::PollNotFound,
            PollError::Closed { .. } => ErrorCode::PollClosed,
            PollError::NotClosed { .. } => ErrorCode::PollNotClosed,
            PollError::InvalidDuration => ErrorCode::ValidationFailed,
            PollError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<DomainError> for PollError {
    fn from(err: DomainError) -> Self {
        PollError::Infrastructure(err.to_string())
    }
}

impl From<PollError> for DomainError {
    fn from(err: PollError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}
