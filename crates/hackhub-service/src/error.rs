//! Typed outcomes returned by every team service operation.
//!
//! Each variant carries the message the page layer shows to the user.
//! Storage errors never leak through; unexpected failures are reported and
//! collapsed into [`TeamError::Internal`].

use serde::Serialize;
use thiserror::Error;

/// Failure outcome of a team operation.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "error", content = "message", rename_all = "snake_case")]
pub enum TeamError {
    /// The caller may not perform this action.
    #[error("{0}")]
    PermissionDenied(String),
    /// The target does not exist, or the caller may not see it.
    #[error("{0}")]
    NotFound(String),
    /// The write would duplicate an existing row.
    #[error("{0}")]
    Conflict(String),
    /// The sender has too many pending invites.
    #[error("{0}")]
    RateLimited(String),
    /// The caller already belongs to the team.
    #[error("{0}")]
    AlreadyMember(String),
    /// The caller owns the project they tried to join.
    #[error("{0}")]
    AlreadyOwner(String),
    /// Another claimant accepted the link first.
    #[error("{0}")]
    AlreadyUsed(String),
    /// The link token matches no pending invite.
    #[error("{0}")]
    InvalidLink(String),
    /// The profile cannot be invited.
    #[error("{0}")]
    InvalidTarget(String),
    /// Input was rejected before touching the store.
    #[error("{0}")]
    Validation(String),
    /// Unexpected failure; details went to the error reporter.
    #[error("{0}")]
    Internal(String),
}

impl TeamError {
    /// The generic message shown for unexpected failures.
    pub const INTERNAL_MESSAGE: &'static str = "Something went wrong, please try again";

    /// An internal error with the generic message.
    pub fn internal() -> Self {
        Self::Internal(Self::INTERNAL_MESSAGE.to_string())
    }

    /// The user-facing message.
    pub fn message(&self) -> &str {
        match self {
            Self::PermissionDenied(m)
            | Self::NotFound(m)
            | Self::Conflict(m)
            | Self::RateLimited(m)
            | Self::AlreadyMember(m)
            | Self::AlreadyOwner(m)
            | Self::AlreadyUsed(m)
            | Self::InvalidLink(m)
            | Self::InvalidTarget(m)
            | Self::Validation(m)
            | Self::Internal(m) => m,
        }
    }

    pub(crate) fn not_found(message: &str) -> Self {
        Self::NotFound(message.to_string())
    }

    pub(crate) fn permission_denied(message: &str) -> Self {
        Self::PermissionDenied(message.to_string())
    }
}

/// Result alias for team operations.
pub type TeamResult<T> = Result<T, TeamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_the_user_message() {
        let err = TeamError::AlreadyUsed("This invite has already been used".to_string());
        assert_eq!(err.to_string(), "This invite has already been used");
        assert_eq!(err.message(), "This invite has already been used");
    }

    #[test]
    fn test_serializes_as_tagged_outcome() {
        let json = serde_json::to_value(TeamError::internal()).unwrap();
        assert_eq!(json["error"], "internal");
        assert_eq!(json["message"], TeamError::INTERNAL_MESSAGE);
    }
}
