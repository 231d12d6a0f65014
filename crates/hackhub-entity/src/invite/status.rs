//! Invite kind and status enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How an invite is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "invite_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InviteKind {
    /// Bound to one recipient profile at creation.
    Direct,
    /// Identified by a token; the first eligible claimant becomes the recipient.
    Link,
}

impl InviteKind {
    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Link => "link",
        }
    }
}

impl fmt::Display for InviteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle state of an invite.
///
/// `Pending` is the only non-terminal state. Every transition out of it
/// happens exactly once, through a conditional update guarded on
/// `status = 'pending'`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "invite_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InviteStatus {
    /// Awaiting a response.
    Pending,
    /// Accepted; a membership was created alongside.
    Accepted,
    /// Declined by the recipient (direct invites only).
    Declined,
    /// Withdrawn by the sender.
    Revoked,
}

impl InviteStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::Revoked => "revoked",
        }
    }
}

impl fmt::Display for InviteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
