//! Invite entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use hackhub_core::types::{InviteId, ProfileId, ProjectId};

use super::status::{InviteKind, InviteStatus};

/// An invitation to join a project's team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Invite {
    /// Unique invite identifier.
    pub id: InviteId,
    /// The project being joined.
    pub project_id: ProjectId,
    /// The project owner who created the invite.
    pub sender_id: ProfileId,
    /// The invited profile. Always set for direct invites; set on claim for links.
    pub recipient_id: Option<ProfileId>,
    /// Direct or link.
    pub kind: InviteKind,
    /// Opaque claim token (link invites only).
    #[serde(skip_serializing)]
    pub token: Option<String>,
    /// Current lifecycle state.
    pub status: InviteStatus,
    /// When the invite was created.
    pub created_at: DateTime<Utc>,
    /// When the invite left the pending state.
    pub responded_at: Option<DateTime<Utc>>,
}

impl Invite {
    /// Whether the invite is still awaiting a response.
    pub fn is_pending(&self) -> bool {
        self.status == InviteStatus::Pending
    }

    /// Whether `profile_id` appears on the invite as sender or recipient.
    pub fn involves(&self, profile_id: ProfileId) -> bool {
        self.sender_id == profile_id || self.recipient_id == Some(profile_id)
    }
}

/// Data required to create a new invite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInvite {
    /// Target project.
    pub project_id: ProjectId,
    /// Sending owner.
    pub sender_id: ProfileId,
    /// Bound recipient (direct only).
    pub recipient_id: Option<ProfileId>,
    /// Direct or link.
    pub kind: InviteKind,
    /// Claim token (link only).
    pub token: Option<String>,
}

impl CreateInvite {
    /// A direct invite bound to `recipient_id`.
    pub fn direct(project_id: ProjectId, sender_id: ProfileId, recipient_id: ProfileId) -> Self {
        Self {
            project_id,
            sender_id,
            recipient_id: Some(recipient_id),
            kind: InviteKind::Direct,
            token: None,
        }
    }

    /// A link invite claimable with `token`.
    pub fn link(project_id: ProjectId, sender_id: ProfileId, token: String) -> Self {
        Self {
            project_id,
            sender_id,
            recipient_id: None,
            kind: InviteKind::Link,
            token: Some(token),
        }
    }
}
