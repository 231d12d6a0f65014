//! Membership entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use hackhub_core::types::{InviteId, MembershipId, ProfileId, ProjectId};

/// A profile's membership in a project team.
///
/// At most one row exists per `(project_id, profile_id)`. The project owner
/// never has one for their own project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Membership {
    /// Unique membership identifier.
    pub id: MembershipId,
    /// The project.
    pub project_id: ProjectId,
    /// The member.
    pub profile_id: ProfileId,
    /// The invite whose acceptance created this row. Cleared before that
    /// invite is deleted.
    pub invite_id: Option<InviteId>,
    /// When the member joined.
    pub joined_at: DateTime<Utc>,
}

/// Data required to create a membership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMembership {
    /// The project.
    pub project_id: ProjectId,
    /// The joining profile.
    pub profile_id: ProfileId,
    /// The accepted invite.
    pub invite_id: Option<InviteId>,
}
