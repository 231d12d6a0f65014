//! Summaries of cascading deletions.

use serde::{Deserialize, Serialize};

use hackhub_core::types::{ProfileId, ProjectId};

/// Rows removed while deleting one project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPurge {
    /// The deleted project.
    pub project_id: ProjectId,
    /// Membership rows deleted.
    pub memberships_removed: u64,
    /// Invite rows deleted.
    pub invites_removed: u64,
    /// Event registration rows deleted.
    pub event_links_removed: u64,
}

/// Rows removed or detached while deleting one profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountPurge {
    /// The deleted profile.
    pub profile_id: ProfileId,
    /// Projects the profile owned, each purged as in [`ProjectPurge`].
    pub projects: Vec<ProjectPurge>,
    /// The profile's memberships on projects it did not own.
    pub memberships_removed: u64,
    /// Invites elsewhere where the profile was sender or recipient.
    pub invites_removed: u64,
    /// Moderation and audit references set to NULL.
    pub references_cleared: u64,
}

impl AccountPurge {
    /// Ids of the owned projects that were deleted.
    pub fn project_ids(&self) -> Vec<ProjectId> {
        self.projects.iter().map(|p| p.project_id).collect()
    }
}
