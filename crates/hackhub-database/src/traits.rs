//! Store traits consumed by the service layer.
//!
//! Every method is a single atomic store operation: one statement, or one
//! transaction for the [`CascadeStore`] methods. The conditional-update
//! methods on [`InviteStore`] return `Ok(None)` when their predicate matched
//! no row; callers treat that as the authoritative "lost the race / not
//! yours / already resolved" signal and must not re-read to second-guess it.
//!
//! Uniqueness violations are reported as [`ErrorKind::Conflict`] so callers
//! can recover them without inspecting backend error codes.
//!
//! [`ErrorKind::Conflict`]: hackhub_core::error::ErrorKind::Conflict

use async_trait::async_trait;

use hackhub_core::result::AppResult;
use hackhub_core::types::{AccountId, InviteId, ProfileId, ProjectId};
use hackhub_entity::audit::{AuditLogEntry, CreateAuditLogEntry};
use hackhub_entity::invite::{CreateInvite, Invite, InviteStatus};
use hackhub_entity::membership::{CreateMembership, Membership};
use hackhub_entity::profile::Profile;
use hackhub_entity::project::Project;
use hackhub_entity::purge::{AccountPurge, ProjectPurge};

/// Filter for the invitable-profile search.
#[derive(Debug, Clone)]
pub struct CandidateQuery {
    /// Project the candidates would join. Its owner and members are excluded.
    pub project_id: ProjectId,
    /// The searching profile, excluded from results.
    pub caller_id: ProfileId,
    /// Raw search text, matched case-insensitively as a substring.
    pub text: String,
    /// Maximum number of rows.
    pub limit: u32,
}

/// Read access to participant profiles.
#[async_trait]
pub trait ProfileStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a profile by primary key.
    async fn find_profile(&self, id: ProfileId) -> AppResult<Option<Profile>>;

    /// Find the profile belonging to an account.
    async fn find_profile_by_account(&self, account_id: AccountId) -> AppResult<Option<Profile>>;

    /// Find a profile by username (case-insensitive).
    async fn find_profile_by_username(&self, username: &str) -> AppResult<Option<Profile>>;

    /// Invitable profiles matching the query, excluding the caller, the
    /// project owner, current members, and moderated profiles.
    async fn search_candidates(&self, query: &CandidateQuery) -> AppResult<Vec<Profile>>;
}

/// Read access to projects.
#[async_trait]
pub trait ProjectStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a project by primary key.
    async fn find_project(&self, id: ProjectId) -> AppResult<Option<Project>>;
}

/// Invite rows and their state machine.
#[async_trait]
pub trait InviteStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a pending invite.
    ///
    /// Fails with a conflict if a pending direct invite already exists for
    /// the same project and recipient.
    async fn create_invite(&self, data: &CreateInvite) -> AppResult<Invite>;

    /// Find a link invite by its token, whatever its status.
    async fn find_link_by_token(&self, token: &str) -> AppResult<Option<Invite>>;

    /// Find the pending direct invite for a project and recipient.
    async fn find_pending_direct(
        &self,
        project_id: ProjectId,
        recipient_id: ProfileId,
    ) -> AppResult<Option<Invite>>;

    /// Move a pending direct invite addressed to `recipient_id` into `status`.
    async fn respond_to_direct(
        &self,
        id: InviteId,
        recipient_id: ProfileId,
        status: InviteStatus,
    ) -> AppResult<Option<Invite>>;

    /// Accept a pending link invite and bind `claimant_id` as its recipient
    /// in the same statement.
    async fn claim_link(&self, id: InviteId, claimant_id: ProfileId) -> AppResult<Option<Invite>>;

    /// Revoke a pending invite sent by `sender_id`.
    async fn revoke_invite(&self, id: InviteId, sender_id: ProfileId)
    -> AppResult<Option<Invite>>;

    /// Count pending invites sent by a profile across all projects.
    async fn count_pending_by_sender(&self, sender_id: ProfileId) -> AppResult<u64>;

    /// List every invite for a project, newest first.
    async fn list_invites_by_project(&self, project_id: ProjectId) -> AppResult<Vec<Invite>>;

    /// List pending direct invites addressed to a profile, newest first.
    async fn list_pending_for_recipient(&self, recipient_id: ProfileId)
    -> AppResult<Vec<Invite>>;
}

/// Membership rows.
#[async_trait]
pub trait MembershipStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a membership. Fails with a conflict if the profile is already
    /// a member of the project.
    async fn create_membership(&self, data: &CreateMembership) -> AppResult<Membership>;

    /// Find the membership for a project and profile.
    async fn find_membership(
        &self,
        project_id: ProjectId,
        profile_id: ProfileId,
    ) -> AppResult<Option<Membership>>;

    /// Delete the membership for a project and profile. Returns `true` if a
    /// row was deleted.
    async fn delete_membership(&self, project_id: ProjectId, profile_id: ProfileId)
    -> AppResult<bool>;

    /// List a project's members, oldest first.
    async fn list_memberships(&self, project_id: ProjectId) -> AppResult<Vec<Membership>>;
}

/// Transactional cleanup of dependent rows.
#[async_trait]
pub trait CascadeStore: Send + Sync + std::fmt::Debug + 'static {
    /// Delete a project and every membership, invite, and event link that
    /// references it. Returns `Ok(None)` if the project does not exist.
    async fn purge_project(&self, project_id: ProjectId) -> AppResult<Option<ProjectPurge>>;

    /// Delete a profile, its owned projects, its memberships and invites,
    /// and detach it from moderation and audit references. Returns
    /// `Ok(None)` if the profile does not exist.
    async fn purge_profile(&self, profile_id: ProfileId) -> AppResult<Option<AccountPurge>>;
}

/// Append-only audit log.
#[async_trait]
pub trait AuditStore: Send + Sync + std::fmt::Debug + 'static {
    /// Record an audit entry.
    async fn record(&self, data: &CreateAuditLogEntry) -> AppResult<AuditLogEntry>;
}
