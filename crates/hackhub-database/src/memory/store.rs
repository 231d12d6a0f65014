//! In-memory store using a Tokio mutex.
//!
//! All tables live behind one lock. Each trait method takes the lock once,
//! so a method call behaves like a single SQL statement and a purge behaves
//! like a committed transaction. The same uniqueness and foreign-key rules
//! as the PostgreSQL schema are enforced, with the same error kinds.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use hackhub_core::error::AppError;
use hackhub_core::result::AppResult;
use hackhub_core::types::{
    AccountId, AuditLogId, EventId, InviteId, MembershipId, ProfileId, ProjectId,
};
use hackhub_entity::audit::{AuditLogEntry, CreateAuditLogEntry};
use hackhub_entity::invite::{CreateInvite, Invite, InviteKind, InviteStatus};
use hackhub_entity::membership::{CreateMembership, Membership};
use hackhub_entity::profile::{CreateProfile, Profile};
use hackhub_entity::project::{CreateProject, Project, ProjectEventLink};
use hackhub_entity::purge::{AccountPurge, ProjectPurge};

use crate::traits::{
    AuditStore, CandidateQuery, CascadeStore, InviteStore, MembershipStore, ProfileStore,
    ProjectStore,
};

/// Row storage guarded by the store's mutex.
#[derive(Debug, Default)]
struct Tables {
    profiles: Vec<Profile>,
    projects: Vec<Project>,
    event_links: Vec<ProjectEventLink>,
    invites: Vec<Invite>,
    memberships: Vec<Membership>,
    audit_log: Vec<AuditLogEntry>,
}

/// A point-in-time copy of every table.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Profile rows.
    pub profiles: Vec<Profile>,
    /// Project rows.
    pub projects: Vec<Project>,
    /// Project event registrations.
    pub event_links: Vec<ProjectEventLink>,
    /// Invite rows in insertion order.
    pub invites: Vec<Invite>,
    /// Membership rows in insertion order.
    pub memberships: Vec<Membership>,
    /// Audit log entries in insertion order.
    pub audit_log: Vec<AuditLogEntry>,
}

impl Snapshot {
    /// Memberships of one project.
    pub fn members_of(&self, project_id: ProjectId) -> Vec<&Membership> {
        self.memberships
            .iter()
            .filter(|m| m.project_id == project_id)
            .collect()
    }

    /// Invites of one project.
    pub fn invites_of(&self, project_id: ProjectId) -> Vec<&Invite> {
        self.invites
            .iter()
            .filter(|i| i.project_id == project_id)
            .collect()
    }
}

fn remove_where<T>(rows: &mut Vec<T>, predicate: impl Fn(&T) -> bool) -> u64 {
    let before = rows.len();
    rows.retain(|row| !predicate(row));
    (before - rows.len()) as u64
}

fn clear_where<T, V>(
    rows: &mut [T],
    field: impl Fn(&mut T) -> &mut Option<V>,
    matches: impl Fn(&V) -> bool,
) -> u64 {
    let mut cleared = 0;
    for row in rows.iter_mut() {
        let slot = field(row);
        if slot.as_ref().is_some_and(&matches) {
            *slot = None;
            cleared += 1;
        }
    }
    cleared
}

impl Tables {
    fn has_profile(&self, id: ProfileId) -> bool {
        self.profiles.iter().any(|p| p.id == id)
    }

    fn has_project(&self, id: ProjectId) -> bool {
        self.projects.iter().any(|p| p.id == id)
    }

    fn profile_mut(&mut self, id: ProfileId) -> AppResult<&mut Profile> {
        self.profiles
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::not_found(format!("Profile {id} not found")))
    }

    fn project_mut(&mut self, id: ProjectId) -> AppResult<&mut Project> {
        self.projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::not_found(format!("Project {id} not found")))
    }

    /// Clear invite back-references held by memberships for the given invites.
    fn detach_invites(&mut self, invite_ids: &HashSet<InviteId>) {
        clear_where(&mut self.memberships, |m| &mut m.invite_id, |id| {
            invite_ids.contains(id)
        });
    }

    fn purge_project_rows(&mut self, project_id: ProjectId) -> ProjectPurge {
        let invite_ids: HashSet<InviteId> = self
            .invites
            .iter()
            .filter(|i| i.project_id == project_id)
            .map(|i| i.id)
            .collect();
        self.detach_invites(&invite_ids);

        let memberships_removed =
            remove_where(&mut self.memberships, |m| m.project_id == project_id);
        let invites_removed = remove_where(&mut self.invites, |i| i.project_id == project_id);
        let event_links_removed =
            remove_where(&mut self.event_links, |l| l.project_id == project_id);
        self.projects.retain(|p| p.id != project_id);

        ProjectPurge {
            project_id,
            memberships_removed,
            invites_removed,
            event_links_removed,
        }
    }

    fn clear_profile_references(&mut self, profile_id: ProfileId) -> u64 {
        let is_profile = |id: &ProfileId| *id == profile_id;
        let target = profile_id.into_uuid();

        let mut cleared = 0;
        cleared += clear_where(&mut self.profiles, |p| &mut p.banned_by, is_profile);
        cleared += clear_where(&mut self.profiles, |p| &mut p.hidden_by, is_profile);
        cleared += clear_where(&mut self.projects, |p| &mut p.hidden_by, is_profile);
        cleared += clear_where(&mut self.projects, |p| &mut p.reviewed_by, is_profile);
        cleared += clear_where(&mut self.audit_log, |e| &mut e.actor_id, is_profile);
        for entry in self.audit_log.iter_mut() {
            if entry.target_type == "profile" && entry.target_id == Some(target) {
                entry.target_id = None;
                cleared += 1;
            }
        }
        cleared
    }
}

/// In-memory implementation of all store traits.
///
/// Cloning shares the underlying tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a profile. Account ids and usernames (case-insensitive) are unique.
    pub async fn create_profile(&self, data: &CreateProfile) -> AppResult<Profile> {
        let mut tables = self.tables.lock().await;

        if tables.profiles.iter().any(|p| p.account_id == data.account_id) {
            return Err(AppError::conflict(format!(
                "Account {} already has a profile",
                data.account_id
            )));
        }
        let lowered = data.username.to_lowercase();
        if tables
            .profiles
            .iter()
            .any(|p| p.username.to_lowercase() == lowered)
        {
            return Err(AppError::conflict(format!(
                "Username '{}' is already taken",
                data.username
            )));
        }

        let profile = Profile {
            id: ProfileId::new(),
            account_id: data.account_id,
            username: data.username.clone(),
            display_name: data.display_name.clone(),
            allow_invites: data.allow_invites,
            is_banned: false,
            banned_by: None,
            is_hidden: false,
            hidden_by: None,
            created_at: Utc::now(),
        };
        tables.profiles.push(profile.clone());
        Ok(profile)
    }

    /// Insert a project owned by an existing profile. Slugs are unique.
    pub async fn create_project(&self, data: &CreateProject) -> AppResult<Project> {
        let mut tables = self.tables.lock().await;

        if !tables.has_profile(data.owner_id) {
            return Err(AppError::not_found(format!(
                "Profile {} not found",
                data.owner_id
            )));
        }
        if tables.projects.iter().any(|p| p.slug == data.slug) {
            return Err(AppError::conflict(format!(
                "Slug '{}' is already taken",
                data.slug
            )));
        }

        let project = Project {
            id: ProjectId::new(),
            owner_id: data.owner_id,
            slug: data.slug.clone(),
            title: data.title.clone(),
            is_hidden: false,
            hidden_by: None,
            reviewed_by: None,
            created_at: Utc::now(),
        };
        tables.projects.push(project.clone());
        Ok(project)
    }

    /// Register a project for an event.
    pub async fn link_event(
        &self,
        project_id: ProjectId,
        event_id: EventId,
    ) -> AppResult<ProjectEventLink> {
        let mut tables = self.tables.lock().await;

        if !tables.has_project(project_id) {
            return Err(AppError::not_found(format!("Project {project_id} not found")));
        }
        if tables
            .event_links
            .iter()
            .any(|l| l.project_id == project_id && l.event_id == event_id)
        {
            return Err(AppError::conflict("Project is already registered for this event"));
        }

        let link = ProjectEventLink {
            project_id,
            event_id,
            linked_at: Utc::now(),
        };
        tables.event_links.push(link.clone());
        Ok(link)
    }

    /// Mark a profile banned by a moderator.
    pub async fn ban_profile(&self, target: ProfileId, moderator: ProfileId) -> AppResult<()> {
        let mut tables = self.tables.lock().await;
        if !tables.has_profile(moderator) {
            return Err(AppError::not_found(format!("Profile {moderator} not found")));
        }
        let profile = tables.profile_mut(target)?;
        profile.is_banned = true;
        profile.banned_by = Some(moderator);
        Ok(())
    }

    /// Mark a profile hidden by a moderator.
    pub async fn hide_profile(&self, target: ProfileId, moderator: ProfileId) -> AppResult<()> {
        let mut tables = self.tables.lock().await;
        if !tables.has_profile(moderator) {
            return Err(AppError::not_found(format!("Profile {moderator} not found")));
        }
        let profile = tables.profile_mut(target)?;
        profile.is_hidden = true;
        profile.hidden_by = Some(moderator);
        Ok(())
    }

    /// Toggle whether a profile accepts invites.
    pub async fn set_allow_invites(&self, target: ProfileId, allow: bool) -> AppResult<()> {
        let mut tables = self.tables.lock().await;
        tables.profile_mut(target)?.allow_invites = allow;
        Ok(())
    }

    /// Mark a project hidden by a moderator.
    pub async fn hide_project(&self, project_id: ProjectId, moderator: ProfileId) -> AppResult<()> {
        let mut tables = self.tables.lock().await;
        if !tables.has_profile(moderator) {
            return Err(AppError::not_found(format!("Profile {moderator} not found")));
        }
        let project = tables.project_mut(project_id)?;
        project.is_hidden = true;
        project.hidden_by = Some(moderator);
        Ok(())
    }

    /// Record the moderator who reviewed a project.
    pub async fn review_project(&self, project_id: ProjectId, reviewer: ProfileId) -> AppResult<()> {
        let mut tables = self.tables.lock().await;
        if !tables.has_profile(reviewer) {
            return Err(AppError::not_found(format!("Profile {reviewer} not found")));
        }
        tables.project_mut(project_id)?.reviewed_by = Some(reviewer);
        Ok(())
    }

    /// Copy every table.
    pub async fn snapshot(&self) -> Snapshot {
        let tables = self.tables.lock().await;
        Snapshot {
            profiles: tables.profiles.clone(),
            projects: tables.projects.clone(),
            event_links: tables.event_links.clone(),
            invites: tables.invites.clone(),
            memberships: tables.memberships.clone(),
            audit_log: tables.audit_log.clone(),
        }
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn find_profile(&self, id: ProfileId) -> AppResult<Option<Profile>> {
        let tables = self.tables.lock().await;
        Ok(tables.profiles.iter().find(|p| p.id == id).cloned())
    }

    async fn find_profile_by_account(&self, account_id: AccountId) -> AppResult<Option<Profile>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .profiles
            .iter()
            .find(|p| p.account_id == account_id)
            .cloned())
    }

    async fn find_profile_by_username(&self, username: &str) -> AppResult<Option<Profile>> {
        let lowered = username.to_lowercase();
        let tables = self.tables.lock().await;
        Ok(tables
            .profiles
            .iter()
            .find(|p| p.username.to_lowercase() == lowered)
            .cloned())
    }

    async fn search_candidates(&self, query: &CandidateQuery) -> AppResult<Vec<Profile>> {
        let needle = query.text.to_lowercase();
        let tables = self.tables.lock().await;

        let owner_id = tables
            .projects
            .iter()
            .find(|p| p.id == query.project_id)
            .map(|p| p.owner_id);
        let members: HashSet<ProfileId> = tables
            .memberships
            .iter()
            .filter(|m| m.project_id == query.project_id)
            .map(|m| m.profile_id)
            .collect();

        Ok(tables
            .profiles
            .iter()
            .filter(|p| {
                p.id != query.caller_id
                    && Some(p.id) != owner_id
                    && !members.contains(&p.id)
                    && p.is_invitable()
                    && p.matches(&needle)
            })
            .take(query.limit as usize)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn find_project(&self, id: ProjectId) -> AppResult<Option<Project>> {
        let tables = self.tables.lock().await;
        Ok(tables.projects.iter().find(|p| p.id == id).cloned())
    }
}

#[async_trait]
impl InviteStore for MemoryStore {
    async fn create_invite(&self, data: &CreateInvite) -> AppResult<Invite> {
        let mut tables = self.tables.lock().await;

        let recipient_known = data.recipient_id.is_none_or(|id| tables.has_profile(id));
        if !tables.has_project(data.project_id)
            || !tables.has_profile(data.sender_id)
            || !recipient_known
        {
            return Err(AppError::database("Invite references a missing row"));
        }
        let well_formed = match data.kind {
            InviteKind::Direct => data.token.is_none() && data.recipient_id.is_some(),
            InviteKind::Link => data.token.is_some(),
        };
        if !well_formed {
            return Err(AppError::database("Invite violates invites_shape_check"));
        }

        if data.kind == InviteKind::Direct
            && tables.invites.iter().any(|i| {
                i.kind == InviteKind::Direct
                    && i.is_pending()
                    && i.project_id == data.project_id
                    && i.recipient_id == data.recipient_id
            })
        {
            return Err(AppError::conflict(
                "A pending invite already exists for this recipient",
            ));
        }
        if data.token.is_some() && tables.invites.iter().any(|i| i.token == data.token) {
            return Err(AppError::conflict("Invite token collision"));
        }

        let invite = Invite {
            id: InviteId::new(),
            project_id: data.project_id,
            sender_id: data.sender_id,
            recipient_id: data.recipient_id,
            kind: data.kind,
            token: data.token.clone(),
            status: InviteStatus::Pending,
            created_at: Utc::now(),
            responded_at: None,
        };
        tables.invites.push(invite.clone());
        debug!(invite_id = %invite.id, kind = %invite.kind, "Invite inserted");
        Ok(invite)
    }

    async fn find_link_by_token(&self, token: &str) -> AppResult<Option<Invite>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .invites
            .iter()
            .find(|i| i.kind == InviteKind::Link && i.token.as_deref() == Some(token))
            .cloned())
    }

    async fn find_pending_direct(
        &self,
        project_id: ProjectId,
        recipient_id: ProfileId,
    ) -> AppResult<Option<Invite>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .invites
            .iter()
            .find(|i| {
                i.kind == InviteKind::Direct
                    && i.is_pending()
                    && i.project_id == project_id
                    && i.recipient_id == Some(recipient_id)
            })
            .cloned())
    }

    async fn respond_to_direct(
        &self,
        id: InviteId,
        recipient_id: ProfileId,
        status: InviteStatus,
    ) -> AppResult<Option<Invite>> {
        let mut tables = self.tables.lock().await;
        let Some(invite) = tables.invites.iter_mut().find(|i| {
            i.id == id
                && i.recipient_id == Some(recipient_id)
                && i.kind == InviteKind::Direct
                && i.is_pending()
        }) else {
            return Ok(None);
        };

        invite.status = status;
        invite.responded_at = Some(Utc::now());
        Ok(Some(invite.clone()))
    }

    async fn claim_link(&self, id: InviteId, claimant_id: ProfileId) -> AppResult<Option<Invite>> {
        let mut tables = self.tables.lock().await;
        if !tables.has_profile(claimant_id) {
            return Err(AppError::database("Invite references a missing row"));
        }
        let Some(invite) = tables
            .invites
            .iter_mut()
            .find(|i| i.id == id && i.kind == InviteKind::Link && i.is_pending())
        else {
            return Ok(None);
        };

        invite.status = InviteStatus::Accepted;
        invite.recipient_id = Some(claimant_id);
        invite.responded_at = Some(Utc::now());
        Ok(Some(invite.clone()))
    }

    async fn revoke_invite(
        &self,
        id: InviteId,
        sender_id: ProfileId,
    ) -> AppResult<Option<Invite>> {
        let mut tables = self.tables.lock().await;
        let Some(invite) = tables
            .invites
            .iter_mut()
            .find(|i| i.id == id && i.sender_id == sender_id && i.is_pending())
        else {
            return Ok(None);
        };

        invite.status = InviteStatus::Revoked;
        invite.responded_at = Some(Utc::now());
        Ok(Some(invite.clone()))
    }

    async fn count_pending_by_sender(&self, sender_id: ProfileId) -> AppResult<u64> {
        let tables = self.tables.lock().await;
        Ok(tables
            .invites
            .iter()
            .filter(|i| i.sender_id == sender_id && i.is_pending())
            .count() as u64)
    }

    async fn list_invites_by_project(&self, project_id: ProjectId) -> AppResult<Vec<Invite>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .invites
            .iter()
            .rev()
            .filter(|i| i.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn list_pending_for_recipient(
        &self,
        recipient_id: ProfileId,
    ) -> AppResult<Vec<Invite>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .invites
            .iter()
            .rev()
            .filter(|i| {
                i.kind == InviteKind::Direct
                    && i.is_pending()
                    && i.recipient_id == Some(recipient_id)
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl MembershipStore for MemoryStore {
    async fn create_membership(&self, data: &CreateMembership) -> AppResult<Membership> {
        let mut tables = self.tables.lock().await;

        let invite_known = data
            .invite_id
            .is_none_or(|id| tables.invites.iter().any(|i| i.id == id));
        if !tables.has_project(data.project_id) || !tables.has_profile(data.profile_id) || !invite_known
        {
            return Err(AppError::database("Membership references a missing row"));
        }
        if tables
            .memberships
            .iter()
            .any(|m| m.project_id == data.project_id && m.profile_id == data.profile_id)
        {
            return Err(AppError::conflict(format!(
                "Profile {} is already a member of project {}",
                data.profile_id, data.project_id
            )));
        }

        let membership = Membership {
            id: MembershipId::new(),
            project_id: data.project_id,
            profile_id: data.profile_id,
            invite_id: data.invite_id,
            joined_at: Utc::now(),
        };
        tables.memberships.push(membership.clone());
        Ok(membership)
    }

    async fn find_membership(
        &self,
        project_id: ProjectId,
        profile_id: ProfileId,
    ) -> AppResult<Option<Membership>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .memberships
            .iter()
            .find(|m| m.project_id == project_id && m.profile_id == profile_id)
            .cloned())
    }

    async fn delete_membership(
        &self,
        project_id: ProjectId,
        profile_id: ProfileId,
    ) -> AppResult<bool> {
        let mut tables = self.tables.lock().await;
        let removed = remove_where(&mut tables.memberships, |m| {
            m.project_id == project_id && m.profile_id == profile_id
        });
        Ok(removed > 0)
    }

    async fn list_memberships(&self, project_id: ProjectId) -> AppResult<Vec<Membership>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .memberships
            .iter()
            .filter(|m| m.project_id == project_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CascadeStore for MemoryStore {
    async fn purge_project(&self, project_id: ProjectId) -> AppResult<Option<ProjectPurge>> {
        let mut tables = self.tables.lock().await;
        if !tables.has_project(project_id) {
            return Ok(None);
        }

        let purge = tables.purge_project_rows(project_id);
        info!(project_id = %project_id, "Project purged from memory store");
        Ok(Some(purge))
    }

    async fn purge_profile(&self, profile_id: ProfileId) -> AppResult<Option<AccountPurge>> {
        let mut tables = self.tables.lock().await;
        if !tables.has_profile(profile_id) {
            return Ok(None);
        }

        let owned: Vec<ProjectId> = tables
            .projects
            .iter()
            .filter(|p| p.owner_id == profile_id)
            .map(|p| p.id)
            .collect();

        let mut purge = AccountPurge {
            profile_id,
            ..Default::default()
        };
        for project_id in owned {
            let project = tables.purge_project_rows(project_id);
            purge.projects.push(project);
        }

        purge.memberships_removed =
            remove_where(&mut tables.memberships, |m| m.profile_id == profile_id);

        let invite_ids: HashSet<InviteId> = tables
            .invites
            .iter()
            .filter(|i| i.involves(profile_id))
            .map(|i| i.id)
            .collect();
        tables.detach_invites(&invite_ids);
        purge.invites_removed = remove_where(&mut tables.invites, |i| i.involves(profile_id));

        purge.references_cleared = tables.clear_profile_references(profile_id);
        tables.profiles.retain(|p| p.id != profile_id);

        info!(profile_id = %profile_id, "Profile purged from memory store");
        Ok(Some(purge))
    }
}

#[async_trait]
impl AuditStore for MemoryStore {
    async fn record(&self, data: &CreateAuditLogEntry) -> AppResult<AuditLogEntry> {
        let mut tables = self.tables.lock().await;
        if data.actor_id.is_some_and(|id| !tables.has_profile(id)) {
            return Err(AppError::database("Audit entry references a missing actor"));
        }

        let entry = AuditLogEntry {
            id: AuditLogId::new(),
            actor_id: data.actor_id,
            action: data.action.clone(),
            target_type: data.target_type.clone(),
            target_id: data.target_id,
            details: data.details.clone(),
            created_at: Utc::now(),
        };
        tables.audit_log.push(entry.clone());
        Ok(entry)
    }
}
