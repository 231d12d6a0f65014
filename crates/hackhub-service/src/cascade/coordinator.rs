//! Project and account deletion.
//!
//! The row deletes run inside one store transaction. The account audit
//! entry is written afterwards because the profile it describes no longer
//! exists by then.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use hackhub_core::types::{ProfileId, ProjectId};
use hackhub_database::{AuditStore, CascadeStore, Stores};
use hackhub_entity::audit::CreateAuditLogEntry;
use hackhub_entity::purge::{AccountPurge, ProjectPurge};

use crate::error::{TeamError, TeamResult};
use crate::reporting::{ErrorReporter, ReportExt};

/// Audit action recorded for account deletion.
pub const ACCOUNT_DELETE_ACTION: &str = "account.delete";

/// Runs deletion cascades.
#[derive(Debug, Clone)]
pub struct CascadeCoordinator {
    cascade: Arc<dyn CascadeStore>,
    audit: Arc<dyn AuditStore>,
    reporter: Arc<dyn ErrorReporter>,
}

impl CascadeCoordinator {
    /// Creates a new coordinator.
    pub fn new(stores: &Stores, reporter: Arc<dyn ErrorReporter>) -> Self {
        Self {
            cascade: Arc::clone(&stores.cascade),
            audit: Arc::clone(&stores.audit),
            reporter,
        }
    }

    /// Delete a project with its memberships, invites, and event links.
    pub async fn purge_project(&self, project_id: ProjectId) -> TeamResult<ProjectPurge> {
        let purge = self
            .cascade
            .purge_project(project_id)
            .await
            .or_report(self.reporter.as_ref(), "purge_project")?
            .ok_or_else(|| TeamError::NotFound("Project not found".to_string()))?;

        info!(
            project_id = %project_id,
            memberships = purge.memberships_removed,
            invites = purge.invites_removed,
            event_links = purge.event_links_removed,
            "Project purged"
        );

        Ok(purge)
    }

    /// Delete a profile and everything that hangs off it.
    ///
    /// `actor` is the profile performing the deletion, if known. When a
    /// user deletes their own account the audit entry has no actor.
    pub async fn purge_account(
        &self,
        actor: Option<ProfileId>,
        profile_id: ProfileId,
    ) -> TeamResult<AccountPurge> {
        let purge = self
            .cascade
            .purge_profile(profile_id)
            .await
            .or_report(self.reporter.as_ref(), "purge_account")?
            .ok_or_else(|| TeamError::NotFound("Profile not found".to_string()))?;

        info!(
            profile_id = %profile_id,
            projects = purge.projects.len(),
            memberships = purge.memberships_removed,
            invites = purge.invites_removed,
            references = purge.references_cleared,
            "Account purged"
        );

        let entry = CreateAuditLogEntry {
            actor_id: actor.filter(|a| *a != profile_id),
            action: ACCOUNT_DELETE_ACTION.to_string(),
            target_type: "profile".to_string(),
            target_id: Some(profile_id.into_uuid()),
            details: Some(json!({
                "projects": purge.project_ids(),
                "memberships_removed": purge.memberships_removed,
                "invites_removed": purge.invites_removed,
                "references_cleared": purge.references_cleared,
            })),
        };
        if let Err(e) = self.audit.record(&entry).await {
            self.reporter.report("purge_account.audit", &e);
        }

        Ok(purge)
    }
}
