//! Team membership removal and listing.

use std::sync::Arc;

use tracing::info;

use hackhub_core::types::{ProfileId, ProjectId};
use hackhub_database::{MembershipStore, Stores};
use hackhub_entity::membership::Membership;

use crate::context::RequestContext;
use crate::error::{TeamError, TeamResult};
use crate::identity::IdentityResolver;
use crate::reporting::{ErrorReporter, ReportExt};

/// Manages who stays on a team.
#[derive(Debug, Clone)]
pub struct TeamService {
    identity: IdentityResolver,
    memberships: Arc<dyn MembershipStore>,
    reporter: Arc<dyn ErrorReporter>,
}

impl TeamService {
    /// Creates a new team service.
    pub fn new(
        stores: &Stores,
        identity: IdentityResolver,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self {
            identity,
            memberships: Arc::clone(&stores.memberships),
            reporter,
        }
    }

    /// Remove a member from a project the caller owns.
    ///
    /// Returns whether a membership row was deleted; removing someone who
    /// is not a member is not an error.
    pub async fn remove_team_member(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
        member_id: ProfileId,
    ) -> TeamResult<bool> {
        let (owner, project) = self.identity.require_owner(ctx, project_id).await?;

        let removed = self
            .memberships
            .delete_membership(project.id, member_id)
            .await
            .or_report(self.reporter.as_ref(), "remove_team_member")?;

        info!(
            project_id = %project.id,
            owner_id = %owner.id,
            member_id = %member_id,
            removed = removed,
            "Team member removed"
        );

        Ok(removed)
    }

    /// Leave a project's team. Owners cannot leave.
    pub async fn leave_project(&self, ctx: &RequestContext, project_id: ProjectId) -> TeamResult<()> {
        let profile = self.identity.resolve_profile(ctx).await?;
        let project = self.identity.load_project(project_id).await?;

        if project.is_owned_by(profile.id) {
            return Err(TeamError::PermissionDenied(
                "Owners cannot leave their own project".to_string(),
            ));
        }

        let removed = self
            .memberships
            .delete_membership(project.id, profile.id)
            .await
            .or_report(self.reporter.as_ref(), "leave_project")?;
        if !removed {
            return Err(TeamError::NotFound(
                "You are not a member of this project".to_string(),
            ));
        }

        info!(project_id = %project.id, member_id = %profile.id, "Member left project");
        Ok(())
    }

    /// Members of a project, oldest first. Visible to the owner and members.
    pub async fn list_members(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
    ) -> TeamResult<Vec<Membership>> {
        let profile = self.identity.resolve_profile(ctx).await?;
        let project = self.identity.load_project(project_id).await?;

        let members = self
            .memberships
            .list_memberships(project.id)
            .await
            .or_report(self.reporter.as_ref(), "list_members")?;

        let visible =
            project.is_owned_by(profile.id) || members.iter().any(|m| m.profile_id == profile.id);
        if !visible {
            return Err(TeamError::PermissionDenied(
                "Only the team can see its members".to_string(),
            ));
        }

        Ok(members)
    }
}
