//! Resolves the acting profile and checks project ownership.

use std::sync::Arc;

use hackhub_core::types::ProjectId;
use hackhub_database::{ProfileStore, ProjectStore, Stores};
use hackhub_entity::profile::Profile;
use hackhub_entity::project::Project;

use crate::context::RequestContext;
use crate::error::{TeamError, TeamResult};
use crate::reporting::{ErrorReporter, ReportExt};

/// Turns a [`RequestContext`] into a profile and answers ownership questions.
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    profiles: Arc<dyn ProfileStore>,
    projects: Arc<dyn ProjectStore>,
    reporter: Arc<dyn ErrorReporter>,
}

impl IdentityResolver {
    /// Creates a new resolver.
    pub fn new(stores: &Stores, reporter: Arc<dyn ErrorReporter>) -> Self {
        Self {
            profiles: Arc::clone(&stores.profiles),
            projects: Arc::clone(&stores.projects),
            reporter,
        }
    }

    /// The caller's profile.
    pub async fn resolve_profile(&self, ctx: &RequestContext) -> TeamResult<Profile> {
        let account_id = ctx
            .account_id
            .ok_or_else(|| TeamError::permission_denied("You must be signed in"))?;

        self.profiles
            .find_profile_by_account(account_id)
            .await
            .or_report(self.reporter.as_ref(), "resolve_profile")?
            .ok_or_else(|| TeamError::permission_denied("Create a profile before joining teams"))
    }

    /// Load a project by id.
    pub async fn load_project(&self, project_id: ProjectId) -> TeamResult<Project> {
        self.projects
            .find_project(project_id)
            .await
            .or_report(self.reporter.as_ref(), "load_project")?
            .ok_or_else(|| TeamError::not_found("Project not found"))
    }

    /// The caller's profile and the project, provided the caller owns it.
    pub async fn require_owner(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
    ) -> TeamResult<(Profile, Project)> {
        let profile = self.resolve_profile(ctx).await?;
        let project = self.load_project(project_id).await?;

        if !project.is_owned_by(profile.id) {
            return Err(TeamError::permission_denied(
                "Only the project owner can manage the team",
            ));
        }

        Ok((profile, project))
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use hackhub_core::error::AppError;
    use hackhub_core::result::AppResult;
    use hackhub_core::types::{AccountId, ProfileId};
    use hackhub_database::{CandidateQuery, MemoryStore};
    use hackhub_entity::profile::CreateProfile;
    use hackhub_entity::project::CreateProject;

    use super::*;
    use crate::reporting::testing::RecordingReporter;

    #[derive(Debug)]
    struct BrokenProfiles;

    #[async_trait]
    impl ProfileStore for BrokenProfiles {
        async fn find_profile(&self, _id: ProfileId) -> AppResult<Option<Profile>> {
            Err(AppError::database("pool timed out"))
        }

        async fn find_profile_by_account(&self, _id: AccountId) -> AppResult<Option<Profile>> {
            Err(AppError::database("pool timed out"))
        }

        async fn find_profile_by_username(&self, _username: &str) -> AppResult<Option<Profile>> {
            Err(AppError::database("pool timed out"))
        }

        async fn search_candidates(&self, _query: &CandidateQuery) -> AppResult<Vec<Profile>> {
            Err(AppError::database("pool timed out"))
        }
    }

    #[tokio::test]
    async fn test_anonymous_caller_is_denied() {
        let stores = Stores::memory(MemoryStore::new());
        let resolver = IdentityResolver::new(&stores, Arc::new(RecordingReporter::default()));

        let err = resolver
            .resolve_profile(&RequestContext::anonymous("127.0.0.1"))
            .await
            .unwrap_err();
        assert!(matches!(err, TeamError::PermissionDenied(_)));
    }

    #[tokio::test]
    async fn test_store_failure_is_reported_as_internal() {
        let mut stores = Stores::memory(MemoryStore::new());
        stores.profiles = Arc::new(BrokenProfiles);
        let reporter = Arc::new(RecordingReporter::default());
        let resolver = IdentityResolver::new(&stores, reporter.clone());

        let ctx = RequestContext::authenticated(AccountId::new(), "127.0.0.1");
        let err = resolver.resolve_profile(&ctx).await.unwrap_err();

        assert_eq!(err, TeamError::internal());
        let reports = reporter.reports.lock().unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].0, "resolve_profile");
    }

    #[tokio::test]
    async fn test_require_owner() {
        let store = MemoryStore::new();
        let owner_account = AccountId::new();
        let other_account = AccountId::new();
        let owner = store
            .create_profile(&CreateProfile {
                account_id: owner_account,
                username: "owner".to_string(),
                display_name: None,
                allow_invites: true,
            })
            .await
            .unwrap();
        store
            .create_profile(&CreateProfile {
                account_id: other_account,
                username: "other".to_string(),
                display_name: None,
                allow_invites: true,
            })
            .await
            .unwrap();
        let project = store
            .create_project(&CreateProject {
                owner_id: owner.id,
                slug: "rover".to_string(),
                title: "Rover".to_string(),
            })
            .await
            .unwrap();

        let resolver = IdentityResolver::new(
            &Stores::memory(store),
            Arc::new(RecordingReporter::default()),
        );

        let (profile, found) = resolver
            .require_owner(&RequestContext::authenticated(owner_account, "::1"), project.id)
            .await
            .unwrap();
        assert_eq!(profile.id, owner.id);
        assert_eq!(found.id, project.id);

        let err = resolver
            .require_owner(&RequestContext::authenticated(other_account, "::1"), project.id)
            .await
            .unwrap_err();
        assert!(matches!(err, TeamError::PermissionDenied(_)));

        let err = resolver
            .require_owner(
                &RequestContext::authenticated(owner_account, "::1"),
                ProjectId::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, TeamError::NotFound(_)));
    }
}
