//! One handle holding every team service.

use std::sync::Arc;

use hackhub_core::config::AppConfig;
use hackhub_database::Stores;

use crate::cascade::CascadeCoordinator;
use crate::identity::IdentityResolver;
use crate::invite::InviteService;
use crate::notification::InviteNotifier;
use crate::reporting::ErrorReporter;
use crate::search::CandidateSearchService;
use crate::team::TeamService;

/// All team services wired to the same stores and collaborators.
#[derive(Debug, Clone)]
pub struct TeamEngine {
    /// Invite lifecycle.
    pub invites: InviteService,
    /// Membership removal and listing.
    pub team: TeamService,
    /// Candidate search.
    pub search: CandidateSearchService,
    /// Deletion cascades.
    pub cascade: CascadeCoordinator,
}

impl TeamEngine {
    /// Build every service from one set of stores.
    pub fn new(
        stores: &Stores,
        config: &AppConfig,
        notifier: Arc<dyn InviteNotifier>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        let identity = IdentityResolver::new(stores, Arc::clone(&reporter));

        Self {
            invites: InviteService::new(
                stores,
                identity.clone(),
                &config.invites,
                notifier,
                Arc::clone(&reporter),
            ),
            team: TeamService::new(stores, identity.clone(), Arc::clone(&reporter)),
            search: CandidateSearchService::new(
                stores,
                identity,
                config.search.clone(),
                Arc::clone(&reporter),
            ),
            cascade: CascadeCoordinator::new(stores, reporter),
        }
    }
}

#[cfg(test)]
mod tests {
    use hackhub_core::config::{DatabaseConfig, InviteConfig, LoggingConfig, SearchConfig};
    use hackhub_core::types::AccountId;
    use hackhub_database::MemoryStore;

    use super::*;
    use crate::context::RequestContext;
    use crate::error::TeamError;
    use crate::notification::TracingNotifier;
    use crate::reporting::testing::RecordingReporter;

    fn config() -> AppConfig {
        AppConfig {
            database: DatabaseConfig {
                url: "postgres://unused".to_string(),
                max_connections: 1,
                min_connections: 0,
                connect_timeout_seconds: 1,
                idle_timeout_seconds: 1,
            },
            logging: LoggingConfig::default(),
            invites: InviteConfig {
                max_pending_per_sender: 7,
                ..InviteConfig::default()
            },
            search: SearchConfig::default(),
        }
    }

    #[tokio::test]
    async fn test_services_share_one_identity_resolver() {
        let reporter = Arc::new(RecordingReporter::default());
        let engine = TeamEngine::new(
            &Stores::memory(MemoryStore::new()),
            &config(),
            Arc::new(TracingNotifier),
            reporter.clone(),
        );

        let rendered = format!("{engine:?}");
        assert_eq!(rendered.matches("IdentityResolver").count(), 3);
        assert!(rendered.contains("limit: 7"));

        // Every service resolves a missing profile the same way.
        let ctx = RequestContext::authenticated(AccountId::new(), "127.0.0.1");
        let project_id = hackhub_core::types::ProjectId::new();
        let errors = [
            engine.team.leave_project(&ctx, project_id).await.unwrap_err(),
            engine
                .search
                .search_candidates(&ctx, project_id, "ada")
                .await
                .unwrap_err(),
            engine
                .invites
                .generate_invite_link(&ctx, project_id)
                .await
                .unwrap_err(),
        ];
        assert!(errors.iter().all(|e| matches!(e, TeamError::PermissionDenied(_))));
        assert!(reporter.reports.lock().unwrap().is_empty());
    }
}
