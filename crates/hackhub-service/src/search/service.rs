//! Candidate search for the invite form.

use std::sync::Arc;

use tracing::debug;

use hackhub_core::config::SearchConfig;
use hackhub_core::types::ProjectId;
use hackhub_database::{CandidateQuery, ProfileStore, Stores};
use hackhub_entity::profile::Profile;

use crate::context::RequestContext;
use crate::error::{TeamError, TeamResult};
use crate::identity::IdentityResolver;
use crate::reporting::{ErrorReporter, ReportExt};

/// Finds profiles an owner could invite to a project.
#[derive(Debug, Clone)]
pub struct CandidateSearchService {
    identity: IdentityResolver,
    profiles: Arc<dyn ProfileStore>,
    reporter: Arc<dyn ErrorReporter>,
    config: SearchConfig,
}

impl CandidateSearchService {
    /// Creates a new search service.
    pub fn new(
        stores: &Stores,
        identity: IdentityResolver,
        config: SearchConfig,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self {
            identity,
            profiles: Arc::clone(&stores.profiles),
            reporter,
            config,
        }
    }

    /// Profiles matching `query` that could join `project_id`.
    ///
    /// Short queries return nothing so that typing the first character
    /// stays quiet. Results are capped and unordered.
    pub async fn search_candidates(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
        query: &str,
    ) -> TeamResult<Vec<Profile>> {
        let text = query.trim();
        let length = text.chars().count();

        if length > self.config.max_query_len {
            return Err(TeamError::Validation(format!(
                "Search text must be at most {} characters",
                self.config.max_query_len
            )));
        }
        if length < self.config.min_query_len {
            return Ok(Vec::new());
        }

        let (caller, project) = self.identity.require_owner(ctx, project_id).await?;

        let candidates = self
            .profiles
            .search_candidates(&CandidateQuery {
                project_id: project.id,
                caller_id: caller.id,
                text: text.to_string(),
                limit: self.config.result_limit,
            })
            .await
            .or_report(self.reporter.as_ref(), "search_candidates")?;

        debug!(project_id = %project.id, results = candidates.len(), "Candidate search");
        Ok(candidates)
    }
}
