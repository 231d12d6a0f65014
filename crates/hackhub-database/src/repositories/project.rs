//! Project repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use hackhub_core::error::{AppError, ErrorKind};
use hackhub_core::result::AppResult;
use hackhub_core::types::ProjectId;
use hackhub_entity::project::Project;

use crate::traits::ProjectStore;

/// Repository for project ownership lookups.
#[derive(Debug, Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    /// Create a new project repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectStore for ProjectRepository {
    async fn find_project(&self, id: ProjectId) -> AppResult<Option<Project>> {
        sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find project", e))
    }
}
