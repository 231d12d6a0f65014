//! Membership repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use hackhub_core::error::{AppError, ErrorKind};
use hackhub_core::result::AppResult;
use hackhub_core::types::{MembershipId, ProfileId, ProjectId};
use hackhub_entity::membership::{CreateMembership, Membership};

use crate::traits::MembershipStore;

/// Repository for membership rows.
#[derive(Debug, Clone)]
pub struct MembershipRepository {
    pool: PgPool,
}

impl MembershipRepository {
    /// Create a new membership repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipStore for MembershipRepository {
    async fn create_membership(&self, data: &CreateMembership) -> AppResult<Membership> {
        sqlx::query_as::<_, Membership>(
            "INSERT INTO memberships (id, project_id, profile_id, invite_id) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(MembershipId::new())
        .bind(data.project_id)
        .bind(data.profile_id)
        .bind(data.invite_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("memberships_project_profile_key") =>
            {
                AppError::conflict(format!(
                    "Profile {} is already a member of project {}",
                    data.profile_id, data.project_id
                ))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create membership", e),
        })
    }

    async fn find_membership(
        &self,
        project_id: ProjectId,
        profile_id: ProfileId,
    ) -> AppResult<Option<Membership>> {
        sqlx::query_as::<_, Membership>(
            "SELECT * FROM memberships WHERE project_id = $1 AND profile_id = $2",
        )
        .bind(project_id)
        .bind(profile_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find membership", e))
    }

    async fn delete_membership(
        &self,
        project_id: ProjectId,
        profile_id: ProfileId,
    ) -> AppResult<bool> {
        let result =
            sqlx::query("DELETE FROM memberships WHERE project_id = $1 AND profile_id = $2")
                .bind(project_id)
                .bind(profile_id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to delete membership", e)
                })?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_memberships(&self, project_id: ProjectId) -> AppResult<Vec<Membership>> {
        sqlx::query_as::<_, Membership>(
            "SELECT * FROM memberships WHERE project_id = $1 ORDER BY joined_at ASC",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list memberships", e))
    }
}
