//! Invite repository implementation.
//!
//! The three transition methods are single `UPDATE ... WHERE status =
//! 'pending' RETURNING *` statements. Under concurrent callers Postgres
//! re-evaluates the predicate after the first writer commits, so only one
//! caller ever gets a row back.

use async_trait::async_trait;
use sqlx::PgPool;

use hackhub_core::error::{AppError, ErrorKind};
use hackhub_core::result::AppResult;
use hackhub_core::types::{InviteId, ProfileId, ProjectId};
use hackhub_entity::invite::{CreateInvite, Invite, InviteStatus};

use crate::traits::InviteStore;

/// Repository for invite rows and their conditional transitions.
#[derive(Debug, Clone)]
pub struct InviteRepository {
    pool: PgPool,
}

impl InviteRepository {
    /// Create a new invite repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InviteStore for InviteRepository {
    async fn create_invite(&self, data: &CreateInvite) -> AppResult<Invite> {
        sqlx::query_as::<_, Invite>(
            "INSERT INTO invites (id, project_id, sender_id, recipient_id, kind, token) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(InviteId::new())
        .bind(data.project_id)
        .bind(data.sender_id)
        .bind(data.recipient_id)
        .bind(data.kind)
        .bind(&data.token)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("invites_pending_direct_key") =>
            {
                AppError::conflict("A pending invite already exists for this recipient")
            }
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("invites_token_key") => {
                AppError::conflict("Invite token collision")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create invite", e),
        })
    }

    async fn find_link_by_token(&self, token: &str) -> AppResult<Option<Invite>> {
        sqlx::query_as::<_, Invite>("SELECT * FROM invites WHERE token = $1 AND kind = 'link'")
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find invite by token", e)
        })
    }

    async fn find_pending_direct(
        &self,
        project_id: ProjectId,
        recipient_id: ProfileId,
    ) -> AppResult<Option<Invite>> {
        sqlx::query_as::<_, Invite>(
            "SELECT * FROM invites \
             WHERE project_id = $1 AND recipient_id = $2 AND kind = 'direct' AND status = 'pending'",
        )
        .bind(project_id)
        .bind(recipient_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find pending invite", e)
        })
    }

    async fn respond_to_direct(
        &self,
        id: InviteId,
        recipient_id: ProfileId,
        status: InviteStatus,
    ) -> AppResult<Option<Invite>> {
        sqlx::query_as::<_, Invite>(
            "UPDATE invites SET status = $3, responded_at = NOW() \
             WHERE id = $1 AND recipient_id = $2 AND kind = 'direct' AND status = 'pending' \
             RETURNING *",
        )
        .bind(id)
        .bind(recipient_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to respond to invite", e))
    }

    async fn claim_link(&self, id: InviteId, claimant_id: ProfileId) -> AppResult<Option<Invite>> {
        sqlx::query_as::<_, Invite>(
            "UPDATE invites SET status = 'accepted', recipient_id = $2, responded_at = NOW() \
             WHERE id = $1 AND kind = 'link' AND status = 'pending' \
             RETURNING *",
        )
        .bind(id)
        .bind(claimant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to claim invite link", e))
    }

    async fn revoke_invite(
        &self,
        id: InviteId,
        sender_id: ProfileId,
    ) -> AppResult<Option<Invite>> {
        sqlx::query_as::<_, Invite>(
            "UPDATE invites SET status = 'revoked', responded_at = NOW() \
             WHERE id = $1 AND sender_id = $2 AND status = 'pending' \
             RETURNING *",
        )
        .bind(id)
        .bind(sender_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to revoke invite", e))
    }

    async fn count_pending_by_sender(&self, sender_id: ProfileId) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM invites WHERE sender_id = $1 AND status = 'pending'",
        )
        .bind(sender_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count pending invites", e)
        })?;
        Ok(count as u64)
    }

    async fn list_invites_by_project(&self, project_id: ProjectId) -> AppResult<Vec<Invite>> {
        sqlx::query_as::<_, Invite>(
            "SELECT * FROM invites WHERE project_id = $1 ORDER BY created_at DESC",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list invites", e))
    }

    async fn list_pending_for_recipient(
        &self,
        recipient_id: ProfileId,
    ) -> AppResult<Vec<Invite>> {
        sqlx::query_as::<_, Invite>(
            "SELECT * FROM invites \
             WHERE recipient_id = $1 AND kind = 'direct' AND status = 'pending' \
             ORDER BY created_at DESC",
        )
        .bind(recipient_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list incoming invites", e)
        })
    }
}
