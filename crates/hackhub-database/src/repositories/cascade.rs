//! Transactional cascade deletes.
//!
//! Both purges run inside one transaction. Any failure drops the
//! transaction before commit, which rolls back every statement issued so
//! far.

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

use hackhub_core::error::{AppError, ErrorKind};
use hackhub_core::result::AppResult;
use hackhub_core::types::{ProfileId, ProjectId};
use hackhub_entity::purge::{AccountPurge, ProjectPurge};

use crate::traits::CascadeStore;

/// Repository that owns the multi-table delete paths.
#[derive(Debug, Clone)]
pub struct CascadeRepository {
    pool: PgPool,
}

impl CascadeRepository {
    /// Create a new cascade repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_err(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, message, e)
}

/// Delete one project and its dependents on an open connection.
async fn purge_project_rows(conn: &mut PgConnection, project_id: ProjectId) -> AppResult<ProjectPurge> {
    // Memberships may point at invites of this project through invite_id.
    sqlx::query(
        "UPDATE memberships SET invite_id = NULL \
         WHERE invite_id IN (SELECT id FROM invites WHERE project_id = $1)",
    )
    .bind(project_id)
    .execute(&mut *conn)
    .await
    .map_err(db_err("Failed to detach project invites"))?;

    let memberships = sqlx::query("DELETE FROM memberships WHERE project_id = $1")
        .bind(project_id)
        .execute(&mut *conn)
        .await
        .map_err(db_err("Failed to delete project memberships"))?;

    let invites = sqlx::query("DELETE FROM invites WHERE project_id = $1")
        .bind(project_id)
        .execute(&mut *conn)
        .await
        .map_err(db_err("Failed to delete project invites"))?;

    let events = sqlx::query("DELETE FROM project_events WHERE project_id = $1")
        .bind(project_id)
        .execute(&mut *conn)
        .await
        .map_err(db_err("Failed to delete project event links"))?;

    sqlx::query("DELETE FROM projects WHERE id = $1")
        .bind(project_id)
        .execute(&mut *conn)
        .await
        .map_err(db_err("Failed to delete project"))?;

    Ok(ProjectPurge {
        project_id,
        memberships_removed: memberships.rows_affected(),
        invites_removed: invites.rows_affected(),
        event_links_removed: events.rows_affected(),
    })
}

#[async_trait]
impl CascadeStore for CascadeRepository {
    async fn purge_project(&self, project_id: ProjectId) -> AppResult<Option<ProjectPurge>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        let locked: Option<ProjectId> =
            sqlx::query_scalar("SELECT id FROM projects WHERE id = $1 FOR UPDATE")
                .bind(project_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_err("Failed to lock project"))?;

        if locked.is_none() {
            return Ok(None);
        }

        let purge = purge_project_rows(&mut tx, project_id).await?;

        tx.commit()
            .await
            .map_err(db_err("Failed to commit project purge"))?;

        Ok(Some(purge))
    }

    async fn purge_profile(&self, profile_id: ProfileId) -> AppResult<Option<AccountPurge>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        let locked: Option<ProfileId> =
            sqlx::query_scalar("SELECT id FROM profiles WHERE id = $1 FOR UPDATE")
                .bind(profile_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_err("Failed to lock profile"))?;

        if locked.is_none() {
            return Ok(None);
        }

        let owned: Vec<ProjectId> =
            sqlx::query_scalar("SELECT id FROM projects WHERE owner_id = $1 FOR UPDATE")
                .bind(profile_id)
                .fetch_all(&mut *tx)
                .await
                .map_err(db_err("Failed to list owned projects"))?;

        let mut purge = AccountPurge {
            profile_id,
            ..Default::default()
        };

        for project_id in owned {
            let project = purge_project_rows(&mut tx, project_id).await?;
            purge.projects.push(project);
        }

        let memberships = sqlx::query("DELETE FROM memberships WHERE profile_id = $1")
            .bind(profile_id)
            .execute(&mut *tx)
            .await
            .map_err(db_err("Failed to delete profile memberships"))?;
        purge.memberships_removed = memberships.rows_affected();

        sqlx::query(
            "UPDATE memberships SET invite_id = NULL \
             WHERE invite_id IN (SELECT id FROM invites WHERE sender_id = $1 OR recipient_id = $1)",
        )
        .bind(profile_id)
        .execute(&mut *tx)
        .await
        .map_err(db_err("Failed to detach profile invites"))?;

        let invites = sqlx::query("DELETE FROM invites WHERE sender_id = $1 OR recipient_id = $1")
            .bind(profile_id)
            .execute(&mut *tx)
            .await
            .map_err(db_err("Failed to delete profile invites"))?;
        purge.invites_removed = invites.rows_affected();

        let detach = [
            "UPDATE profiles SET banned_by = NULL WHERE banned_by = $1",
            "UPDATE profiles SET hidden_by = NULL WHERE hidden_by = $1",
            "UPDATE projects SET hidden_by = NULL WHERE hidden_by = $1",
            "UPDATE projects SET reviewed_by = NULL WHERE reviewed_by = $1",
            "UPDATE audit_log SET actor_id = NULL WHERE actor_id = $1",
            "UPDATE audit_log SET target_id = NULL WHERE target_type = 'profile' AND target_id = $1",
        ];
        for statement in detach {
            let result = sqlx::query(statement)
                .bind(profile_id)
                .execute(&mut *tx)
                .await
                .map_err(db_err("Failed to clear profile references"))?;
            purge.references_cleared += result.rows_affected();
        }

        sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(profile_id)
            .execute(&mut *tx)
            .await
            .map_err(db_err("Failed to delete profile"))?;

        tx.commit()
            .await
            .map_err(db_err("Failed to commit account purge"))?;

        Ok(Some(purge))
    }
}
