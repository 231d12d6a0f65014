//! Profile repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use hackhub_core::error::{AppError, ErrorKind};
use hackhub_core::result::AppResult;
use hackhub_core::types::{AccountId, ProfileId};
use hackhub_entity::profile::Profile;

use crate::traits::{CandidateQuery, ProfileStore};

/// Repository for profile lookups and candidate search.
#[derive(Debug, Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    /// Create a new profile repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for ProfileRepository {
    async fn find_profile(&self, id: ProfileId) -> AppResult<Option<Profile>> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find profile", e))
    }

    async fn find_profile_by_account(&self, account_id: AccountId) -> AppResult<Option<Profile>> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE account_id = $1")
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find profile by account", e)
            })
    }

    async fn find_profile_by_username(&self, username: &str) -> AppResult<Option<Profile>> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE LOWER(username) = LOWER($1)")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find profile by username", e)
            })
    }

    async fn search_candidates(&self, query: &CandidateQuery) -> AppResult<Vec<Profile>> {
        let pattern = like_pattern(&query.text);

        sqlx::query_as::<_, Profile>(
            "SELECT p.* FROM profiles p \
             WHERE (p.username ILIKE $1 ESCAPE '\\' OR p.display_name ILIKE $1 ESCAPE '\\') \
               AND p.id <> $2 \
               AND p.allow_invites AND NOT p.is_banned AND NOT p.is_hidden \
               AND NOT EXISTS (SELECT 1 FROM projects pr WHERE pr.id = $3 AND pr.owner_id = p.id) \
               AND NOT EXISTS (SELECT 1 FROM memberships m WHERE m.project_id = $3 AND m.profile_id = p.id) \
             LIMIT $4",
        )
        .bind(&pattern)
        .bind(query.caller_id)
        .bind(query.project_id)
        .bind(i64::from(query.limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to search candidates", e))
    }
}

/// Build an `ILIKE` substring pattern, escaping the wildcard characters in
/// user input.
fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
