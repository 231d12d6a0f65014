//! Project entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use hackhub_core::types::{ProfileId, ProjectId};

/// A hackathon project.
///
/// Ownership is a column on the project, never a membership row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Project {
    /// Unique project identifier.
    pub id: ProjectId,
    /// The profile that owns the project.
    pub owner_id: ProfileId,
    /// URL slug.
    pub slug: String,
    /// Display title.
    pub title: String,
    /// Whether a moderator hid the project.
    pub is_hidden: bool,
    /// The moderator who hid the project.
    pub hidden_by: Option<ProfileId>,
    /// The moderator who last reviewed the project.
    pub reviewed_by: Option<ProfileId>,
    /// When the project was created.
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Whether `profile_id` owns this project.
    pub fn is_owned_by(&self, profile_id: ProfileId) -> bool {
        self.owner_id == profile_id
    }
}

/// Data required to create a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    /// Owning profile.
    pub owner_id: ProfileId,
    /// URL slug.
    pub slug: String,
    /// Display title.
    pub title: String,
}
