//! Project-to-event registration link.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use hackhub_core::types::{EventId, ProjectId};

/// A project's registration for a hackathon event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ProjectEventLink {
    /// The registered project.
    pub project_id: ProjectId,
    /// The event it is registered for.
    pub event_id: EventId,
    /// When the registration was made.
    pub linked_at: DateTime<Utc>,
}
