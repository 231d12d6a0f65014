//! Profile entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use hackhub_core::types::{AccountId, ProfileId};

/// A participant profile.
///
/// Profiles are created by the signup flow; this crate only reads them and
/// removes them during account deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Profile {
    /// Unique profile identifier.
    pub id: ProfileId,
    /// The account this profile belongs to.
    pub account_id: AccountId,
    /// Unique handle (compared case-insensitively).
    pub username: String,
    /// Human-readable display name.
    pub display_name: Option<String>,
    /// Whether the participant accepts team invites.
    pub allow_invites: bool,
    /// Whether a moderator banned the profile.
    pub is_banned: bool,
    /// The moderator who banned the profile.
    pub banned_by: Option<ProfileId>,
    /// Whether a moderator hid the profile from listings.
    pub is_hidden: bool,
    /// The moderator who hid the profile.
    pub hidden_by: Option<ProfileId>,
    /// When the profile was created.
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// Whether the profile may be the target of an invite at all.
    pub fn is_invitable(&self) -> bool {
        self.allow_invites && !self.is_banned && !self.is_hidden
    }

    /// Case-insensitive substring match on username or display name.
    ///
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.username.to_lowercase().contains(needle)
            || self
                .display_name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(needle))
    }

    /// The name to show in listings.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }
}

/// Data required to create a profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProfile {
    /// Owning account.
    pub account_id: AccountId,
    /// Desired username.
    pub username: String,
    /// Display name (optional).
    pub display_name: Option<String>,
    /// Whether invites are accepted.
    pub allow_invites: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(username: &str, display_name: Option<&str>) -> Profile {
        Profile {
            id: ProfileId::new(),
            account_id: AccountId::new(),
            username: username.to_string(),
            display_name: display_name.map(str::to_string),
            allow_invites: true,
            is_banned: false,
            banned_by: None,
            is_hidden: false,
            hidden_by: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_matches_username_or_display_name() {
        let p = profile("GraceH", Some("Grace Hopper"));
        assert!(p.matches("grace"));
        assert!(p.matches("hopper"));
        assert!(!p.matches("ada"));
    }

    #[test]
    fn test_moderated_profiles_are_not_invitable() {
        let mut p = profile("ada", None);
        assert!(p.is_invitable());
        p.is_hidden = true;
        assert!(!p.is_invitable());
        p.is_hidden = false;
        p.allow_invites = false;
        assert!(!p.is_invitable());
    }
}
