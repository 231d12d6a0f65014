//! Sender-side ceiling on outstanding invites.
//!
//! The check counts pending invites and compares against the ceiling; it
//! does not reserve a slot. Two concurrent creations by the same sender can
//! both pass the check, so the ceiling may be exceeded briefly under races.

use std::sync::Arc;

use serde::Serialize;

use hackhub_core::result::AppResult;
use hackhub_core::types::ProfileId;
use hackhub_database::InviteStore;

/// A sender's pending invite count against the ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InviteQuota {
    /// Pending invites sent by the profile, across all projects.
    pub pending: u64,
    /// Configured ceiling.
    pub limit: u32,
}

impl InviteQuota {
    /// Invites the sender may still create.
    pub fn remaining(&self) -> u64 {
        u64::from(self.limit).saturating_sub(self.pending)
    }

    /// Whether another invite would exceed the ceiling.
    pub fn is_exhausted(&self) -> bool {
        self.pending >= u64::from(self.limit)
    }
}

/// Counts a sender's pending invites.
#[derive(Debug, Clone)]
pub struct InviteRateLimiter {
    invites: Arc<dyn InviteStore>,
    limit: u32,
}

impl InviteRateLimiter {
    /// Creates a limiter with the given ceiling.
    pub fn new(invites: Arc<dyn InviteStore>, limit: u32) -> Self {
        Self { invites, limit }
    }

    /// Current quota for `sender_id`.
    pub async fn quota(&self, sender_id: ProfileId) -> AppResult<InviteQuota> {
        let pending = self.invites.count_pending_by_sender(sender_id).await?;
        Ok(InviteQuota {
            pending,
            limit: self.limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_arithmetic() {
        let quota = InviteQuota {
            pending: 3,
            limit: 5,
        };
        assert_eq!(quota.remaining(), 2);
        assert!(!quota.is_exhausted());

        let full = InviteQuota {
            pending: 6,
            limit: 5,
        };
        assert_eq!(full.remaining(), 0);
        assert!(full.is_exhausted());
    }
}
