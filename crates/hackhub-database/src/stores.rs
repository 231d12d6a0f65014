//! Bundles of trait objects handed to the service layer.

use std::sync::Arc;

use sqlx::PgPool;

use crate::memory::MemoryStore;
use crate::repositories::{
    AuditLogRepository, CascadeRepository, InviteRepository, MembershipRepository,
    ProfileRepository, ProjectRepository,
};
use crate::traits::{
    AuditStore, CascadeStore, InviteStore, MembershipStore, ProfileStore, ProjectStore,
};

/// One handle per store trait, all backed by the same database.
#[derive(Debug, Clone)]
pub struct Stores {
    /// Profile lookups and candidate search.
    pub profiles: Arc<dyn ProfileStore>,
    /// Project lookups.
    pub projects: Arc<dyn ProjectStore>,
    /// Invite rows and transitions.
    pub invites: Arc<dyn InviteStore>,
    /// Membership rows.
    pub memberships: Arc<dyn MembershipStore>,
    /// Transactional purges.
    pub cascade: Arc<dyn CascadeStore>,
    /// Audit log.
    pub audit: Arc<dyn AuditStore>,
}

impl Stores {
    /// PostgreSQL repositories sharing one pool.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            profiles: Arc::new(ProfileRepository::new(pool.clone())),
            projects: Arc::new(ProjectRepository::new(pool.clone())),
            invites: Arc::new(InviteRepository::new(pool.clone())),
            memberships: Arc::new(MembershipRepository::new(pool.clone())),
            cascade: Arc::new(CascadeRepository::new(pool.clone())),
            audit: Arc::new(AuditLogRepository::new(pool)),
        }
    }

    /// Every trait served by one in-memory store.
    pub fn memory(store: MemoryStore) -> Self {
        let store = Arc::new(store);
        Self {
            profiles: store.clone(),
            projects: store.clone(),
            invites: store.clone(),
            memberships: store.clone(),
            cascade: store.clone(),
            audit: store,
        }
    }
}
