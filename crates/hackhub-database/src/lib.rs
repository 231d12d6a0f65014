//! # hackhub-database
//!
//! Store traits for the team engine plus two implementations: PostgreSQL
//! repositories built on sqlx, and [`MemoryStore`], an in-process store
//! with the same atomicity and uniqueness guarantees.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod stores;
pub mod traits;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use stores::Stores;
pub use traits::{
    AuditStore, CandidateQuery, CascadeStore, InviteStore, MembershipStore, ProfileStore,
    ProjectStore,
};
