//! PostgreSQL implementations of the store traits.

pub mod audit;
pub mod cascade;
pub mod invite;
pub mod membership;
pub mod profile;
pub mod project;

pub use audit::AuditLogRepository;
pub use cascade::CascadeRepository;
pub use invite::InviteRepository;
pub use membership::MembershipRepository;
pub use profile::ProfileRepository;
pub use project::ProjectRepository;
