//! # hackhub-service
//!
//! Team invitation and membership services for HackHub. Each service takes
//! an explicit [`RequestContext`], performs its checks, and issues one
//! atomic store operation; the store decides who wins any race.
//!
//! Services follow constructor injection: stores and collaborators are
//! handed in as `Arc` trait objects at construction time.

pub mod cascade;
pub mod context;
pub mod engine;
pub mod error;
pub mod identity;
pub mod invite;
pub mod notification;
pub mod reporting;
pub mod search;
pub mod team;

pub use cascade::CascadeCoordinator;
pub use context::RequestContext;
pub use engine::TeamEngine;
pub use error::{TeamError, TeamResult};
pub use identity::IdentityResolver;
pub use invite::{
    Acceptance, InviteQuota, InviteRateLimiter, InviteResponse, InviteService, IssuedLink,
    LinkTokenGenerator,
};
pub use notification::{InviteEvent, InviteNotifier, TracingNotifier};
pub use reporting::{ErrorReporter, TracingErrorReporter};
pub use search::CandidateSearchService;
pub use team::TeamService;
