//! Invite creation, claiming, and revocation.

pub mod limiter;
pub mod service;
pub mod token;

pub use limiter::{InviteQuota, InviteRateLimiter};
pub use service::{Acceptance, InviteResponse, InviteService, IssuedLink};
pub use token::LinkTokenGenerator;
