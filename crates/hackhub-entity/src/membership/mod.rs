//! Team membership entities.

pub mod model;

pub use model::{CreateMembership, Membership};
