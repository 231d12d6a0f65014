//! Caller identity and project ownership.

pub mod resolver;

pub use resolver::IdentityResolver;
