//! # hackhub-entity
//!
//! Domain entity models for the HackHub team engine. Every struct in this
//! crate represents a database table row or a domain value object. Row
//! types additionally derive `sqlx::FromRow`.

pub mod audit;
pub mod invite;
pub mod membership;
pub mod profile;
pub mod project;
pub mod purge;
