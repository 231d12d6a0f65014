//! Deletion cascades.

pub mod coordinator;

pub use coordinator::{ACCOUNT_DELETE_ACTION, CascadeCoordinator};
