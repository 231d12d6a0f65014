//! Team membership management.

pub mod service;

pub use service::TeamService;
