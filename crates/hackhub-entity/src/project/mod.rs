//! Project entities.

pub mod event;
pub mod model;

pub use event::ProjectEventLink;
pub use model::{CreateProject, Project};
