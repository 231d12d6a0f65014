//! Team invite entities and the invite state machine.

pub mod model;
pub mod status;

pub use model::{CreateInvite, Invite};
pub use status::{InviteKind, InviteStatus};
