//! Fire-and-forget invite notifications.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use hackhub_core::result::AppResult;
use hackhub_entity::invite::Invite;
use hackhub_entity::membership::Membership;

/// Something a user should hear about.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InviteEvent {
    /// A direct invite was sent to its recipient.
    Received {
        /// The new invite.
        invite: Invite,
    },
    /// An invite was accepted; tells the sender.
    Accepted {
        /// The accepted invite.
        invite: Invite,
        /// The membership it created.
        membership: Membership,
    },
}

impl InviteEvent {
    /// Short event name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Received { .. } => "invite.received",
            Self::Accepted { .. } => "invite.accepted",
        }
    }

    /// The invite the event is about.
    pub fn invite(&self) -> &Invite {
        match self {
            Self::Received { invite } | Self::Accepted { invite, .. } => invite,
        }
    }
}

/// Delivers invite events to users.
#[async_trait]
pub trait InviteNotifier: Send + Sync + std::fmt::Debug + 'static {
    /// Deliver one event.
    async fn notify(&self, event: &InviteEvent) -> AppResult<()>;
}

/// Notifier that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl InviteNotifier for TracingNotifier {
    async fn notify(&self, event: &InviteEvent) -> AppResult<()> {
        let invite = event.invite();
        info!(
            event = event.name(),
            invite_id = %invite.id,
            project_id = %invite.project_id,
            "Invite notification"
        );
        Ok(())
    }
}

/// Send `event` in the background. Failures are logged and dropped.
pub(crate) fn dispatch(notifier: &Arc<dyn InviteNotifier>, event: InviteEvent) {
    let notifier = Arc::clone(notifier);
    tokio::spawn(async move {
        if let Err(e) = notifier.notify(&event).await {
            warn!(
                event = event.name(),
                invite_id = %event.invite().id,
                error = %e,
                "Invite notification failed"
            );
        }
    });
}
