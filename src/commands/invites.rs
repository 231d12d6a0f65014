//! Incoming invite listing.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use hackhub_core::config::AppConfig;
use hackhub_core::error::AppError;
use hackhub_core::types::ProfileId;
use hackhub_database::Stores;
use hackhub_entity::invite::Invite;
use hackhub_service::RequestContext;

use crate::output::{self, OutputFormat};

/// Arguments for the invites command
#[derive(Debug, Args)]
pub struct InvitesArgs {
    /// Profile ID of the recipient
    pub profile_id: ProfileId,
}

/// Invite display row
#[derive(Debug, Serialize, Tabled)]
struct InviteRow {
    /// Invite ID
    id: String,
    /// Project ID
    project: String,
    /// Sender profile ID
    sender: String,
    /// Sent at
    sent: String,
}

impl From<&Invite> for InviteRow {
    fn from(invite: &Invite) -> Self {
        Self {
            id: invite.id.to_string(),
            project: invite.project_id.to_string(),
            sender: invite.sender_id.to_string(),
            sent: invite.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// List pending direct invites for a profile
pub async fn execute(
    args: &InvitesArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let pool = super::connect(config).await?;
    let stores = Stores::postgres(pool.pool().clone());
    let engine = super::build_engine(&stores, config);

    let profile = stores
        .profiles
        .find_profile(args.profile_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Profile {} not found", args.profile_id)))?;

    let ctx = RequestContext::authenticated(profile.account_id, "cli");
    let invites = engine
        .invites
        .list_incoming_invites(&ctx)
        .await
        .map_err(super::team_error)?;

    let rows: Vec<InviteRow> = invites.iter().map(InviteRow::from).collect();
    output::print_list(&rows, format);

    pool.close().await;
    Ok(())
}
