//! Project and account deletion commands.

use clap::Args;

use hackhub_core::config::AppConfig;
use hackhub_core::error::AppError;
use hackhub_core::types::{ProfileId, ProjectId};
use hackhub_database::Stores;

use crate::output::{self, OutputFormat};

/// Arguments for the purge-project command
#[derive(Debug, Args)]
pub struct PurgeProjectArgs {
    /// Project ID
    pub project_id: ProjectId,
    /// Skip confirmation prompt
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the purge-account command
#[derive(Debug, Args)]
pub struct PurgeAccountArgs {
    /// Profile ID of the account to delete
    pub profile_id: ProfileId,
    /// Profile ID of the administrator performing the deletion
    #[arg(long)]
    pub actor: Option<ProfileId>,
    /// Skip confirmation prompt
    #[arg(long)]
    pub force: bool,
}

/// Delete one project
pub async fn execute_project(
    args: &PurgeProjectArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let prompt = format!(
        "Delete project {} with its team, invites, and event registrations?",
        args.project_id
    );
    if !super::confirm(&prompt, args.force)? {
        println!("Cancelled.");
        return Ok(());
    }

    let pool = super::connect(config).await?;
    let engine = super::build_engine(&Stores::postgres(pool.pool().clone()), config);

    let purge = engine
        .cascade
        .purge_project(args.project_id)
        .await
        .map_err(super::team_error)?;

    output::print_summary(
        &purge,
        &[
            ("Project", purge.project_id.to_string()),
            ("Memberships removed", purge.memberships_removed.to_string()),
            ("Invites removed", purge.invites_removed.to_string()),
            ("Event links removed", purge.event_links_removed.to_string()),
        ],
        format,
    );
    output::print_success("Project deleted.");

    pool.close().await;
    Ok(())
}

/// Delete one account's profile
pub async fn execute_account(
    args: &PurgeAccountArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let prompt = format!(
        "Delete profile {} and every project it owns? This cannot be undone.",
        args.profile_id
    );
    if !super::confirm(&prompt, args.force)? {
        println!("Cancelled.");
        return Ok(());
    }

    let pool = super::connect(config).await?;
    let engine = super::build_engine(&Stores::postgres(pool.pool().clone()), config);

    let purge = engine
        .cascade
        .purge_account(args.actor, args.profile_id)
        .await
        .map_err(super::team_error)?;

    let projects = purge
        .project_ids()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    output::print_summary(
        &purge,
        &[
            ("Profile", purge.profile_id.to_string()),
            ("Projects deleted", projects),
            ("Memberships removed", purge.memberships_removed.to_string()),
            ("Invites removed", purge.invites_removed.to_string()),
            ("References cleared", purge.references_cleared.to_string()),
        ],
        format,
    );
    output::print_success("Account deleted.");

    pool.close().await;
    Ok(())
}
