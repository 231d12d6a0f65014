//! CLI command definitions and dispatch.

pub mod invites;
pub mod migrate;
pub mod purge;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use hackhub_core::config::AppConfig;
use hackhub_core::error::{AppError, ErrorKind};
use hackhub_database::{DatabasePool, Stores};
use hackhub_service::{TeamEngine, TeamError, TracingErrorReporter, TracingNotifier};

use crate::output::OutputFormat;

/// HackHub team engine administration
#[derive(Debug, Parser)]
#[command(name = "hackhub", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Delete a project with its team, invites, and event registrations
    PurgeProject(purge::PurgeProjectArgs),
    /// Delete a profile and everything it owns
    PurgeAccount(purge::PurgeAccountArgs),
    /// List pending invites addressed to a profile
    Invites(invites::InvitesArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate => migrate::execute(config).await,
            Commands::PurgeProject(args) => purge::execute_project(args, config, self.format).await,
            Commands::PurgeAccount(args) => purge::execute_account(args, config, self.format).await,
            Commands::Invites(args) => invites::execute(args, config, self.format).await,
        }
    }
}

/// Helper: load configuration from file and environment
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path)
}

/// Helper: connect to PostgreSQL
pub async fn connect(config: &AppConfig) -> Result<DatabasePool, AppError> {
    DatabasePool::connect(&config.database).await
}

/// Helper: wire the team services over PostgreSQL stores
pub fn build_engine(stores: &Stores, config: &AppConfig) -> TeamEngine {
    TeamEngine::new(
        stores,
        config,
        Arc::new(TracingNotifier),
        Arc::new(TracingErrorReporter),
    )
}

/// Helper: surface a team outcome as a CLI error
pub fn team_error(err: TeamError) -> AppError {
    let kind = match &err {
        TeamError::NotFound(_) => ErrorKind::NotFound,
        TeamError::PermissionDenied(_) => ErrorKind::Authorization,
        TeamError::Validation(_) | TeamError::InvalidLink(_) | TeamError::InvalidTarget(_) => {
            ErrorKind::Validation
        }
        TeamError::Conflict(_)
        | TeamError::RateLimited(_)
        | TeamError::AlreadyMember(_)
        | TeamError::AlreadyOwner(_)
        | TeamError::AlreadyUsed(_) => ErrorKind::Conflict,
        TeamError::Internal(_) => ErrorKind::Internal,
    };
    AppError::new(kind, err.message())
}

/// Helper: ask before a destructive action unless `force` is set
pub fn confirm(prompt: &str, force: bool) -> Result<bool, AppError> {
    if force {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {e}")))
}
