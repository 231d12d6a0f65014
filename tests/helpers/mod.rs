//! Shared test helpers for integration tests.
//!
//! Every test runs the real services over a fresh [`MemoryStore`].

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use hackhub_core::config::{AppConfig, DatabaseConfig, InviteConfig, LoggingConfig, SearchConfig};
use hackhub_core::error::AppError;
use hackhub_core::result::AppResult;
use hackhub_core::types::{AccountId, ProfileId, ProjectId};
use hackhub_database::{MembershipStore, MemoryStore, Stores};
use hackhub_entity::membership::{CreateMembership, Membership};
use hackhub_entity::profile::{CreateProfile, Profile};
use hackhub_entity::project::{CreateProject, Project};
use hackhub_service::{
    ErrorReporter, InviteEvent, InviteNotifier, RequestContext, TeamEngine,
};

/// Notifier that forwards every event to a channel.
#[derive(Debug)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<InviteEvent>,
}

#[async_trait]
impl InviteNotifier for ChannelNotifier {
    async fn notify(&self, event: &InviteEvent) -> AppResult<()> {
        self.tx
            .send(event.clone())
            .map_err(|_| AppError::external("notification channel closed"))
    }
}

/// Notifier whose delivery always fails.
#[derive(Debug, Default)]
pub struct FailingNotifier {
    attempts: AtomicUsize,
}

impl FailingNotifier {
    /// Number of deliveries tried so far.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InviteNotifier for FailingNotifier {
    async fn notify(&self, _event: &InviteEvent) -> AppResult<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(AppError::external("mail relay unavailable"))
    }
}

/// Membership store whose lookups always miss, as a read taken just before
/// a concurrent insert would.
#[derive(Debug)]
pub struct StaleMembershipReads(pub MemoryStore);

#[async_trait]
impl MembershipStore for StaleMembershipReads {
    async fn create_membership(&self, data: &CreateMembership) -> AppResult<Membership> {
        self.0.create_membership(data).await
    }

    async fn find_membership(
        &self,
        _project_id: ProjectId,
        _profile_id: ProfileId,
    ) -> AppResult<Option<Membership>> {
        Ok(None)
    }

    async fn delete_membership(
        &self,
        project_id: ProjectId,
        profile_id: ProfileId,
    ) -> AppResult<bool> {
        self.0.delete_membership(project_id, profile_id).await
    }

    async fn list_memberships(&self, project_id: ProjectId) -> AppResult<Vec<Membership>> {
        self.0.list_memberships(project_id).await
    }
}

/// Reporter that keeps every reported operation name.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub operations: Mutex<Vec<&'static str>>,
}

impl ErrorReporter for RecordingReporter {
    fn report(&self, operation: &'static str, _error: &AppError) {
        self.operations.lock().unwrap().push(operation);
    }
}

/// A signed-in participant.
#[derive(Debug, Clone)]
pub struct User {
    pub profile: Profile,
    pub ctx: RequestContext,
}

impl User {
    pub fn id(&self) -> hackhub_core::types::ProfileId {
        self.profile.id
    }
}

/// Test application context
pub struct TestApp {
    /// Backing store, for seeding and inspecting rows
    pub store: MemoryStore,
    /// The services under test
    pub engine: TeamEngine,
    /// Reported internal failures
    pub reporter: Arc<RecordingReporter>,
    notifications: mpsc::UnboundedReceiver<InviteEvent>,
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
            min_connections: 0,
            connect_timeout_seconds: 1,
            idle_timeout_seconds: 1,
        },
        logging: LoggingConfig::default(),
        invites: InviteConfig::default(),
        search: SearchConfig::default(),
    }
}

impl TestApp {
    /// Create a new test application with default limits
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Create a new test application with custom limits
    pub fn with_config(config: AppConfig) -> Self {
        Self::build(config, None, |_, _| {})
    }

    /// Create a test application that delivers through `notifier`
    pub fn with_notifier(notifier: Arc<dyn InviteNotifier>) -> Self {
        Self::build(test_config(), Some(notifier), |_, _| {})
    }

    /// Create a test application with some store handles replaced
    pub fn with_stores(customize: impl FnOnce(&MemoryStore, &mut Stores)) -> Self {
        Self::build(test_config(), None, customize)
    }

    fn build(
        config: AppConfig,
        notifier: Option<Arc<dyn InviteNotifier>>,
        customize: impl FnOnce(&MemoryStore, &mut Stores),
    ) -> Self {
        let store = MemoryStore::new();
        let (tx, notifications) = mpsc::unbounded_channel();
        let notifier: Arc<dyn InviteNotifier> = match notifier {
            Some(notifier) => notifier,
            None => Arc::new(ChannelNotifier { tx }),
        };
        let reporter = Arc::new(RecordingReporter::default());

        let mut stores = Stores::memory(store.clone());
        customize(&store, &mut stores);
        let engine = TeamEngine::new(&stores, &config, notifier, reporter.clone());

        Self {
            store,
            engine,
            reporter,
            notifications,
        }
    }

    /// Create a profile that accepts invites
    pub async fn user(&self, username: &str) -> User {
        self.user_named(username, None).await
    }

    /// Create a profile with a display name
    pub async fn user_named(&self, username: &str, display_name: Option<&str>) -> User {
        let account_id = AccountId::new();
        let profile = self
            .store
            .create_profile(&CreateProfile {
                account_id,
                username: username.to_string(),
                display_name: display_name.map(str::to_string),
                allow_invites: true,
            })
            .await
            .expect("Failed to create profile");

        User {
            profile,
            ctx: RequestContext::authenticated(account_id, "127.0.0.1"),
        }
    }

    /// Create a project owned by `owner`
    pub async fn project(&self, owner: &User, slug: &str) -> Project {
        self.store
            .create_project(&CreateProject {
                owner_id: owner.id(),
                slug: slug.to_string(),
                title: format!("Project {slug}"),
            })
            .await
            .expect("Failed to create project")
    }

    /// Invite `member` to `project` and accept on their behalf
    pub async fn add_member(&self, owner: &User, project: &Project, member: &User) {
        let invite = self
            .engine
            .invites
            .send_direct_invite(&owner.ctx, project.id, &member.profile.username)
            .await
            .expect("Failed to send invite");
        self.engine
            .invites
            .respond_to_invite(&member.ctx, invite.id, true)
            .await
            .expect("Failed to accept invite");
    }

    /// Wait for the next notification
    pub async fn next_notification(&mut self) -> InviteEvent {
        tokio::time::timeout(Duration::from_secs(2), self.notifications.recv())
            .await
            .expect("Timed out waiting for notification")
            .expect("Notification channel closed")
    }
}
