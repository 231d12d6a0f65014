//! Invite lifecycle service.
//!
//! Every transition out of `pending` is a single conditional write in the
//! store. The returned row is the only thing that decides success; the
//! lookups that precede some writes exist to pick a friendlier message and
//! are never trusted for correctness.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use hackhub_core::config::InviteConfig;
use hackhub_core::result::AppResult;
use hackhub_core::types::{InviteId, ProfileId, ProjectId};
use hackhub_database::{InviteStore, MembershipStore, ProfileStore, Stores};
use hackhub_entity::invite::{CreateInvite, Invite, InviteStatus};
use hackhub_entity::membership::{CreateMembership, Membership};

use super::limiter::{InviteQuota, InviteRateLimiter};
use super::token::LinkTokenGenerator;
use crate::context::RequestContext;
use crate::error::{TeamError, TeamResult};
use crate::identity::IdentityResolver;
use crate::notification::{InviteEvent, InviteNotifier, dispatch};
use crate::reporting::{ErrorReporter, ReportExt};

const MSG_INVITE_NOT_FOUND: &str = "Invite not found";
const MSG_ALREADY_MEMBER: &str = "You are already a member of this project";
const MSG_PENDING_EXISTS: &str = "This user already has a pending invite to this project";

/// A freshly created link invite and the token to share.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedLink {
    /// The pending link invite.
    pub invite: Invite,
    /// The claim token. Shown once to the owner to build the URL.
    pub token: String,
}

/// An accepted invite together with the membership it created.
#[derive(Debug, Clone, Serialize)]
pub struct Acceptance {
    /// The invite, now `accepted`.
    pub invite: Invite,
    /// The new membership row.
    pub membership: Membership,
}

/// Outcome of answering a direct invite.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum InviteResponse {
    /// The recipient joined the team.
    Accepted(Acceptance),
    /// The recipient declined.
    Declined(Invite),
}

/// Orchestrates invite creation, claiming, and revocation.
#[derive(Debug, Clone)]
pub struct InviteService {
    identity: IdentityResolver,
    profiles: Arc<dyn ProfileStore>,
    invites: Arc<dyn InviteStore>,
    memberships: Arc<dyn MembershipStore>,
    limiter: InviteRateLimiter,
    tokens: LinkTokenGenerator,
    notifier: Arc<dyn InviteNotifier>,
    reporter: Arc<dyn ErrorReporter>,
}

impl InviteService {
    /// Creates a new invite service.
    pub fn new(
        stores: &Stores,
        identity: IdentityResolver,
        config: &InviteConfig,
        notifier: Arc<dyn InviteNotifier>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self {
            identity,
            profiles: Arc::clone(&stores.profiles),
            invites: Arc::clone(&stores.invites),
            memberships: Arc::clone(&stores.memberships),
            limiter: InviteRateLimiter::new(
                Arc::clone(&stores.invites),
                config.max_pending_per_sender,
            ),
            tokens: LinkTokenGenerator::new(config.link_token_bytes),
            notifier,
            reporter,
        }
    }

    fn report<T>(&self, result: AppResult<T>, operation: &'static str) -> TeamResult<T> {
        result.or_report(self.reporter.as_ref(), operation)
    }

    /// Invite a profile, by username, to a project the caller owns.
    pub async fn send_direct_invite(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
        recipient_username: &str,
    ) -> TeamResult<Invite> {
        let username = recipient_username.trim();
        if username.is_empty() {
            return Err(TeamError::Validation("Enter a username to invite".to_string()));
        }

        let (sender, project) = self.identity.require_owner(ctx, project_id).await?;

        let recipient = self
            .report(
                self.profiles.find_profile_by_username(username).await,
                "send_direct_invite",
            )?
            .ok_or_else(|| TeamError::not_found("User not found"))?;

        if recipient.id == sender.id {
            return Err(TeamError::InvalidTarget(
                "You cannot invite yourself".to_string(),
            ));
        }
        if !recipient.allow_invites {
            return Err(TeamError::InvalidTarget(
                "This user is not accepting team invites".to_string(),
            ));
        }
        if recipient.is_banned || recipient.is_hidden {
            return Err(TeamError::InvalidTarget(
                "This user cannot be invited".to_string(),
            ));
        }

        let membership = self.report(
            self.memberships
                .find_membership(project.id, recipient.id)
                .await,
            "send_direct_invite",
        )?;
        if membership.is_some() {
            return Err(TeamError::Conflict(
                "This user is already a member of this project".to_string(),
            ));
        }

        let pending = self.report(
            self.invites
                .find_pending_direct(project.id, recipient.id)
                .await,
            "send_direct_invite",
        )?;
        if pending.is_some() {
            return Err(TeamError::Conflict(MSG_PENDING_EXISTS.to_string()));
        }

        self.check_quota(sender.id, "send_direct_invite").await?;

        let invite = match self
            .invites
            .create_invite(&CreateInvite::direct(project.id, sender.id, recipient.id))
            .await
        {
            Ok(invite) => invite,
            Err(e) if e.is_conflict() => {
                return Err(TeamError::Conflict(MSG_PENDING_EXISTS.to_string()));
            }
            Err(e) => return self.report(Err(e), "send_direct_invite"),
        };

        info!(
            invite_id = %invite.id,
            project_id = %project.id,
            sender_id = %sender.id,
            recipient_id = %recipient.id,
            "Direct invite sent"
        );

        dispatch(
            &self.notifier,
            InviteEvent::Received {
                invite: invite.clone(),
            },
        );

        Ok(invite)
    }

    /// Create a shareable link invite for a project the caller owns.
    pub async fn generate_invite_link(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
    ) -> TeamResult<IssuedLink> {
        let (sender, project) = self.identity.require_owner(ctx, project_id).await?;

        self.check_quota(sender.id, "generate_invite_link").await?;

        let token = self.tokens.generate();
        let invite = self.report(
            self.invites
                .create_invite(&CreateInvite::link(project.id, sender.id, token.clone()))
                .await,
            "generate_invite_link",
        )?;

        info!(
            invite_id = %invite.id,
            project_id = %project.id,
            sender_id = %sender.id,
            "Invite link generated"
        );

        Ok(IssuedLink { invite, token })
    }

    /// Accept or decline a direct invite addressed to the caller.
    ///
    /// Wrong id, wrong recipient, and an invite that is no longer pending
    /// all produce the same `NotFound` outcome.
    pub async fn respond_to_invite(
        &self,
        ctx: &RequestContext,
        invite_id: InviteId,
        accept: bool,
    ) -> TeamResult<InviteResponse> {
        let profile = self.identity.resolve_profile(ctx).await?;
        let status = if accept {
            InviteStatus::Accepted
        } else {
            InviteStatus::Declined
        };

        let invite = self
            .report(
                self.invites
                    .respond_to_direct(invite_id, profile.id, status)
                    .await,
                "respond_to_invite",
            )?
            .ok_or_else(|| TeamError::not_found(MSG_INVITE_NOT_FOUND))?;

        if !accept {
            info!(invite_id = %invite.id, recipient_id = %profile.id, "Invite declined");
            return Ok(InviteResponse::Declined(invite));
        }

        let membership = self.join(&invite, profile.id, "respond_to_invite").await?;

        info!(
            invite_id = %invite.id,
            project_id = %invite.project_id,
            member_id = %profile.id,
            "Invite accepted"
        );

        dispatch(
            &self.notifier,
            InviteEvent::Accepted {
                invite: invite.clone(),
                membership: membership.clone(),
            },
        );

        Ok(InviteResponse::Accepted(Acceptance { invite, membership }))
    }

    /// Claim a link invite by its token.
    ///
    /// When several profiles present the same token concurrently, exactly
    /// one claim binds itself as the recipient; the rest get `AlreadyUsed`,
    /// as does anyone presenting the token afterwards. Revoked and unknown
    /// tokens are `InvalidLink`.
    pub async fn accept_invite_link(
        &self,
        ctx: &RequestContext,
        token: &str,
    ) -> TeamResult<Acceptance> {
        let token = token.trim();
        if token.is_empty() {
            return Err(invalid_link());
        }

        let profile = self.identity.resolve_profile(ctx).await?;

        let pending = self
            .report(
                self.invites.find_link_by_token(token).await,
                "accept_invite_link",
            )?
            .ok_or_else(invalid_link)?;
        match pending.status {
            InviteStatus::Pending => {}
            InviteStatus::Accepted => return Err(already_used()),
            InviteStatus::Declined | InviteStatus::Revoked => return Err(invalid_link()),
        }

        let project = self.identity.load_project(pending.project_id).await?;
        if project.is_owned_by(profile.id) {
            return Err(TeamError::AlreadyOwner(
                "You already own this project".to_string(),
            ));
        }

        let existing = self.report(
            self.memberships
                .find_membership(project.id, profile.id)
                .await,
            "accept_invite_link",
        )?;
        if existing.is_some() {
            return Err(TeamError::AlreadyMember(MSG_ALREADY_MEMBER.to_string()));
        }

        let Some(invite) = self.report(
            self.invites.claim_link(pending.id, profile.id).await,
            "accept_invite_link",
        )?
        else {
            debug!(invite_id = %pending.id, claimant_id = %profile.id, "Lost invite link race");
            return Err(already_used());
        };

        let membership = self.join(&invite, profile.id, "accept_invite_link").await?;

        info!(
            invite_id = %invite.id,
            project_id = %invite.project_id,
            member_id = %profile.id,
            "Invite link claimed"
        );

        dispatch(
            &self.notifier,
            InviteEvent::Accepted {
                invite: invite.clone(),
                membership: membership.clone(),
            },
        );

        Ok(Acceptance { invite, membership })
    }

    /// Withdraw a pending invite the caller sent.
    pub async fn revoke_invite(
        &self,
        ctx: &RequestContext,
        invite_id: InviteId,
    ) -> TeamResult<Invite> {
        let profile = self.identity.resolve_profile(ctx).await?;

        let invite = self
            .report(
                self.invites.revoke_invite(invite_id, profile.id).await,
                "revoke_invite",
            )?
            .ok_or_else(|| TeamError::not_found(MSG_INVITE_NOT_FOUND))?;

        info!(invite_id = %invite.id, sender_id = %profile.id, "Invite revoked");
        Ok(invite)
    }

    /// Every invite of a project the caller owns, newest first.
    pub async fn list_project_invites(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
    ) -> TeamResult<Vec<Invite>> {
        let (_, project) = self.identity.require_owner(ctx, project_id).await?;
        self.report(
            self.invites.list_invites_by_project(project.id).await,
            "list_project_invites",
        )
    }

    /// Pending direct invites addressed to the caller.
    pub async fn list_incoming_invites(&self, ctx: &RequestContext) -> TeamResult<Vec<Invite>> {
        let profile = self.identity.resolve_profile(ctx).await?;
        self.report(
            self.invites.list_pending_for_recipient(profile.id).await,
            "list_incoming_invites",
        )
    }

    /// The caller's pending invite count and ceiling.
    pub async fn pending_invite_count(&self, ctx: &RequestContext) -> TeamResult<InviteQuota> {
        let profile = self.identity.resolve_profile(ctx).await?;
        self.report(self.limiter.quota(profile.id).await, "pending_invite_count")
    }

    async fn check_quota(&self, sender_id: ProfileId, operation: &'static str) -> TeamResult<()> {
        let quota = self.report(self.limiter.quota(sender_id).await, operation)?;
        if quota.is_exhausted() {
            debug!(sender_id = %sender_id, pending = quota.pending, "Invite ceiling reached");
            return Err(TeamError::RateLimited(format!(
                "You can have at most {} pending invites; wait for some to be answered or revoke one",
                quota.limit
            )));
        }
        Ok(())
    }

    /// Insert the membership for an accepted invite.
    ///
    /// The invite transition has already committed and stays in place if
    /// this fails.
    async fn join(
        &self,
        invite: &Invite,
        profile_id: ProfileId,
        operation: &'static str,
    ) -> TeamResult<Membership> {
        let data = CreateMembership {
            project_id: invite.project_id,
            profile_id,
            invite_id: Some(invite.id),
        };

        match self.memberships.create_membership(&data).await {
            Ok(membership) => Ok(membership),
            Err(e) if e.is_conflict() => {
                Err(TeamError::AlreadyMember(MSG_ALREADY_MEMBER.to_string()))
            }
            Err(e) => self.report(Err(e), operation),
        }
    }
}

fn invalid_link() -> TeamError {
    TeamError::InvalidLink("Invalid or expired invite link".to_string())
}

fn already_used() -> TeamError {
    TeamError::AlreadyUsed("This invite has already been used".to_string())
}
