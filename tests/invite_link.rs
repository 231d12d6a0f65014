//! Integration tests for shareable invite links.

mod helpers;

use std::sync::Arc;

use futures::future::join_all;

use hackhub_entity::invite::{InviteKind, InviteStatus};
use hackhub_service::TeamError;

use helpers::{StaleMembershipReads, TestApp};

#[tokio::test]
async fn test_generate_and_claim_link() {
    let app = TestApp::new();
    let owner = app.user("owner").await;
    let carol = app.user("carol").await;
    let project = app.project(&owner, "rover").await;

    let link = app
        .engine
        .invites
        .generate_invite_link(&owner.ctx, project.id)
        .await
        .unwrap();
    assert_eq!(link.invite.kind, InviteKind::Link);
    assert_eq!(link.invite.recipient_id, None);
    assert_eq!(link.invite.token.as_deref(), Some(link.token.as_str()));
    assert!(link.token.len() >= 43);

    let acceptance = app
        .engine
        .invites
        .accept_invite_link(&carol.ctx, &link.token)
        .await
        .unwrap();
    assert_eq!(acceptance.invite.status, InviteStatus::Accepted);
    assert_eq!(acceptance.invite.recipient_id, Some(carol.id()));
    assert_eq!(acceptance.membership.project_id, project.id);
    assert_eq!(acceptance.membership.invite_id, Some(link.invite.id));
}

#[tokio::test]
async fn test_link_tokens_are_unique_per_invite() {
    let app = TestApp::new();
    let owner = app.user("owner").await;
    let project = app.project(&owner, "rover").await;

    let first = app
        .engine
        .invites
        .generate_invite_link(&owner.ctx, project.id)
        .await
        .unwrap();
    let second = app
        .engine
        .invites
        .generate_invite_link(&owner.ctx, project.id)
        .await
        .unwrap();
    assert_ne!(first.token, second.token);
}

#[tokio::test]
async fn test_used_link_reports_already_used() {
    let app = TestApp::new();
    let owner = app.user("owner").await;
    let carol = app.user("carol").await;
    let dave = app.user("dave").await;
    let project = app.project(&owner, "rover").await;
    let link = app
        .engine
        .invites
        .generate_invite_link(&owner.ctx, project.id)
        .await
        .unwrap();

    app.engine
        .invites
        .accept_invite_link(&carol.ctx, &link.token)
        .await
        .unwrap();

    for ctx in [&dave.ctx, &carol.ctx] {
        let err = app
            .engine
            .invites
            .accept_invite_link(ctx, &link.token)
            .await
            .unwrap_err();
        assert!(matches!(err, TeamError::AlreadyUsed(_)), "{err:?}");
    }

    let snapshot = app.store.snapshot().await;
    assert_eq!(snapshot.members_of(project.id).len(), 1);
    assert_eq!(snapshot.invites[0].recipient_id, Some(carol.id()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_claims_have_one_winner() {
    let app = TestApp::new();
    let owner = app.user("owner").await;
    let mut claimants = Vec::new();
    for i in 0..6 {
        claimants.push(app.user(&format!("claimant{i}")).await);
    }

    for round in 0..20 {
        let project = app.project(&owner, &format!("rover-{round}")).await;
        let link = app
            .engine
            .invites
            .generate_invite_link(&owner.ctx, project.id)
            .await
            .unwrap();

        let attempts = claimants.iter().map(|claimant| {
            let invites = app.engine.invites.clone();
            let ctx = claimant.ctx.clone();
            let token = link.token.clone();
            tokio::spawn(async move { invites.accept_invite_link(&ctx, &token).await })
        });
        let results: Vec<_> = join_all(attempts)
            .await
            .into_iter()
            .map(|joined| joined.expect("task panicked"))
            .collect();

        let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(winners.len(), 1, "round {round}");
        for result in results.iter().filter(|r| r.is_err()) {
            assert!(
                matches!(result, Err(TeamError::AlreadyUsed(_))),
                "round {round}: {result:?}"
            );
        }

        let snapshot = app.store.snapshot().await;
        let members = snapshot.members_of(project.id);
        assert_eq!(members.len(), 1);
        let invite = snapshot.invites.iter().find(|i| i.id == link.invite.id).unwrap();
        assert_eq!(invite.status, InviteStatus::Accepted);
        assert_eq!(invite.recipient_id, Some(members[0].profile_id));
        assert_eq!(winners[0].membership.profile_id, members[0].profile_id);
    }
}

#[tokio::test]
async fn test_owner_cannot_claim_own_link() {
    let app = TestApp::new();
    let owner = app.user("owner").await;
    let project = app.project(&owner, "rover").await;
    let link = app
        .engine
        .invites
        .generate_invite_link(&owner.ctx, project.id)
        .await
        .unwrap();

    let err = app
        .engine
        .invites
        .accept_invite_link(&owner.ctx, &link.token)
        .await
        .unwrap_err();
    assert!(matches!(err, TeamError::AlreadyOwner(_)));

    let snapshot = app.store.snapshot().await;
    assert!(snapshot.memberships.is_empty());
    assert_eq!(snapshot.invites[0].status, InviteStatus::Pending);
}

#[tokio::test]
async fn test_member_cannot_claim_link() {
    let app = TestApp::new();
    let owner = app.user("owner").await;
    let bob = app.user("bob").await;
    let project = app.project(&owner, "rover").await;
    app.add_member(&owner, &project, &bob).await;
    let link = app
        .engine
        .invites
        .generate_invite_link(&owner.ctx, project.id)
        .await
        .unwrap();

    let err = app
        .engine
        .invites
        .accept_invite_link(&bob.ctx, &link.token)
        .await
        .unwrap_err();
    assert!(matches!(err, TeamError::AlreadyMember(_)));

    // The link stays usable for someone else.
    let pending = app
        .store
        .snapshot()
        .await
        .invites
        .into_iter()
        .find(|i| i.id == link.invite.id)
        .unwrap();
    assert!(pending.is_pending());
}

#[tokio::test]
async fn test_membership_conflict_after_claim_keeps_link_accepted() {
    let app = TestApp::with_stores(|store, stores| {
        stores.memberships = Arc::new(StaleMembershipReads(store.clone()));
    });
    let owner = app.user("owner").await;
    let bob = app.user("bob").await;
    let project = app.project(&owner, "rover").await;
    app.add_member(&owner, &project, &bob).await;
    let link = app
        .engine
        .invites
        .generate_invite_link(&owner.ctx, project.id)
        .await
        .unwrap();

    // The membership lookup misses, so the claim goes through and the
    // insert is what catches the duplicate.
    let err = app
        .engine
        .invites
        .accept_invite_link(&bob.ctx, &link.token)
        .await
        .unwrap_err();
    assert!(matches!(err, TeamError::AlreadyMember(_)), "{err:?}");

    let snapshot = app.store.snapshot().await;
    let stored = snapshot
        .invites
        .iter()
        .find(|i| i.id == link.invite.id)
        .unwrap();
    assert_eq!(stored.status, InviteStatus::Accepted);
    assert_eq!(stored.recipient_id, Some(bob.id()));
    assert_eq!(snapshot.members_of(project.id).len(), 1);
    assert!(app.reporter.operations.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_revoked_or_unknown_link_is_invalid() {
    let app = TestApp::new();
    let owner = app.user("owner").await;
    let carol = app.user("carol").await;
    let project = app.project(&owner, "rover").await;
    let link = app
        .engine
        .invites
        .generate_invite_link(&owner.ctx, project.id)
        .await
        .unwrap();

    app.engine
        .invites
        .revoke_invite(&owner.ctx, link.invite.id)
        .await
        .unwrap();

    for token in [link.token.as_str(), "not-a-real-token", ""] {
        let err = app
            .engine
            .invites
            .accept_invite_link(&carol.ctx, token)
            .await
            .unwrap_err();
        assert!(matches!(err, TeamError::InvalidLink(_)), "{token:?}: {err:?}");
    }
}
