//! Integration tests for the pending invite ceiling.

mod helpers;

use hackhub_core::config::InviteConfig;
use hackhub_service::TeamError;

use helpers::{TestApp, test_config};

#[tokio::test]
async fn test_ceiling_spans_projects_and_frees_on_revoke() {
    let app = TestApp::new();
    let owner = app.user("owner").await;
    let first = app.project(&owner, "rover").await;
    let second = app.project(&owner, "lander").await;
    for name in ["u1", "u2", "u3", "u4", "u5", "u6"] {
        app.user(name).await;
    }

    let mut sent = Vec::new();
    for (project, name) in [
        (first.id, "u1"),
        (first.id, "u2"),
        (first.id, "u3"),
        (second.id, "u4"),
        (second.id, "u5"),
    ] {
        let invite = app
            .engine
            .invites
            .send_direct_invite(&owner.ctx, project, name)
            .await
            .unwrap();
        sent.push(invite);
    }

    let quota = app
        .engine
        .invites
        .pending_invite_count(&owner.ctx)
        .await
        .unwrap();
    assert_eq!(quota.pending, 5);
    assert_eq!(quota.remaining(), 0);

    let err = app
        .engine
        .invites
        .send_direct_invite(&owner.ctx, second.id, "u6")
        .await
        .unwrap_err();
    assert!(matches!(err, TeamError::RateLimited(_)));
    assert_eq!(app.store.snapshot().await.invites.len(), 5);

    let err = app
        .engine
        .invites
        .generate_invite_link(&owner.ctx, second.id)
        .await
        .unwrap_err();
    assert!(matches!(err, TeamError::RateLimited(_)));

    app.engine
        .invites
        .revoke_invite(&owner.ctx, sent[0].id)
        .await
        .unwrap();

    app.engine
        .invites
        .send_direct_invite(&owner.ctx, second.id, "u6")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_accepted_and_declined_invites_free_slots() {
    let mut config = test_config();
    config.invites = InviteConfig {
        max_pending_per_sender: 2,
        ..InviteConfig::default()
    };
    let app = TestApp::with_config(config);
    let owner = app.user("owner").await;
    let bob = app.user("bob").await;
    let carol = app.user("carol").await;
    app.user("dave").await;
    let project = app.project(&owner, "rover").await;

    let to_bob = app
        .engine
        .invites
        .send_direct_invite(&owner.ctx, project.id, "bob")
        .await
        .unwrap();
    let to_carol = app
        .engine
        .invites
        .send_direct_invite(&owner.ctx, project.id, "carol")
        .await
        .unwrap();
    assert!(matches!(
        app.engine
            .invites
            .send_direct_invite(&owner.ctx, project.id, "dave")
            .await,
        Err(TeamError::RateLimited(_))
    ));

    app.engine
        .invites
        .respond_to_invite(&bob.ctx, to_bob.id, true)
        .await
        .unwrap();
    app.engine
        .invites
        .respond_to_invite(&carol.ctx, to_carol.id, false)
        .await
        .unwrap();

    let quota = app
        .engine
        .invites
        .pending_invite_count(&owner.ctx)
        .await
        .unwrap();
    assert_eq!(quota.pending, 0);
    assert_eq!(quota.limit, 2);

    app.engine
        .invites
        .send_direct_invite(&owner.ctx, project.id, "dave")
        .await
        .unwrap();
}
