//! End-to-end approval flow through the public engine API.

use std::sync::Arc;

use greenlight_auth::{Role, RoleAuthorizer};
use greenlight_core::UserId;
use greenlight_engine::{ApprovalEngine, EngineError};
use greenlight_notify::{InMemoryNotificationStore, NotificationDispatcher, NotificationStore};
use greenlight_resource::{Actor, ApprovalAction, ApprovalStatus, ResourcePayload};
use greenlight_store::{InMemoryResourceStore, ResourceFilter};
use greenlight_workspace::{Member, WorkspaceDirectory};

struct Setup {
    engine: ApprovalEngine,
    notifications: Arc<InMemoryNotificationStore>,
    workspace_id: greenlight_core::WorkspaceId,
    editor: Actor,
    admin: Actor,
}

fn setup() -> Setup {
    let directory = Arc::new(WorkspaceDirectory::new(
        Arc::new(greenlight_workspace::InMemoryWorkspaceStore::new()),
        RoleAuthorizer::default(),
    ));

    let owner = Actor::new(UserId::new(), "Olive", "olive@acme.test", Role::Owner);
    let editor = Actor::new(UserId::new(), "Dana", "dana@acme.test", Role::Editor);
    let admin = Actor::new(UserId::new(), "Avery", "avery@acme.test", Role::Admin);

    let ws = directory
        .create_workspace("Acme", owner.user_id, &owner.email, &owner.name)
        .unwrap();
    for a in [&editor, &admin] {
        directory
            .add_member(ws.id, Member::new(a.user_id, &a.email, &a.name, a.role))
            .unwrap();
    }

    let notifications = Arc::new(InMemoryNotificationStore::new());
    let engine = ApprovalEngine::new(
        Arc::new(InMemoryResourceStore::new()),
        directory,
        NotificationDispatcher::new(notifications.clone() as Arc<dyn NotificationStore>),
    );

    Setup {
        engine,
        notifications,
        workspace_id: ws.id,
        editor,
        admin,
    }
}

#[test]
fn full_review_cycle() {
    let s = setup();

    // Editor creates an ad; it starts in Draft.
    let resource = s
        .engine
        .create_resource(
            s.workspace_id,
            "Hero ad",
            Some("Q3 launch creative".to_string()),
            ResourcePayload::Ad {
                headline: Some("Summer Sale".to_string()),
                media_url: None,
                call_to_action: Some("Shop now".to_string()),
            },
            &s.editor,
            vec!["summer".to_string()],
        )
        .unwrap();
    assert_eq!(resource.approval_status, ApprovalStatus::Draft);
    assert!(resource.approval_history.is_empty());

    // Editor submits for review.
    let outcome = s
        .engine
        .perform_action(
            resource.id,
            ApprovalAction::SubmitForReview,
            &s.editor,
            None,
            None,
        )
        .unwrap();
    assert_eq!(outcome.new_status, ApprovalStatus::InReview);
    assert_eq!(s.engine.history(resource.id).unwrap().len(), 1);

    // Admin requests changes with a comment.
    let outcome = s
        .engine
        .perform_action(
            resource.id,
            ApprovalAction::RequestChanges,
            &s.admin,
            Some("fix headline".to_string()),
            None,
        )
        .unwrap();
    assert_eq!(outcome.new_status, ApprovalStatus::ChangesRequested);
    let after = s.engine.resource(resource.id).unwrap();
    assert_eq!(after.approval_history.len(), 2);
    assert_eq!(after.comments.len(), 1);
    assert_eq!(after.comments[0].content, "fix headline");

    // Creator reverts to Draft to rework.
    let outcome = s
        .engine
        .perform_action(
            resource.id,
            ApprovalAction::RevertToDraft,
            &s.editor,
            None,
            None,
        )
        .unwrap();
    assert_eq!(outcome.new_status, ApprovalStatus::Draft);
    assert_eq!(s.engine.history(resource.id).unwrap().len(), 3);

    // Resubmit and approve.
    s.engine
        .perform_action(
            resource.id,
            ApprovalAction::SubmitForReview,
            &s.editor,
            None,
            None,
        )
        .unwrap();
    let outcome = s
        .engine
        .perform_action(
            resource.id,
            ApprovalAction::Approve,
            &s.admin,
            Some("looks good".to_string()),
            None,
        )
        .unwrap();
    assert_eq!(outcome.new_status, ApprovalStatus::Approved);

    let after = s.engine.resource(resource.id).unwrap();
    assert_eq!(after.approval_history.len(), 5);
    assert_eq!(after.comments.len(), 2);
    assert_eq!(after.approved_by, Some(s.admin.user_id));
    assert!(after.approved_at.is_some());

    // Submitting an already-approved resource is rejected.
    let err = s
        .engine
        .perform_action(
            resource.id,
            ApprovalAction::SubmitForReview,
            &s.editor,
            None,
            None,
        )
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::InvalidTransition {
            from: ApprovalStatus::Approved,
            to: ApprovalStatus::InReview,
        }
    ));

    // History chains across the whole run.
    let history = s.engine.history(resource.id).unwrap();
    assert_eq!(history[0].from_status, Some(ApprovalStatus::Draft));
    for pair in history.windows(2) {
        assert_eq!(pair[1].from_status, Some(pair[0].to_status));
    }

    // The creator was notified of every transition performed by the admin.
    let inbox = s.notifications.for_user(s.editor.user_id, false).unwrap();
    assert_eq!(inbox.len(), 2);
}

#[test]
fn listing_and_statistics_over_a_workspace() {
    let s = setup();

    let ad = s
        .engine
        .create_resource(
            s.workspace_id,
            "Hero ad",
            None,
            ResourcePayload::Ad {
                headline: None,
                media_url: None,
                call_to_action: None,
            },
            &s.editor,
            vec![],
        )
        .unwrap();
    let shot = s
        .engine
        .create_resource(
            s.workspace_id,
            "iPhone shots",
            None,
            ResourcePayload::Screenshot {
                app_id: "314159".to_string(),
                locale: "en-US".to_string(),
                device_type: "iphone_6_7".to_string(),
                image_urls: vec![],
            },
            &s.editor,
            vec![],
        )
        .unwrap();

    for id in [ad.id, shot.id] {
        s.engine
            .perform_action(id, ApprovalAction::SubmitForReview, &s.editor, None, None)
            .unwrap();
    }
    s.engine
        .perform_action(ad.id, ApprovalAction::Approve, &s.admin, None, None)
        .unwrap();
    s.engine
        .perform_action(
            shot.id,
            ApprovalAction::Reject,
            &s.admin,
            None,
            Some("wrong locale".to_string()),
        )
        .unwrap();

    let filter = ResourceFilter::for_workspace(s.workspace_id);
    assert_eq!(s.engine.list_resources(&filter).unwrap().len(), 2);

    let approved = s
        .engine
        .list_resources(&filter.clone().with_status(ApprovalStatus::Approved))
        .unwrap();
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].id, ad.id);

    let stats = s.engine.statistics(&filter).unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.approval_rate, 50.0);
    assert_eq!(stats.by_app["314159"], 1);
    assert!(stats.avg_time_to_approval_secs.is_some());
}

#[test]
fn every_engine_write_bumps_the_version() {
    let s = setup();
    let resource = s
        .engine
        .create_resource(
            s.workspace_id,
            "Hero ad",
            None,
            ResourcePayload::Ad {
                headline: None,
                media_url: None,
                call_to_action: None,
            },
            &s.editor,
            vec![],
        )
        .unwrap();
    assert_eq!(resource.version, 1);

    for action in [
        ApprovalAction::SubmitForReview,
        ApprovalAction::RevertToDraft,
        ApprovalAction::SubmitForReview,
    ] {
        s.engine
            .perform_action(resource.id, action, &s.editor, None, None)
            .unwrap();
    }
    s.engine
        .add_comment(resource.id, &s.admin, "checking copy", false)
        .unwrap();

    let latest = s.engine.resource(resource.id).unwrap();
    assert_eq!(latest.version, 5);
    assert_eq!(latest.approval_status, ApprovalStatus::InReview);
}
