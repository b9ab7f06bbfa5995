//! Integration tests for access resolution and folder grant management.

mod helpers;

use docvault_core::error::ErrorKind;
use docvault_core::types::UserId;
use docvault_database::PermissionStore;
use docvault_entity::permission::AccessLevel;

use helpers::{TestApp, assert_kind};

#[tokio::test]
async fn test_nearest_explicit_grant_wins() {
    let app = TestApp::new();
    let alice = app.user("alice@example.com").await;
    let bob = app.user("bob@example.com").await;

    let docs = app.create_folder(&alice, "Docs", None).await;
    let work = app.create_folder(&alice, "Work", Some(docs.id)).await;
    let deep = app.create_folder(&alice, "Deep", Some(work.id)).await;

    app.folders
        .provide_folder_access(&alice, docs.id, bob.user_id, AccessLevel::Editor)
        .await
        .unwrap();
    app.folders
        .provide_folder_access(&alice, work.id, bob.user_id, AccessLevel::Viewer)
        .await
        .unwrap();

    assert_eq!(app.folder_level(bob.user_id, docs.id).await, Some(AccessLevel::Editor));
    // A closer, lower grant overrides the inherited one.
    assert_eq!(app.folder_level(bob.user_id, work.id).await, Some(AccessLevel::Viewer));
    assert_eq!(app.folder_level(bob.user_id, deep.id).await, Some(AccessLevel::Viewer));

    let stranger = UserId::new();
    assert_eq!(app.folder_level(stranger, deep.id).await, None);
}

#[tokio::test]
async fn test_provide_overwrites_existing_grant() {
    let app = TestApp::new();
    let alice = app.user("alice@example.com").await;
    let bob = app.user("bob@example.com").await;

    let docs = app.create_folder(&alice, "Docs", None).await;

    app.folders
        .provide_folder_access(&alice, docs.id, bob.user_id, AccessLevel::Viewer)
        .await
        .unwrap();
    let grant = app
        .folders
        .provide_folder_access(&alice, docs.id, bob.user_id, AccessLevel::Admin)
        .await
        .unwrap();
    assert_eq!(grant.access_level, AccessLevel::Admin);

    let grants = app.folders.list_folder_access(&alice, docs.id).await.unwrap();
    assert_eq!(grants.len(), 2);
    assert_eq!(app.folder_level(bob.user_id, docs.id).await, Some(AccessLevel::Admin));
}

#[tokio::test]
async fn test_only_admin_manages_grants() {
    let app = TestApp::new();
    let alice = app.user("alice@example.com").await;
    let bob = app.user("bob@example.com").await;
    let carol = app.user("carol@example.com").await;

    let docs = app.create_folder(&alice, "Docs", None).await;
    app.folders
        .provide_folder_access(&alice, docs.id, bob.user_id, AccessLevel::Editor)
        .await
        .unwrap();

    assert_kind(
        app.folders
            .provide_folder_access(&bob, docs.id, carol.user_id, AccessLevel::Viewer)
            .await,
        ErrorKind::Authorization,
    );
    assert_kind(
        app.folders.revoke_folder_access(&bob, docs.id, alice.user_id).await,
        ErrorKind::Authorization,
    );
    assert_kind(
        app.folders.list_folder_access(&bob, docs.id).await,
        ErrorKind::Authorization,
    );
}

#[tokio::test]
async fn test_provide_to_unknown_user_is_not_found() {
    let app = TestApp::new();
    let alice = app.user("alice@example.com").await;
    let docs = app.create_folder(&alice, "Docs", None).await;

    let err = assert_kind(
        app.folders
            .provide_folder_access(&alice, docs.id, UserId::new(), AccessLevel::Viewer)
            .await,
        ErrorKind::NotFound,
    );
    assert_eq!(err.message, "User not found.");
}

#[tokio::test]
async fn test_revoke_removes_one_grant_and_detaches_targets_subtrees() {
    let app = TestApp::new();
    let alice = app.user("alice@example.com").await;
    let bob = app.user("bob@example.com").await;
    let carol = app.user("carol@example.com").await;

    let docs = app.create_folder(&alice, "Docs", None).await;
    app.folders
        .provide_folder_access(&alice, docs.id, bob.user_id, AccessLevel::Editor)
        .await
        .unwrap();
    app.folders
        .provide_folder_access(&alice, docs.id, carol.user_id, AccessLevel::Editor)
        .await
        .unwrap();

    let work = app.create_folder(&alice, "Work", Some(docs.id)).await;
    let bobs = app.create_folder(&bob, "Bob", Some(docs.id)).await;
    let bob_nested = app.create_folder(&bob, "Nested", Some(bobs.id)).await;
    let bob_in_work = app.create_folder(&bob, "BobWork", Some(work.id)).await;
    let carols = app.create_folder(&carol, "Carol", Some(docs.id)).await;

    app.folders
        .revoke_folder_access(&alice, docs.id, bob.user_id)
        .await
        .unwrap();

    let remaining = app.folders.list_folder_access(&alice, docs.id).await.unwrap();
    let holders: Vec<UserId> = remaining.iter().map(|g| g.user_id).collect();
    assert_eq!(remaining.len(), 2);
    assert!(holders.contains(&alice.user_id));
    assert!(holders.contains(&carol.user_id));

    assert!(app.folder(bobs.id).await.is_root());
    assert!(app.folder(bob_in_work.id).await.is_root());
    // Detached subtrees move as a whole.
    assert_eq!(app.folder(bob_nested.id).await.parent_id, Some(bobs.id));
    assert_eq!(app.folder(carols.id).await.parent_id, Some(docs.id));
    assert_eq!(app.folder(work.id).await.parent_id, Some(docs.id));

    assert_eq!(app.folder_level(bob.user_id, docs.id).await, None);
    assert_eq!(app.folder_level(bob.user_id, bobs.id).await, Some(AccessLevel::Admin));
}

#[tokio::test]
async fn test_revoke_without_grant_is_not_found() {
    let app = TestApp::new();
    let alice = app.user("alice@example.com").await;
    let bob = app.user("bob@example.com").await;

    let docs = app.create_folder(&alice, "Docs", None).await;
    let before = PermissionStore::list_folder_permissions(app.store.as_ref(), docs.id)
        .await
        .unwrap();

    let err = assert_kind(
        app.folders.revoke_folder_access(&alice, docs.id, bob.user_id).await,
        ErrorKind::NotFound,
    );
    assert_eq!(
        err.message,
        "The user does not have explicit permission on this folder."
    );

    let after = PermissionStore::list_folder_permissions(app.store.as_ref(), docs.id)
        .await
        .unwrap();
    assert_eq!(after, before);
}

#[tokio::test]
async fn test_inherited_admin_may_revoke_explicit_grant() {
    let app = TestApp::new();
    let alice = app.user("alice@example.com").await;
    let bob = app.user("bob@example.com").await;
    let carol = app.user("carol@example.com").await;

    let docs = app.create_folder(&alice, "Docs", None).await;
    let work = app.create_folder(&alice, "Work", Some(docs.id)).await;

    app.folders
        .provide_folder_access(&alice, docs.id, bob.user_id, AccessLevel::Admin)
        .await
        .unwrap();
    app.folders
        .provide_folder_access(&alice, work.id, carol.user_id, AccessLevel::Viewer)
        .await
        .unwrap();

    // Bob's Admin on Work comes from Docs only.
    assert!(
        PermissionStore::find_folder_permission(app.store.as_ref(), work.id, bob.user_id)
            .await
            .unwrap()
            .is_none()
    );
    assert_eq!(app.folder_level(bob.user_id, work.id).await, Some(AccessLevel::Admin));

    app.folders
        .revoke_folder_access(&bob, work.id, carol.user_id)
        .await
        .unwrap();
    assert_eq!(app.folder_level(carol.user_id, work.id).await, None);
}

#[tokio::test]
async fn test_missing_folder_is_checked_before_access() {
    let app = TestApp::new();
    let bob = app.user("bob@example.com").await;
    let alice = app.user("alice@example.com").await;

    let missing = docvault_core::types::FolderId::new();
    assert_kind(
        app.folders
            .provide_folder_access(&bob, missing, alice.user_id, AccessLevel::Viewer)
            .await,
        ErrorKind::NotFound,
    );
    assert_kind(
        app.folders.revoke_folder_access(&bob, missing, alice.user_id).await,
        ErrorKind::NotFound,
    );
}
