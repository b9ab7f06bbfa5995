//! Integration tests for folder creation, reads, deletion and moves.

mod helpers;

use docvault_core::error::ErrorKind;
use docvault_core::types::FolderId;
use docvault_database::{FolderStore, PermissionStore};
use docvault_entity::permission::AccessLevel;
use docvault_service::folder::CreateFolderRequest;

use helpers::{TestApp, assert_kind};

fn request(name: &str, parent_id: Option<FolderId>) -> CreateFolderRequest {
    CreateFolderRequest {
        name: name.to_string(),
        parent_id,
    }
}

#[tokio::test]
async fn test_creator_gets_exactly_one_admin_grant() {
    let app = TestApp::new();
    let alice = app.user("alice@example.com").await;

    let docs = app.create_folder(&alice, "Docs", None).await;
    assert!(docs.is_root());
    assert_eq!(docs.owner_id, alice.user_id);

    let grants = PermissionStore::list_folder_permissions(app.store.as_ref(), docs.id)
        .await
        .unwrap();
    assert_eq!(grants.len(), 1);
    assert_eq!(grants[0].user_id, alice.user_id);
    assert_eq!(grants[0].access_level, AccessLevel::Admin);
}

#[tokio::test]
async fn test_docs_sharing_scenario() {
    let app = TestApp::new();
    let alice = app.user("alice@example.com").await;
    let bob = app.user("bob@example.com").await;

    let docs = app.create_folder(&alice, "Docs", None).await;
    let work = app.create_folder(&alice, "Work", Some(docs.id)).await;
    assert_eq!(work.parent_id, Some(docs.id));

    // Bob has no access to Docs yet.
    let err = assert_kind(
        app.folders
            .create_folder(&bob, request("Bob", Some(docs.id)))
            .await,
        ErrorKind::Authorization,
    );
    assert!(err.is_unauthorized());

    app.folders
        .provide_folder_access(&alice, docs.id, bob.user_id, AccessLevel::Editor)
        .await
        .unwrap();

    let bobs = app.create_folder(&bob, "Bob", Some(docs.id)).await;

    assert_eq!(app.folder_level(bob.user_id, bobs.id).await, Some(AccessLevel::Admin));
    assert_eq!(app.folder_level(bob.user_id, docs.id).await, Some(AccessLevel::Editor));
    assert_eq!(app.folder_level(bob.user_id, work.id).await, Some(AccessLevel::Editor));
    assert_eq!(app.folder_level(alice.user_id, bobs.id).await, Some(AccessLevel::Admin));

    let grants = PermissionStore::list_folder_permissions(app.store.as_ref(), bobs.id)
        .await
        .unwrap();
    assert_eq!(grants.len(), 1);
    assert_eq!(grants[0].user_id, bob.user_id);
}

#[tokio::test]
async fn test_create_under_viewer_parent_writes_nothing() {
    let app = TestApp::new();
    let alice = app.user("alice@example.com").await;
    let bob = app.user("bob@example.com").await;

    let docs = app.create_folder(&alice, "Docs", None).await;
    app.folders
        .provide_folder_access(&alice, docs.id, bob.user_id, AccessLevel::Viewer)
        .await
        .unwrap();

    assert_kind(
        app.folders
            .create_folder(&bob, request("Nope", Some(docs.id)))
            .await,
        ErrorKind::Authorization,
    );

    let children = FolderStore::find_children(app.store.as_ref(), docs.id)
        .await
        .unwrap();
    assert!(children.is_empty());

    let bob_roots = app.folders.get_root_folders(&bob).await.unwrap();
    assert_eq!(bob_roots.len(), 1);
    assert_eq!(bob_roots[0].folder.id, docs.id);
}

#[tokio::test]
async fn test_create_under_missing_parent_is_not_found() {
    let app = TestApp::new();
    let alice = app.user("alice@example.com").await;

    let err = assert_kind(
        app.folders
            .create_folder(&alice, request("Orphan", Some(FolderId::new())))
            .await,
        ErrorKind::NotFound,
    );
    assert_eq!(err.message, "Folder not found.");
}

#[tokio::test]
async fn test_folder_name_rules() {
    let app = TestApp::new();
    let alice = app.user("alice@example.com").await;

    assert_kind(
        app.folders.create_folder(&alice, request("", None)).await,
        ErrorKind::Validation,
    );
    assert_kind(
        app.folders
            .create_folder(&alice, request(&"n".repeat(51), None))
            .await,
        ErrorKind::Validation,
    );
    assert!(
        app.folders
            .create_folder(&alice, request(&"n".repeat(50), None))
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_get_folder_lists_immediate_contents() {
    let app = TestApp::new();
    let alice = app.user("alice@example.com").await;
    let bob = app.user("bob@example.com").await;

    let docs = app.create_folder(&alice, "Docs", None).await;
    let work = app.create_folder(&alice, "Work", Some(docs.id)).await;
    app.create_folder(&alice, "Deep", Some(work.id)).await;
    app.upload(&alice, "notes.txt", Some(docs.id), b"hello").await;

    let view = app.folders.get_folder(&alice, docs.id).await.unwrap();
    assert_eq!(view.folder.id, docs.id);
    assert_eq!(view.subfolders.len(), 1);
    assert_eq!(view.subfolders[0].id, work.id);
    assert_eq!(view.files.len(), 1);
    assert_eq!(view.files[0].name, "notes.txt");

    assert_kind(
        app.folders.get_folder(&bob, docs.id).await,
        ErrorKind::Authorization,
    );
    assert_kind(
        app.folders.get_folder(&alice, FolderId::new()).await,
        ErrorKind::NotFound,
    );
}

#[tokio::test]
async fn test_root_folders_follow_explicit_grants() {
    let app = TestApp::new();
    let alice = app.user("alice@example.com").await;
    let bob = app.user("bob@example.com").await;

    let docs = app.create_folder(&alice, "Docs", None).await;
    app.create_folder(&alice, "Work", Some(docs.id)).await;
    let photos = app.create_folder(&bob, "Photos", None).await;

    let roots = app.folders.get_root_folders(&alice).await.unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].folder.id, docs.id);
    assert_eq!(roots[0].subfolders.len(), 1);

    app.folders
        .provide_folder_access(&bob, photos.id, alice.user_id, AccessLevel::Viewer)
        .await
        .unwrap();

    let names: Vec<String> = app
        .folders
        .get_root_folders(&alice)
        .await
        .unwrap()
        .into_iter()
        .map(|v| v.folder.name)
        .collect();
    assert_eq!(names, vec!["Docs".to_string(), "Photos".to_string()]);
}

#[tokio::test]
async fn test_delete_removes_same_creator_subtree_and_promotes_the_rest() {
    let app = TestApp::new();
    let alice = app.user("alice@example.com").await;
    let bob = app.user("bob@example.com").await;

    let docs = app.create_folder(&alice, "Docs", None).await;
    app.folders
        .provide_folder_access(&alice, docs.id, bob.user_id, AccessLevel::Editor)
        .await
        .unwrap();

    let work = app.create_folder(&alice, "Work", Some(docs.id)).await;
    let drafts = app.create_folder(&alice, "Drafts", Some(work.id)).await;
    let shared = app.create_folder(&bob, "Shared", Some(docs.id)).await;
    let inner = app.create_folder(&alice, "Inner", Some(shared.id)).await;
    let bob_in_work = app.create_folder(&bob, "BobWork", Some(work.id)).await;

    let file = app.upload(&alice, "plan.txt", Some(drafts.id), b"plan").await;

    app.folders.delete_folder(&alice, docs.id).await.unwrap();

    assert!(!app.folder_exists(docs.id).await);
    assert!(!app.folder_exists(work.id).await);
    assert!(!app.folder_exists(drafts.id).await);

    let shared_now = app.folder(shared.id).await;
    assert!(shared_now.is_root());
    let bob_in_work_now = app.folder(bob_in_work.id).await;
    assert!(bob_in_work_now.is_root());

    // Below a detached folder nothing changes.
    assert_eq!(app.folder(inner.id).await.parent_id, Some(shared.id));

    let record = app.file_record(file.id).await;
    assert!(record.is_deleted);
    assert!(record.deleted_at.is_some());
    assert!(!app.objects.contains(&file.storage_key).await);

    let bob_roots: Vec<FolderId> = app
        .folders
        .get_root_folders(&bob)
        .await
        .unwrap()
        .into_iter()
        .map(|v| v.folder.id)
        .collect();
    assert!(bob_roots.contains(&shared.id));
    assert!(bob_roots.contains(&bob_in_work.id));
}

#[tokio::test]
async fn test_delete_requires_admin() {
    let app = TestApp::new();
    let alice = app.user("alice@example.com").await;
    let bob = app.user("bob@example.com").await;

    let docs = app.create_folder(&alice, "Docs", None).await;
    app.folders
        .provide_folder_access(&alice, docs.id, bob.user_id, AccessLevel::Editor)
        .await
        .unwrap();

    assert_kind(
        app.folders.delete_folder(&bob, docs.id).await,
        ErrorKind::Authorization,
    );
    assert!(app.folder_exists(docs.id).await);

    assert_kind(
        app.folders.delete_folder(&alice, FolderId::new()).await,
        ErrorKind::NotFound,
    );
}

#[tokio::test]
async fn test_inherited_admin_may_delete_subfolder() {
    let app = TestApp::new();
    let alice = app.user("alice@example.com").await;
    let bob = app.user("bob@example.com").await;

    let docs = app.create_folder(&alice, "Docs", None).await;
    app.folders
        .provide_folder_access(&alice, docs.id, bob.user_id, AccessLevel::Editor)
        .await
        .unwrap();
    let bobs = app.create_folder(&bob, "Bob", Some(docs.id)).await;

    app.folders.delete_folder(&alice, bobs.id).await.unwrap();
    assert!(!app.folder_exists(bobs.id).await);
    assert!(app.folder_exists(docs.id).await);
}

#[tokio::test]
async fn test_move_folder() {
    let app = TestApp::new();
    let alice = app.user("alice@example.com").await;

    let docs = app.create_folder(&alice, "Docs", None).await;
    let archive = app.create_folder(&alice, "Archive", None).await;
    let work = app.create_folder(&alice, "Work", Some(docs.id)).await;

    let moved = app
        .folders
        .move_folder(&alice, work.id, Some(archive.id))
        .await
        .unwrap();
    assert_eq!(moved.parent_id, Some(archive.id));

    let promoted = app.folders.move_folder(&alice, work.id, None).await.unwrap();
    assert!(promoted.is_root());
}

#[tokio::test]
async fn test_move_into_own_subtree_is_rejected() {
    let app = TestApp::new();
    let alice = app.user("alice@example.com").await;

    let docs = app.create_folder(&alice, "Docs", None).await;
    let work = app.create_folder(&alice, "Work", Some(docs.id)).await;
    let deep = app.create_folder(&alice, "Deep", Some(work.id)).await;

    assert_kind(
        app.folders.move_folder(&alice, docs.id, Some(deep.id)).await,
        ErrorKind::Validation,
    );
    assert_kind(
        app.folders.move_folder(&alice, docs.id, Some(docs.id)).await,
        ErrorKind::Validation,
    );
    assert!(app.folder(docs.id).await.is_root());
}

#[tokio::test]
async fn test_move_requires_write_on_target() {
    let app = TestApp::new();
    let alice = app.user("alice@example.com").await;
    let bob = app.user("bob@example.com").await;

    let docs = app.create_folder(&alice, "Docs", None).await;
    let mine = app.create_folder(&bob, "Mine", None).await;
    app.folders
        .provide_folder_access(&alice, docs.id, bob.user_id, AccessLevel::Viewer)
        .await
        .unwrap();

    assert_kind(
        app.folders.move_folder(&bob, mine.id, Some(docs.id)).await,
        ErrorKind::Authorization,
    );
    assert!(app.folder(mine.id).await.is_root());
}
