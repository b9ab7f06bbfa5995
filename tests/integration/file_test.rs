//! Integration tests for upload, download, soft delete and file grants.

mod helpers;

use std::sync::Arc;

use async_trait::async_trait;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::types::{FileId, FolderId, UserId};
use docvault_database::{FileStore, MemoryStore, PermissionStore};
use docvault_entity::permission::{AccessLevel, FilePermission, FolderPermission};

use helpers::{MAX_UPLOAD_BYTES, TestApp, assert_kind, collect, upload_request};

#[tokio::test]
async fn test_upload_then_download() {
    let app = TestApp::new();
    let alice = app.user("alice@example.com").await;
    let docs = app.create_folder(&alice, "Docs", None).await;

    let uploaded = app
        .files
        .upload_file(&alice, upload_request("report.pdf", Some(docs.id), b"%PDF-1.7"))
        .await
        .unwrap();

    assert_eq!(uploaded.message, "File uploaded successfully.");
    assert_eq!(uploaded.file.content_type, "application/pdf");
    assert_eq!(uploaded.file.size_bytes, 8);
    assert_eq!(uploaded.file.owner_id, alice.user_id);
    assert!(
        uploaded
            .file
            .storage_key
            .starts_with(&format!("user-{}/", alice.user_id))
    );
    assert!(uploaded.file.storage_key.ends_with("_report.pdf"));
    assert!(app.objects.contains(&uploaded.file.storage_key).await);

    let download = app
        .files
        .download_file(&alice, uploaded.file.id)
        .await
        .unwrap();
    assert_eq!(download.file_name, "report.pdf");
    assert_eq!(download.content_type, "application/pdf");
    assert_eq!(collect(download.stream).await, b"%PDF-1.7".to_vec());
}

#[tokio::test]
async fn test_declared_content_type_is_kept() {
    let app = TestApp::new();
    let alice = app.user("alice@example.com").await;

    let mut req = upload_request("data.bin", None, b"\x00\x01");
    req.content_type = Some("application/x-custom".to_string());

    let uploaded = app.files.upload_file(&alice, req).await.unwrap();
    assert_eq!(uploaded.file.content_type, "application/x-custom");
}

#[tokio::test]
async fn test_upload_rejects_bad_input() {
    let app = TestApp::new();
    let alice = app.user("alice@example.com").await;

    let err = assert_kind(
        app.files
            .upload_file(&alice, upload_request("empty.txt", None, b""))
            .await,
        ErrorKind::Validation,
    );
    assert_eq!(err.message, "Uploaded file is empty or missing.");

    assert_kind(
        app.files
            .upload_file(&alice, upload_request("../escape.txt", None, b"x"))
            .await,
        ErrorKind::Validation,
    );

    static BIG: [u8; MAX_UPLOAD_BYTES as usize + 1] = [0; MAX_UPLOAD_BYTES as usize + 1];
    assert_kind(
        app.files
            .upload_file(&alice, upload_request("big.bin", None, &BIG))
            .await,
        ErrorKind::Validation,
    );

    assert!(app.objects.is_empty().await);
}

#[tokio::test]
async fn test_upload_into_folder_requires_write() {
    let app = TestApp::new();
    let alice = app.user("alice@example.com").await;
    let bob = app.user("bob@example.com").await;
    let docs = app.create_folder(&alice, "Docs", None).await;

    assert_kind(
        app.files
            .upload_file(&bob, upload_request("a.txt", Some(docs.id), b"a"))
            .await,
        ErrorKind::Authorization,
    );

    app.folders
        .provide_folder_access(&alice, docs.id, bob.user_id, AccessLevel::Viewer)
        .await
        .unwrap();
    assert_kind(
        app.files
            .upload_file(&bob, upload_request("a.txt", Some(docs.id), b"a"))
            .await,
        ErrorKind::Authorization,
    );

    app.folders
        .provide_folder_access(&alice, docs.id, bob.user_id, AccessLevel::Editor)
        .await
        .unwrap();
    let file = app.upload(&bob, "a.txt", Some(docs.id), b"a").await;
    assert_eq!(file.folder_id, Some(docs.id));

    assert_eq!(app.objects.len().await, 1);
}

#[tokio::test]
async fn test_folderless_upload_grants_admin() {
    let app = TestApp::new();
    let alice = app.user("alice@example.com").await;
    let bob = app.user("bob@example.com").await;

    let file = app.upload(&alice, "loose.txt", None, b"loose").await;

    let grant = PermissionStore::find_file_permission(app.store.as_ref(), file.id, alice.user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(grant.access_level, AccessLevel::Admin);

    assert_kind(
        app.files.download_file(&bob, file.id).await,
        ErrorKind::Authorization,
    );

    let mine = app.files.list_files(&alice, None).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert!(app.files.list_files(&bob, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_files_in_folder() {
    let app = TestApp::new();
    let alice = app.user("alice@example.com").await;
    let bob = app.user("bob@example.com").await;
    let docs = app.create_folder(&alice, "Docs", None).await;

    app.upload(&alice, "b.txt", Some(docs.id), b"b").await;
    app.upload(&alice, "a.txt", Some(docs.id), b"a").await;

    let names: Vec<String> = app
        .files
        .list_files(&alice, Some(docs.id))
        .await
        .unwrap()
        .into_iter()
        .map(|f| f.name)
        .collect();
    assert_eq!(names, vec!["a.txt".to_string(), "b.txt".to_string()]);

    assert_kind(
        app.files.list_files(&bob, Some(docs.id)).await,
        ErrorKind::Authorization,
    );
}

#[tokio::test]
async fn test_delete_tombstones_and_removes_blob() {
    let app = TestApp::new();
    let alice = app.user("alice@example.com").await;
    let docs = app.create_folder(&alice, "Docs", None).await;
    let file = app.upload(&alice, "old.txt", Some(docs.id), b"old").await;

    let deleted = app.files.delete_file(&alice, file.id).await.unwrap();
    assert!(deleted.is_deleted);
    assert_eq!(deleted.file_id, file.id);
    assert_eq!(deleted.message, "File deleted successfully.");

    let record = app.file_record(file.id).await;
    assert!(record.is_deleted);
    assert_eq!(record.deleted_at, Some(deleted.deleted_at));
    assert!(!app.objects.contains(&file.storage_key).await);

    let err = assert_kind(
        app.files.download_file(&alice, file.id).await,
        ErrorKind::NotFound,
    );
    assert_eq!(err.message, "File not found or has been deleted.");

    assert_kind(app.files.delete_file(&alice, file.id).await, ErrorKind::NotFound);
    assert!(app.files.list_files(&alice, Some(docs.id)).await.unwrap().is_empty());
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

    let file = app.upload(&alice, "keep.txt", Some(docs.id), b"keep").await;

    assert_kind(
        app.files.delete_file(&bob, file.id).await,
        ErrorKind::Authorization,
    );
    assert!(app.file_record(file.id).await.is_live());
    assert!(app.objects.contains(&file.storage_key).await);

    assert_kind(
        app.files.delete_file(&alice, FileId::new()).await,
        ErrorKind::NotFound,
    );
}

#[tokio::test]
async fn test_file_grant_overrides_folder_chain() {
    let app = TestApp::new();
    let alice = app.user("alice@example.com").await;
    let bob = app.user("bob@example.com").await;
    let docs = app.create_folder(&alice, "Docs", None).await;
    let file = app.upload(&alice, "shared.txt", Some(docs.id), b"shared").await;

    assert_kind(
        app.files.download_file(&bob, file.id).await,
        ErrorKind::Authorization,
    );

    app.files
        .provide_file_access(&alice, file.id, bob.user_id, AccessLevel::Viewer)
        .await
        .unwrap();
    let download = app.files.download_file(&bob, file.id).await.unwrap();
    assert_eq!(collect(download.stream).await, b"shared".to_vec());

    // Viewer on the file cannot manage it.
    assert_kind(
        app.files.delete_file(&bob, file.id).await,
        ErrorKind::Authorization,
    );

    app.files
        .revoke_file_access(&alice, file.id, bob.user_id)
        .await
        .unwrap();
    assert_kind(
        app.files.download_file(&bob, file.id).await,
        ErrorKind::Authorization,
    );

    let err = assert_kind(
        app.files.revoke_file_access(&alice, file.id, bob.user_id).await,
        ErrorKind::NotFound,
    );
    assert_eq!(
        err.message,
        "The user does not have explicit permission on this file."
    );
}

/// Grant store that fails every file grant write.
#[derive(Debug)]
struct FailingFileGrants(Arc<MemoryStore>);

#[async_trait]
impl PermissionStore for FailingFileGrants {
    async fn find_folder_permission(
        &self,
        folder_id: FolderId,
        user_id: UserId,
    ) -> AppResult<Option<FolderPermission>> {
        self.0.find_folder_permission(folder_id, user_id).await
    }

    async fn list_folder_permissions(
        &self,
        folder_id: FolderId,
    ) -> AppResult<Vec<FolderPermission>> {
        self.0.list_folder_permissions(folder_id).await
    }

    async fn upsert_folder_permission(
        &self,
        folder_id: FolderId,
        user_id: UserId,
        level: AccessLevel,
    ) -> AppResult<FolderPermission> {
        self.0.upsert_folder_permission(folder_id, user_id, level).await
    }

    async fn find_file_permission(
        &self,
        file_id: FileId,
        user_id: UserId,
    ) -> AppResult<Option<FilePermission>> {
        self.0.find_file_permission(file_id, user_id).await
    }

    async fn upsert_file_permission(
        &self,
        _file_id: FileId,
        _user_id: UserId,
        _level: AccessLevel,
    ) -> AppResult<FilePermission> {
        Err(AppError::database("file_permissions is unavailable"))
    }

    async fn remove_file_permission(&self, file_id: FileId, user_id: UserId) -> AppResult<bool> {
        self.0.remove_file_permission(file_id, user_id).await
    }
}

#[tokio::test]
async fn test_failed_owner_grant_discards_root_upload() {
    let app = TestApp::with_permissions(|store| Arc::new(FailingFileGrants(store)));
    let alice = app.user("alice@example.com").await;

    assert_kind(
        app.files
            .upload_file(&alice, upload_request("notes.txt", None, b"hello"))
            .await,
        ErrorKind::Database,
    );

    assert!(app.objects.is_empty().await);
    assert!(
        FileStore::find_root_files_for_owner(app.store.as_ref(), alice.user_id)
            .await
            .unwrap()
            .is_empty()
    );
}
