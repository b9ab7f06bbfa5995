//! The credential store contract consumed by the vault services.
//!
//! Every method returns [`AppResult`]. Absence is reported as `Ok(None)`
//! (or an empty list), a uniqueness violation as
//! [`ErrorKind::Conflict`](docvault_core::error::ErrorKind::Conflict) and
//! any other backend failure as
//! [`ErrorKind::Database`](docvault_core::error::ErrorKind::Database).

use std::fmt;

use async_trait::async_trait;

use docvault_core::result::AppResult;
use docvault_core::types::{FileId, FolderId, UserId};
use docvault_entity::account::{Account, CreateAccount};
use docvault_entity::file::{CreateFile, FileRecord};
use docvault_entity::folder::{CreateFolder, Folder, FolderChanges};
use docvault_entity::permission::{AccessLevel, FilePermission, FolderPermission};

/// Account persistence.
#[async_trait]
pub trait AccountStore: Send + Sync + fmt::Debug + 'static {
    /// Find an account by email, compared case-insensitively.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>>;

    /// Find an account by id.
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<Account>>;

    /// Insert a new account. Conflict when the email is taken.
    async fn create(&self, data: &CreateAccount) -> AppResult<Account>;

    /// Persist the mutable fields of an existing account.
    async fn update(&self, account: &Account) -> AppResult<Account>;
}

/// Folder persistence and structural queries.
#[async_trait]
pub trait FolderStore: Send + Sync + fmt::Debug + 'static {
    /// Find a folder by id.
    async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>>;

    /// Direct children of a folder, ordered by name.
    async fn find_children(&self, parent_id: FolderId) -> AppResult<Vec<Folder>>;

    /// Every folder below `root_id` (excluding the root itself), in any order.
    async fn find_descendants(&self, root_id: FolderId) -> AppResult<Vec<Folder>>;

    /// Root folders on which `user_id` holds an explicit grant.
    async fn find_roots_for_user(&self, user_id: UserId) -> AppResult<Vec<Folder>>;

    /// Insert a new folder.
    async fn create(&self, data: &CreateFolder) -> AppResult<Folder>;

    /// Re-parent a folder (None promotes it to a root).
    async fn set_parent(&self, id: FolderId, parent_id: Option<FolderId>) -> AppResult<Folder>;

    /// Commit a structural change set as one unit.
    ///
    /// Grants in `revoke` are removed, folders in `detach` become roots,
    /// folders in `delete` are removed together with their grants and their
    /// live files are tombstoned. Returns the tombstoned files.
    async fn apply_changes(&self, changes: &FolderChanges) -> AppResult<Vec<FileRecord>>;
}

/// Explicit permission grants on folders and files.
#[async_trait]
pub trait PermissionStore: Send + Sync + fmt::Debug + 'static {
    /// The explicit grant for `(folder, user)`, if any.
    async fn find_folder_permission(
        &self,
        folder_id: FolderId,
        user_id: UserId,
    ) -> AppResult<Option<FolderPermission>>;

    /// Every explicit grant on a folder.
    async fn list_folder_permissions(&self, folder_id: FolderId)
        -> AppResult<Vec<FolderPermission>>;

    /// Insert or overwrite the grant for `(folder, user)`.
    async fn upsert_folder_permission(
        &self,
        folder_id: FolderId,
        user_id: UserId,
        level: AccessLevel,
    ) -> AppResult<FolderPermission>;

    /// The explicit grant for `(file, user)`, if any.
    async fn find_file_permission(
        &self,
        file_id: FileId,
        user_id: UserId,
    ) -> AppResult<Option<FilePermission>>;

    /// Insert or overwrite the grant for `(file, user)`.
    async fn upsert_file_permission(
        &self,
        file_id: FileId,
        user_id: UserId,
        level: AccessLevel,
    ) -> AppResult<FilePermission>;

    /// Remove the grant for `(file, user)`. Returns false if none existed.
    async fn remove_file_permission(&self, file_id: FileId, user_id: UserId) -> AppResult<bool>;
}

/// File record persistence.
#[async_trait]
pub trait FileStore: Send + Sync + fmt::Debug + 'static {
    /// Find a file by id, tombstoned records included.
    async fn find_by_id(&self, id: FileId) -> AppResult<Option<FileRecord>>;

    /// Live files directly inside a folder, ordered by name.
    async fn find_by_folder(&self, folder_id: FolderId) -> AppResult<Vec<FileRecord>>;

    /// Live files without a folder uploaded by `owner_id`.
    async fn find_root_files_for_owner(&self, owner_id: UserId) -> AppResult<Vec<FileRecord>>;

    /// Insert a new file record. Conflict when the storage key is taken.
    async fn create(&self, data: &CreateFile) -> AppResult<FileRecord>;

    /// Persist the mutable fields of an existing file record.
    async fn update(&self, file: &FileRecord) -> AppResult<FileRecord>;
}
