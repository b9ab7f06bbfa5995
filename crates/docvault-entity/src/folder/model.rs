//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use docvault_core::types::{FolderId, UserId};

use crate::file::FileRecord;

/// A folder in the vault hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Parent folder ID (None for root folders).
    pub parent_id: Option<FolderId>,
    /// The account that created the folder.
    pub owner_id: UserId,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Check if this is a root folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Data required to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    /// Folder name.
    pub name: String,
    /// Parent folder (None for root).
    pub parent_id: Option<FolderId>,
    /// The creating account.
    pub owner_id: UserId,
}

/// A folder together with its immediate contents, as returned by reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderView {
    /// The folder itself.
    pub folder: Folder,
    /// Direct child folders.
    pub subfolders: Vec<Folder>,
    /// Non-deleted files directly inside the folder.
    pub files: Vec<FileRecord>,
}
