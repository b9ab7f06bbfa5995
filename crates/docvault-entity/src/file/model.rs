//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use docvault_core::types::{FileId, FolderId, UserId};

/// A file stored in the vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct FileRecord {
    /// Unique file identifier.
    pub id: FileId,
    /// The file name (including extension).
    pub name: String,
    /// MIME type of the file.
    pub content_type: String,
    /// File size in bytes.
    pub size_bytes: i64,
    /// The key within the object store.
    pub storage_key: String,
    /// The folder containing this file, if any.
    pub folder_id: Option<FolderId>,
    /// The uploading account.
    pub owner_id: UserId,
    /// When the file was uploaded.
    pub uploaded_at: DateTime<Utc>,
    /// Tombstone flag.
    pub is_deleted: bool,
    /// When the file was tombstoned.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl FileRecord {
    /// Whether the file is visible to read paths.
    pub fn is_live(&self) -> bool {
        !self.is_deleted
    }

    /// Mark the record deleted as of `now`. Idempotent.
    pub fn tombstone(&mut self, now: DateTime<Utc>) {
        if !self.is_deleted {
            self.is_deleted = true;
            self.deleted_at = Some(now);
        }
    }
}

/// Data required to create a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFile {
    /// The file name.
    pub name: String,
    /// MIME type.
    pub content_type: String,
    /// File size in bytes.
    pub size_bytes: i64,
    /// The key the bytes were uploaded under.
    pub storage_key: String,
    /// The folder to place the file in.
    pub folder_id: Option<FolderId>,
    /// The uploading account.
    pub owner_id: UserId,
}
