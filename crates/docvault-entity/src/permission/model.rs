//! Explicit permission grant rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use docvault_core::types::{FileId, FolderId, PermissionId, UserId};

use super::level::AccessLevel;

/// An explicit grant of an access level to a user on a folder.
///
/// At most one row exists per `(folder_id, user_id)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct FolderPermission {
    /// Unique grant identifier.
    pub id: PermissionId,
    /// The folder the grant applies to.
    pub folder_id: FolderId,
    /// The user receiving access.
    pub user_id: UserId,
    /// The granted level.
    pub access_level: AccessLevel,
    /// When the grant was first written.
    pub created_at: DateTime<Utc>,
}

impl FolderPermission {
    /// Build a new grant row with a fresh identifier.
    pub fn new(folder_id: FolderId, user_id: UserId, access_level: AccessLevel) -> Self {
        Self {
            id: PermissionId::new(),
            folder_id,
            user_id,
            access_level,
            created_at: Utc::now(),
        }
    }
}

/// An explicit grant of an access level to a user on a single file.
///
/// When present it overrides anything resolvable through the file's folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct FilePermission {
    /// Unique grant identifier.
    pub id: PermissionId,
    /// The file the grant applies to.
    pub file_id: FileId,
    /// The user receiving access.
    pub user_id: UserId,
    /// The granted level.
    pub access_level: AccessLevel,
    /// When the grant was first written.
    pub created_at: DateTime<Utc>,
}

impl FilePermission {
    /// Build a new grant row with a fresh identifier.
    pub fn new(file_id: FileId, user_id: UserId, access_level: AccessLevel) -> Self {
        Self {
            id: PermissionId::new(),
            file_id,
            user_id,
            access_level,
            created_at: Utc::now(),
        }
    }
}
