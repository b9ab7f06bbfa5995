//! Explicit grant repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::types::{FileId, FolderId, PermissionId, UserId};
use docvault_entity::permission::{AccessLevel, FilePermission, FolderPermission};

use crate::store::PermissionStore;

/// Repository for folder and file grant rows.
#[derive(Debug, Clone)]
pub struct PermissionRepository {
    pool: PgPool,
}

impl PermissionRepository {
    /// Create a new permission repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PermissionStore for PermissionRepository {
    async fn find_folder_permission(
        &self,
        folder_id: FolderId,
        user_id: UserId,
    ) -> AppResult<Option<FolderPermission>> {
        sqlx::query_as::<_, FolderPermission>(
            "SELECT * FROM folder_permissions WHERE folder_id = $1 AND user_id = $2",
        )
        .bind(folder_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find folder permission", e)
        })
    }

    async fn list_folder_permissions(
        &self,
        folder_id: FolderId,
    ) -> AppResult<Vec<FolderPermission>> {
        sqlx::query_as::<_, FolderPermission>(
            "SELECT * FROM folder_permissions WHERE folder_id = $1 ORDER BY created_at ASC",
        )
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list folder permissions", e)
        })
    }

    async fn upsert_folder_permission(
        &self,
        folder_id: FolderId,
        user_id: UserId,
        level: AccessLevel,
    ) -> AppResult<FolderPermission> {
        sqlx::query_as::<_, FolderPermission>(
            "INSERT INTO folder_permissions (id, folder_id, user_id, access_level) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (folder_id, user_id) DO UPDATE SET access_level = EXCLUDED.access_level \
             RETURNING *",
        )
        .bind(PermissionId::new())
        .bind(folder_id)
        .bind(user_id)
        .bind(level)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to upsert folder permission", e)
        })
    }

    async fn find_file_permission(
        &self,
        file_id: FileId,
        user_id: UserId,
    ) -> AppResult<Option<FilePermission>> {
        sqlx::query_as::<_, FilePermission>(
            "SELECT * FROM file_permissions WHERE file_id = $1 AND user_id = $2",
        )
        .bind(file_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find file permission", e)
        })
    }

    async fn upsert_file_permission(
        &self,
        file_id: FileId,
        user_id: UserId,
        level: AccessLevel,
    ) -> AppResult<FilePermission> {
        sqlx::query_as::<_, FilePermission>(
            "INSERT INTO file_permissions (id, file_id, user_id, access_level) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (file_id, user_id) DO UPDATE SET access_level = EXCLUDED.access_level \
             RETURNING *",
        )
        .bind(PermissionId::new())
        .bind(file_id)
        .bind(user_id)
        .bind(level)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to upsert file permission", e)
        })
    }

    async fn remove_file_permission(&self, file_id: FileId, user_id: UserId) -> AppResult<bool> {
        let result =
            sqlx::query("DELETE FROM file_permissions WHERE file_id = $1 AND user_id = $2")
                .bind(file_id)
                .bind(user_id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to remove file permission", e)
                })?;
        Ok(result.rows_affected() > 0)
    }
}
