//! Folder repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::types::{FolderId, UserId};
use docvault_entity::file::FileRecord;
use docvault_entity::folder::{CreateFolder, Folder, FolderChanges};

use crate::store::FolderStore;

/// Repository for folder rows and tree queries.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: PgPool,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, context, e)
}

#[async_trait]
impl FolderStore for FolderRepository {
    async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find folder"))
    }

    async fn find_children(&self, parent_id: FolderId) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE parent_id = $1 ORDER BY name ASC, id ASC",
        )
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list children"))
    }

    async fn find_descendants(&self, root_id: FolderId) -> AppResult<Vec<Folder>> {
        // UNION (not UNION ALL) so a corrupted cyclic chain still terminates.
        sqlx::query_as::<_, Folder>(
            "WITH RECURSIVE tree AS ( \
                SELECT * FROM folders WHERE parent_id = $1 \
                UNION \
                SELECT f.* FROM folders f INNER JOIN tree t ON f.parent_id = t.id \
             ) SELECT * FROM tree WHERE id != $1",
        )
        .bind(root_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list descendants"))
    }

    async fn find_roots_for_user(&self, user_id: UserId) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT f.* FROM folders f \
             INNER JOIN folder_permissions p ON p.folder_id = f.id \
             WHERE f.parent_id IS NULL AND p.user_id = $1 \
             ORDER BY f.name ASC, f.id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list root folders"))
    }

    async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (id, name, parent_id, owner_id) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(FolderId::new())
        .bind(&data.name)
        .bind(data.parent_id)
        .bind(data.owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create folder"))
    }

    async fn set_parent(&self, id: FolderId, parent_id: Option<FolderId>) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "UPDATE folders SET parent_id = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(parent_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to move folder"))?
        .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))
    }

    async fn apply_changes(&self, changes: &FolderChanges) -> AppResult<Vec<FileRecord>> {
        if changes.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        for (folder_id, user_id) in &changes.revoke {
            sqlx::query("DELETE FROM folder_permissions WHERE folder_id = $1 AND user_id = $2")
                .bind(folder_id)
                .bind(user_id)
                .execute(&mut *tx)
                .await
                .map_err(db_error("Failed to remove folder permission"))?;
        }

        if !changes.detach.is_empty() {
            sqlx::query(
                "UPDATE folders SET parent_id = NULL, updated_at = NOW() WHERE id = ANY($1)",
            )
            .bind(&changes.detach[..])
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to detach folders"))?;
        }

        let mut tombstoned = Vec::new();
        if !changes.delete.is_empty() {
            tombstoned = sqlx::query_as::<_, FileRecord>(
                "UPDATE files SET is_deleted = TRUE, deleted_at = NOW() \
                 WHERE folder_id = ANY($1) AND is_deleted = FALSE RETURNING *",
            )
            .bind(&changes.delete[..])
            .fetch_all(&mut *tx)
            .await
            .map_err(db_error("Failed to tombstone files"))?;

            sqlx::query("DELETE FROM folder_permissions WHERE folder_id = ANY($1)")
                .bind(&changes.delete[..])
                .execute(&mut *tx)
                .await
                .map_err(db_error("Failed to remove folder permissions"))?;

            sqlx::query("DELETE FROM folders WHERE id = ANY($1)")
                .bind(&changes.delete[..])
                .execute(&mut *tx)
                .await
                .map_err(db_error("Failed to delete folders"))?;
        }

        tx.commit()
            .await
            .map_err(db_error("Failed to commit folder changes"))?;

        Ok(tombstoned)
    }
}
