//! File record lifecycle with access enforcement.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use docvault_auth::acl::{AccessRequirement, PermissionResolver};
use docvault_core::error::AppError;
use docvault_core::traits::ObjectStore;
use docvault_core::types::{FileId, FolderId, UserId};
use docvault_database::store::{AccountStore, FileStore, FolderStore, PermissionStore};
use docvault_entity::file::{CreateFile, FileRecord};
use docvault_entity::permission::{AccessLevel, FilePermission};
use docvault_storage::guess_content_type;

use super::remove_blobs;
use crate::context::RequestContext;

/// Maximum file name length in characters.
pub const MAX_FILE_NAME_LEN: usize = 255;

/// Request to upload a file.
#[derive(Debug, Clone)]
pub struct UploadFileRequest {
    /// Original file name.
    pub name: String,
    /// Declared MIME type; guessed from the name when absent.
    pub content_type: Option<String>,
    /// Target folder (None for a folder-less upload).
    pub folder_id: Option<FolderId>,
    /// File content.
    pub data: Bytes,
}

/// Result of a successful upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadFileResponse {
    /// The stored record.
    pub file: FileRecord,
    /// Where the object store put the bytes.
    pub locator: String,
    /// Human-readable outcome.
    pub message: String,
}

/// Result of a successful soft delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileDeleteResponse {
    /// The deleted file.
    pub file_id: FileId,
    /// Always true.
    pub is_deleted: bool,
    /// Tombstone timestamp.
    pub deleted_at: DateTime<Utc>,
    /// Human-readable outcome.
    pub message: String,
}

/// Manages file records, their blobs and file-level grants.
#[derive(Debug, Clone)]
pub struct FileService {
    /// Account store (grant targets).
    accounts: Arc<dyn AccountStore>,
    /// Folder store.
    folders: Arc<dyn FolderStore>,
    /// File store.
    pub(crate) files: Arc<dyn FileStore>,
    /// Grant store.
    permissions: Arc<dyn PermissionStore>,
    /// Blob store.
    pub(crate) objects: Arc<dyn ObjectStore>,
    /// Permission resolver.
    pub(crate) resolver: Arc<PermissionResolver>,
    /// Upload size limit in bytes.
    max_upload_bytes: u64,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        folders: Arc<dyn FolderStore>,
        files: Arc<dyn FileStore>,
        permissions: Arc<dyn PermissionStore>,
        objects: Arc<dyn ObjectStore>,
        resolver: Arc<PermissionResolver>,
        max_upload_bytes: u64,
    ) -> Self {
        Self {
            accounts,
            folders,
            files,
            permissions,
            objects,
            resolver,
            max_upload_bytes,
        }
    }

    /// Loads a live file or fails with `NotFound`.
    pub(crate) async fn load_live_file(&self, file_id: FileId) -> Result<FileRecord, AppError> {
        match self.files.find_by_id(file_id).await? {
            Some(file) if file.is_live() => Ok(file),
            _ => Err(AppError::not_found("File not found or has been deleted.")),
        }
    }

    /// Uploads bytes and records the file.
    ///
    /// Uploading into a folder requires Admin or Editor on it. A folder-less
    /// upload grants the uploader Admin on the new file.
    pub async fn upload_file(
        &self,
        ctx: &RequestContext,
        req: UploadFileRequest,
    ) -> Result<UploadFileResponse, AppError> {
        if req.data.is_empty() {
            return Err(AppError::validation("Uploaded file is empty or missing."));
        }
        if req.data.len() as u64 > self.max_upload_bytes {
            return Err(AppError::validation(format!(
                "File exceeds the upload limit of {} bytes",
                self.max_upload_bytes
            )));
        }
        validate_file_name(&req.name)?;

        if let Some(folder_id) = req.folder_id {
            if self.folders.find_by_id(folder_id).await?.is_none() {
                return Err(AppError::not_found("Folder not found."));
            }
            self.resolver
                .require_folder_access(ctx.user_id, folder_id, AccessRequirement::Write)
                .await?;
        }

        let storage_key = format!("user-{}/{}_{}", ctx.user_id, Uuid::new_v4(), req.name);
        let content_type = req
            .content_type
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| guess_content_type(&req.name).to_string());
        let size_bytes = req.data.len() as i64;

        let locator = self.objects.upload(&storage_key, req.data).await?;

        let created = self
            .files
            .create(&CreateFile {
                name: req.name,
                content_type,
                size_bytes,
                storage_key: storage_key.clone(),
                folder_id: req.folder_id,
                owner_id: ctx.user_id,
            })
            .await;

        let mut file = match created {
            Ok(file) => file,
            Err(e) => {
                self.discard_blob(&storage_key).await;
                return Err(e);
            }
        };

        // A folder-less file is only reachable through its owner's grant.
        if file.folder_id.is_none() {
            if let Err(e) = self
                .permissions
                .upsert_file_permission(file.id, ctx.user_id, AccessLevel::Admin)
                .await
            {
                file.tombstone(Utc::now());
                if let Err(cleanup) = self.files.update(&file).await {
                    warn!(file_id = %file.id, error = %cleanup, "Failed to tombstone unreachable file");
                }
                self.discard_blob(&storage_key).await;
                return Err(e);
            }
        }

        info!(
            user_id = %ctx.user_id,
            file_id = %file.id,
            folder_id = ?file.folder_id,
            size_bytes,
            "File uploaded"
        );

        Ok(UploadFileResponse {
            file,
            locator,
            message: "File uploaded successfully.".to_string(),
        })
    }

    async fn discard_blob(&self, storage_key: &str) {
        if let Err(e) = self.objects.delete(storage_key).await {
            warn!(key = %storage_key, error = %e, "Failed to remove orphaned blob");
        }
    }

    /// Soft-deletes a file and removes its blob best-effort. Requires
    /// exactly Admin.
    pub async fn delete_file(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
    ) -> Result<FileDeleteResponse, AppError> {
        let mut file = self.load_live_file(file_id).await?;
        self.resolver
            .require_file_access(ctx.user_id, &file, AccessRequirement::Admin)
            .await?;

        file.tombstone(Utc::now());
        let file = self.files.update(&file).await?;

        remove_blobs(self.objects.as_ref(), std::slice::from_ref(&file)).await;

        info!(user_id = %ctx.user_id, file_id = %file_id, "File deleted");

        Ok(FileDeleteResponse {
            file_id: file.id,
            is_deleted: true,
            deleted_at: file.deleted_at.unwrap_or_else(Utc::now),
            message: "File deleted successfully.".to_string(),
        })
    }

    /// Lists live files in a folder (any access required), or the
    /// requester's own folder-less files when `folder_id` is `None`.
    pub async fn list_files(
        &self,
        ctx: &RequestContext,
        folder_id: Option<FolderId>,
    ) -> Result<Vec<FileRecord>, AppError> {
        match folder_id {
            Some(folder_id) => {
                if self.folders.find_by_id(folder_id).await?.is_none() {
                    return Err(AppError::not_found("Folder not found."));
                }
                self.resolver
                    .require_folder_access(ctx.user_id, folder_id, AccessRequirement::Read)
                    .await?;
                self.files.find_by_folder(folder_id).await
            }
            None => self.files.find_root_files_for_owner(ctx.user_id).await,
        }
    }

    /// Gives `target` an explicit grant on a file. Requires exactly Admin.
    pub async fn provide_file_access(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
        target: UserId,
        level: AccessLevel,
    ) -> Result<FilePermission, AppError> {
        let file = self.load_live_file(file_id).await?;
        self.resolver
            .require_file_access(ctx.user_id, &file, AccessRequirement::Admin)
            .await?;

        if self.accounts.find_by_id(target).await?.is_none() {
            return Err(AppError::not_found("User not found."));
        }

        let grant = self
            .permissions
            .upsert_file_permission(file_id, target, level)
            .await?;

        info!(
            user_id = %ctx.user_id,
            file_id = %file_id,
            target = %target,
            level = %level,
            "File access granted"
        );

        Ok(grant)
    }

    /// Removes `target`'s explicit grant on a file. Requires exactly Admin.
    pub async fn revoke_file_access(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
        target: UserId,
    ) -> Result<(), AppError> {
        let file = self.load_live_file(file_id).await?;
        self.resolver
            .require_file_access(ctx.user_id, &file, AccessRequirement::Admin)
            .await?;

        if !self.permissions.remove_file_permission(file_id, target).await? {
            return Err(AppError::not_found(
                "The user does not have explicit permission on this file.",
            ));
        }

        info!(user_id = %ctx.user_id, file_id = %file_id, target = %target, "File access revoked");
        Ok(())
    }
}

/// Rejects empty, oversized or path-like file names.
fn validate_file_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() || name.chars().count() > MAX_FILE_NAME_LEN {
        return Err(AppError::validation(format!(
            "File name must be 1-{MAX_FILE_NAME_LEN} characters"
        )));
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(AppError::validation("File name must not contain path separators"));
    }
    Ok(())
}
