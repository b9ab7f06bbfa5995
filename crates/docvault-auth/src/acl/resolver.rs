//! Effective permission resolution by walking up the folder tree.
//!
//! Rules:
//! - An explicit grant on the resource wins, whatever its level.
//! - Otherwise the parent folder is consulted, then its parent, and so on.
//! - A root without a grant, or a parent that no longer exists, yields `None`.
//! - A file grant wins over anything resolved through the file's folder.
//! - A tombstoned file resolves to `None`.
//!
//! Every call reads the store; nothing is cached.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::{FileId, FolderId, UserId};
use docvault_database::store::{FileStore, FolderStore, PermissionStore};
use docvault_entity::file::FileRecord;
use docvault_entity::permission::AccessLevel;

use super::checker::AccessRequirement;

/// Resolves a user's effective access level on folders and files.
#[derive(Debug, Clone)]
pub struct PermissionResolver {
    folders: Arc<dyn FolderStore>,
    files: Arc<dyn FileStore>,
    permissions: Arc<dyn PermissionStore>,
}

impl PermissionResolver {
    /// Creates a new resolver over the given stores.
    pub fn new(
        folders: Arc<dyn FolderStore>,
        files: Arc<dyn FileStore>,
        permissions: Arc<dyn PermissionStore>,
    ) -> Self {
        Self {
            folders,
            files,
            permissions,
        }
    }

    /// Resolves the effective level of `user_id` on `folder_id`.
    ///
    /// Fails with an internal error if the parent chain loops back on itself.
    pub async fn resolve_folder_access(
        &self,
        user_id: UserId,
        folder_id: FolderId,
    ) -> AppResult<Option<AccessLevel>> {
        let mut visited = HashSet::new();
        let mut current = Some(folder_id);

        while let Some(id) = current {
            if !visited.insert(id) {
                return Err(AppError::internal(format!(
                    "Folder hierarchy contains a cycle at {id}"
                )));
            }

            let Some(folder) = self.folders.find_by_id(id).await? else {
                debug!(%user_id, %folder_id, missing = %id, "Folder chain ends at missing folder");
                return Ok(None);
            };

            if let Some(grant) = self.permissions.find_folder_permission(id, user_id).await? {
                debug!(
                    %user_id,
                    %folder_id,
                    granted_on = %id,
                    level = %grant.access_level,
                    "Resolved folder access"
                );
                return Ok(Some(grant.access_level));
            }

            current = folder.parent_id;
        }

        debug!(%user_id, %folder_id, "No folder access");
        Ok(None)
    }

    /// Resolves the effective level of `user_id` on `file_id`.
    pub async fn resolve_file_access(
        &self,
        user_id: UserId,
        file_id: FileId,
    ) -> AppResult<Option<AccessLevel>> {
        match self.files.find_by_id(file_id).await? {
            Some(file) => self.resolve_record_access(user_id, &file).await,
            None => Ok(None),
        }
    }

    /// Like [`resolve_file_access`](Self::resolve_file_access) for an
    /// already loaded record.
    pub async fn resolve_record_access(
        &self,
        user_id: UserId,
        file: &FileRecord,
    ) -> AppResult<Option<AccessLevel>> {
        if !file.is_live() {
            debug!(%user_id, file_id = %file.id, "File is tombstoned");
            return Ok(None);
        }

        if let Some(grant) = self.permissions.find_file_permission(file.id, user_id).await? {
            debug!(%user_id, file_id = %file.id, level = %grant.access_level, "Resolved file access");
            return Ok(Some(grant.access_level));
        }

        match file.folder_id {
            Some(folder_id) => self.resolve_folder_access(user_id, folder_id).await,
            None => Ok(None),
        }
    }

    /// Resolves folder access and fails with an authorization error unless
    /// `requirement` is met.
    pub async fn require_folder_access(
        &self,
        user_id: UserId,
        folder_id: FolderId,
        requirement: AccessRequirement,
    ) -> AppResult<AccessLevel> {
        let level = self.resolve_folder_access(user_id, folder_id).await?;
        match level {
            Some(level) if requirement.is_met_by(Some(level)) => Ok(level),
            _ => Err(AppError::forbidden(format!(
                "Insufficient access on folder {folder_id}: {requirement} required"
            ))),
        }
    }

    /// Resolves file access and fails with an authorization error unless
    /// `requirement` is met.
    pub async fn require_file_access(
        &self,
        user_id: UserId,
        file: &FileRecord,
        requirement: AccessRequirement,
    ) -> AppResult<AccessLevel> {
        let level = self.resolve_record_access(user_id, file).await?;
        match level {
            Some(level) if requirement.is_met_by(Some(level)) => Ok(level),
            _ => Err(AppError::forbidden(format!(
                "Insufficient access on file {}: {requirement} required",
                file.id
            ))),
        }
    }
}
