//! Folder creation, reads and structural mutations with access enforcement.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use docvault_auth::acl::{AccessRequirement, PermissionResolver};
use docvault_core::error::AppError;
use docvault_core::traits::ObjectStore;
use docvault_core::types::FolderId;
use docvault_database::store::{AccountStore, FileStore, FolderStore, PermissionStore};
use docvault_entity::folder::{CreateFolder, Folder, FolderArena, FolderView};
use docvault_entity::permission::AccessLevel;

use crate::context::RequestContext;
use crate::file::remove_blobs;

/// Maximum folder name length in characters.
pub const MAX_FOLDER_NAME_LEN: usize = 50;

/// Request to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolderRequest {
    /// Folder name.
    pub name: String,
    /// Parent folder ID (None for a root folder).
    pub parent_id: Option<FolderId>,
}

/// Manages the folder tree and explicit folder grants.
#[derive(Debug, Clone)]
pub struct FolderService {
    /// Account store (grant targets).
    pub(crate) accounts: Arc<dyn AccountStore>,
    /// Folder store.
    pub(crate) folders: Arc<dyn FolderStore>,
    /// File store.
    pub(crate) files: Arc<dyn FileStore>,
    /// Grant store.
    pub(crate) permissions: Arc<dyn PermissionStore>,
    /// Blob store, for cleanup after deletes.
    pub(crate) objects: Arc<dyn ObjectStore>,
    /// Permission resolver.
    pub(crate) resolver: Arc<PermissionResolver>,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        folders: Arc<dyn FolderStore>,
        files: Arc<dyn FileStore>,
        permissions: Arc<dyn PermissionStore>,
        objects: Arc<dyn ObjectStore>,
        resolver: Arc<PermissionResolver>,
    ) -> Self {
        Self {
            accounts,
            folders,
            files,
            permissions,
            objects,
            resolver,
        }
    }

    /// Loads a folder or fails with `NotFound`.
    pub(crate) async fn load_folder(&self, folder_id: FolderId) -> Result<Folder, AppError> {
        self.folders
            .find_by_id(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found."))
    }

    /// Creates a folder and grants the requester Admin on it.
    ///
    /// With a parent, the requester must hold Admin or Editor on it; the
    /// check happens before anything is written.
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        req: CreateFolderRequest,
    ) -> Result<Folder, AppError> {
        let name_len = req.name.chars().count();
        if req.name.trim().is_empty() || name_len > MAX_FOLDER_NAME_LEN {
            return Err(AppError::validation(format!(
                "Folder name must be 1-{MAX_FOLDER_NAME_LEN} characters"
            )));
        }

        if let Some(parent_id) = req.parent_id {
            self.load_folder(parent_id).await?;
            self.resolver
                .require_folder_access(ctx.user_id, parent_id, AccessRequirement::Write)
                .await?;
        }

        let folder = self
            .folders
            .create(&CreateFolder {
                name: req.name,
                parent_id: req.parent_id,
                owner_id: ctx.user_id,
            })
            .await?;

        self.permissions
            .upsert_folder_permission(folder.id, ctx.user_id, AccessLevel::Admin)
            .await?;

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder.id,
            parent_id = ?folder.parent_id,
            "Folder created"
        );

        Ok(folder)
    }

    /// Returns a folder with its immediate subfolders and live files.
    ///
    /// Any resolvable access level suffices.
    pub async fn get_folder(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
    ) -> Result<FolderView, AppError> {
        let folder = self.load_folder(folder_id).await?;
        self.resolver
            .require_folder_access(ctx.user_id, folder_id, AccessRequirement::Read)
            .await?;

        self.view(folder).await
    }

    /// Returns every root folder the requester holds an explicit grant on,
    /// each with its immediate contents.
    pub async fn get_root_folders(&self, ctx: &RequestContext) -> Result<Vec<FolderView>, AppError> {
        let roots = self.folders.find_roots_for_user(ctx.user_id).await?;

        let mut views = Vec::with_capacity(roots.len());
        for folder in roots {
            views.push(self.view(folder).await?);
        }
        Ok(views)
    }

    async fn view(&self, folder: Folder) -> Result<FolderView, AppError> {
        let subfolders = self.folders.find_children(folder.id).await?;
        let files = self.files.find_by_folder(folder.id).await?;
        Ok(FolderView {
            folder,
            subfolders,
            files,
        })
    }

    /// Deletes a folder. Requires exactly Admin.
    ///
    /// Descendants created by the folder's creator are deleted with it;
    /// every other direct child of a deleted folder becomes a root. The
    /// whole change is committed in one store call, then the blobs of the
    /// files it tombstoned are removed best-effort.
    pub async fn delete_folder(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
    ) -> Result<(), AppError> {
        let folder = self.load_folder(folder_id).await?;
        self.resolver
            .require_folder_access(ctx.user_id, folder_id, AccessRequirement::Admin)
            .await?;

        let creator = folder.owner_id;
        let descendants = self.folders.find_descendants(folder_id).await?;
        let changes = FolderArena::build(folder, descendants).plan_delete(creator);

        let tombstoned = self.folders.apply_changes(&changes).await?;

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder_id,
            deleted = changes.delete.len(),
            detached = changes.detach.len(),
            files = tombstoned.len(),
            "Folder deleted"
        );

        remove_blobs(self.objects.as_ref(), &tombstoned).await;
        Ok(())
    }

    /// Moves a folder under a new parent, or to the root when `new_parent`
    /// is `None`.
    ///
    /// Requires exactly Admin on the folder and Admin or Editor on the new
    /// parent. Rejects moves into the folder itself or its own subtree.
    pub async fn move_folder(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
        new_parent: Option<FolderId>,
    ) -> Result<Folder, AppError> {
        self.load_folder(folder_id).await?;
        self.resolver
            .require_folder_access(ctx.user_id, folder_id, AccessRequirement::Admin)
            .await?;

        if let Some(parent_id) = new_parent {
            self.load_folder(parent_id).await?;
            self.resolver
                .require_folder_access(ctx.user_id, parent_id, AccessRequirement::Write)
                .await?;
            self.ensure_not_within(folder_id, parent_id).await?;
        }

        let moved = self.folders.set_parent(folder_id, new_parent).await?;

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder_id,
            new_parent = ?new_parent,
            "Folder moved"
        );

        Ok(moved)
    }

    /// Walks up from `target` and fails if `folder_id` is on the path.
    async fn ensure_not_within(&self, folder_id: FolderId, target: FolderId) -> Result<(), AppError> {
        let mut visited = HashSet::new();
        let mut current = Some(target);

        while let Some(id) = current {
            if id == folder_id {
                return Err(AppError::validation(
                    "A folder cannot be moved into itself or one of its subfolders",
                ));
            }
            if !visited.insert(id) {
                return Err(AppError::internal(format!(
                    "Folder hierarchy contains a cycle at {id}"
                )));
            }
            current = match self.folders.find_by_id(id).await? {
                Some(folder) => folder.parent_id,
                None => None,
            };
        }

        Ok(())
    }
}
