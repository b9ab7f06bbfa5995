//! Granting and revoking explicit folder access.

use tracing::info;

use docvault_auth::acl::AccessRequirement;
use docvault_core::error::AppError;
use docvault_core::types::{FolderId, UserId};
use docvault_entity::folder::FolderArena;
use docvault_entity::permission::{AccessLevel, FolderPermission};

use super::service::FolderService;
use crate::context::RequestContext;

impl FolderService {
    /// Gives `target` an explicit grant on a folder, replacing any
    /// existing one. Requires exactly Admin.
    pub async fn provide_folder_access(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
        target: UserId,
        level: AccessLevel,
    ) -> Result<FolderPermission, AppError> {
        self.load_folder(folder_id).await?;
        self.resolver
            .require_folder_access(ctx.user_id, folder_id, AccessRequirement::Admin)
            .await?;

        if self.accounts.find_by_id(target).await?.is_none() {
            return Err(AppError::not_found("User not found."));
        }

        let grant = self
            .permissions
            .upsert_folder_permission(folder_id, target, level)
            .await?;

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder_id,
            target = %target,
            level = %level,
            "Folder access granted"
        );

        Ok(grant)
    }

    /// Removes `target`'s explicit grant on a folder and detaches every
    /// subfolder below it that `target` created. Requires exactly Admin,
    /// inherited or explicit.
    pub async fn revoke_folder_access(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
        target: UserId,
    ) -> Result<(), AppError> {
        let folder = self.load_folder(folder_id).await?;
        self.resolver
            .require_folder_access(ctx.user_id, folder_id, AccessRequirement::Admin)
            .await?;

        if self
            .permissions
            .find_folder_permission(folder_id, target)
            .await?
            .is_none()
        {
            return Err(AppError::not_found(
                "The user does not have explicit permission on this folder.",
            ));
        }

        let descendants = self.folders.find_descendants(folder_id).await?;
        let mut changes = FolderArena::build(folder, descendants).plan_detach_owned_by(target);
        changes.revoke.push((folder_id, target));

        self.folders.apply_changes(&changes).await?;

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder_id,
            target = %target,
            detached = changes.detach.len(),
            "Folder access revoked"
        );

        Ok(())
    }

    /// Lists the explicit grants on a folder. Requires exactly Admin.
    pub async fn list_folder_access(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
    ) -> Result<Vec<FolderPermission>, AppError> {
        self.load_folder(folder_id).await?;
        self.resolver
            .require_folder_access(ctx.user_id, folder_id, AccessRequirement::Admin)
            .await?;

        self.permissions.list_folder_permissions(folder_id).await
    }
}
