//! A credential store held entirely in memory.
//!
//! All four store traits share one state behind a single
//! `tokio::sync::RwLock`, so every call (including
//! [`FolderStore::apply_changes`]) is serialized against the others.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::{FileId, FolderId, UserId};
use docvault_entity::account::{Account, CreateAccount};
use docvault_entity::file::{CreateFile, FileRecord};
use docvault_entity::folder::{CreateFolder, Folder, FolderChanges};
use docvault_entity::permission::{AccessLevel, FilePermission, FolderPermission};

use crate::store::{AccountStore, FileStore, FolderStore, PermissionStore};

#[derive(Debug, Default)]
struct State {
    accounts: HashMap<UserId, Account>,
    folders: HashMap<FolderId, Folder>,
    files: HashMap<FileId, FileRecord>,
    folder_permissions: HashMap<(FolderId, UserId), FolderPermission>,
    file_permissions: HashMap<(FileId, UserId), FilePermission>,
}

impl State {
    fn email_taken(&self, email: &str, except: Option<UserId>) -> bool {
        self.accounts
            .values()
            .any(|a| Some(a.id) != except && a.email.eq_ignore_ascii_case(email))
    }

    fn remove_folder(&mut self, id: FolderId) -> bool {
        if self.folders.remove(&id).is_none() {
            return false;
        }
        self.folder_permissions.retain(|(folder, _), _| *folder != id);
        for folder in self.folders.values_mut() {
            if folder.parent_id == Some(id) {
                folder.parent_id = None;
            }
        }
        for file in self.files.values_mut() {
            if file.folder_id == Some(id) {
                file.folder_id = None;
            }
        }
        true
    }
}

/// Credential store backed by in-process maps.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_folders(mut folders: Vec<Folder>) -> Vec<Folder> {
    folders.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    folders
}

fn sorted_files(mut files: Vec<FileRecord>) -> Vec<FileRecord> {
    files.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    files
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        let state = self.state.read().await;
        Ok(state
            .accounts
            .values()
            .find(|a| a.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<Option<Account>> {
        Ok(self.state.read().await.accounts.get(&id).cloned())
    }

    async fn create(&self, data: &CreateAccount) -> AppResult<Account> {
        let mut state = self.state.write().await;
        if state.email_taken(&data.email, None) {
            return Err(AppError::conflict("User already exists."));
        }
        let account = Account {
            id: UserId::new(),
            first_name: data.first_name.clone(),
            last_name: data.last_name.clone(),
            email: data.email.clone(),
            password_hash: data.password_hash.clone(),
            password_salt: data.password_salt.clone(),
            role: data.role,
            refresh_token: None,
            refresh_token_expiry: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
        };
        state.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn update(&self, account: &Account) -> AppResult<Account> {
        let mut state = self.state.write().await;
        if !state.accounts.contains_key(&account.id) {
            return Err(AppError::not_found(format!("Account {} not found", account.id)));
        }
        if state.email_taken(&account.email, Some(account.id)) {
            return Err(AppError::conflict("Email already in use"));
        }
        let mut stored = account.clone();
        stored.updated_at = Some(Utc::now());
        state.accounts.insert(stored.id, stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl FolderStore for MemoryStore {
    async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>> {
        Ok(self.state.read().await.folders.get(&id).cloned())
    }

    async fn find_children(&self, parent_id: FolderId) -> AppResult<Vec<Folder>> {
        let state = self.state.read().await;
        Ok(sorted_folders(
            state
                .folders
                .values()
                .filter(|f| f.parent_id == Some(parent_id))
                .cloned()
                .collect(),
        ))
    }

    async fn find_descendants(&self, root_id: FolderId) -> AppResult<Vec<Folder>> {
        let state = self.state.read().await;

        let mut by_parent: HashMap<FolderId, Vec<&Folder>> = HashMap::new();
        for folder in state.folders.values() {
            if let Some(parent) = folder.parent_id {
                by_parent.entry(parent).or_default().push(folder);
            }
        }

        let mut seen = HashSet::from([root_id]);
        let mut out = Vec::new();
        let mut stack = vec![root_id];
        while let Some(current) = stack.pop() {
            for child in by_parent.get(&current).into_iter().flatten() {
                if seen.insert(child.id) {
                    out.push((*child).clone());
                    stack.push(child.id);
                }
            }
        }
        Ok(out)
    }

    async fn find_roots_for_user(&self, user_id: UserId) -> AppResult<Vec<Folder>> {
        let state = self.state.read().await;
        Ok(sorted_folders(
            state
                .folders
                .values()
                .filter(|f| {
                    f.is_root() && state.folder_permissions.contains_key(&(f.id, user_id))
                })
                .cloned()
                .collect(),
        ))
    }

    async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let folder = Folder {
            id: FolderId::new(),
            name: data.name.clone(),
            parent_id: data.parent_id,
            owner_id: data.owner_id,
            created_at: now,
            updated_at: now,
        };
        state.folders.insert(folder.id, folder.clone());
        Ok(folder)
    }

    async fn set_parent(&self, id: FolderId, parent_id: Option<FolderId>) -> AppResult<Folder> {
        let mut state = self.state.write().await;
        let folder = state
            .folders
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;
        folder.parent_id = parent_id;
        folder.updated_at = Utc::now();
        Ok(folder.clone())
    }

    async fn apply_changes(&self, changes: &FolderChanges) -> AppResult<Vec<FileRecord>> {
        if changes.is_empty() {
            return Ok(Vec::new());
        }
        let mut state = self.state.write().await;
        let now = Utc::now();

        for key in &changes.revoke {
            state.folder_permissions.remove(key);
        }

        for id in &changes.detach {
            if let Some(folder) = state.folders.get_mut(id) {
                folder.parent_id = None;
                folder.updated_at = now;
            }
        }

        let doomed: HashSet<FolderId> = changes.delete.iter().copied().collect();
        let mut tombstoned = Vec::new();
        for file in state.files.values_mut() {
            if file.is_live() && file.folder_id.is_some_and(|f| doomed.contains(&f)) {
                file.tombstone(now);
                tombstoned.push(file.clone());
            }
        }
        for id in &changes.delete {
            state.remove_folder(*id);
        }

        Ok(tombstoned)
    }
}

#[async_trait]
impl PermissionStore for MemoryStore {
    async fn find_folder_permission(
        &self,
        folder_id: FolderId,
        user_id: UserId,
    ) -> AppResult<Option<FolderPermission>> {
        let state = self.state.read().await;
        Ok(state.folder_permissions.get(&(folder_id, user_id)).cloned())
    }

    async fn list_folder_permissions(
        &self,
        folder_id: FolderId,
    ) -> AppResult<Vec<FolderPermission>> {
        let state = self.state.read().await;
        let mut grants: Vec<_> = state
            .folder_permissions
            .values()
            .filter(|p| p.folder_id == folder_id)
            .cloned()
            .collect();
        grants.sort_by_key(|p| (p.created_at, p.id));
        Ok(grants)
    }

    async fn upsert_folder_permission(
        &self,
        folder_id: FolderId,
        user_id: UserId,
        level: AccessLevel,
    ) -> AppResult<FolderPermission> {
        let mut state = self.state.write().await;
        let grant = state
            .folder_permissions
            .entry((folder_id, user_id))
            .and_modify(|p| p.access_level = level)
            .or_insert_with(|| FolderPermission::new(folder_id, user_id, level));
        Ok(grant.clone())
    }

    async fn find_file_permission(
        &self,
        file_id: FileId,
        user_id: UserId,
    ) -> AppResult<Option<FilePermission>> {
        let state = self.state.read().await;
        Ok(state.file_permissions.get(&(file_id, user_id)).cloned())
    }

    async fn upsert_file_permission(
        &self,
        file_id: FileId,
        user_id: UserId,
        level: AccessLevel,
    ) -> AppResult<FilePermission> {
        let mut state = self.state.write().await;
        let grant = state
            .file_permissions
            .entry((file_id, user_id))
            .and_modify(|p| p.access_level = level)
            .or_insert_with(|| FilePermission::new(file_id, user_id, level));
        Ok(grant.clone())
    }

    async fn remove_file_permission(&self, file_id: FileId, user_id: UserId) -> AppResult<bool> {
        let mut state = self.state.write().await;
        Ok(state.file_permissions.remove(&(file_id, user_id)).is_some())
    }
}

#[async_trait]
impl FileStore for MemoryStore {
    async fn find_by_id(&self, id: FileId) -> AppResult<Option<FileRecord>> {
        Ok(self.state.read().await.files.get(&id).cloned())
    }

    async fn find_by_folder(&self, folder_id: FolderId) -> AppResult<Vec<FileRecord>> {
        let state = self.state.read().await;
        Ok(sorted_files(
            state
                .files
                .values()
                .filter(|f| f.is_live() && f.folder_id == Some(folder_id))
                .cloned()
                .collect(),
        ))
    }

    async fn find_root_files_for_owner(&self, owner_id: UserId) -> AppResult<Vec<FileRecord>> {
        let state = self.state.read().await;
        Ok(sorted_files(
            state
                .files
                .values()
                .filter(|f| f.is_live() && f.folder_id.is_none() && f.owner_id == owner_id)
                .cloned()
                .collect(),
        ))
    }

    async fn create(&self, data: &CreateFile) -> AppResult<FileRecord> {
        let mut state = self.state.write().await;
        if state.files.values().any(|f| f.storage_key == data.storage_key) {
            return Err(AppError::conflict(format!(
                "Storage key '{}' already exists",
                data.storage_key
            )));
        }
        let file = FileRecord {
            id: FileId::new(),
            name: data.name.clone(),
            content_type: data.content_type.clone(),
            size_bytes: data.size_bytes,
            storage_key: data.storage_key.clone(),
            folder_id: data.folder_id,
            owner_id: data.owner_id,
            uploaded_at: Utc::now(),
            is_deleted: false,
            deleted_at: None,
        };
        state.files.insert(file.id, file.clone());
        Ok(file)
    }

    async fn update(&self, file: &FileRecord) -> AppResult<FileRecord> {
        let mut state = self.state.write().await;
        let stored = state
            .files
            .get_mut(&file.id)
            .ok_or_else(|| AppError::not_found(format!("File {} not found", file.id)))?;
        stored.name = file.name.clone();
        stored.content_type = file.content_type.clone();
        stored.folder_id = file.folder_id;
        stored.is_deleted = file.is_deleted;
        stored.deleted_at = file.deleted_at;
        Ok(stored.clone())
    }
}
