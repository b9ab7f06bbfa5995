//! Arena indexing of a folder subtree and the change set computed from it.
//!
//! A subtree is fetched from the store in one call and indexed here so
//! that structural walks run on an explicit stack instead of recursing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use docvault_core::types::{FolderId, UserId};

use super::model::Folder;

/// A folder subtree indexed by id, with child lists per node.
#[derive(Debug, Clone)]
pub struct FolderArena {
    root: FolderId,
    nodes: HashMap<FolderId, Folder>,
    children: HashMap<FolderId, Vec<FolderId>>,
}

impl FolderArena {
    /// Index `root` and its `descendants` (in any order).
    ///
    /// Descendants whose parent is not part of the arena are ignored.
    pub fn build(root: Folder, descendants: Vec<Folder>) -> Self {
        let root_id = root.id;
        let mut nodes = HashMap::with_capacity(descendants.len() + 1);
        nodes.insert(root_id, root);
        for folder in descendants {
            nodes.insert(folder.id, folder);
        }

        let mut children: HashMap<FolderId, Vec<FolderId>> = HashMap::new();
        for folder in nodes.values() {
            if folder.id == root_id {
                continue;
            }
            if let Some(parent) = folder.parent_id {
                if nodes.contains_key(&parent) {
                    children.entry(parent).or_default().push(folder.id);
                }
            }
        }
        for list in children.values_mut() {
            list.sort();
        }

        Self {
            root: root_id,
            nodes,
            children,
        }
    }

    /// Direct children of `id` within the arena.
    fn children(&self, id: &FolderId) -> &[FolderId] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Plan the removal of the root.
    ///
    /// Children created by `creator` are removed together with their own
    /// children (processed the same way); any other child is detached and
    /// becomes a root. Deleted ids are listed parents first.
    pub fn plan_delete(&self, creator: UserId) -> FolderChanges {
        let mut changes = FolderChanges::default();
        let mut stack = vec![self.root];

        while let Some(current) = stack.pop() {
            changes.delete.push(current);
            for child in self.children(&current) {
                let Some(node) = self.nodes.get(child) else {
                    continue;
                };
                if node.owner_id == creator {
                    stack.push(*child);
                } else {
                    changes.detach.push(*child);
                }
            }
        }

        changes
    }

    /// Plan the detachment of every descendant subtree created by `user`.
    ///
    /// Descent stops at a detached folder; other folders are walked further.
    /// The root itself is never detached.
    pub fn plan_detach_owned_by(&self, user: UserId) -> FolderChanges {
        let mut changes = FolderChanges::default();
        let mut stack = vec![self.root];

        while let Some(current) = stack.pop() {
            for child in self.children(&current) {
                let Some(node) = self.nodes.get(child) else {
                    continue;
                };
                if node.owner_id == user {
                    changes.detach.push(*child);
                } else {
                    stack.push(*child);
                }
            }
        }

        changes
    }
}

/// A set of structural changes committed to the store as one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderChanges {
    /// Folders whose parent is set to None.
    pub detach: Vec<FolderId>,
    /// Folders removed, with their grants; their files are tombstoned.
    pub delete: Vec<FolderId>,
    /// Explicit folder grants `(folder, user)` removed.
    pub revoke: Vec<(FolderId, UserId)>,
}

impl FolderChanges {
    /// Whether applying this change set would touch nothing.
    pub fn is_empty(&self) -> bool {
        self.detach.is_empty() && self.delete.is_empty() && self.revoke.is_empty()
    }
}
