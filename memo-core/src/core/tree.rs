//! Folder lifecycle and the structural invariants of the folder forest.
//!
//! Every operation validates first and mutates last, so a refused call leaves
//! the store untouched.

use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::core::store::now_millis;
use crate::{DeleteResult, Folder, MemoError, Result, Store};

impl Store {
    /// Creates a folder named `name` under `parent_id` (`None` for root) and
    /// returns its id. New folders start expanded.
    ///
    /// # Errors
    ///
    /// Returns [`MemoError::Validation`] if the trimmed name is empty, or
    /// [`MemoError::FolderNotFound`] if `parent_id` names no folder.
    pub fn create_folder(&mut self, name: &str, parent_id: Option<&str>) -> Result<String> {
        let name = validate_folder_name(name)?;
        self.ensure_folder(parent_id)?;

        let folder = Folder {
            id: Uuid::new_v4().to_string(),
            name,
            created_at: now_millis(),
            parent_id: parent_id.map(str::to_string),
            is_expanded: true,
        };
        let id = folder.id.clone();
        log::debug!("created folder '{}' ({id})", folder.name);
        self.folders.insert(id.clone(), folder);
        Ok(id)
    }

    /// Renames a folder to the trimmed `name`.
    ///
    /// # Errors
    ///
    /// Returns [`MemoError::FolderNotFound`] or [`MemoError::Validation`].
    pub fn rename_folder(&mut self, folder_id: &str, name: &str) -> Result<()> {
        self.folder(folder_id)?;
        let name = validate_folder_name(name)?;
        self.folder_mut(folder_id)?.name = name;
        Ok(())
    }

    /// Deletes `folder_id`, every descendant folder, and every note contained
    /// anywhere in that subtree.
    ///
    /// The closure is computed with an explicit worklist before anything is
    /// removed, so no partial state is ever observable.
    ///
    /// # Errors
    ///
    /// Returns [`MemoError::FolderNotFound`] if `folder_id` does not exist.
    pub fn delete_folder_cascade(&mut self, folder_id: &str) -> Result<DeleteResult> {
        self.folder(folder_id)?;

        let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
        for folder in self.folders.values() {
            if let Some(parent) = folder.parent_id.as_deref() {
                children.entry(parent).or_default().push(folder.id.as_str());
            }
        }
        for kids in children.values_mut() {
            kids.sort_unstable();
        }

        let mut visited: HashSet<&str> = HashSet::new();
        let mut deleted_folder_ids = Vec::new();
        let mut stack = vec![folder_id];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            deleted_folder_ids.push(current.to_string());
            if let Some(kids) = children.get(current) {
                stack.extend(kids.iter().rev());
            }
        }

        let mut deleted_note_ids: Vec<String> = self
            .notes
            .values()
            .filter(|n| n.folder_id.as_deref().is_some_and(|f| visited.contains(f)))
            .map(|n| n.id.clone())
            .collect();
        deleted_note_ids.sort_unstable();

        for id in &deleted_note_ids {
            self.notes.remove(id);
        }
        for id in &deleted_folder_ids {
            self.folders.remove(id);
        }

        log::debug!(
            "deleted folder {folder_id} with {} subfolders and {} notes",
            deleted_folder_ids.len() - 1,
            deleted_note_ids.len()
        );
        Ok(DeleteResult { deleted_folder_ids, deleted_note_ids })
    }

    /// Moves `folder_id` under `new_parent_id` (`None` for root).
    ///
    /// Only `parentId` changes.
    ///
    /// # Errors
    ///
    /// Returns [`MemoError::FolderNotFound`] if either folder is missing, or
    /// [`MemoError::CycleRejected`] if the target is the folder itself or one
    /// of its descendants.
    pub fn reparent_folder(&mut self, folder_id: &str, new_parent_id: Option<&str>) -> Result<()> {
        self.folder(folder_id)?;
        if let Some(target) = new_parent_id {
            self.folder(target)?;
            if target == folder_id {
                return Err(MemoError::CycleRejected(
                    "A folder cannot be moved into itself".to_string(),
                ));
            }
            if self.is_ancestor_of(folder_id, target) {
                return Err(MemoError::CycleRejected(
                    "A folder cannot be moved into one of its own subfolders".to_string(),
                ));
            }
        }

        self.folder_mut(folder_id)?.parent_id = new_parent_id.map(str::to_string);
        Ok(())
    }

    /// Flips the `isExpanded` view hint and returns the new value.
    ///
    /// # Errors
    ///
    /// Returns [`MemoError::FolderNotFound`] if `folder_id` does not exist.
    pub fn toggle_expand(&mut self, folder_id: &str) -> Result<bool> {
        let folder = self.folder_mut(folder_id)?;
        folder.is_expanded = !folder.is_expanded;
        Ok(folder.is_expanded)
    }
}

fn validate_folder_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(MemoError::Validation("Folder name cannot be empty".to_string()));
    }
    Ok(name.to_string())
}
