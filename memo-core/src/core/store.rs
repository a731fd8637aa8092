//! In-memory notebook state: the single source of truth for notes, folders
//! and settings.
//!
//! Mutating operations live next to the component that owns them
//! ([`tree`](super::tree) for folders, [`notes`](super::notes) for notes);
//! this module holds the maps, lookups, graph queries shared by both, and the
//! conversion to and from the storage shape.

use std::collections::{HashMap, HashSet};

use crate::{Folder, MemoError, Note, Result, Settings, Snapshot};

/// Current wall-clock time in Unix milliseconds.
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Store {
    pub(crate) notes: HashMap<String, Note>,
    pub(crate) folders: HashMap<String, Folder>,
    pub(crate) settings: Settings,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a (migrated) snapshot.
    ///
    /// References are taken as given; call [`Store::repair_references`]
    /// afterwards to restore the structural invariants on untrusted input.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let notes = snapshot
            .notes
            .into_iter()
            .map(|(id, rec)| (id.clone(), Note::from_record(id, rec)))
            .collect();
        let folders = snapshot
            .folders
            .into_iter()
            .map(|(id, rec)| (id.clone(), Folder::from_record(id, rec)))
            .collect();
        Self { notes, folders, settings: snapshot.settings }
    }

    /// A complete copy of the current state in storage shape.
    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            notes: self.notes.iter().map(|(id, n)| (id.clone(), n.to_record())).collect(),
            folders: self.folders.iter().map(|(id, f)| (id.clone(), f.to_record())).collect(),
            settings: self.settings.clone(),
        }
    }

    // ── Lookups ──────────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns [`MemoError::NoteNotFound`] if `id` is not in the store.
    pub fn note(&self, id: &str) -> Result<&Note> {
        self.notes.get(id).ok_or_else(|| MemoError::NoteNotFound(id.to_string()))
    }

    /// # Errors
    ///
    /// Returns [`MemoError::FolderNotFound`] if `id` is not in the store.
    pub fn folder(&self, id: &str) -> Result<&Folder> {
        self.folders.get(id).ok_or_else(|| MemoError::FolderNotFound(id.to_string()))
    }

    pub(crate) fn note_mut(&mut self, id: &str) -> Result<&mut Note> {
        self.notes.get_mut(id).ok_or_else(|| MemoError::NoteNotFound(id.to_string()))
    }

    pub(crate) fn folder_mut(&mut self, id: &str) -> Result<&mut Folder> {
        self.folders.get_mut(id).ok_or_else(|| MemoError::FolderNotFound(id.to_string()))
    }

    /// Succeeds for `None` (the top level) or an existing folder id.
    pub(crate) fn ensure_folder(&self, id: Option<&str>) -> Result<()> {
        match id {
            Some(id) => self.folder(id).map(|_| ()),
            None => Ok(()),
        }
    }

    pub fn notes(&self) -> impl Iterator<Item = &Note> {
        self.notes.values()
    }

    pub fn folders(&self) -> impl Iterator<Item = &Folder> {
        self.folders.values()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    pub fn folder_count(&self) -> usize {
        self.folders.len()
    }

    // ── Graph queries ────────────────────────────────────────────

    /// Iterates the ancestors of folder `of`, nearest first, ending at a root.
    ///
    /// The walk is bounded by the folder count, so it terminates even on a
    /// corrupted graph. An unknown `of` yields nothing.
    pub fn ancestors<'a>(&'a self, of: &str) -> Ancestors<'a> {
        Ancestors {
            store: self,
            next: self.folders.get(of).and_then(|f| f.parent_id.as_deref()),
            remaining: self.folders.len(),
        }
    }

    /// `true` if `candidate` lies on the parent chain of folder `of`.
    ///
    /// A folder is not its own ancestor.
    pub fn is_ancestor_of(&self, candidate: &str, of: &str) -> bool {
        self.ancestors(of).any(|f| f.id == candidate)
    }

    /// The folders from a root down to and including `id`.
    ///
    /// # Errors
    ///
    /// Returns [`MemoError::FolderNotFound`] if `id` is not in the store.
    pub fn folder_path(&self, id: &str) -> Result<Vec<&Folder>> {
        let folder = self.folder(id)?;
        let mut path: Vec<&Folder> = self.ancestors(id).collect();
        path.reverse();
        path.push(folder);
        Ok(path)
    }

    // ── Integrity ────────────────────────────────────────────────

    /// Restores the structural invariants on state that did not come from the
    /// managers: dangling `parentId`/`folderId` references are reset to the
    /// top level and folders caught in a parent cycle are detached to root.
    ///
    /// Returns the number of records changed.
    pub fn repair_references(&mut self) -> usize {
        let mut repaired = 0;

        let dangling_folders: Vec<String> = self
            .folders
            .values()
            .filter(|f| f.parent_id.as_ref().is_some_and(|p| !self.folders.contains_key(p)))
            .map(|f| f.id.clone())
            .collect();
        for id in dangling_folders {
            log::warn!("folder '{id}' referenced a missing parent; moved to root");
            if let Some(f) = self.folders.get_mut(&id) {
                f.parent_id = None;
                repaired += 1;
            }
        }

        let dangling_notes: Vec<String> = self
            .notes
            .values()
            .filter(|n| n.folder_id.as_ref().is_some_and(|f| !self.folders.contains_key(f)))
            .map(|n| n.id.clone())
            .collect();
        for id in dangling_notes {
            log::warn!("note '{id}' referenced a missing folder; moved to top level");
            if let Some(n) = self.notes.get_mut(&id) {
                n.folder_id = None;
                repaired += 1;
            }
        }

        repaired += self.break_cycles();
        repaired
    }

    /// Detaches one folder per parent cycle to root, leaving every other
    /// `parentId` in place. Folders whose chain merely leads into a cycle
    /// keep their parent.
    fn break_cycles(&mut self) -> usize {
        let mut ids: Vec<String> = self.folders.keys().cloned().collect();
        ids.sort();

        let mut done: HashSet<String> = HashSet::new();
        let mut detached = 0;
        for start in ids {
            let mut path: Vec<String> = Vec::new();
            let mut on_path: HashSet<String> = HashSet::new();
            let mut current = Some(start);
            while let Some(id) = current.take() {
                if done.contains(&id) {
                    break;
                }
                if on_path.contains(&id) {
                    log::warn!("folder '{id}' closed a parent cycle; moved to root");
                    if let Some(f) = self.folders.get_mut(&id) {
                        f.parent_id = None;
                        detached += 1;
                    }
                    break;
                }
                current = self.folders.get(&id).and_then(|f| f.parent_id.clone());
                on_path.insert(id.clone());
                path.push(id);
            }
            done.extend(path);
        }
        detached
    }
}

/// Iterator returned by [`Store::ancestors`].
pub struct Ancestors<'a> {
    store: &'a Store,
    next: Option<&'a str>,
    remaining: usize,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Folder;

    fn next(&mut self) -> Option<&'a Folder> {
        if self.remaining == 0 {
            return None;
        }
        let folder = self.store.folders.get(self.next?)?;
        self.remaining -= 1;
        self.next = folder.parent_id.as_deref();
        Some(folder)
    }
}
