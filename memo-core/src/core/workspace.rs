//! High-level notebook operations over a persisted [`Store`].

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::core::config::default_export_directory;
use crate::core::export::{parse_snapshot, read_backup, to_export_json, write_backup};
use crate::{
    migrate, AppConfig, AutoSave, DeleteResult, KeyValueStore, MemoError, Note, Persistence,
    Result, SaveOutcome, Selection, Snapshot, Storage, Store,
};

/// Notification sent to subscribers after a successful operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Folders or notes were added, removed or moved.
    Structure,
    /// The contents of one note changed.
    Content { note_id: String },
    Settings,
    /// The open note or active folder may point at something that no longer
    /// exists; collaborators drop their own selection state.
    SelectionReset,
}

/// One end of a drag-and-drop gesture in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemRef<'a> {
    Folder(&'a str),
    Note(&'a str),
}

type Listener = Box<dyn FnMut(&Change) + Send>;

/// An open notebook.
///
/// `Workspace` is the primary interface for all mutations. Each operation runs
/// against a copy of the store which replaces the live one only after it has
/// been persisted, so a refused or failed call leaves state exactly as it was.
pub struct Workspace<S: KeyValueStore> {
    persistence: Persistence<S>,
    store: Store,
    selection: Selection,
    autosave: AutoSave,
    export_dir: PathBuf,
    listeners: Vec<Listener>,
}

impl Workspace<Storage> {
    /// Opens (or creates) the SQLite notebook named by `config` and applies
    /// its auto-save preferences and backup directory.
    ///
    /// # Errors
    ///
    /// Returns [`MemoError::Io`] if the data directory cannot be created, or
    /// [`MemoError::Database`] if the database cannot be opened.
    pub fn open(config: &AppConfig) -> Result<Self> {
        fs::create_dir_all(&config.data_directory)?;
        let storage = Storage::open(config.database_path())?;
        let mut workspace = Self::new(storage);
        workspace.autosave = AutoSave::new(config.auto_save, config.auto_save_delay());
        workspace.export_dir = PathBuf::from(&config.export_directory);
        Ok(workspace)
    }
}

impl<S: KeyValueStore> Workspace<S> {
    /// Loads the notebook from `backend`, migrating and repairing it.
    ///
    /// Any backfill or repair is written back immediately. If that write
    /// fails the loaded state is still served and the next successful
    /// operation persists it.
    pub fn new(backend: S) -> Self {
        let mut persistence = Persistence::new(backend);
        let mut snapshot = persistence.load();
        let migrated = migrate(&mut snapshot);

        let mut store = Store::from_snapshot(snapshot);
        let repaired = store.repair_references();
        if repaired > 0 {
            log::warn!("repaired {repaired} broken references on load");
        }
        let reset_settings = store.settings.normalize();
        if migrated || repaired > 0 || reset_settings {
            if let Err(e) = persistence.save(&store.to_snapshot()) {
                log::error!("could not persist migrated notebook: {e}");
            }
        }

        log::info!(
            "opened notebook with {} folders and {} notes",
            store.folder_count(),
            store.note_count()
        );
        Self {
            persistence,
            store,
            selection: Selection::new(),
            autosave: AutoSave::default(),
            export_dir: default_export_directory(),
            listeners: Vec::new(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn autosave(&self) -> &AutoSave {
        &self.autosave
    }

    pub fn backend(&self) -> &S {
        self.persistence.backend()
    }

    pub fn backend_mut(&mut self) -> &mut S {
        self.persistence.backend_mut()
    }

    /// Registers a callback invoked after every successful change.
    pub fn subscribe(&mut self, listener: impl FnMut(&Change) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn emit(&mut self, change: Change) {
        for listener in &mut self.listeners {
            listener(&change);
        }
    }

    /// Applies `op` to a copy of the store, persists the copy if it differs,
    /// then swaps it in. The flag reports whether anything changed.
    fn transact_changed<T>(
        &mut self,
        op: impl FnOnce(&mut Store) -> Result<T>,
    ) -> Result<(T, bool)> {
        let mut next = self.store.clone();
        let value = op(&mut next)?;
        if next == self.store {
            return Ok((value, false));
        }
        self.persistence.save(&next.to_snapshot())?;
        self.store = next;
        Ok((value, true))
    }

    fn transact<T>(&mut self, op: impl FnOnce(&mut Store) -> Result<T>) -> Result<T> {
        self.transact_changed(op).map(|(value, _)| value)
    }

    fn close_if_current(&mut self, note_id: &str) {
        if self.selection.current_note_id() == Some(note_id) {
            self.selection.new_draft();
            self.autosave.cancel();
            self.emit(Change::SelectionReset);
        }
    }

    fn refuse_under_liked_filter(&self) -> Result<()> {
        if self.selection.is_liked_filter() {
            return Err(MemoError::Validation(
                "Folders cannot be created while showing liked notes".to_string(),
            ));
        }
        Ok(())
    }

    // ── Folders ──────────────────────────────────────────────────

    /// Creates a folder under `parent_id` (`None` for root).
    ///
    /// # Errors
    ///
    /// Returns [`MemoError::Validation`] for a blank name or while the liked
    /// filter is on, [`MemoError::FolderNotFound`] for an unknown parent, or
    /// the persistence error.
    pub fn create_folder(&mut self, name: &str, parent_id: Option<&str>) -> Result<String> {
        self.refuse_under_liked_filter()?;
        let id = self.transact(|s| s.create_folder(name, parent_id))?;
        self.emit(Change::Structure);
        Ok(id)
    }

    /// Creates a folder inside the active folder.
    ///
    /// # Errors
    ///
    /// As [`Workspace::create_folder`].
    pub fn create_folder_here(&mut self, name: &str) -> Result<String> {
        let parent = self.selection.active_folder_id().map(str::to_string);
        self.create_folder(name, parent.as_deref())
    }

    /// # Errors
    ///
    /// Returns [`MemoError::FolderNotFound`], [`MemoError::Validation`] or the
    /// persistence error.
    pub fn rename_folder(&mut self, folder_id: &str, name: &str) -> Result<()> {
        let ((), changed) = self.transact_changed(|s| s.rename_folder(folder_id, name))?;
        if changed {
            self.emit(Change::Structure);
        }
        Ok(())
    }

    /// Deletes a folder with its whole subtree, closing the open note and
    /// clearing the active folder if either was removed.
    ///
    /// # Errors
    ///
    /// Returns [`MemoError::FolderNotFound`] or the persistence error.
    pub fn delete_folder(&mut self, folder_id: &str) -> Result<DeleteResult> {
        let result = self.transact(|s| s.delete_folder_cascade(folder_id))?;

        if self
            .selection
            .active_folder_id()
            .is_some_and(|id| result.contains_folder(id))
        {
            self.selection.clear_active_folder();
        }
        let closed = self
            .selection
            .current_note_id()
            .is_some_and(|id| result.contains_note(id));
        if closed {
            self.selection.new_draft();
            self.autosave.cancel();
            self.emit(Change::SelectionReset);
        }

        self.emit(Change::Structure);
        Ok(result)
    }

    /// Deletes the active folder. Returns `None` when there is nothing to
    /// delete or the liked filter is on.
    ///
    /// # Errors
    ///
    /// As [`Workspace::delete_folder`].
    pub fn delete_active_folder(&mut self) -> Result<Option<DeleteResult>> {
        if self.selection.is_liked_filter() {
            return Ok(None);
        }
        match self.selection.active_folder_id().map(str::to_string) {
            Some(id) => self.delete_folder(&id).map(Some),
            None => Ok(None),
        }
    }

    /// # Errors
    ///
    /// Returns [`MemoError::FolderNotFound`], [`MemoError::CycleRejected`] or
    /// the persistence error.
    pub fn reparent_folder(&mut self, folder_id: &str, new_parent_id: Option<&str>) -> Result<()> {
        let ((), changed) =
            self.transact_changed(|s| s.reparent_folder(folder_id, new_parent_id))?;
        if changed {
            self.emit(Change::Structure);
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`MemoError::FolderNotFound`] or the persistence error.
    pub fn toggle_expand(&mut self, folder_id: &str) -> Result<bool> {
        let expanded = self.transact(|s| s.toggle_expand(folder_id))?;
        self.emit(Change::Structure);
        Ok(expanded)
    }

    // ── Notes ────────────────────────────────────────────────────

    /// Saves editor contents; see [`Store::save_note`].
    ///
    /// # Errors
    ///
    /// Returns the store's error or the persistence error.
    pub fn save_note(
        &mut self,
        id: Option<&str>,
        title: &str,
        body: &str,
        folder_context: Option<&str>,
    ) -> Result<SaveOutcome> {
        let outcome = self.transact(|s| s.save_note(id, title, body, folder_context))?;
        match &outcome {
            SaveOutcome::Saved { note_id, created: true, .. } => {
                log::debug!("created note {note_id}");
                self.emit(Change::Structure);
            }
            SaveOutcome::Saved { note_id, .. } => {
                let change = Change::Content { note_id: note_id.clone() };
                self.emit(change);
            }
            SaveOutcome::Deleted { note_id } => {
                let note_id = note_id.clone();
                self.close_if_current(&note_id);
                self.emit(Change::Structure);
            }
            SaveOutcome::Skipped => {}
        }
        Ok(outcome)
    }

    /// Saves the editor into the open note, or creates one in the current
    /// folder context. A newly created note becomes the open note.
    ///
    /// # Errors
    ///
    /// As [`Workspace::save_note`].
    pub fn save_current(&mut self, title: &str, body: &str) -> Result<SaveOutcome> {
        let id = self.selection.current_note_id().map(str::to_string);
        let context = self.selection.folder_context().map(str::to_string);
        let outcome = self.save_note(id.as_deref(), title, body, context.as_deref())?;

        if let SaveOutcome::Saved { note_id, created: true, .. } = &outcome {
            let folder = self.store.note(note_id)?.folder_id.clone();
            self.selection.open_note(note_id, folder.as_deref());
        }
        self.autosave.cancel();
        Ok(outcome)
    }

    /// # Errors
    ///
    /// Returns [`MemoError::NoteNotFound`] or the persistence error.
    pub fn delete_note(&mut self, note_id: &str) -> Result<Note> {
        let note = self.transact(|s| s.delete_note(note_id))?;
        self.close_if_current(note_id);
        self.emit(Change::Structure);
        Ok(note)
    }

    /// Deletes the open note, if any.
    ///
    /// # Errors
    ///
    /// As [`Workspace::delete_note`].
    pub fn delete_current(&mut self) -> Result<Option<Note>> {
        match self.selection.current_note_id().map(str::to_string) {
            Some(id) => self.delete_note(&id).map(Some),
            None => Ok(None),
        }
    }

    /// # Errors
    ///
    /// Returns [`MemoError::NoteNotFound`] or the persistence error.
    pub fn toggle_like(&mut self, note_id: &str) -> Result<bool> {
        let liked = self.transact(|s| s.toggle_like(note_id))?;
        self.emit(Change::Content { note_id: note_id.to_string() });
        Ok(liked)
    }

    /// # Errors
    ///
    /// Returns [`MemoError::NoteNotFound`], [`MemoError::FolderNotFound`] or
    /// the persistence error.
    pub fn reparent_note(&mut self, note_id: &str, new_folder_id: Option<&str>) -> Result<()> {
        let ((), changed) =
            self.transact_changed(|s| s.reparent_note(note_id, new_folder_id))?;
        if changed {
            self.emit(Change::Structure);
        }
        Ok(())
    }

    /// Resolves a sidebar drop of `dragged` onto `target`.
    ///
    /// A note dropped on a folder moves into it; on another note it joins
    /// that note's folder. A folder dropped on a folder moves under it; on a
    /// note it moves under that note's folder. Dropping an item on itself, or
    /// any drop while the liked filter is on, does nothing.
    ///
    /// Returns `true` if anything moved; a drop that leaves the item where it
    /// already was returns `false`.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for unknown ids, [`MemoError::CycleRejected`]
    /// if a folder would land inside itself, or the persistence error.
    pub fn move_item(&mut self, dragged: ItemRef<'_>, target: ItemRef<'_>) -> Result<bool> {
        if self.selection.is_liked_filter() || dragged == target {
            return Ok(false);
        }
        let ((), moved) = self.transact_changed(|s| match (dragged, target) {
            (ItemRef::Note(id), ItemRef::Folder(folder)) => s.reparent_note(id, Some(folder)),
            (ItemRef::Note(id), ItemRef::Note(other)) => {
                let folder = s.note(other)?.folder_id.clone();
                s.reparent_note(id, folder.as_deref())
            }
            (ItemRef::Folder(id), ItemRef::Folder(parent)) => s.reparent_folder(id, Some(parent)),
            (ItemRef::Folder(id), ItemRef::Note(other)) => {
                let parent = s.note(other)?.folder_id.clone();
                s.reparent_folder(id, parent.as_deref())
            }
        })?;
        if moved {
            self.emit(Change::Structure);
        }
        Ok(moved)
    }

    // ── Selection ────────────────────────────────────────────────

    /// Opens a note in the editor, dropping any pending auto-save.
    ///
    /// # Errors
    ///
    /// Returns [`MemoError::NoteNotFound`] if `note_id` does not exist.
    pub fn open_note(&mut self, note_id: &str) -> Result<&Note> {
        let folder = self.store.note(note_id)?.folder_id.clone();
        self.autosave.cancel();
        self.selection.open_note(note_id, folder.as_deref());
        self.store.note(note_id)
    }

    /// Starts an empty draft, dropping any pending auto-save.
    pub fn new_draft(&mut self) {
        self.autosave.cancel();
        self.selection.new_draft();
    }

    /// Toggles `folder_id` as the active folder. Returns `false` if ignored
    /// because the liked filter is on.
    ///
    /// # Errors
    ///
    /// Returns [`MemoError::FolderNotFound`] if `folder_id` does not exist.
    pub fn set_active_folder(&mut self, folder_id: &str) -> Result<bool> {
        self.store.folder(folder_id)?;
        Ok(self.selection.set_active_folder(folder_id))
    }

    /// Flips the liked-only filter; enabling it closes the open note.
    pub fn toggle_liked_filter(&mut self) -> bool {
        let had_note = self.selection.current_note_id().is_some();
        let on = self.selection.toggle_liked_filter();
        if on && had_note {
            self.autosave.cancel();
            self.emit(Change::SelectionReset);
        }
        on
    }

    // ── Settings ─────────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns the persistence error.
    pub fn toggle_dark_mode(&mut self) -> Result<bool> {
        let dark = self.transact(|s| {
            s.settings.is_dark_mode = !s.settings.is_dark_mode;
            Ok(s.settings.is_dark_mode)
        })?;
        self.emit(Change::Settings);
        Ok(dark)
    }

    /// # Errors
    ///
    /// Returns [`MemoError::Validation`] for an unsupported family or size, or
    /// the persistence error.
    pub fn update_font(&mut self, font_family: &str, font_size: &str) -> Result<()> {
        let ((), changed) =
            self.transact_changed(|s| s.settings.set_font(font_family, font_size))?;
        if changed {
            self.emit(Change::Settings);
        }
        Ok(())
    }

    // ── Auto-save ────────────────────────────────────────────────

    /// Records an editor keystroke at `now`.
    pub fn note_edited(&mut self, now: Instant) {
        self.autosave.touch(now);
    }

    /// Saves the editor if the auto-save quiet period has elapsed.
    ///
    /// # Errors
    ///
    /// As [`Workspace::save_current`].
    pub fn poll_auto_save(&mut self, now: Instant, title: &str, body: &str) -> Result<Option<SaveOutcome>> {
        if self.autosave.poll(now) {
            return self.save_current(title, body).map(Some);
        }
        Ok(None)
    }

    /// Turns auto-save on or off. Turning it on saves the editor right away.
    ///
    /// # Errors
    ///
    /// As [`Workspace::save_current`].
    pub fn set_auto_save(&mut self, enabled: bool, title: &str, body: &str) -> Result<Option<SaveOutcome>> {
        self.autosave.set_enabled(enabled);
        if enabled {
            return self.save_current(title, body).map(Some);
        }
        Ok(None)
    }

    // ── Import / export ──────────────────────────────────────────

    /// A complete copy of the notebook.
    pub fn export_snapshot(&self) -> Snapshot {
        self.store.to_snapshot()
    }

    /// # Errors
    ///
    /// Returns [`MemoError::Json`] if serialisation fails.
    pub fn export_json(&self) -> Result<String> {
        to_export_json(&self.export_snapshot())
    }

    /// Writes a dated backup file into `dir` and returns its path.
    ///
    /// # Errors
    ///
    /// Returns [`MemoError::Io`] or [`MemoError::Json`].
    pub fn export_to_directory(&self, dir: &Path) -> Result<PathBuf> {
        write_backup(dir, &self.export_snapshot())
    }

    /// Directory [`Workspace::export_backup`] writes to; taken from
    /// [`AppConfig::export_directory`] when opened from a config.
    pub fn export_directory(&self) -> &Path {
        &self.export_dir
    }

    /// Writes a dated backup file into the configured export directory.
    ///
    /// # Errors
    ///
    /// As [`Workspace::export_to_directory`].
    pub fn export_backup(&self) -> Result<PathBuf> {
        self.export_to_directory(&self.export_dir)
    }

    /// Replaces the whole notebook with the backup text in `raw`.
    ///
    /// Older backups are migrated and broken references repaired. On success
    /// the selection is cleared.
    ///
    /// # Errors
    ///
    /// Returns [`MemoError::Parse`] or [`MemoError::InvalidFormat`] for bad
    /// input, or the persistence error. The notebook is unchanged on error.
    pub fn import_snapshot(&mut self, raw: &str) -> Result<()> {
        self.replace_with(parse_snapshot(raw)?)
    }

    /// Reads a backup file and imports it.
    ///
    /// # Errors
    ///
    /// Returns [`MemoError::Io`] if the file cannot be read, otherwise as
    /// [`Workspace::import_snapshot`].
    pub fn import_file(&mut self, path: &Path) -> Result<()> {
        self.replace_with(read_backup(path)?)
    }

    fn replace_with(&mut self, mut snapshot: Snapshot) -> Result<()> {
        migrate(&mut snapshot);
        let mut next = Store::from_snapshot(snapshot);
        let repaired = next.repair_references();
        if repaired > 0 {
            log::warn!("repaired {repaired} broken references in imported data");
        }
        next.settings.normalize();
        self.persistence.save(&next.to_snapshot())?;
        self.store = next;

        log::info!(
            "imported {} folders and {} notes",
            self.store.folder_count(),
            self.store.note_count()
        );
        self.selection.reset();
        self.autosave.cancel();
        self.emit(Change::SelectionReset);
        self.emit(Change::Structure);
        self.emit(Change::Settings);
        Ok(())
    }
}
