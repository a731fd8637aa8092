//! Editor and sidebar selection: the open note, the active folder and the
//! liked-only filter.
//!
//! The selection decides where new notes and folders land. It holds ids only
//! and never validates them against the store; the workspace clears entries
//! that a mutation made stale.

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    current_note_id: Option<String>,
    active_folder_id: Option<String>,
    liked_filter: bool,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// The note open in the editor, or `None` for an unsaved draft.
    pub fn current_note_id(&self) -> Option<&str> {
        self.current_note_id.as_deref()
    }

    pub fn active_folder_id(&self) -> Option<&str> {
        self.active_folder_id.as_deref()
    }

    pub fn is_liked_filter(&self) -> bool {
        self.liked_filter
    }

    /// Where a note created from the current draft is placed: nowhere while
    /// the liked filter is on, otherwise the active folder.
    pub fn folder_context(&self) -> Option<&str> {
        if self.liked_filter {
            None
        } else {
            self.active_folder_id()
        }
    }

    /// Activates `folder_id`, or clears it if it is already active.
    ///
    /// Ignored while the liked filter is on. Returns `true` if the selection
    /// changed.
    pub fn set_active_folder(&mut self, folder_id: &str) -> bool {
        if self.liked_filter {
            return false;
        }
        if self.active_folder_id.as_deref() == Some(folder_id) {
            self.active_folder_id = None;
        } else {
            self.active_folder_id = Some(folder_id.to_string());
        }
        true
    }

    /// Flips the liked-only filter and returns the new value.
    ///
    /// Turning the filter on clears the active folder and closes the open
    /// note.
    pub fn toggle_liked_filter(&mut self) -> bool {
        self.liked_filter = !self.liked_filter;
        if self.liked_filter {
            self.active_folder_id = None;
            self.current_note_id = None;
        }
        self.liked_filter
    }

    /// Opens `note_id` in the editor. Unless the liked filter is on, the
    /// note's folder becomes the active folder.
    pub fn open_note(&mut self, note_id: &str, folder_id: Option<&str>) {
        self.current_note_id = Some(note_id.to_string());
        if !self.liked_filter {
            self.active_folder_id = folder_id.map(str::to_string);
        }
    }

    /// Closes the open note so the editor shows an empty draft.
    pub fn new_draft(&mut self) {
        self.current_note_id = None;
    }

    pub fn clear_active_folder(&mut self) {
        self.active_folder_id = None;
    }

    /// Drops both the open note and the active folder, keeping the filter.
    pub fn reset(&mut self) {
        self.current_note_id = None;
        self.active_folder_id = None;
    }
}
