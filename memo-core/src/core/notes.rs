//! Note lifecycle bound to folder membership.

use serde::Serialize;
use uuid::Uuid;

use crate::core::note::UNTITLED;
use crate::core::store::now_millis;
use crate::{Note, Result, Store};

/// What [`Store::save_note`] did with the editor contents.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum SaveOutcome {
    /// The note was written. `created` is set on the first save of a draft.
    #[serde(rename_all = "camelCase")]
    Saved { note_id: String, saved_at: i64, created: bool },
    /// An existing note was emptied, so it was deleted instead.
    #[serde(rename_all = "camelCase")]
    Deleted { note_id: String },
    /// An empty draft; nothing was created.
    Skipped,
}

impl SaveOutcome {
    /// The id of the note that now holds the editor contents, if any.
    pub fn saved_id(&self) -> Option<&str> {
        match self {
            Self::Saved { note_id, .. } => Some(note_id.as_str()),
            Self::Deleted { .. } | Self::Skipped => None,
        }
    }
}

impl Store {
    /// Saves editor contents into note `id`, or into a new note when `id` is
    /// `None`.
    ///
    /// An existing note whose title and body are both empty is deleted; an
    /// empty draft is ignored. A new note is placed in `folder_context` and
    /// keeps that folder until explicitly moved. Titles are trimmed and an
    /// empty title is stored as [`UNTITLED`]; the body is stored verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MemoError::NoteNotFound`] if `id` names no note, or
    /// [`crate::MemoError::FolderNotFound`] if a new note's `folder_context`
    /// names no folder.
    pub fn save_note(
        &mut self,
        id: Option<&str>,
        title: &str,
        body: &str,
        folder_context: Option<&str>,
    ) -> Result<SaveOutcome> {
        let title = title.trim();
        let blank = title.is_empty() && body.is_empty();

        let now = now_millis();
        let (note_id, created) = match id {
            Some(id) => {
                self.note(id)?;
                if blank {
                    self.notes.remove(id);
                    log::debug!("emptied note {id} deleted on save");
                    return Ok(SaveOutcome::Deleted { note_id: id.to_string() });
                }
                (id.to_string(), false)
            }
            None if blank => return Ok(SaveOutcome::Skipped),
            None => {
                self.ensure_folder(folder_context)?;
                let note = Note {
                    id: Uuid::new_v4().to_string(),
                    title: String::new(),
                    body: String::new(),
                    created_at: now,
                    updated_at: None,
                    folder_id: folder_context.map(str::to_string),
                    is_liked: false,
                };
                let note_id = note.id.clone();
                self.notes.insert(note_id.clone(), note);
                (note_id, true)
            }
        };

        let note = self.note_mut(&note_id)?;
        note.title = if title.is_empty() { UNTITLED.to_string() } else { title.to_string() };
        note.body = body.to_string();
        // Clock skew must not move updatedAt backwards.
        let saved_at = note.updated_at.map_or(now, |prev| prev.max(now));
        note.updated_at = Some(saved_at);

        Ok(SaveOutcome::Saved { note_id, saved_at, created })
    }

    /// Removes a note and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MemoError::NoteNotFound`] if `id` does not exist.
    pub fn delete_note(&mut self, id: &str) -> Result<Note> {
        self.notes
            .remove(id)
            .ok_or_else(|| crate::MemoError::NoteNotFound(id.to_string()))
    }

    /// Flips `isLiked` and returns the new value.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MemoError::NoteNotFound`] if `id` does not exist.
    pub fn toggle_like(&mut self, id: &str) -> Result<bool> {
        let note = self.note_mut(id)?;
        note.is_liked = !note.is_liked;
        Ok(note.is_liked)
    }

    /// Moves a note into `new_folder_id` (`None` for the top level).
    ///
    /// Notes are leaves, so no cycle check applies.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MemoError::NoteNotFound`] if the note is missing, or
    /// [`crate::MemoError::FolderNotFound`] if the target folder is missing.
    pub fn reparent_note(&mut self, id: &str, new_folder_id: Option<&str>) -> Result<()> {
        self.note(id)?;
        self.ensure_folder(new_folder_id)?;
        self.note_mut(id)?.folder_id = new_folder_id.map(str::to_string);
        Ok(())
    }
}
