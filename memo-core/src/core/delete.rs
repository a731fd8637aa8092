//! Result type for cascading folder removal.
//!
//! Serialised in camelCase (`deletedFolderIds`, `deletedNoteIds`) like every
//! other value handed to presentation collaborators.

use serde::{Deserialize, Serialize};

/// The outcome of [`Store::delete_folder_cascade`](crate::Store::delete_folder_cascade).
///
/// Lists every record removed, so collaborators can drop selections that
/// pointed into the deleted subtree.
///
/// # Examples
///
/// ```rust
/// use memo_core::DeleteResult;
///
/// let result = DeleteResult {
///     deleted_folder_ids: vec!["work".to_string(), "projects".to_string()],
///     deleted_note_ids: vec!["plan".to_string()],
/// };
/// assert!(result.contains_note("plan"));
/// assert_eq!(result.deleted_count(), 3);
/// let json = serde_json::to_string(&result).unwrap();
/// assert!(json.contains("deletedFolderIds"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    /// The target folder first, then every descendant folder.
    pub deleted_folder_ids: Vec<String>,

    /// Every note that lived in the target folder or any descendant.
    pub deleted_note_ids: Vec<String>,
}

impl DeleteResult {
    /// Total number of records removed.
    pub fn deleted_count(&self) -> usize {
        self.deleted_folder_ids.len() + self.deleted_note_ids.len()
    }

    pub fn contains_note(&self, note_id: &str) -> bool {
        self.deleted_note_ids.iter().any(|id| id == note_id)
    }

    pub fn contains_folder(&self, folder_id: &str) -> bool {
        self.deleted_folder_ids.iter().any(|id| id == folder_id)
    }
}
