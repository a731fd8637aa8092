//! Folder records: the typed [`Folder`] and its storage shape [`FolderRecord`].

use serde::{Deserialize, Serialize};

use crate::core::snapshot::deserialize_present;

/// A hierarchical container node for notes and other folders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    /// Trimmed, never empty for folders created through the tree manager.
    pub name: String,
    pub created_at: i64,
    /// Parent folder, or `None` for a root folder.
    pub parent_id: Option<String>,
    /// Presentation hint; has no effect on containment.
    pub is_expanded: bool,
}

impl Folder {
    /// Builds a typed folder from a stored record, applying schema defaults.
    pub fn from_record(id: String, record: FolderRecord) -> Self {
        Self {
            id,
            name: record.name,
            created_at: record.created_at,
            parent_id: record.parent_id.flatten(),
            is_expanded: record.is_expanded.unwrap_or(true),
        }
    }

    pub fn to_record(&self) -> FolderRecord {
        FolderRecord {
            name: self.name.clone(),
            created_at: self.created_at,
            parent_id: Some(self.parent_id.clone()),
            is_expanded: Some(self.is_expanded),
        }
    }
}

/// A folder exactly as loaded from storage or a backup file.
///
/// See [`NoteRecord`](crate::NoteRecord) for the meaning of the nested options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub created_at: i64,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_id: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_expanded: Option<bool>,
}
