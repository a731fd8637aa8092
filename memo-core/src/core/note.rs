//! Note records: the typed [`Note`] served to managers and the loosely-typed
//! [`NoteRecord`] as it appears in storage and backup files.

use serde::{Deserialize, Serialize};

use crate::core::snapshot::deserialize_present;

/// Title stored when a note is saved with an empty title.
pub const UNTITLED: &str = "Untitled";

/// A leaf content record belonging to at most one folder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub body: String,
    /// Unix milliseconds of the first save. Never changes afterwards.
    pub created_at: i64,
    /// Unix milliseconds of the latest save; `None` only for imported
    /// records that never carried one.
    pub updated_at: Option<i64>,
    /// Containing folder, or `None` for the top level.
    pub folder_id: Option<String>,
    pub is_liked: bool,
}

impl Note {
    /// Builds a typed note from a stored record, applying the current schema
    /// defaults to any field the record lacks.
    pub fn from_record(id: String, record: NoteRecord) -> Self {
        Self {
            id,
            title: record.title,
            body: record.body,
            created_at: record.created_at,
            updated_at: record.updated_at,
            folder_id: record.folder_id.flatten(),
            is_liked: record.is_liked.unwrap_or(false),
        }
    }

    /// Converts back to the storage shape with every schema field present.
    pub fn to_record(&self) -> NoteRecord {
        NoteRecord {
            title: self.title.clone(),
            body: self.body.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            folder_id: Some(self.folder_id.clone()),
            is_liked: Some(self.is_liked),
        }
    }

    /// Case-insensitive substring match against title or body.
    ///
    /// `needle` must already be lower-cased; an empty needle matches everything.
    pub fn matches(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.title.to_lowercase().contains(needle)
            || self.body.to_lowercase().contains(needle)
    }

    /// Ordering key for "most recently updated first"; a missing timestamp
    /// sorts as the oldest possible value.
    pub(crate) fn recency(&self) -> i64 {
        self.updated_at.unwrap_or(i64::MIN)
    }
}

/// A note exactly as loaded from storage or a backup file.
///
/// Fields added by later schema versions are `Option`s so the migration
/// engine can tell "absent" from "present": `folder_id` is `None` when the key
/// is missing and `Some(None)` when it is an explicit `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub folder_id: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_liked: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(title: &str, body: &str) -> Note {
        Note {
            id: "n1".to_string(),
            title: title.to_string(),
            body: body.to_string(),
            created_at: 1,
            updated_at: Some(2),
            folder_id: None,
            is_liked: false,
        }
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let n = note("Quarterly Plan", "Draft for Q1");
        assert!(n.matches("plan"));
        assert!(n.matches("q1"));
        assert!(!n.matches("budget"));
        assert!(n.matches(""));
    }

    #[test]
    fn test_record_distinguishes_absent_and_null_folder() {
        let absent: NoteRecord = serde_json::from_str(r#"{"title":"a","body":"b","createdAt":1}"#).unwrap();
        assert_eq!(absent.folder_id, None);
        assert_eq!(absent.is_liked, None);

        let null: NoteRecord =
            serde_json::from_str(r#"{"title":"a","body":"b","createdAt":1,"folderId":null}"#).unwrap();
        assert_eq!(null.folder_id, Some(None));

        let set: NoteRecord =
            serde_json::from_str(r#"{"title":"a","createdAt":1,"folderId":"f1","isLiked":true}"#).unwrap();
        assert_eq!(set.folder_id, Some(Some("f1".to_string())));
        assert_eq!(set.is_liked, Some(true));
        assert_eq!(set.body, "");
    }

    #[test]
    fn test_to_record_writes_explicit_null_folder() {
        let json = serde_json::to_string(&note("t", "b").to_record()).unwrap();
        assert!(json.contains("\"folderId\":null"));
        assert!(json.contains("\"isLiked\":false"));
        assert!(json.contains("\"updatedAt\":2"));
    }

    #[test]
    fn test_missing_updated_at_sorts_oldest() {
        let mut n = note("t", "b");
        n.updated_at = None;
        assert!(n.recency() < 0);
    }
}
