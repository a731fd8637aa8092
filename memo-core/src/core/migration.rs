//! Schema migration for freshly loaded snapshots.
//!
//! Older notebooks predate nested folders, the expand toggle, note-to-folder
//! membership and likes. [`migrate`] backfills those fields where a record
//! lacks them and touches nothing else.

use crate::Snapshot;

/// Backfills schema fields missing from `snapshot`.
///
/// Folders gain `parentId = null` and `isExpanded = true`; notes gain
/// `folderId = null` and `isLiked = false`. Fields that are present, even as
/// an explicit `null`, are left alone.
///
/// Returns `true` if any record changed, in which case the caller must persist
/// the result. Running it again on migrated data returns `false`.
pub fn migrate(snapshot: &mut Snapshot) -> bool {
    let mut changed = false;

    for folder in snapshot.folders.values_mut() {
        if folder.parent_id.is_none() {
            folder.parent_id = Some(None);
            changed = true;
        }
        if folder.is_expanded.is_none() {
            folder.is_expanded = Some(true);
            changed = true;
        }
    }

    for note in snapshot.notes.values_mut() {
        if note.folder_id.is_none() {
            note.folder_id = Some(None);
            changed = true;
        }
        if note.is_liked.is_none() {
            note.is_liked = Some(false);
            changed = true;
        }
    }

    if changed {
        log::info!(
            "migrated data structure ({} folders, {} notes)",
            snapshot.folders.len(),
            snapshot.notes.len()
        );
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FolderRecord, NoteRecord};

    fn legacy_snapshot() -> Snapshot {
        let json = r#"{
            "notes": {
                "note_1": { "title": "Old", "body": "text", "createdAt": 10, "updatedAt": 20 },
                "note_2": { "title": "Newer", "body": "", "createdAt": 11, "updatedAt": 21,
                            "folderId": "folder_1", "isLiked": true }
            },
            "folders": {
                "folder_1": { "name": "Work", "createdAt": 5 },
                "folder_2": { "name": "Sub", "createdAt": 6, "parentId": "folder_1", "isExpanded": false }
            },
            "settings": {}
        }"#;
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_migrate_backfills_missing_fields() {
        let mut snap = legacy_snapshot();
        assert!(migrate(&mut snap));

        let f1 = &snap.folders["folder_1"];
        assert_eq!(f1.parent_id, Some(None));
        assert_eq!(f1.is_expanded, Some(true));

        let n1 = &snap.notes["note_1"];
        assert_eq!(n1.folder_id, Some(None));
        assert_eq!(n1.is_liked, Some(false));
    }

    #[test]
    fn test_migrate_preserves_present_fields() {
        let mut snap = legacy_snapshot();
        migrate(&mut snap);

        let f2 = &snap.folders["folder_2"];
        assert_eq!(f2.parent_id, Some(Some("folder_1".to_string())));
        assert_eq!(f2.is_expanded, Some(false));

        let n2 = &snap.notes["note_2"];
        assert_eq!(n2.folder_id, Some(Some("folder_1".to_string())));
        assert_eq!(n2.is_liked, Some(true));
        assert_eq!(n2.title, "Newer");
        assert_eq!(n2.created_at, 11);
        assert_eq!(n2.updated_at, Some(21));
    }

    #[test]
    fn test_migrate_is_idempotent() {
        let mut snap = legacy_snapshot();
        assert!(migrate(&mut snap));
        let after_first = snap.clone();
        assert!(!migrate(&mut snap));
        assert_eq!(snap, after_first);
    }

    #[test]
    fn test_migrate_keeps_explicit_null() {
        let mut snap = Snapshot::default();
        snap.folders.insert(
            "f".to_string(),
            FolderRecord { name: "F".to_string(), created_at: 0, parent_id: Some(None), is_expanded: Some(false) },
        );
        snap.notes.insert(
            "n".to_string(),
            NoteRecord { folder_id: Some(None), is_liked: Some(false), ..Default::default() },
        );
        assert!(!migrate(&mut snap));
        assert_eq!(snap.folders["f"].is_expanded, Some(false));
    }
}
