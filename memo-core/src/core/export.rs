//! Whole-notebook backups as a single pretty-printed JSON text file.
//!
//! The file holds one object of the form `{ notes, folders, settings }`, the
//! same [`Snapshot`] shape the persistence adapter stores.

use chrono::NaiveDate;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{MemoError, Result, Snapshot, Store};

const REQUIRED_FIELDS: [&str; 3] = ["notes", "folders", "settings"];

/// A complete copy of the store, ready to serialise.
pub fn export_snapshot(store: &Store) -> Snapshot {
    store.to_snapshot()
}

/// Renders `snapshot` as the text written to a backup file.
///
/// # Errors
///
/// Returns [`MemoError::Json`] if serialisation fails.
pub fn to_export_json(snapshot: &Snapshot) -> Result<String> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

/// `memo-backup-YYYY-MM-DD.txt` for the given day.
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("memo-backup-{}.txt", date.format("%Y-%m-%d"))
}

/// Writes `snapshot` into `dir` under today's (UTC) backup name and returns
/// the path written. An existing backup from the same day is overwritten.
///
/// # Errors
///
/// Returns [`MemoError::Io`] if the directory cannot be created or the file
/// cannot be written.
pub fn write_backup(dir: &Path, snapshot: &Snapshot) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(backup_file_name(chrono::Utc::now().date_naive()));
    fs::write(&path, to_export_json(snapshot)?)?;
    log::info!(
        "exported {} notes and {} folders to {}",
        snapshot.notes.len(),
        snapshot.folders.len(),
        path.display()
    );
    Ok(path)
}

/// Parses backup text into a snapshot without touching any store.
///
/// The result has not been migrated; callers run it through
/// [`migrate`](crate::migrate) before use.
///
/// # Errors
///
/// Returns [`MemoError::Parse`] if `raw` is not JSON at all, and
/// [`MemoError::InvalidFormat`] if it is JSON but not an object carrying
/// non-null `notes`, `folders` and `settings` of the expected shape.
pub fn parse_snapshot(raw: &str) -> Result<Snapshot> {
    let value: Value = serde_json::from_str(raw).map_err(|e| MemoError::Parse(e.to_string()))?;

    let object = value
        .as_object()
        .ok_or_else(|| MemoError::InvalidFormat("expected a JSON object".to_string()))?;
    for field in REQUIRED_FIELDS {
        if object.get(field).map_or(true, Value::is_null) {
            return Err(MemoError::InvalidFormat(format!("missing field `{field}`")));
        }
    }

    serde_json::from_value(value).map_err(|e| MemoError::InvalidFormat(e.to_string()))
}

/// Reads and parses a backup file.
///
/// # Errors
///
/// Returns [`MemoError::Io`] if the file cannot be read, otherwise as
/// [`parse_snapshot`].
pub fn read_backup(path: &Path) -> Result<Snapshot> {
    let raw = fs::read_to_string(path)?;
    parse_snapshot(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::tests::{folder, note, store_with};
    use crate::migrate;
    use tempfile::TempDir;

    fn sample() -> Store {
        let mut s = store_with(
            vec![folder("work", "Work", None), folder("proj", "Projects", Some("work"))],
            vec![note("plan", "Q1 Plan", Some("proj"), 10), note("loose", "Loose", None, 20)],
        );
        s.settings.is_dark_mode = true;
        s
    }

    #[test]
    fn test_backup_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(backup_file_name(date), "memo-backup-2024-03-07.txt");
    }

    #[test]
    fn test_export_import_round_trip() {
        let store = sample();
        let text = to_export_json(&export_snapshot(&store)).unwrap();
        assert!(text.contains('\n'), "export should be pretty-printed");

        let mut parsed = parse_snapshot(&text).unwrap();
        assert!(!migrate(&mut parsed));
        assert_eq!(Store::from_snapshot(parsed), store);
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(matches!(parse_snapshot("not json {"), Err(MemoError::Parse(_))));
        assert!(matches!(parse_snapshot(""), Err(MemoError::Parse(_))));
    }

    #[test]
    fn test_parse_requires_all_three_fields() {
        let cases = [
            r#"[]"#,
            r#"{"notes":{},"folders":{}}"#,
            r#"{"notes":{},"settings":{}}"#,
            r#"{"folders":{},"settings":{}}"#,
            r#"{"notes":null,"folders":{},"settings":{}}"#,
        ];
        for raw in cases {
            assert!(
                matches!(parse_snapshot(raw), Err(MemoError::InvalidFormat(_))),
                "accepted {raw}"
            );
        }
    }

    #[test]
    fn test_parse_rejects_wrong_shape() {
        let raw = r#"{"notes":[1,2],"folders":{},"settings":{}}"#;
        assert!(matches!(parse_snapshot(raw), Err(MemoError::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_accepts_old_backup_without_new_fields() {
        let raw = r#"{
            "notes": {"n1": {"title": "Old", "body": "text", "createdAt": 1, "updatedAt": 2}},
            "folders": {"f1": {"name": "Archive", "createdAt": 1}},
            "settings": {"fontFamily": "serif", "fontSize": "16px", "isDarkMode": false}
        }"#;
        let mut snap = parse_snapshot(raw).unwrap();
        assert!(migrate(&mut snap));
        assert_eq!(snap.notes["n1"].is_liked, Some(false));
        assert_eq!(snap.folders["f1"].is_expanded, Some(true));
    }

    #[test]
    fn test_write_and_read_backup() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("backups");
        let snap = export_snapshot(&sample());

        let path = write_backup(&target, &snap).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("memo-backup-") && name.ends_with(".txt"));

        assert_eq!(read_backup(&path).unwrap(), snap);
        assert!(matches!(read_backup(&target.join("missing.txt")), Err(MemoError::Io(_))));
    }
}
