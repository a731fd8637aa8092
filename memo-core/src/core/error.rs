//! Error types for the Memo core library.

use thiserror::Error;

/// All errors that can occur within the Memo core library.
///
/// Every variant is recovered at the operation boundary: the store is left
/// exactly as it was before the failed call.
#[derive(Debug, Error)]
pub enum MemoError {
    /// Input was refused, e.g. an empty folder name.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A folder ID was requested that does not exist in the store.
    #[error("Folder not found: {0}")]
    FolderNotFound(String),

    /// A note ID was requested that does not exist in the store.
    #[error("Note not found: {0}")]
    NoteNotFound(String),

    /// A folder move would make the folder its own ancestor.
    #[error("Move rejected: {0}")]
    CycleRejected(String),

    /// Imported content is not structured data at all.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Imported content parsed but does not have the snapshot shape.
    #[error("Invalid import format: {0}")]
    InvalidFormat(String),

    /// A SQLite operation failed.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// An I/O operation on the filesystem failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be serialised to JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias that pins the error type to [`MemoError`].
pub type Result<T> = std::result::Result<T, MemoError>;

impl MemoError {
    /// Returns a short, human-readable message suitable for display to the end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::FolderNotFound(_) => "Folder no longer exists".to_string(),
            Self::NoteNotFound(_) => "Note no longer exists".to_string(),
            Self::CycleRejected(msg) => msg.clone(),
            Self::Parse(e) => format!("Could not read the file: {e}"),
            Self::InvalidFormat(_) => "The file is not a valid backup".to_string(),
            Self::Database(e) => format!("Failed to save: {e}"),
            Self::Io(e) => format!("File error: {e}"),
            Self::Json(e) => format!("Data format error: {e}"),
        }
    }

    /// `true` for the not-found variants of either namespace.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::FolderNotFound(_) | Self::NoteNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message_is_shown_verbatim() {
        let e = MemoError::CycleRejected("A folder cannot be moved into its own subfolder".to_string());
        assert_eq!(e.user_message(), "A folder cannot be moved into its own subfolder");
        assert!(e.to_string().starts_with("Move rejected"));
    }

    #[test]
    fn test_is_not_found() {
        assert!(MemoError::FolderNotFound("f".into()).is_not_found());
        assert!(MemoError::NoteNotFound("n".into()).is_not_found());
        assert!(!MemoError::Validation("x".into()).is_not_found());
    }

    #[test]
    fn test_invalid_format_hides_detail_from_user() {
        let e = MemoError::InvalidFormat("missing field `settings`".to_string());
        assert_eq!(e.user_message(), "The file is not a valid backup");
        assert!(e.to_string().contains("settings"));
    }
}
