//! Reads and writes the three notebook records through a [`KeyValueStore`].

use serde::de::DeserializeOwned;

use crate::{KeyValueStore, Result, Snapshot};

pub const NOTES_KEY: &str = "notes";
pub const FOLDERS_KEY: &str = "folders";
pub const SETTINGS_KEY: &str = "notes-settings";

/// Persistence adapter over a key-value backend.
///
/// Loading never fails: an absent or unparsable record is replaced by its
/// empty/default equivalent. Saving always writes the complete current state
/// of all three records in one backend call.
pub struct Persistence<S: KeyValueStore> {
    backend: S,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Loads the three raw records.
    pub fn load(&self) -> Snapshot {
        Snapshot {
            notes: self.load_record(NOTES_KEY),
            folders: self.load_record(FOLDERS_KEY),
            settings: self.load_record(SETTINGS_KEY),
        }
    }

    fn load_record<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let raw = match self.backend.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return T::default(),
            Err(e) => {
                log::warn!("could not read record '{key}', using defaults: {e}");
                return T::default();
            }
        };
        match serde_json::from_str::<Option<T>>(&raw) {
            Ok(value) => value.unwrap_or_default(),
            Err(e) => {
                log::warn!("discarding corrupt record '{key}': {e}");
                T::default()
            }
        }
    }

    /// Replaces all three stored records with `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MemoError::Json`] if a record cannot be serialised, or
    /// the backend's error if the write fails. On error the previously stored
    /// records stand.
    pub fn save(&mut self, snapshot: &Snapshot) -> Result<()> {
        let entries = [
            (NOTES_KEY, serde_json::to_string(&snapshot.notes)?),
            (FOLDERS_KEY, serde_json::to_string(&snapshot.folders)?),
            (SETTINGS_KEY, serde_json::to_string(&snapshot.settings)?),
        ];
        self.backend.put_all(&entries)
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }
}
