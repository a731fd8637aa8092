//! The three-record aggregate shared by persistence, migration and backups.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use crate::{FolderRecord, NoteRecord, Settings};

/// The complete state of a notebook in its storage shape: notes and folders
/// keyed by id, plus the settings record.
///
/// This is what the persistence adapter loads, what the migration engine
/// upgrades, and what an export file contains (`{ notes, folders, settings }`).
/// Maps are ordered so serialised output is stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub notes: BTreeMap<String, NoteRecord>,
    pub folders: BTreeMap<String, FolderRecord>,
    pub settings: Settings,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty() && self.folders.is_empty()
    }
}

/// Deserialises a field that is present in the input (even as `null`) into
/// `Some(value)`. Combined with `#[serde(default)]` an absent key stays `None`.
pub(crate) fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
