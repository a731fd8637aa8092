//! Core library for Memo, a local-first note organiser with nested folders.
//!
//! The primary entry point is [`Workspace`], which represents an open
//! notebook. All mutations go through `Workspace` methods; the underlying
//! [`Store`] can also be driven directly when persistence is not wanted.
//!
//! Types are re-exported from their respective sub-modules for convenience;
//! consumers should import from the crate root rather than the `core` module.

pub mod core;

// Re-export commonly used types.
#[doc(inline)]
pub use crate::core::{
    autosave::AutoSave,
    config::{config_file_path, load_config, save_config, AppConfig},
    delete::DeleteResult,
    error::{MemoError, Result},
    export::{
        backup_file_name, export_snapshot, parse_snapshot, read_backup, to_export_json, write_backup,
    },
    folder::{Folder, FolderRecord},
    migration::migrate,
    note::{Note, NoteRecord, UNTITLED},
    notes::SaveOutcome,
    persistence::Persistence,
    query::{compare_names, filter_by_text, TreeItem, TreeRow},
    selection::Selection,
    settings::Settings,
    snapshot::Snapshot,
    storage::{KeyValueStore, MemoryStore, Storage},
    store::{Ancestors, Store},
    workspace::{Change, ItemRef, Workspace},
};
