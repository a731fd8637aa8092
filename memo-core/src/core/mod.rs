//! Internal domain modules for the Memo core library.
//!
//! All public types from these modules are re-exported at the crate root
//! with `#[doc(inline)]`; import from there in preference to this module.

pub mod autosave;
pub mod config;
pub mod delete;
pub mod error;
pub mod export;
pub mod folder;
pub mod migration;
pub mod note;
pub mod notes;
pub mod persistence;
pub mod query;
pub mod selection;
pub mod settings;
pub mod snapshot;
pub mod storage;
pub mod store;
pub mod tree;
pub mod workspace;

#[doc(inline)]
pub use autosave::AutoSave;
#[doc(inline)]
pub use config::{load_config, save_config, AppConfig};
#[doc(inline)]
pub use delete::DeleteResult;
#[doc(inline)]
pub use error::{MemoError, Result};
#[doc(inline)]
pub use export::{backup_file_name, export_snapshot, parse_snapshot};
#[doc(inline)]
pub use folder::{Folder, FolderRecord};
#[doc(inline)]
pub use migration::migrate;
#[doc(inline)]
pub use note::{Note, NoteRecord};
#[doc(inline)]
pub use notes::SaveOutcome;
#[doc(inline)]
pub use persistence::Persistence;
#[doc(inline)]
pub use query::{compare_names, filter_by_text, TreeItem, TreeRow};
#[doc(inline)]
pub use selection::Selection;
#[doc(inline)]
pub use settings::Settings;
#[doc(inline)]
pub use snapshot::Snapshot;
#[doc(inline)]
pub use storage::{KeyValueStore, MemoryStore, Storage};
#[doc(inline)]
pub use store::Store;
#[doc(inline)]
pub use workspace::{Change, ItemRef, Workspace};
