//! Read-only, ordered views over the store for sidebar and list rendering.

use feruca::Collator;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::{Folder, Note, Store};

/// One entry of a folder listing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", content = "item", rename_all = "camelCase")]
pub enum TreeItem<'a> {
    Folder(&'a Folder),
    Note(&'a Note),
}

impl<'a> TreeItem<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            Self::Folder(f) => &f.id,
            Self::Note(n) => &n.id,
        }
    }

    /// Folder name or note title.
    pub fn label(&self) -> &'a str {
        match self {
            Self::Folder(f) => &f.name,
            Self::Note(n) => &n.title,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder(_))
    }
}

/// A [`TreeItem`] placed at an indentation depth in the flattened sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TreeRow<'a> {
    pub depth: usize,
    pub item: TreeItem<'a>,
}

/// Orders folder names with the Unicode collation algorithm (CLDR root
/// locale): accents and case are secondary to the base letters, and
/// lowercase sorts ahead of uppercase when names differ only in case.
///
/// Sorting many names should reuse one [`Collator`] instead.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    Collator::default().collate(a, b)
}

/// Most recently updated first; notes without `updatedAt` sink to the end.
fn by_recency(a: &&Note, b: &&Note) -> Ordering {
    b.recency().cmp(&a.recency()).then_with(|| a.id.cmp(&b.id))
}

fn sort_by_name(folders: &mut [&Folder]) {
    let mut collator = Collator::default();
    folders.sort_by(|a, b| collator.collate(&a.name, &b.name).then_with(|| a.id.cmp(&b.id)));
}

/// Keeps every folder and every note matching `term` (case-insensitive
/// substring of title or body). An empty term keeps everything.
pub fn filter_by_text<'a>(items: Vec<TreeItem<'a>>, term: &str) -> Vec<TreeItem<'a>> {
    let needle = term.to_lowercase();
    items
        .into_iter()
        .filter(|item| match item {
            TreeItem::Folder(_) => true,
            TreeItem::Note(n) => n.matches(&needle),
        })
        .collect()
}

/// Folders and notes grouped by their parent, each group already sorted.
type ChildIndex<'a> = HashMap<Option<&'a str>, (Vec<&'a Folder>, Vec<&'a Note>)>;

fn children_in<'a>(index: &ChildIndex<'a>, parent: Option<&'a str>) -> Vec<TreeItem<'a>> {
    index
        .get(&parent)
        .map(|(folders, notes)| {
            folders
                .iter()
                .map(|f| TreeItem::Folder(*f))
                .chain(notes.iter().map(|n| TreeItem::Note(*n)))
                .collect()
        })
        .unwrap_or_default()
}

impl Store {
    /// Direct children of `parent_id` (`None` for the top level): folders by
    /// name, then notes by most recent update.
    pub fn list_children(&self, parent_id: Option<&str>) -> Vec<TreeItem<'_>> {
        let mut folders: Vec<&Folder> = self
            .folders
            .values()
            .filter(|f| f.parent_id.as_deref() == parent_id)
            .collect();
        sort_by_name(&mut folders);

        let mut notes: Vec<&Note> = self
            .notes
            .values()
            .filter(|n| n.folder_id.as_deref() == parent_id)
            .collect();
        notes.sort_by(by_recency);

        folders
            .into_iter()
            .map(TreeItem::Folder)
            .chain(notes.into_iter().map(TreeItem::Note))
            .collect()
    }

    /// All liked notes regardless of folder, most recent first, optionally
    /// narrowed by `term`.
    pub fn list_liked(&self, term: &str) -> Vec<&Note> {
        let needle = term.to_lowercase();
        let mut liked: Vec<&Note> = self
            .notes
            .values()
            .filter(|n| n.is_liked && n.matches(&needle))
            .collect();
        liked.sort_by(by_recency);
        liked
    }

    pub fn count_all(&self) -> usize {
        self.notes.len()
    }

    pub fn count_liked(&self) -> usize {
        self.notes.values().filter(|n| n.is_liked).count()
    }

    /// Flattens the hierarchy depth-first in sidebar order.
    ///
    /// Each level lists its folders then its notes; the walk descends only
    /// into expanded folders. `term` filters notes, never folders.
    pub fn visible_tree(&self, term: &str) -> Vec<TreeRow<'_>> {
        let needle = term.to_lowercase();

        let mut index: ChildIndex<'_> = HashMap::new();
        for f in self.folders.values() {
            index.entry(f.parent_id.as_deref()).or_default().0.push(f);
        }
        for n in self.notes.values() {
            index.entry(n.folder_id.as_deref()).or_default().1.push(n);
        }
        for (folders, notes) in index.values_mut() {
            sort_by_name(folders);
            notes.sort_by(by_recency);
        }

        let mut rows = Vec::new();
        let mut stack: Vec<(TreeItem<'_>, usize)> =
            children_in(&index, None).into_iter().rev().map(|item| (item, 0)).collect();
        while let Some((item, depth)) = stack.pop() {
            match item {
                TreeItem::Note(n) if !n.matches(&needle) => continue,
                TreeItem::Note(_) => rows.push(TreeRow { depth, item }),
                TreeItem::Folder(f) => {
                    rows.push(TreeRow { depth, item });
                    if f.is_expanded {
                        stack.extend(
                            children_in(&index, Some(f.id.as_str()))
                                .into_iter()
                                .rev()
                                .map(|c| (c, depth + 1)),
                        );
                    }
                }
            }
        }
        rows
    }
}
