//! Filtering, sorting, paging and multi-selection over a file listing.

use serde::{Deserialize, Serialize};

use super::{FileEntry, FileKind};

/// How many images may be sent to the editor at once.
pub const MAX_MULTI_SELECT: usize = 5;

/// Entries revealed per "load more" step.
pub const PAGE_SIZE: usize = 10;

/// Ordering of a filtered listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    NameAsc,
    NameDesc,
    /// Most recently modified first; undated entries last.
    #[default]
    Newest,
}

/// A view over a listing: one kind, an optional name search, an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileQuery {
    pub kind: FileKind,
    /// Case-insensitive substring of the file name; blank matches everything.
    pub search: String,
    pub sort: SortOrder,
}

impl FileQuery {
    pub fn new(kind: FileKind) -> Self {
        Self {
            kind,
            search: String::new(),
            sort: SortOrder::default(),
        }
    }

    /// Matching entries in the requested order.
    pub fn apply<'a>(&self, entries: &'a [FileEntry]) -> Vec<&'a FileEntry> {
        let needle = self.search.trim().to_lowercase();
        let mut matched: Vec<&FileEntry> = entries
            .iter()
            .filter(|e| e.kind == self.kind)
            .filter(|e| needle.is_empty() || e.name.to_lowercase().contains(&needle))
            .collect();

        match self.sort {
            SortOrder::NameAsc => matched.sort_by_key(|e| e.name.to_lowercase()),
            SortOrder::NameDesc => {
                matched.sort_by_key(|e| std::cmp::Reverse(e.name.to_lowercase()))
            }
            SortOrder::Newest => matched.sort_by(|a, b| {
                b.modified
                    .cmp(&a.modified)
                    .then_with(|| a.relative_path.cmp(&b.relative_path))
            }),
        }
        matched
    }

    /// The first `pages * PAGE_SIZE` matches, and whether more remain.
    pub fn page<'a>(&self, entries: &'a [FileEntry], pages: usize) -> (Vec<&'a FileEntry>, bool) {
        let mut matched = self.apply(entries);
        let visible = pages.max(1).saturating_mul(PAGE_SIZE);
        let has_more = matched.len() > visible;
        matched.truncate(visible);
        (matched, has_more)
    }
}

/// Ordered multi-selection of images bound for the editor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    paths: Vec<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or remove a path. Returns `false` when adding would exceed
    /// [`MAX_MULTI_SELECT`]; the selection is unchanged in that case.
    pub fn toggle(&mut self, relative_path: &str) -> bool {
        if let Some(index) = self.paths.iter().position(|p| p == relative_path) {
            self.paths.remove(index);
            return true;
        }
        if self.paths.len() >= MAX_MULTI_SELECT {
            return false;
        }
        self.paths.push(relative_path.to_string());
        true
    }

    pub fn contains(&self, relative_path: &str) -> bool {
        self.paths.iter().any(|p| p == relative_path)
    }

    /// Selected paths in selection order; the last one ends up on top.
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }
}
