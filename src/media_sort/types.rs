use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::media_sort::Category;

/// A file found by a scan that is eligible for sorting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaEntry {
    /// Filename including extension.
    pub name: String,
    /// Full path to the file.
    pub path: PathBuf,
    pub category: Category,
}

/// Result of scanning one folder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Eligible files in discovery order.
    pub entries: Vec<MediaEntry>,
    /// Number of entries per media category.
    pub counts_by_category: BTreeMap<Category, usize>,
    /// Number of distinct non-empty titles, an estimate of the folders a sort creates.
    pub distinct_title_count: usize,
}

/// A file that could not be sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileError {
    pub entry_name: String,
    pub message: String,
}

/// Result of one sort invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortOutcome {
    pub moved_count: usize,
    /// Per-file failures in processing order.
    pub errors: Vec<FileError>,
}

impl MediaEntry {
    pub fn new(path: PathBuf, name: String, category: Category) -> Self {
        Self { name, path, category }
    }

    /// Create an entry from a path, classifying it by its filename.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let name = crate::path_to_filename_string(path);
        Self::new(path.to_path_buf(), name, Category::from_path(path))
    }

    /// Progress label for this entry, e.g. `Processing [VIDEO]: movie.mp4`.
    #[must_use]
    pub fn progress_label(&self) -> String {
        format!("Processing [{}]: {}", self.category.tag(), self.name)
    }
}

impl ScanResult {
    /// Total number of eligible files.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries in the given category.
    #[must_use]
    pub fn count(&self, category: Category) -> usize {
        self.counts_by_category.get(&category).copied().unwrap_or_default()
    }
}

impl FileError {
    pub fn new(entry_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            entry_name: entry_name.into(),
            message: message.into(),
        }
    }
}

impl SortOutcome {
    /// True if at least one file failed.
    #[must_use]
    pub const fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl fmt::Display for ScanResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for category in Category::MEDIA {
            write!(f, "{}: {}  ", category.label(), self.count(category))?;
        }
        write!(
            f,
            "Total Files: {}  Folders: {}",
            self.total(),
            self.distinct_title_count
        )
    }
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.entry_name, self.message)
    }
}
