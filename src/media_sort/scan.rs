//! Folder scanning for eligible media files.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use unicode_normalization::UnicodeNormalization;

use crate::media_sort::title::{TitleNormalizer, title_for_file_name};
use crate::media_sort::{Category, CategorySet, Error, MediaEntry, Result, ScanResult};

/// Scan the direct children of `folder` for files in the enabled categories.
///
/// Entries are returned in discovery order.
/// Directories and symlinks to directories are skipped, symlinks to files are followed.
///
/// # Errors
/// Returns `NotFound` if the folder does not exist or is not a directory,
/// `Access` if it cannot be read due to permissions, and `Io` for other read failures.
pub fn scan(folder: &Path, enabled: &CategorySet, normalizer: &dyn TitleNormalizer) -> Result<ScanResult> {
    require_dir(folder)?;

    let mut entries = Vec::new();
    let mut counts_by_category: BTreeMap<Category, usize> =
        Category::MEDIA.into_iter().map(|category| (category, 0)).collect();
    let mut titles: HashSet<String> = HashSet::new();

    for entry in fs::read_dir(folder).map_err(|e| Error::from_read_dir(folder, e))? {
        let entry = entry.map_err(|e| Error::from_read_dir(folder, e))?;
        let path = entry.path();
        if !is_regular_file(&entry) {
            continue;
        }

        // Classify from the on-disk name, `name` drops invalid Unicode
        let category = Category::from_path(&path);
        if !category.is_enabled_in(enabled) {
            continue;
        }
        let name: String = crate::os_str_to_string(&entry.file_name()).nfc().collect();

        // Empty titles are sorted into the fallback folder but not counted here
        let title = title_for_file_name(normalizer, &name);
        if !title.is_empty() {
            titles.insert(title);
        }

        *counts_by_category.entry(category).or_default() += 1;
        entries.push(MediaEntry::new(path, name, category));
    }

    Ok(ScanResult {
        entries,
        counts_by_category,
        distinct_title_count: titles.len(),
    })
}

/// Check that `path` is an existing directory.
///
/// Stat failures keep their cause, so an untraversable parent is `Access` rather than `NotFound`.
pub(crate) fn require_dir(path: &Path) -> Result<()> {
    let metadata = fs::metadata(path).map_err(|e| Error::from_read_dir(path, e))?;
    if metadata.is_dir() {
        Ok(())
    } else {
        Err(Error::NotFound(path.to_path_buf()))
    }
}

/// Check if a directory entry is a regular file, following symlinks.
fn is_regular_file(entry: &fs::DirEntry) -> bool {
    match entry.file_type() {
        Ok(file_type) if file_type.is_symlink() => fs::metadata(entry.path()).is_ok_and(|meta| meta.is_file()),
        Ok(file_type) => file_type.is_file(),
        Err(_) => false,
    }
}
