//! Moving scanned files into title folders.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::media_sort::scan::require_dir;
use crate::media_sort::title::{TitleNormalizer, destination_title};
use crate::media_sort::{Error, FileError, MediaEntry, ProgressReporter, Result, SortOutcome};

/// Moves files into folders named after their normalized titles.
///
/// Files are processed one at a time in the given order.
/// Only one sort can run at a time per engine.
pub struct SortEngine {
    normalizer: Arc<dyn TitleNormalizer>,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when the sort returns.
struct InFlightGuard<'a>(&'a AtomicBool);

impl SortEngine {
    #[must_use]
    pub fn new(normalizer: Arc<dyn TitleNormalizer>) -> Self {
        Self {
            normalizer,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Sort the given entries into title folders under `root`.
    ///
    /// Per-file failures are collected into the returned outcome and reported through
    /// `reporter`; they never stop the batch.
    /// An empty entry list does nothing and makes no progress calls.
    ///
    /// # Errors
    /// Returns `RootNotSet` for an empty root path, `NotFound` if the root is not a directory,
    /// `Access` if it cannot be reached due to permissions,
    /// and `SortInProgress` if another sort is running on this engine.
    pub fn sort<R: ProgressReporter + ?Sized>(
        &self,
        entries: &[MediaEntry],
        root: &Path,
        reporter: &mut R,
    ) -> Result<SortOutcome> {
        let _guard = self.acquire()?;

        if root.as_os_str().is_empty() {
            return Err(Error::RootNotSet);
        }
        require_dir(root)?;

        let mut outcome = SortOutcome::default();
        if entries.is_empty() {
            return Ok(outcome);
        }

        let total = entries.len();
        for (index, entry) in entries.iter().enumerate() {
            reporter.on_sort_progress(progress_percent(index, total), &entry.progress_label());

            match self.sort_entry(entry, root) {
                Ok(true) => outcome.moved_count += 1,
                Ok(false) => {}
                Err(error) => {
                    let message = error.to_string();
                    reporter.on_sort_file_error(&entry.name, &message);
                    outcome.errors.push(FileError::new(&entry.name, message));
                }
            }
        }

        reporter.on_sort_progress(100, &format!("Complete! Moved {} files", outcome.moved_count));
        reporter.on_sort_complete(&outcome);

        Ok(outcome)
    }

    /// Destination folder for the given entry.
    #[must_use]
    pub fn destination_folder(&self, entry: &MediaEntry, root: &Path) -> PathBuf {
        root.join(destination_title(self.normalizer.as_ref(), &entry.name))
    }

    /// True while a sort is running.
    #[must_use]
    pub fn is_sorting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Move one entry into its title folder.
    /// Returns false if it was already there.
    fn sort_entry(&self, entry: &MediaEntry, root: &Path) -> Result<bool> {
        let dest_folder = self.destination_folder(entry, root);

        if !dest_folder.exists() {
            fs::create_dir(&dest_folder).map_err(|source| Error::CreateDir {
                path: dest_folder.clone(),
                source,
            })?;
        }

        if entry.path.parent() == Some(dest_folder.as_path()) {
            return Ok(false);
        }

        // Use the on-disk name so non UTF-8 names survive the move
        let file_name = entry
            .path
            .file_name()
            .map_or_else(|| entry.name.clone().into(), ToOwned::to_owned);
        let dest_path = dest_folder.join(file_name);

        fs::rename(&entry.path, &dest_path).map_err(|source| Error::Move {
            from: entry.path.clone(),
            to: dest_path,
            source,
        })?;

        Ok(true)
    }

    fn acquire(&self) -> Result<InFlightGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| InFlightGuard(&self.in_flight))
            .map_err(|_| Error::SortInProgress)
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl std::fmt::Debug for SortEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SortEngine")
            .field("normalizer", &self.normalizer.name())
            .field("in_flight", &self.in_flight)
            .finish()
    }
}

/// Percentage of `index` out of `total`, rounded down.
#[must_use]
pub const fn progress_percent(index: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    (index.saturating_mul(100) / total) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs::File;

    use tempfile::TempDir;

    use crate::media_sort::{DefaultNormalizer, EventLog, NoopReporter, ProgressEvent};

    fn engine() -> SortEngine {
        SortEngine::new(Arc::new(DefaultNormalizer))
    }

    fn create_entries(dir: &Path, names: &[&str]) -> Vec<MediaEntry> {
        names
            .iter()
            .map(|name| {
                let path = dir.join(name);
                File::create(&path).expect("Failed to create test file");
                MediaEntry::from_path(&path)
            })
            .collect()
    }

    #[test]
    fn moves_file_into_title_folder() {
        let root = TempDir::new().expect("Failed to create temp dir");
        let entries = create_entries(root.path(), &["a_b.mp4"]);

        let outcome = engine()
            .sort(&entries, root.path(), &mut NoopReporter)
            .expect("sort should succeed");

        assert_eq!(outcome, SortOutcome { moved_count: 1, errors: vec![] });
        assert!(root.path().join("A B").is_dir());
        assert!(root.path().join("A B").join("a_b.mp4").is_file());
        assert!(!root.path().join("a_b.mp4").exists());
    }

    #[test]
    fn file_already_in_destination_is_skipped() {
        let root = TempDir::new().expect("Failed to create temp dir");
        let folder = root.path().join("A B");
        fs::create_dir(&folder).expect("Failed to create folder");
        let entries = create_entries(&folder, &["a_b.mp4"]);

        let outcome = engine()
            .sort(&entries, root.path(), &mut NoopReporter)
            .expect("sort should succeed");

        assert_eq!(outcome, SortOutcome::default());
        assert!(folder.join("a_b.mp4").is_file());
    }

    #[test]
    fn files_with_same_title_share_folder() {
        let root = TempDir::new().expect("Failed to create temp dir");
        let entries = create_entries(root.path(), &["my_movie-2020.mp4", "My.Movie.2020.mkv"]);

        let outcome = engine()
            .sort(&entries, root.path(), &mut NoopReporter)
            .expect("sort should succeed");

        assert_eq!(outcome.moved_count, 2);
        let folder = root.path().join("My Movie 2020");
        assert!(folder.join("my_movie-2020.mp4").is_file());
        assert!(folder.join("My.Movie.2020.mkv").is_file());
    }

    #[test]
    fn empty_title_goes_to_unknown_folder() {
        let root = TempDir::new().expect("Failed to create temp dir");
        let entries = create_entries(root.path(), &["_-_.mp4"]);

        let outcome = engine()
            .sort(&entries, root.path(), &mut NoopReporter)
            .expect("sort should succeed");

        assert_eq!(outcome.moved_count, 1);
        assert!(root.path().join("Unknown").join("_-_.mp4").is_file());
    }

    #[test]
    fn failed_entry_does_not_stop_batch() {
        let root = TempDir::new().expect("Failed to create temp dir");
        let entries = create_entries(root.path(), &["first.mp4", "second.mp4", "third.mp4"]);
        // A regular file where the destination folder should be makes the move fail
        File::create(root.path().join("Second")).expect("Failed to create blocking file");

        let mut log = EventLog::new();
        let outcome = engine()
            .sort(&entries, root.path(), &mut log)
            .expect("sort should succeed");

        assert_eq!(outcome.moved_count, 2);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].entry_name, "second.mp4");
        assert!(root.path().join("First").join("first.mp4").is_file());
        assert!(root.path().join("Third").join("third.mp4").is_file());
        assert!(root.path().join("second.mp4").is_file());

        let error_events = log
            .events()
            .iter()
            .filter(|event| matches!(event, ProgressEvent::SortFileError { file_name, .. } if file_name == "second.mp4"))
            .count();
        assert_eq!(error_events, 1);
    }

    #[cfg(unix)]
    #[test]
    fn folder_creation_failure_does_not_stop_batch() {
        let root = TempDir::new().expect("Failed to create temp dir");
        let entries = create_entries(root.path(), &["first.mp4", "second.mp4", "third.mp4"]);
        // Dangling symlink: the folder does not exist but cannot be created either
        let blocked = root.path().join("Second");
        std::os::unix::fs::symlink(root.path().join("nowhere"), &blocked).expect("Failed to create symlink");

        let mut log = EventLog::new();
        let outcome = engine()
            .sort(&entries, root.path(), &mut log)
            .expect("sort should succeed");

        assert_eq!(outcome.moved_count, 2);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].entry_name, "second.mp4");
        assert!(outcome.errors[0].message.starts_with("Failed to create directory"));
        assert!(outcome.errors[0].message.contains(&blocked.display().to_string()));
        assert!(root.path().join("second.mp4").is_file());
        assert!(root.path().join("First").join("first.mp4").is_file());
        assert!(root.path().join("Third").join("third.mp4").is_file());
        assert!(log.events().iter().any(
            |event| matches!(event, ProgressEvent::SortFileError { file_name, .. } if file_name == "second.mp4")
        ));
    }

    #[test]
    fn missing_source_file_is_reported_as_error() {
        let root = TempDir::new().expect("Failed to create temp dir");
        let mut entries = create_entries(root.path(), &["exists.mp4"]);
        entries.insert(0, MediaEntry::from_path(&root.path().join("gone.mp4")));

        let outcome = engine()
            .sort(&entries, root.path(), &mut NoopReporter)
            .expect("sort should succeed");

        assert_eq!(outcome.moved_count, 1);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].entry_name, "gone.mp4");
    }

    #[test]
    fn progress_is_reported_before_each_entry_and_at_end() {
        let root = TempDir::new().expect("Failed to create temp dir");
        let entries = create_entries(root.path(), &["a.mp4", "b.jpg", "c.pdf"]);

        let mut log = EventLog::new();
        engine()
            .sort(&entries, root.path(), &mut log)
            .expect("sort should succeed");

        assert_eq!(log.percentages(), vec![0, 33, 66, 100]);
        assert_eq!(
            log.events()[1],
            ProgressEvent::SortProgress {
                percent: 33,
                label: "Processing [IMAGE]: b.jpg".to_string()
            }
        );
        assert!(matches!(
            log.events().last(),
            Some(ProgressEvent::SortCompleted(outcome)) if outcome.moved_count == 3
        ));
    }

    #[test]
    fn empty_batch_is_noop_without_progress() {
        let root = TempDir::new().expect("Failed to create temp dir");

        let mut log = EventLog::new();
        let outcome = engine().sort(&[], root.path(), &mut log).expect("sort should succeed");

        assert_eq!(outcome, SortOutcome::default());
        assert!(log.events().is_empty());
    }

    #[test]
    fn empty_root_is_rejected() {
        let result = engine().sort(&[], Path::new(""), &mut NoopReporter);
        assert!(matches!(result, Err(Error::RootNotSet)));
    }

    #[test]
    fn missing_root_is_rejected() {
        let root = TempDir::new().expect("Failed to create temp dir");
        let result = engine().sort(&[], &root.path().join("missing"), &mut NoopReporter);
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn root_below_file_is_not_found() {
        let root = TempDir::new().expect("Failed to create temp dir");
        File::create(root.path().join("movie.mp4")).expect("Failed to create test file");
        let result = engine().sort(&[], &root.path().join("movie.mp4").join("media"), &mut NoopReporter);
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[cfg(unix)]
    #[test]
    fn root_in_locked_parent_is_access_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().expect("Failed to create temp dir");
        let locked = dir.path().join("locked");
        let root = locked.join("media");
        fs::create_dir_all(&root).expect("Failed to create folder");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).expect("Failed to lock folder");

        // Privileged users can still traverse the folder
        let privileged = fs::metadata(&root).is_ok();
        let result = engine().sort(&[], &root, &mut NoopReporter);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("Failed to unlock folder");

        if !privileged {
            assert!(matches!(result, Err(Error::Access { .. })));
        }
    }

    #[test]
    fn reentrant_sort_is_refused() {
        struct Reentrant<'a> {
            engine: &'a SortEngine,
            root: PathBuf,
            nested: Option<Result<SortOutcome>>,
        }

        impl ProgressReporter for Reentrant<'_> {
            fn on_sort_progress(&mut self, _percent: u8, _label: &str) {
                if self.nested.is_none() {
                    self.nested = Some(self.engine.sort(&[], &self.root, &mut NoopReporter));
                }
            }
        }

        let root = TempDir::new().expect("Failed to create temp dir");
        let entries = create_entries(root.path(), &["a.mp4"]);
        let engine = engine();
        let mut reporter = Reentrant {
            engine: &engine,
            root: root.path().to_path_buf(),
            nested: None,
        };

        let outcome = engine
            .sort(&entries, root.path(), &mut reporter)
            .expect("outer sort should succeed");

        assert_eq!(outcome.moved_count, 1);
        assert!(matches!(reporter.nested, Some(Err(Error::SortInProgress))));
        assert!(!engine.is_sorting());
    }

    #[test]
    fn engine_is_released_after_error() {
        let engine = engine();
        assert!(engine.sort(&[], Path::new(""), &mut NoopReporter).is_err());
        assert!(!engine.is_sorting());
    }

    #[test]
    fn progress_percent_rounds_down() {
        assert_eq!(progress_percent(0, 3), 0);
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 66);
        assert_eq!(progress_percent(29, 100), 29);
        assert_eq!(progress_percent(0, 0), 100);
    }
}
