//! Scan and sort session for one root folder.

use std::fmt;
use std::sync::Arc;

use crate::media_sort::title::{TitleNormalizer, destination_title};
use crate::media_sort::{
    Category, Error, ProgressReporter, Result, ScanResult, SortConfig, SortEngine, SortOutcome,
};

/// Number of entries shown in a preview by default.
pub const PREVIEW_LIMIT: usize = 20;

/// Ties the config, normalizer, engine and latest scan result together.
pub struct MediaSorter {
    config: SortConfig,
    normalizer: Arc<dyn TitleNormalizer>,
    engine: SortEngine,
    last_scan: ScanResult,
}

/// One line of a sort preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewLine {
    pub category: Category,
    pub name: String,
    pub title: String,
}

/// Outcome of a sort and the error of the following re-scan, if any.
#[derive(Debug, Default)]
pub struct SortRun {
    pub outcome: SortOutcome,
    pub rescan_error: Option<Error>,
}

/// First entries of a scan with their destination titles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preview {
    pub lines: Vec<PreviewLine>,
    /// Entries not included in `lines`.
    pub remaining: usize,
}

impl MediaSorter {
    #[must_use]
    pub fn new(config: SortConfig, normalizer: Arc<dyn TitleNormalizer>) -> Self {
        let engine = SortEngine::new(Arc::clone(&normalizer));
        Self {
            config,
            normalizer,
            engine,
            last_scan: ScanResult::default(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &SortConfig {
        &self.config
    }

    /// Result of the latest scan.
    #[must_use]
    pub const fn last_scan(&self) -> &ScanResult {
        &self.last_scan
    }

    #[must_use]
    pub fn is_accelerated(&self) -> bool {
        self.normalizer.is_accelerated()
    }

    #[must_use]
    pub fn normalizer_name(&self) -> &'static str {
        self.normalizer.name()
    }

    /// Scan the root folder, replacing the previous result.
    ///
    /// # Errors
    /// Returns an error if the root folder cannot be read.
    /// The previous result is cleared in that case.
    pub fn scan<R: ProgressReporter + ?Sized>(&mut self, reporter: &mut R) -> Result<&ScanResult> {
        reporter.on_scan_start();
        self.last_scan = ScanResult::default();
        self.last_scan = super::scan(&self.config.root, &self.config.enabled, self.normalizer.as_ref())?;
        reporter.on_scan_complete(&self.last_scan);
        Ok(&self.last_scan)
    }

    /// Preview of the destination titles for the latest scan.
    #[must_use]
    pub fn preview(&self, limit: usize) -> Preview {
        let lines = self
            .last_scan
            .entries
            .iter()
            .take(limit)
            .map(|entry| PreviewLine {
                category: entry.category,
                name: entry.name.clone(),
                title: destination_title(self.normalizer.as_ref(), &entry.name),
            })
            .collect::<Vec<_>>();
        let remaining = self.last_scan.total().saturating_sub(lines.len());
        Preview { lines, remaining }
    }

    /// Sort the files from the latest scan, then scan again.
    /// Does nothing if the latest scan found no files.
    ///
    /// A failed re-scan does not discard the outcome, it is returned in [`SortRun::rescan_error`].
    ///
    /// # Errors
    /// Returns an error if the sort cannot start.
    /// Per-file failures are part of the returned outcome.
    pub fn sort<R: ProgressReporter + ?Sized>(&mut self, reporter: &mut R) -> Result<SortRun> {
        if self.last_scan.is_empty() {
            return Ok(SortRun::default());
        }
        let outcome = self
            .engine
            .sort(&self.last_scan.entries, &self.config.root, reporter)?;
        let rescan_error = self.scan(reporter).err();
        Ok(SortRun { outcome, rescan_error })
    }
}

impl fmt::Debug for MediaSorter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaSorter")
            .field("config", &self.config)
            .field("normalizer", &self.normalizer.name())
            .field("engine", &self.engine)
            .field("last_scan", &self.last_scan)
            .finish()
    }
}

impl fmt::Display for PreviewLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] '{}' -> '{}'", self.category.tag(), self.name, self.title)
    }
}

impl fmt::Display for Preview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        if self.remaining > 0 {
            write!(f, "\n... and {} more files", self.remaining)?;
        }
        Ok(())
    }
}
