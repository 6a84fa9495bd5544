use std::fs;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use itertools::Itertools;

use media_sorter::media_sort::{Category, ScanResult, SortConfig, SortOutcome};

/// Simple file logger for sort runs with buffered writes
pub struct FileLogger {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl FileLogger {
    /// Create a new file logger, writing to ~/logs/media-sorter/msort_<timestamp>.log
    pub(crate) fn new() -> Result<Self> {
        let log_dir = media_sorter::config::LOG_DIR
            .as_deref()
            .context("Failed to get home directory")?;
        Self::in_directory(log_dir)
    }

    /// Create a new file logger in the given directory.
    pub(crate) fn in_directory(log_dir: &Path) -> Result<Self> {
        if !log_dir.exists() {
            fs::create_dir_all(log_dir).context("Failed to create log directory")?;
        }

        let path = log_dir.join(format!("msort_{}.log", Local::now().format("%Y-%m-%d_%H-%M-%S")));

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to create log file: {}", path.display()))?;

        Ok(Self {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    fn timestamp() -> String {
        Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
    }

    /// Log when starting the program
    pub(crate) fn log_init(&mut self, config: &SortConfig, normalizer: &str) {
        let _ = writeln!(
            self.writer,
            "[{}] INIT \"{}\"",
            Self::timestamp(),
            config.root.display()
        );
        let _ = writeln!(self.writer, "  types: {}", config.enabled.iter().join(", "));
        let _ = writeln!(self.writer, "  normalizer: {normalizer}");
        let _ = writeln!(self.writer, "  auto: {}", config.auto);
        let _ = writeln!(self.writer, "  dryrun: {}", config.dryrun);
        let _ = writeln!(self.writer, "  verbose: {}", config.verbose);
        let _ = self.writer.flush();
    }

    /// Log scan statistics
    pub(crate) fn log_scan(&mut self, result: &ScanResult) {
        let counts = Category::MEDIA
            .iter()
            .map(|category| format!("{}: {}", category.label(), result.count(*category)))
            .join(", ");
        let _ = writeln!(
            self.writer,
            "[{}] SCAN    {} files | {} | Folders: {}",
            Self::timestamp(),
            result.total(),
            counts,
            result.distinct_title_count
        );
        let _ = self.writer.flush();
    }

    /// Log when a file fails to move
    pub(crate) fn log_failure(&mut self, file_name: &str, message: &str) {
        let _ = writeln!(
            self.writer,
            "[{}] ERROR   \"{}\" | {}",
            Self::timestamp(),
            file_name,
            message
        );
        let _ = self.writer.flush();
    }

    /// Log final statistics
    pub(crate) fn log_outcome(&mut self, outcome: &SortOutcome, duration: Duration) {
        let _ = writeln!(self.writer, "[{}] SUMMARY", Self::timestamp());
        let _ = writeln!(self.writer, "  Files moved:  {}", outcome.moved_count);
        let _ = writeln!(self.writer, "  Files failed: {}", outcome.errors.len());
        let _ = writeln!(
            self.writer,
            "  Total time: {}",
            media_sorter::format_duration(duration)
        );
        let _ = writeln!(self.writer, "[{}] END", Self::timestamp());
        let _ = self.writer.flush();
    }
}
