use std::io::Write;
use std::time::Instant;

use colored::Colorize;
use indicatif::ProgressBar;
#[cfg(not(test))]
use indicatif::ProgressStyle;

use media_sorter::media_sort::{
    MediaSorter, MsortConfig, PREVIEW_LIMIT, ProgressReporter, ScanResult, SortConfig, SortOutcome, default_library_path,
    select_normalizer,
};
use media_sorter::{print_bold, print_error, print_warning, shorten_path_for_display};

use crate::Args;
use crate::logger::FileLogger;

#[cfg(not(test))]
const PROGRESS_BAR_CHARS: &str = "=> ";
#[cfg(not(test))]
const PROGRESS_BAR_TEMPLATE: &str = "[{elapsed_precise}] {bar:60.cyan/blue} {pos:>3}% {msg}";

/// Maximum number of characters shown for the selected folder.
const FOLDER_DISPLAY_CHARS: usize = 50;

#[derive(Debug)]
pub struct Msort {
    sorter: MediaSorter,
}

/// Prints scan statistics, sort progress and errors to the terminal,
/// and optionally to a log file.
struct ConsoleReporter {
    logger: Option<FileLogger>,
    progress_bar: Option<ProgressBar>,
    sort_start: Option<Instant>,
    verbose: bool,
}

impl Msort {
    pub fn new(args: Args) -> anyhow::Result<Self> {
        let root = media_sorter::resolve_input_path(args.path.as_deref())?;
        let mut user_config = MsortConfig::get_user_config().unwrap_or_else(|error| {
            print_error!("{error}");
            MsortConfig::default()
        });
        user_config.auto |= args.auto;
        user_config.debug |= args.debug;
        user_config.dryrun |= args.print;
        user_config.log |= args.log;
        user_config.preview |= args.preview;
        user_config.verbose |= args.verbose;

        let config = SortConfig::from_user_config(root, user_config, &args.types, args.native)?;
        let (normalizer, load_error) = select_normalizer(config.native_library.as_deref());
        if config.debug {
            eprintln!("{config}");
            match load_error {
                Some(error) => print_warning!("{error}"),
                None => {
                    let library = config.native_library.clone().unwrap_or_else(default_library_path);
                    eprintln!("Native cleaner loaded from {}", library.display());
                }
            }
        }

        Ok(Self {
            sorter: MediaSorter::new(config, normalizer),
        })
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        let config = self.sorter.config().clone();
        let cleaner_status = if self.sorter.is_accelerated() {
            "Native cleaner loaded".green()
        } else {
            "Native cleaner not found".dimmed()
        };
        println!(
            "{} | {} v{}",
            cleaner_status,
            env!("CARGO_BIN_NAME"),
            env!("CARGO_PKG_VERSION")
        );
        println!(
            "{} {}",
            "Folder:".bold(),
            shorten_path_for_display(&config.root, FOLDER_DISPLAY_CHARS)
        );

        let logger = if config.log {
            let mut logger = FileLogger::new()?;
            logger.log_init(&config, self.sorter.normalizer_name());
            if config.verbose {
                println!("Logging to {}", logger.path().display());
            }
            Some(logger)
        } else {
            None
        };
        let mut reporter = ConsoleReporter::new(logger, config.verbose);

        let total = self.sorter.scan(&mut reporter)?.total();
        if total == 0 {
            println!("No media files found");
            return Ok(());
        }

        if config.preview || config.dryrun {
            print_bold!("\nPreview:");
            println!("{}", self.sorter.preview(PREVIEW_LIMIT));
        }
        if config.dryrun {
            return Ok(());
        }

        if !config.auto && !Self::confirm(&format!("Sort {total} media files into folders? (y/n): "))? {
            println!("Skipped");
            return Ok(());
        }

        let run = self.sorter.sort(&mut reporter)?;
        if let Some(error) = run.rescan_error {
            print_error!("Failed to scan folder after sorting: {error}");
        }
        Ok(())
    }

    /// Ask a yes/no question from the user.
    fn confirm(prompt: &str) -> anyhow::Result<bool> {
        print!("{}", prompt.magenta());
        std::io::stdout().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        Ok(input.trim().eq_ignore_ascii_case("y"))
    }
}

impl ConsoleReporter {
    const fn new(logger: Option<FileLogger>, verbose: bool) -> Self {
        Self {
            logger,
            progress_bar: None,
            sort_start: None,
            verbose,
        }
    }

    fn print_statistics(result: &ScanResult) {
        print_bold!("Statistics:");
        println!("  {result}");
    }

    /// Create a progress bar that is hidden during tests.
    fn create_progress_bar() -> ProgressBar {
        #[cfg(test)]
        {
            ProgressBar::hidden()
        }
        #[cfg(not(test))]
        {
            let progress_bar = ProgressBar::new(100);
            progress_bar.set_style(
                ProgressStyle::default_bar()
                    .template(PROGRESS_BAR_TEMPLATE)
                    .expect("Failed to set progress bar template")
                    .progress_chars(PROGRESS_BAR_CHARS),
            );
            progress_bar
        }
    }
}

impl ProgressReporter for ConsoleReporter {
    fn on_scan_start(&mut self) {
        if self.verbose {
            println!("Scanning folder...");
        }
    }

    fn on_scan_complete(&mut self, result: &ScanResult) {
        if !result.is_empty() {
            println!("Found {} media files", result.total());
        }
        Self::print_statistics(result);
        if let Some(logger) = self.logger.as_mut() {
            logger.log_scan(result);
        }
    }

    fn on_sort_progress(&mut self, percent: u8, label: &str) {
        self.sort_start.get_or_insert_with(Instant::now);
        let progress_bar = self.progress_bar.get_or_insert_with(Self::create_progress_bar);
        progress_bar.set_position(u64::from(percent));
        progress_bar.set_message(label.to_string());
        if self.verbose {
            progress_bar.println(label);
        }
    }

    fn on_sort_file_error(&mut self, file_name: &str, message: &str) {
        let print = || print_error!("Error moving {file_name}: {message}");
        match self.progress_bar.as_ref() {
            Some(progress_bar) => progress_bar.suspend(print),
            None => print(),
        }
        if let Some(logger) = self.logger.as_mut() {
            logger.log_failure(file_name, message);
        }
    }

    fn on_sort_complete(&mut self, outcome: &SortOutcome) {
        if let Some(progress_bar) = self.progress_bar.take() {
            progress_bar.finish_and_clear();
        }
        let duration = self.sort_start.take().map(|start| start.elapsed()).unwrap_or_default();

        println!("{}", "─".repeat(60));
        print_bold!("Complete! Moved {} files", outcome.moved_count);
        if outcome.has_errors() {
            println!("{}", format!("Failed to move {} files:", outcome.errors.len()).red());
            for error in &outcome.errors {
                println!("  {error}");
            }
        }
        println!("Time: {}", media_sorter::format_duration(duration));

        if let Some(logger) = self.logger.as_mut() {
            logger.log_outcome(outcome, duration);
        }
    }
}

impl std::fmt::Debug for ConsoleReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleReporter")
            .field("logging", &self.logger.is_some())
            .field("sort_start", &self.sort_start)
            .field("verbose", &self.verbose)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs::{self, File};
    use std::sync::Arc;

    use tempfile::TempDir;

    use media_sorter::media_sort::DefaultNormalizer;

    #[test]
    fn console_reporter_tracks_sort_lifecycle() {
        let root = TempDir::new().expect("Failed to create temp dir");
        File::create(root.path().join("a_b.mp4")).expect("Failed to create test file");
        let mut sorter = MediaSorter::new(SortConfig::new(root.path().to_path_buf()), Arc::new(DefaultNormalizer));
        let mut reporter = ConsoleReporter::new(None, false);

        sorter.scan(&mut reporter).expect("scan should succeed");
        let run = sorter.sort(&mut reporter).expect("sort should succeed");

        assert_eq!(run.outcome.moved_count, 1);
        assert!(reporter.progress_bar.is_none());
        assert!(reporter.sort_start.is_none());
        assert!(root.path().join("A B").join("a_b.mp4").is_file());
    }

    #[test]
    fn console_reporter_logs_errors_to_file() {
        let root = TempDir::new().expect("Failed to create temp dir");
        let logger = FileLogger::in_directory(&root.path().join("logs")).expect("Failed to create logger");
        let log_path = logger.path().to_path_buf();
        let mut reporter = ConsoleReporter::new(Some(logger), false);

        reporter.on_sort_progress(0, "Processing [VIDEO]: a.mp4");
        reporter.on_sort_file_error("a.mp4", "Permission denied");
        reporter.on_sort_complete(&SortOutcome::default());

        let content = fs::read_to_string(log_path).expect("Failed to read log file");
        assert!(content.contains("ERROR   \"a.mp4\" | Permission denied"));
        assert!(content.contains("SUMMARY"));
    }
}
