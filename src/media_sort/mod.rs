//! Media sort module for moving files into folders named after their titles.
//!
//! A scan classifies the direct children of a folder by extension and keeps the enabled categories.
//! A sort then moves each file into a subfolder named after the normalized title of its filename,
//! reporting progress and per-file errors through a [`ProgressReporter`].

mod category;
mod config;
mod error;
mod native;
mod progress;
mod scan;
mod sort;
mod sorter;
mod title;
mod types;

pub use category::{Category, CategorySet, DOCUMENT_EXTENSIONS, IMAGE_EXTENSIONS, VIDEO_EXTENSIONS};
pub use config::{MsortConfig, SortConfig};
pub use error::{Error, Result};
pub use native::{NativeCleaner, default_library_path, select_normalizer};
pub use progress::{ChannelReporter, EventLog, NoopReporter, ProgressEvent, ProgressReporter};
pub use scan::scan;
pub use sort::{SortEngine, progress_percent};
pub use sorter::{MediaSorter, PREVIEW_LIMIT, Preview, PreviewLine, SortRun};
pub use title::{
    AcceleratedNormalizer, CLEAN_BUFFER_SIZE, DefaultNormalizer, FALLBACK_TITLE, SubstitutionCleaner, TitleCleaner,
    TitleNormalizer, destination_title, title_for_file_name,
};
pub use types::{FileError, MediaEntry, ScanResult, SortOutcome};
