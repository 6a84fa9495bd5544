//! File classification by extension.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use serde::Deserialize;

pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "m4v", "3gp", "f4v", "m2ts", "ts",
];

pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "tiff", "tif", "webp", "svg", "ico", "raw", "heic", "heif",
];

pub const DOCUMENT_EXTENSIONS: &[&str] = &["pdf"];

/// Media category assigned from a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Video,
    Image,
    Document,
    #[value(skip)]
    None,
}

/// Set of categories that are eligible for scanning.
pub type CategorySet = BTreeSet<Category>;

impl Category {
    /// Categories that can be enabled, in display order.
    pub const MEDIA: [Self; 3] = [Self::Video, Self::Image, Self::Document];

    /// Classify a filename by its extension.
    ///
    /// The lowercase suffix after the last dot is matched against the fixed extension sets.
    /// Files without an extension, including dot-files like `.mp4`, are `None`.
    #[must_use]
    pub fn classify(filename: &str) -> Self {
        Self::from_path(Path::new(filename))
    }

    /// Classify a path by the extension of its final component.
    /// Invalid Unicode elsewhere in the name does not affect the result.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let Some(extension) = path.extension() else {
            return Self::None;
        };
        let extension = extension.to_string_lossy().to_lowercase();
        Self::MEDIA
            .into_iter()
            .find(|category| category.extensions().contains(&extension.as_str()))
            .unwrap_or(Self::None)
    }

    /// Lowercase extensions bound to this category, without the leading dot.
    #[must_use]
    pub const fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Video => VIDEO_EXTENSIONS,
            Self::Image => IMAGE_EXTENSIONS,
            Self::Document => DOCUMENT_EXTENSIONS,
            Self::None => &[],
        }
    }

    /// Short uppercase tag used in progress labels and previews.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Video => "VIDEO",
            Self::Image => "IMAGE",
            Self::Document => "PDF",
            Self::None => "UNKNOWN",
        }
    }

    /// Plural label used in statistics output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Video => "Videos",
            Self::Image => "Images",
            Self::Document => "PDFs",
            Self::None => "Other",
        }
    }

    /// Check if this category is in the enabled set.
    /// `None` is never eligible.
    #[must_use]
    pub fn is_enabled_in(self, enabled: &CategorySet) -> bool {
        self != Self::None && enabled.contains(&self)
    }

    /// All media categories enabled.
    #[must_use]
    pub fn all() -> CategorySet {
        Self::MEDIA.into_iter().collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Video => "video",
            Self::Image => "image",
            Self::Document => "document",
            Self::None => "none",
        };
        write!(f, "{name}")
    }
}
