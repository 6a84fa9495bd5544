//! Title normalization from filenames.
//!
//! A title is produced in two phases:
//! the separator characters `_`, `-` and `.` are substituted with spaces,
//! and the result is split into words which each get an uppercase first letter.
//! The first phase can be delegated to a native routine through [`TitleCleaner`].

use std::path::Path;

use crate::os_str_to_string;

/// Title used when a filename normalizes to nothing.
pub const FALLBACK_TITLE: &str = "Unknown";

/// Output buffer size of the native cleaner, including the NUL terminator.
pub const CLEAN_BUFFER_SIZE: usize = 512;

const SEPARATORS: [char; 3] = ['_', '-', '.'];

/// Converts a raw filename into a display title.
pub trait TitleNormalizer: Send + Sync {
    /// Normalize the given raw name.
    fn normalize(&self, raw_name: &str) -> String;

    /// Short name of the strategy for status output.
    fn name(&self) -> &'static str;

    /// True when the substitution phase runs in a native routine.
    fn is_accelerated(&self) -> bool {
        false
    }
}

/// Character substitution phase writing into a fixed-size, NUL-terminated buffer.
pub trait TitleCleaner: Send + Sync {
    fn clean_title(&self, input: &[u8], output: &mut [u8; CLEAN_BUFFER_SIZE]);
}

/// Pure Rust normalization.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultNormalizer;

/// Normalization with the substitution phase delegated to a [`TitleCleaner`].
#[derive(Debug)]
pub struct AcceleratedNormalizer<C> {
    cleaner: C,
}

/// In-process cleaner with the same buffer contract as the native routine.
#[derive(Debug, Default, Clone, Copy)]
pub struct SubstitutionCleaner;

impl TitleNormalizer for DefaultNormalizer {
    fn normalize(&self, raw_name: &str) -> String {
        capitalize_words(&substitute_separators(raw_name))
    }

    fn name(&self) -> &'static str {
        "default"
    }
}

impl<C: TitleCleaner> AcceleratedNormalizer<C> {
    pub const fn new(cleaner: C) -> Self {
        Self { cleaner }
    }
}

impl<C: TitleCleaner> TitleNormalizer for AcceleratedNormalizer<C> {
    fn normalize(&self, raw_name: &str) -> String {
        let mut output = [0u8; CLEAN_BUFFER_SIZE];
        self.cleaner.clean_title(raw_name.as_bytes(), &mut output);
        // Last byte is reserved for the terminator even if the cleaner wrote past it.
        let usable = &output[..CLEAN_BUFFER_SIZE - 1];
        let length = usable.iter().position(|&byte| byte == 0).unwrap_or(usable.len());
        let cleaned = String::from_utf8_lossy(&usable[..length]);
        capitalize_words(cleaned.trim())
    }

    fn name(&self) -> &'static str {
        "native"
    }

    fn is_accelerated(&self) -> bool {
        true
    }
}

impl TitleCleaner for SubstitutionCleaner {
    fn clean_title(&self, input: &[u8], output: &mut [u8; CLEAN_BUFFER_SIZE]) {
        let length = input.len().min(CLEAN_BUFFER_SIZE - 1);
        for (target, &byte) in output.iter_mut().zip(&input[..length]) {
            *target = if matches!(byte, b'_' | b'-' | b'.') { b' ' } else { byte };
        }
        output[length] = 0;
    }
}

/// Replace each separator character with a space.
#[must_use]
pub fn substitute_separators(raw_name: &str) -> String {
    raw_name.replace(SEPARATORS, " ")
}

/// Split on whitespace, uppercase the first character of each word and join with single spaces.
/// The rest of each word is kept as-is.
#[must_use]
pub fn capitalize_words(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect::<String>()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalize the file stem of the given filename.
/// Can return an empty string.
#[must_use]
pub fn title_for_file_name(normalizer: &dyn TitleNormalizer, file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .map(os_str_to_string)
        .unwrap_or_default();
    normalizer.normalize(&stem)
}

/// Destination folder name for the given filename, with the fallback title for empty results.
#[must_use]
pub fn destination_title(normalizer: &dyn TitleNormalizer, file_name: &str) -> String {
    let title = title_for_file_name(normalizer, file_name);
    if title.is_empty() {
        FALLBACK_TITLE.to_string()
    } else {
        title
    }
}
