//! Configuration for media sort operations.

use std::path::PathBuf;
use std::{fmt, fs};

use anyhow::Context;
use colored::Colorize;
use itertools::Itertools;
use serde::Deserialize;

use crate::media_sort::{Category, CategorySet};

/// Config from the user config file.
#[derive(Debug, Deserialize)]
pub struct MsortConfig {
    #[serde(default = "default_true")]
    pub video: bool,
    #[serde(default = "default_true")]
    pub image: bool,
    #[serde(default = "default_true")]
    pub document: bool,
    #[serde(default)]
    pub auto: bool,
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub dryrun: bool,
    #[serde(default)]
    pub log: bool,
    #[serde(default)]
    pub native_library: Option<PathBuf>,
    #[serde(default)]
    pub preview: bool,
    #[serde(default)]
    pub verbose: bool,
}

/// Wrapper needed for parsing the config section.
#[derive(Debug, Default, Deserialize)]
struct UserConfig {
    #[serde(default)]
    msort: MsortConfig,
}

/// Final config created from CLI arguments and user config file.
#[derive(Debug, Clone)]
pub struct SortConfig {
    pub root: PathBuf,
    pub enabled: CategorySet,
    pub auto: bool,
    pub debug: bool,
    pub dryrun: bool,
    pub log: bool,
    pub native_library: Option<PathBuf>,
    pub preview: bool,
    pub verbose: bool,
}

const fn default_true() -> bool {
    true
}

impl Default for MsortConfig {
    fn default() -> Self {
        Self {
            video: true,
            image: true,
            document: true,
            auto: false,
            debug: false,
            dryrun: false,
            log: false,
            native_library: None,
            preview: false,
            verbose: false,
        }
    }
}

impl MsortConfig {
    /// Try to read user config from the file if it exists.
    /// Otherwise, fall back to default config.
    ///
    /// # Errors
    /// Returns an error if config file exists but cannot be read or parsed.
    pub fn get_user_config() -> anyhow::Result<Self> {
        let Some(path) = crate::config::CONFIG_PATH.as_deref() else {
            return Ok(Self::default());
        };

        match fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse config file {}:\n{e}", path.display())),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => Err(anyhow::anyhow!(
                "Failed to read config file {}: {error}",
                path.display()
            )),
        }
    }

    /// Parse config from a TOML string.
    ///
    /// # Errors
    /// Returns an error if the TOML string is invalid.
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        toml::from_str::<UserConfig>(toml_str)
            .map(|config| config.msort)
            .with_context(|| "Failed to parse config TOML")
    }

    /// Categories switched on in the config file.
    #[must_use]
    pub fn enabled_categories(&self) -> CategorySet {
        [
            (Category::Video, self.video),
            (Category::Image, self.image),
            (Category::Document, self.document),
        ]
        .into_iter()
        .filter_map(|(category, enabled)| enabled.then_some(category))
        .collect()
    }
}

impl SortConfig {
    /// Config for the given root with all categories enabled and no other options.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            enabled: Category::all(),
            auto: false,
            debug: false,
            dryrun: false,
            log: false,
            native_library: None,
            preview: false,
            verbose: false,
        }
    }

    /// Restrict to the given categories.
    #[must_use]
    pub fn with_categories(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
        self.enabled = categories.into_iter().filter(|c| *c != Category::None).collect();
        self
    }

    /// Combine the user config file with command line overrides.
    ///
    /// Categories given on the command line replace the ones from the config file.
    ///
    /// # Errors
    /// Returns an error if no category ends up enabled.
    pub fn from_user_config(
        root: PathBuf,
        user_config: MsortConfig,
        categories: &[Category],
        native_library: Option<PathBuf>,
    ) -> anyhow::Result<Self> {
        let enabled: CategorySet = if categories.is_empty() {
            user_config.enabled_categories()
        } else {
            categories.iter().copied().filter(|c| *c != Category::None).collect()
        };
        if enabled.is_empty() {
            anyhow::bail!("No file types enabled, enable at least one of: video, image, document");
        }

        Ok(Self {
            root,
            enabled,
            auto: user_config.auto,
            debug: user_config.debug,
            dryrun: user_config.dryrun,
            log: user_config.log,
            native_library: native_library.or(user_config.native_library),
            preview: user_config.preview,
            verbose: user_config.verbose,
        })
    }
}

impl fmt::Display for SortConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "Config:".bold())?;
        writeln!(f, "  root: {}", self.root.display())?;
        writeln!(f, "  types: {}", self.enabled.iter().join(", "))?;
        writeln!(f, "  auto: {}", crate::colorize_bool(self.auto))?;
        writeln!(f, "  debug: {}", crate::colorize_bool(self.debug))?;
        writeln!(f, "  dryrun: {}", crate::colorize_bool(self.dryrun))?;
        writeln!(f, "  log: {}", crate::colorize_bool(self.log))?;
        writeln!(
            f,
            "  native_library: {}",
            self.native_library
                .as_ref()
                .map_or_else(|| "default".to_string(), |path| path.display().to_string())
        )?;
        writeln!(f, "  preview: {}", crate::colorize_bool(self.preview))?;
        write!(f, "  verbose: {}", crate::colorize_bool(self.verbose))
    }
}
