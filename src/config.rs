//! # Configuration
//!
//! One immutable [`Config`] is built at startup and passed by reference into
//! the rest of the application. Values come from `~/.config/vitae/config.json`
//! (if present) with command-line flags applied on top by `main`.
//!
//! ## File Location
//!
//! ```text
//! ~/.config/vitae/config.json
//! ```
//!
//! The `directories` crate is used to resolve the platform-appropriate config
//! directory.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application configuration: where variants live, where PDFs go, which
/// compiler to invoke, and which theme to render with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory scanned for variant source files.
    #[serde(default = "default_variants_dir")]
    pub variants_dir: PathBuf,

    /// Directory that receives compiled PDFs (created at startup if missing).
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Extension of variant source files, without the leading dot.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Compiler executable resolved on the search path.
    #[serde(default = "default_compiler")]
    pub compiler: String,

    /// Name of the selected theme (must match a built-in theme name).
    #[serde(default = "default_theme_name")]
    pub theme: String,
}

fn default_variants_dir() -> PathBuf {
    PathBuf::from("variants")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_extension() -> String {
    "typ".to_string()
}

fn default_compiler() -> String {
    "typst".to_string()
}

fn default_theme_name() -> String {
    "Catppuccin Mocha".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            variants_dir: default_variants_dir(),
            output_dir: default_output_dir(),
            extension: default_extension(),
            compiler: default_compiler(),
            theme: default_theme_name(),
        }
    }
}

impl Config {
    /// Load configuration from disk. Returns `Config::default()` if the file
    /// does not exist or cannot be parsed.
    pub fn load() -> Self {
        Self::try_load().unwrap_or_default()
    }

    /// Try to load configuration, returning an error on failure.
    fn try_load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from a specific path. Returns `Config::default()` if
    /// the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save the current configuration to disk.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    /// Save the current configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Return the path to the config file.
    fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "vitae")
            .context("Could not determine config directory")?;
        Ok(dirs.config_dir().join("config.json"))
    }
}
