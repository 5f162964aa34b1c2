//! # Configuration Management Module
//!
//! All settings for a compilation run, loaded from a TOML file. Every section
//! has defaults, so an empty file (or none at all) describes the standard
//! layout: CSV exports under `ingestion/` compiled into `puzzle_mode_levels/`.
//!
//! ## Configuration Structure
//!
//! - [`SourcesConfig`] - paths of the two spreadsheet exports
//! - [`OutputLayout`] - output directory and file names
//! - [`ValidationConfig`] - optional strictness switches
//! - [`DeployConfig`] - where a finished tree is handed off to
//! - [`WatchConfig`] - polling and debounce for live regeneration
//! - [`LoggingConfig`] - log level and optional log file
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gemlevels::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("gemlevels.toml").await?;
//!     println!("Levels source: {}", config.sources.levels.display());
//!     println!("Output dir: {}", config.output.dir.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```toml
//! [sources]
//! levels = "ingestion/Levels - levels.csv"
//! worlds = "ingestion/Levels - worlds.csv"
//!
//! [output]
//! dir = "puzzle_mode_levels"
//! json_indent = 4
//!
//! [validation]
//! require_levels_in_every_world = true
//! strict_pieces = true
//!
//! [deploy]
//! target = "../game/assets/levels"
//! mode = "copy"
//! ```
//!
//! Relative paths resolve against the working directory of the process.

use crate::emit::OutputLayout;
use crate::model::RowRules;
use crate::output::DeployMode;
use crate::validate::SequenceRules;
use anyhow::{anyhow, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub output: OutputLayout,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub deploy: DeployConfig,
    #[serde(default)]
    pub watch: WatchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Levels table export.
    pub levels: PathBuf,
    /// Worlds table export.
    pub worlds: PathBuf,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            levels: PathBuf::from("ingestion/Levels - levels.csv"),
            worlds: PathBuf::from("ingestion/Levels - worlds.csv"),
        }
    }
}

impl SourcesConfig {
    pub fn paths(&self) -> [&Path; 2] {
        [&self.levels, &self.worlds]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Reject a declared world that has no levels.
    pub require_levels_in_every_world: bool,
    /// Reject queue entries that are not in the piece geometry table.
    pub strict_pieces: bool,
    /// Reject target patterns that list the same cell twice.
    pub reject_duplicate_cells: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            require_levels_in_every_world: true,
            strict_pieces: true,
            reject_duplicate_cells: true,
        }
    }
}

impl ValidationConfig {
    pub fn row_rules(&self) -> RowRules {
        RowRules {
            strict_pieces: self.strict_pieces,
            reject_duplicate_cells: self.reject_duplicate_cells,
        }
    }

    pub fn sequence_rules(&self) -> SequenceRules {
        SequenceRules {
            require_levels_in_every_world: self.require_levels_in_every_world,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    /// Asset directory of the consuming app. Deploy is unavailable when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<PathBuf>,
    pub mode: DeployMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// How often source modification times are checked (ms).
    pub poll_interval_ms: u64,
    /// Quiet period after the last detected change before a run starts (ms).
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
            debounce_ms: 1000,
        }
    }
}

impl WatchConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(10))
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of `error`, `warn`, `info`, `debug`, `trace`.
    pub level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Parsed level, falling back to `info` for unknown names.
    pub fn level_filter(&self) -> log::LevelFilter {
        match self.level.to_ascii_lowercase().as_str() {
            "off" => log::LevelFilter::Off,
            "error" => log::LevelFilter::Error,
            "warn" | "warning" => log::LevelFilter::Warn,
            "info" => log::LevelFilter::Info,
            "debug" => log::LevelFilter::Debug,
            "trace" => log::LevelFilter::Trace,
            _ => {
                eprintln!("Invalid log level '{}', defaulting to info", self.level);
                log::LevelFilter::Info
            }
        }
    }
}

impl Config {
    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| anyhow!("Failed to parse config: {}", e))
    }

    /// Load configuration from a file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path.display(), e))?;

        toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path.display(), e))
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if fs::metadata(path).await.is_err() {
            warn!("Config file {} not found, using defaults", path.display());
            return Ok(Config::default());
        }
        Self::load(path).await
    }

    /// Create a default configuration file
    pub async fn create_default(path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(&Config::default())
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path.display(), e))?;

        Ok(())
    }
}
