//! Configuration module for the hlct CLI.
//!
//! Loads the optional `hlct.toml` that supplies default layout
//! parameters and the default output format. Precedence, highest first:
//! command-line flags, the config file, `HLC_*` environment variables,
//! built-in defaults.

use dirs::{config_dir, home_dir};
use hlc_layout::HeapLayoutConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::commands::common::OutputFormat;
use crate::error::{HlctError, Result};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "hlct.toml";

/// Application configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "ConfigFile")]
pub struct Config {
    /// Default report format.
    pub format: OutputFormat,

    /// Default layout parameters.
    pub layout: HeapLayoutConfig,

    /// Compressed-oop defaults.
    pub oops: OopsConfig,
}

/// On-disk shape of `hlct.toml`, every key optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    format: OutputFormat,
    layout: LayoutTable,
    oops: OopsConfig,
}

/// The `[layout]` table. Keys left out fall through to the `HLC_*`
/// environment, then to the built-in defaults.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
struct LayoutTable {
    heap_size_bytes: Option<u64>,
    region_size_bytes: Option<u64>,
    card_size_bytes: Option<u64>,
    object_alignment_bytes: Option<u64>,
}

impl LayoutTable {
    /// Overlay the keys present in the file onto `base`.
    fn apply(self, base: HeapLayoutConfig) -> HeapLayoutConfig {
        HeapLayoutConfig {
            heap_size_bytes: self.heap_size_bytes.unwrap_or(base.heap_size_bytes),
            region_size_bytes: self.region_size_bytes.unwrap_or(base.region_size_bytes),
            card_size_bytes: self.card_size_bytes.unwrap_or(base.card_size_bytes),
            object_alignment_bytes: self
                .object_alignment_bytes
                .unwrap_or(base.object_alignment_bytes),
        }
    }
}

impl From<ConfigFile> for Config {
    fn from(file: ConfigFile) -> Self {
        Self {
            format: file.format,
            layout: file.layout.apply(HeapLayoutConfig::from_env()),
            oops: file.oops,
        }
    }
}

/// Compressed-oop configuration options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OopsConfig {
    /// Address the heap is reserved at.
    #[serde(default = "default_heap_base")]
    pub heap_base: u64,
}

/// Heap base the collector typically lands on for an 8GB zero-based heap.
fn default_heap_base() -> u64 {
    0x0000_0006_0000_0000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            layout: HeapLayoutConfig::from_env(),
            oops: OopsConfig::default(),
        }
    }
}

impl Default for OopsConfig {
    fn default() -> Self {
        Self {
            heap_base: default_heap_base(),
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Searches for configuration in the following order:
    /// 1. Current directory
    /// 2. User's home directory
    /// 3. System configuration directory
    ///
    /// Returns the default configuration if no config file is found.
    pub fn load() -> Result<Self> {
        match Self::find_config_file() {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(HlctError::Config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| HlctError::Config(format!("Failed to parse configuration: {}", e)))?;

        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a specific path.
    #[cfg(test)]
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            HlctError::Config(format!("Failed to serialize configuration: {}", e))
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check for config in current directory.
    fn check_current_dir_config() -> Option<PathBuf> {
        let path = PathBuf::from(CONFIG_FILE_NAME);
        path.exists().then_some(path)
    }

    /// Check for config in home directory.
    fn check_home_config() -> Option<PathBuf> {
        home_dir()
            .map(|dir| dir.join(".config").join("hlct").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }

    /// Check for config in system config directory.
    fn check_system_config() -> Option<PathBuf> {
        config_dir()
            .map(|dir| dir.join("hlct").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }

    /// Find the configuration file in standard locations.
    fn find_config_file() -> Option<PathBuf> {
        Self::check_current_dir_config()
            .or_else(Self::check_home_config)
            .or_else(Self::check_system_config)
    }
}
