//! Configuration
//!
//! Layered with the `config` crate, lowest to highest precedence: built-in
//! defaults, the global file `$XDG_CONFIG_HOME/offcat/config.toml`, an explicit
//! `--config` file, then `OFFCAT__<SECTION>__<KEY>` environment variables.
//! Command-line flags are applied on top by the CLI.

pub mod facade;
pub mod merge;
pub mod paths;
pub mod sources;

pub use facade::ConfigLoader;

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CATALOG: &str = "offcat.catalog";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OffcatConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Catalog file location and encoding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
    /// Pretty-print JSON catalogs
    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
            pretty: true,
        }
    }
}

/// Defaults for `index`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    #[serde(default)]
    pub checksum: bool,
    #[serde(default)]
    pub archives: bool,
    #[serde(default = "default_true")]
    pub mime: bool,
    #[serde(default)]
    pub ignore: Vec<String>,
    #[serde(default)]
    pub follow_symlinks: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            checksum: false,
            archives: false,
            mime: true,
            ignore: Vec::new(),
            follow_symlinks: false,
        }
    }
}

/// Rendering defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_true")]
    pub color: bool,
    #[serde(default)]
    pub raw_size: bool,
    /// Field separator for csv output
    #[serde(default = "default_separator")]
    pub separator: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            raw_size: false,
            separator: default_separator(),
        }
    }
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from(DEFAULT_CATALOG)
}

fn default_separator() -> String {
    ",".to_string()
}

fn default_true() -> bool {
    true
}
