//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::OffcatConfig;
use config::ConfigError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the global file, an optional explicit file and environment.
    pub fn load(explicit: Option<&Path>) -> Result<OffcatConfig, ConfigError> {
        MergeService::load(explicit)
    }

    /// Create default configuration.
    pub fn default() -> OffcatConfig {
        OffcatConfig::default()
    }
}
