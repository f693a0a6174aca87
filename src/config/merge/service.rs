//! MergeService: orchestrates sources, applies merge policy, deserializes to OffcatConfig.

use crate::config::sources::{environment, explicit_file, global_file};
use crate::config::OffcatConfig;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};
use std::path::Path;

use super::policy;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Precedence: defaults (lowest) -> global file -> explicit file -> environment (highest).
    pub fn load(explicit: Option<&Path>) -> Result<OffcatConfig, ConfigError> {
        let builder = policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = match explicit {
            Some(path) => explicit_file::add_to_builder(builder, path)?,
            None => builder,
        };
        let builder = environment::add_to_builder(builder)?;
        Self::finish(builder)
    }

    pub(crate) fn finish(builder: ConfigBuilder<DefaultState>) -> Result<OffcatConfig, ConfigError> {
        builder.build()?.try_deserialize()
    }
}
