//! Built-in defaults, the lowest layer of every merge.

use crate::config::DEFAULT_CATALOG;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Builder seeded with the defaults every later source overrides.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("catalog.path", DEFAULT_CATALOG)?
        .set_default("catalog.pretty", true)?
        .set_default("index.checksum", false)?
        .set_default("index.archives", false)?
        .set_default("index.mime", true)?
        .set_default("index.ignore", Vec::<String>::new())?
        .set_default("index.follow_symlinks", false)?
        .set_default("output.color", true)?
        .set_default("output.raw_size", false)?
        .set_default("output.separator", ",")
}
