//! Environment variable source: OFFCAT_ prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;
use std::collections::HashMap;

/// Add environment variable overlay to builder.
/// Uses OFFCAT__ prefix and __ as separator for nested keys.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    add_to_builder_from(builder, None)
}

/// Same overlay reading from `source` instead of the process environment when given.
pub fn add_to_builder_from(
    builder: ConfigBuilder<DefaultState>,
    source: Option<HashMap<String, String>>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = builder.add_source(
        Environment::with_prefix("OFFCAT")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("index.ignore")
            .source(source),
    );
    Ok(builder)
}
