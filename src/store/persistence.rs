//! Text serialization backends for catalog files

use crate::error::StorageError;
use crate::store::CatalogBackend;
use crate::tree::catalog::CatalogTree;

/// JSON, the default format
#[derive(Debug, Clone, Copy)]
pub struct JsonBackend {
    pub pretty: bool,
}

impl CatalogBackend for JsonBackend {
    fn name(&self) -> &'static str {
        "json"
    }

    fn serialize(&self, tree: &CatalogTree) -> Result<Vec<u8>, StorageError> {
        let encoded = if self.pretty {
            serde_json::to_vec_pretty(tree)
        } else {
            serde_json::to_vec(tree)
        };
        encoded.map_err(|e| StorageError::Serialization(e.to_string()))
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<CatalogTree, StorageError> {
        serde_json::from_slice(bytes).map_err(|e| StorageError::Serialization(e.to_string()))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TomlBackend;

impl CatalogBackend for TomlBackend {
    fn name(&self) -> &'static str {
        "toml"
    }

    fn serialize(&self, tree: &CatalogTree) -> Result<Vec<u8>, StorageError> {
        toml::to_string_pretty(tree)
            .map(String::into_bytes)
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<CatalogTree, StorageError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        toml::from_str(text).map_err(|e| StorageError::Serialization(e.to_string()))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct YamlBackend;

impl CatalogBackend for YamlBackend {
    fn name(&self) -> &'static str {
        "yaml"
    }

    fn serialize(&self, tree: &CatalogTree) -> Result<Vec<u8>, StorageError> {
        serde_yaml::to_string(tree)
            .map(String::into_bytes)
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<CatalogTree, StorageError> {
        serde_yaml::from_slice(bytes).map_err(|e| StorageError::Serialization(e.to_string()))
    }
}
