//! Catalog Store
//!
//! Loads and saves a whole `CatalogTree` through a serialization backend
//! chosen from the catalog file extension.

pub mod persistence;

use crate::error::StorageError;
use crate::tree::catalog::CatalogTree;
use persistence::{JsonBackend, TomlBackend, YamlBackend};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Serialization backend for a whole tree
pub trait CatalogBackend {
    fn name(&self) -> &'static str;
    fn serialize(&self, tree: &CatalogTree) -> Result<Vec<u8>, StorageError>;
    fn deserialize(&self, bytes: &[u8]) -> Result<CatalogTree, StorageError>;
}

/// Backend implied by the catalog path; unknown extensions use JSON
pub fn backend_for(path: &Path, pretty: bool) -> Box<dyn CatalogBackend> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("toml") => Box::new(TomlBackend),
        Some("yaml") | Some("yml") => Box::new(YamlBackend),
        _ => Box::new(JsonBackend { pretty }),
    }
}

/// A catalog file on disk
pub struct Catalog {
    path: PathBuf,
    backend: Box<dyn CatalogBackend>,
}

impl Catalog {
    pub fn new(path: impl Into<PathBuf>, pretty: bool) -> Self {
        let path = path.into();
        let backend = backend_for(&path, pretty);
        Self { path, backend }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read and decode the catalog; malformed content is a hard error
    pub fn load(&self) -> Result<CatalogTree, StorageError> {
        debug!(path = %self.path.display(), backend = self.backend.name(), "Loading catalog");
        let bytes = std::fs::read(&self.path)?;
        let tree = self
            .backend
            .deserialize(&bytes)
            .map_err(|e| StorageError::Corrupt {
                path: self.path.clone(),
                message: e.to_string(),
            })?;
        for dup in tree.duplicate_sibling_names() {
            warn!(
                storage = %dup.storage,
                parent = %dup.parent,
                name = %dup.name,
                "Duplicate sibling name in catalog"
            );
        }
        Ok(tree)
    }

    /// Load when the file exists, otherwise start an empty tree
    pub fn load_or_new(&self) -> Result<CatalogTree, StorageError> {
        if self.exists() {
            self.load()
        } else {
            Ok(CatalogTree::new())
        }
    }

    /// Refresh `updated` and write the tree
    pub fn save(&self, tree: &mut CatalogTree) -> Result<(), StorageError> {
        tree.updated = crate::types::now();
        let bytes = self.backend.serialize(tree)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, bytes)?;
        debug!(path = %self.path.display(), storages = tree.storages.len(), "Catalog saved");
        Ok(())
    }
}
