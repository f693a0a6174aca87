//! Catalog tree: ordered storages plus catalog metadata

use crate::tree::node::{FileNode, NodeRef};
use crate::tree::storage::StorageNode;
use crate::types::{StorageId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const TOOL_NAME: &str = env!("CARGO_PKG_NAME");
pub const CATALOG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Whole persisted catalog
///
/// Storages keep insertion order, which is also display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogTree {
    #[serde(default = "default_tool")]
    pub tool: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub created: Timestamp,
    #[serde(default)]
    pub updated: Timestamp,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub storages: Vec<StorageNode>,
}

fn default_tool() -> String {
    TOOL_NAME.to_string()
}

impl Default for CatalogTree {
    fn default() -> Self {
        Self::new()
    }
}

/// A sibling-name collision found while validating a tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateName {
    pub storage: String,
    /// Path of the parent holding the duplicates; empty for the storage root
    pub parent: String,
    pub name: String,
}

impl CatalogTree {
    pub fn new() -> Self {
        let now = crate::types::now();
        Self {
            tool: default_tool(),
            version: CATALOG_VERSION.to_string(),
            created: now,
            updated: now,
            note: String::new(),
            storages: Vec::new(),
        }
    }

    pub fn storage_by_name(&self, name: &str) -> Option<&StorageNode> {
        self.storages.iter().find(|s| s.name == name)
    }

    pub fn storage_by_name_mut(&mut self, name: &str) -> Option<&mut StorageNode> {
        self.storages.iter_mut().find(|s| s.name == name)
    }

    pub fn storage_by_id(&self, id: StorageId) -> Option<&StorageNode> {
        self.storages.iter().find(|s| s.id == id)
    }

    pub fn add_storage(&mut self, storage: StorageNode) -> &mut StorageNode {
        self.storages.push(storage);
        let last = self.storages.len() - 1;
        &mut self.storages[last]
    }

    /// Remove a storage and its whole subtree
    pub fn remove_storage(&mut self, name: &str) -> Option<StorageNode> {
        let index = self.storages.iter().position(|s| s.name == name)?;
        Some(self.storages.remove(index))
    }

    /// Storage a node belongs to, through its `storage_id`
    pub fn owning_storage(&self, node: NodeRef<'_>) -> Option<&StorageNode> {
        self.storage_by_id(node.storage_id())
    }

    /// All storages as node views, in display order
    pub fn storage_refs(&self) -> Vec<NodeRef<'_>> {
        self.storages.iter().map(NodeRef::Storage).collect()
    }

    /// Sibling names that occur more than once anywhere in the tree
    pub fn duplicate_sibling_names(&self) -> Vec<DuplicateName> {
        let mut found = Vec::new();
        let mut storage_names = HashSet::new();
        for storage in &self.storages {
            if !storage_names.insert(storage.name.as_str()) {
                found.push(DuplicateName {
                    storage: storage.name.clone(),
                    parent: String::new(),
                    name: storage.name.clone(),
                });
            }
            collect_duplicates(&storage.name, "", &storage.children, &mut found);
        }
        found
    }
}

fn collect_duplicates(
    storage: &str,
    parent: &str,
    children: &[FileNode],
    found: &mut Vec<DuplicateName>,
) {
    let mut names = HashSet::new();
    for child in children {
        if !names.insert(child.name.as_str()) {
            found.push(DuplicateName {
                storage: storage.to_string(),
                parent: parent.to_string(),
                name: child.name.clone(),
            });
        }
        if !child.children.is_empty() {
            collect_duplicates(storage, &child.path(), &child.children, found);
        }
    }
}
