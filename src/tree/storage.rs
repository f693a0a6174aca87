//! Storage roots
//!
//! A storage is the indexed root of one filesystem source (a drive, a folder).

use crate::tree::node::{aggregate, push_child, remove_named, FileNode};
use crate::types::{StorageId, Timestamp};
use crate::units;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::hash::Hasher;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Root of one indexed source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageNode {
    pub id: StorageId,
    pub name: String,
    /// Absolute source path at last index time
    pub path: PathBuf,
    pub size: u64,
    #[serde(default)]
    pub free: u64,
    #[serde(default)]
    pub total: u64,
    #[serde(rename = "ts", default)]
    pub indexed_at: Timestamp,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub meta: String,
    #[serde(rename = "nb_files", default)]
    pub total_files: u64,
    #[serde(default)]
    pub children: Vec<FileNode>,
}

impl StorageNode {
    /// Fresh storage with an id derived from its name and the current time
    pub fn new(
        name: impl Into<String>,
        source: impl Into<PathBuf>,
        meta: impl Into<String>,
        tags: impl IntoIterator<Item = String>,
    ) -> Self {
        let name = name.into();
        let now = chrono::Local::now();
        let id = derive_id(&name, &now.format("%Y-%m-%d %H:%M:%S").to_string());
        Self {
            id,
            name,
            path: source.into(),
            size: 0,
            free: 0,
            total: 0,
            indexed_at: now.timestamp(),
            tags: tags.into_iter().collect(),
            meta: meta.into(),
            total_files: 0,
            children: Vec::new(),
        }
    }

    /// Refresh the source path, disk usage and index time; tags are merged
    pub fn update_source(
        &mut self,
        source: &Path,
        meta: Option<&str>,
        tags: impl IntoIterator<Item = String>,
    ) {
        self.path = source.to_path_buf();
        self.indexed_at = crate::types::now();
        if let Some(meta) = meta {
            self.meta = meta.to_string();
        }
        self.tags.extend(tags);
        self.free = fs2::available_space(source).unwrap_or_else(|e| {
            warn!(path = %source.display(), error = %e, "Cannot read free space");
            0
        });
        self.total = fs2::total_space(source).unwrap_or_else(|e| {
            warn!(path = %source.display(), error = %e, "Cannot read total space");
            0
        });
    }

    pub fn tag(&mut self, tag: &str) {
        self.tags.insert(tag.to_string());
    }

    pub fn untag(&mut self, tag: &str) -> bool {
        self.tags.remove(tag)
    }

    pub fn set_meta(&mut self, meta: impl Into<String>) {
        self.meta = meta.into();
    }

    pub fn child(&self, name: &str) -> Option<&FileNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut FileNode> {
        self.children.iter_mut().find(|c| c.name == name)
    }

    pub fn add_child(&mut self, node: FileNode) -> &mut FileNode {
        push_child(&mut self.children, node)
    }

    pub fn remove_child(&mut self, name: &str) -> Option<FileNode> {
        remove_named(&mut self.children, name)
    }

    /// Walk `/`-separated on-disk relpath segments down from the root
    pub fn node_at_mut(&mut self, relpath: &str) -> Option<&mut FileNode> {
        let mut segments = relpath.split('/').filter(|s| !s.is_empty());
        let first = segments.next()?;
        let mut current = self.child_mut(first)?;
        for segment in segments {
            current = current.child_mut(segment)?;
        }
        Some(current)
    }

    /// Recompute aggregate sizes over the whole subtree; returns `(size, files)`
    pub fn recompute_sizes(&mut self) -> (u64, u64) {
        let (size, count) = aggregate(&mut self.children);
        debug!(
            storage = %self.name,
            size,
            files = count,
            "Storage aggregate recomputed"
        );
        self.size = size;
        self.total_files = count;
        (size, count)
    }

    pub fn reset_seen(&mut self) {
        for child in &mut self.children {
            child.reset_seen();
        }
    }

    /// Attribute set consumed by renderers; `meta` and `tags` only when `long`
    pub fn attributes(&self, raw_size: bool, long: bool) -> BTreeMap<String, String> {
        let mut attrs = BTreeMap::new();
        attrs.insert("nbfiles".to_string(), self.total_files.to_string());
        attrs.insert("size".to_string(), units::size_to_string(self.size, raw_size));
        let total = units::size_to_string(self.total, raw_size);
        attrs.insert("fs_size".to_string(), total.clone());
        let free = match self.total {
            0 => "??".to_string(),
            total => format!("{}%", self.free.saturating_mul(100) / total),
        };
        attrs.insert("fs_free".to_string(), free);
        let used = units::size_to_string(self.total.saturating_sub(self.free), raw_size);
        attrs.insert("fs_du".to_string(), format!("{}/{}", used, total));
        attrs.insert("indexed".to_string(), units::date_to_string(self.indexed_at));
        if !long {
            return attrs;
        }
        attrs.insert("meta".to_string(), self.meta.clone());
        let tags: Vec<&str> = self.tags.iter().map(String::as_str).collect();
        attrs.insert("tags".to_string(), tags.join(","));
        attrs
    }
}

/// FNV-1a over `name` followed by `created`, folded to 32 bits
pub fn derive_id(name: &str, created: &str) -> StorageId {
    let mut hasher = fnv::FnvHasher::default();
    hasher.write(name.as_bytes());
    hasher.write(created.as_bytes());
    fold_to_u32(hasher.finish())
}

fn fold_to_u32(hash: u64) -> u32 {
    ((hash >> 32) as u32) ^ (hash as u32)
}
