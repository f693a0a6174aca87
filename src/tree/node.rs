//! Catalog node types
//!
//! The catalog is a plain ownership tree: a `CatalogTree` owns its storages, a
//! `StorageNode` owns its top-level `FileNode`s and every `FileNode` owns its
//! children. The `storage_id` carried by file nodes is a lookup key, never a
//! pointer.

use crate::tree::storage::StorageNode;
use crate::types::{StorageId, Timestamp};
use crate::units;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Mode reported for storage roots
pub const STORAGE_MODE: &str = "drwxr-xr-x";
/// Mode reported for archive containers
pub const ARCHIVE_MODE: &str = "dr-xr-xr-x";

/// Kind of a non-storage node, as persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    File,
    #[serde(rename = "dir")]
    Directory,
    Archive,
    Archived,
}

impl FileKind {
    /// Directories and archive containers hold children; files and archived entries do not
    pub fn may_have_children(self) -> bool {
        matches!(self, FileKind::Directory | FileKind::Archive)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FileKind::File => "file",
            FileKind::Directory => "dir",
            FileKind::Archive => "archive",
            FileKind::Archived => "archived",
        }
    }
}

/// Exhaustive discriminator over the five node variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Storage,
    Directory,
    File,
    Archive,
    Archived,
}

impl NodeType {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Storage => "storage",
            NodeType::Directory => "dir",
            NodeType::File => "file",
            NodeType::Archive => "archive",
            NodeType::Archived => "archived",
        }
    }
}

impl From<FileKind> for NodeType {
    fn from(kind: FileKind) -> Self {
        match kind {
            FileKind::File => NodeType::File,
            FileKind::Directory => NodeType::Directory,
            FileKind::Archive => NodeType::Archive,
            FileKind::Archived => NodeType::Archived,
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File, directory, archive container or archived entry
///
/// `relpath` is relative to the storage source and uses `/` separators. For an
/// archived entry it is the relpath of the containing archive; the in-archive
/// name lives in `name`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileNode {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FileKind,
    pub relpath: String,
    pub size: u64,
    #[serde(default)]
    pub maccess: Timestamp,
    #[serde(rename = "ts", default)]
    pub indexed_at: Timestamp,
    #[serde(default)]
    pub mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
    pub storage_id: StorageId,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
    /// Set while reconciling; never persisted
    #[serde(skip)]
    pub seen: bool,
    #[serde(default)]
    pub children: Vec<FileNode>,
}

impl PartialEq for FileNode {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.kind == other.kind
            && self.relpath == other.relpath
            && self.size == other.size
            && self.maccess == other.maccess
            && self.indexed_at == other.indexed_at
            && self.mode == other.mode
            && self.checksum == other.checksum
            && self.mime == other.mime
            && self.storage_id == other.storage_id
            && self.extra == other.extra
            && self.children == other.children
    }
}

impl FileNode {
    pub fn new(
        name: impl Into<String>,
        kind: FileKind,
        relpath: impl Into<String>,
        storage_id: StorageId,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            relpath: relpath.into(),
            size: 0,
            maccess: 0,
            indexed_at: crate::types::now(),
            mode: String::new(),
            checksum: None,
            mime: None,
            storage_id,
            extra: BTreeMap::new(),
            seen: true,
            children: Vec::new(),
        }
    }

    /// Archive member attached to the container at `archive_relpath`
    pub fn archived(
        name: impl Into<String>,
        archive_relpath: impl Into<String>,
        size: u64,
        maccess: Option<Timestamp>,
        storage_id: StorageId,
    ) -> Self {
        let mut node = Self::new(name, FileKind::Archived, archive_relpath, storage_id);
        node.size = size;
        node.maccess = maccess.unwrap_or(0);
        node
    }

    /// Path relative to the storage root, including the in-archive name for archived entries
    pub fn path(&self) -> String {
        match self.kind {
            FileKind::Archived if self.relpath.is_empty() => self.name.clone(),
            FileKind::Archived => format!("{}/{}", self.relpath, self.name),
            _ => self.relpath.clone(),
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }

    pub fn may_have_children(&self) -> bool {
        self.kind.may_have_children()
    }

    /// Three `x` in the mode string
    pub fn is_exec(&self) -> bool {
        self.mode.matches('x').count() == 3
    }

    pub fn child(&self, name: &str) -> Option<&FileNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut FileNode> {
        self.children.iter_mut().find(|c| c.name == name)
    }

    /// Append a child and return a handle to it
    pub fn add_child(&mut self, node: FileNode) -> &mut FileNode {
        push_child(&mut self.children, node)
    }

    pub fn remove_child(&mut self, name: &str) -> Option<FileNode> {
        remove_named(&mut self.children, name)
    }

    /// Post-order aggregate: returns `(size, leaf count)` and stores the size on containers
    pub fn recompute_sizes(&mut self) -> (u64, u64) {
        if !self.may_have_children() {
            return (self.size, 1);
        }
        let (size, count) = aggregate(&mut self.children);
        self.size = size;
        (size, count)
    }

    /// Clear the seen flag on this node and its descendants
    pub fn reset_seen(&mut self) {
        self.seen = false;
        for child in &mut self.children {
            child.reset_seen();
        }
    }

    /// Attribute set consumed by renderers; empty unless `long`
    pub fn attributes(&self, raw_size: bool, long: bool) -> BTreeMap<String, String> {
        let mut attrs = BTreeMap::new();
        if !long {
            return attrs;
        }
        attrs.insert("size".to_string(), units::size_to_string(self.size, raw_size));
        attrs.insert("mode".to_string(), self.display_mode().to_string());
        attrs.insert("type".to_string(), self.kind.as_str().to_string());
        attrs.insert("maccess".to_string(), units::date_to_string(self.maccess));
        attrs.insert("indexed".to_string(), units::date_to_string(self.indexed_at));
        if let Some(checksum) = &self.checksum {
            attrs.insert("checksum".to_string(), checksum.clone());
        }
        if let Some(mime) = &self.mime {
            attrs.insert("mime".to_string(), mime.clone());
        }
        for (key, value) in &self.extra {
            attrs.insert(key.clone(), value.clone());
        }
        attrs.insert("children".to_string(), self.children.len().to_string());
        attrs
    }

    fn display_mode(&self) -> &str {
        if self.kind == FileKind::Archive {
            ARCHIVE_MODE
        } else {
            &self.mode
        }
    }
}

pub(crate) fn push_child(children: &mut Vec<FileNode>, node: FileNode) -> &mut FileNode {
    children.push(node);
    let last = children.len() - 1;
    &mut children[last]
}

pub(crate) fn remove_named(children: &mut Vec<FileNode>, name: &str) -> Option<FileNode> {
    let index = children.iter().position(|c| c.name == name)?;
    Some(children.remove(index))
}

pub(crate) fn aggregate(children: &mut [FileNode]) -> (u64, u64) {
    children
        .iter_mut()
        .map(FileNode::recompute_sizes)
        .fold((0, 0), |(size, count), (s, c)| (size + s, count + c))
}

/// Borrowed view over any node variant
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Storage(&'a StorageNode),
    File(&'a FileNode),
}

impl<'a> NodeRef<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            NodeRef::Storage(s) => &s.name,
            NodeRef::File(f) => &f.name,
        }
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            NodeRef::Storage(_) => NodeType::Storage,
            NodeRef::File(f) => f.kind.into(),
        }
    }

    pub fn size(&self) -> u64 {
        match self {
            NodeRef::Storage(s) => s.size,
            NodeRef::File(f) => f.size,
        }
    }

    pub fn maccess(&self) -> Timestamp {
        match self {
            NodeRef::Storage(s) => s.indexed_at,
            NodeRef::File(f) => f.maccess,
        }
    }

    /// Stored mode, synthesized for storages and archive containers
    pub fn mode(&self) -> &'a str {
        match self {
            NodeRef::Storage(_) => STORAGE_MODE,
            NodeRef::File(f) => f.display_mode(),
        }
    }

    /// Path relative to the owning storage; empty for the storage itself
    pub fn path(&self) -> String {
        match self {
            NodeRef::Storage(_) => String::new(),
            NodeRef::File(f) => f.path(),
        }
    }

    pub fn children(&self) -> &'a [FileNode] {
        match self {
            NodeRef::Storage(s) => &s.children,
            NodeRef::File(f) => &f.children,
        }
    }

    pub fn may_have_children(&self) -> bool {
        match self {
            NodeRef::Storage(_) => true,
            NodeRef::File(f) => f.may_have_children(),
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.name().starts_with('.')
    }

    pub fn storage_id(&self) -> StorageId {
        match self {
            NodeRef::Storage(s) => s.id,
            NodeRef::File(f) => f.storage_id,
        }
    }

    pub fn as_file(&self) -> Option<&'a FileNode> {
        match self {
            NodeRef::File(f) => Some(f),
            NodeRef::Storage(_) => None,
        }
    }

    pub fn attributes(&self, raw_size: bool, long: bool) -> BTreeMap<String, String> {
        match self {
            NodeRef::Storage(s) => s.attributes(raw_size, long),
            NodeRef::File(f) => f.attributes(raw_size, long),
        }
    }

    /// Whether a filesystem projection shows this node as a directory.
    ///
    /// Archived entries count as directories only when they carry children.
    pub fn is_projected_dir(&self) -> bool {
        match self.node_type() {
            NodeType::Storage | NodeType::Directory | NodeType::Archive => true,
            NodeType::File => false,
            NodeType::Archived => !self.children().is_empty(),
        }
    }
}

impl<'a> From<&'a StorageNode> for NodeRef<'a> {
    fn from(storage: &'a StorageNode) -> Self {
        NodeRef::Storage(storage)
    }
}

impl<'a> From<&'a FileNode> for NodeRef<'a> {
    fn from(file: &'a FileNode) -> Self {
        NodeRef::File(file)
    }
}
