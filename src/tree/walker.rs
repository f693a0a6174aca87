//! Indexer: reconcile a live filesystem into a storage subtree
//!
//! One pass walks the source depth-first, creating or refreshing nodes and
//! marking them seen, then sweeps the storage for nodes that were not seen
//! and removes them in a second phase, then recomputes aggregate sizes.

use crate::archive::{ArchiveAdapter, DefaultArchiveAdapter};
use crate::error::IndexError;
use crate::tree::hasher;
use crate::tree::mime;
use crate::tree::node::{FileKind, FileNode, NodeRef};
use crate::tree::storage::StorageNode;
use crate::tree::traverse;
use crate::types::{StorageId, Timestamp};
use glob::{MatchOptions, Pattern};
use std::collections::{HashMap, HashSet};
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tracing::{debug, info, warn};
use unicode_normalization::UnicodeNormalization;
use walkdir::WalkDir;

/// Indexing options
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    pub checksum: bool,
    pub mime: bool,
    pub archives: bool,
    /// Shell globs matched against the full path of every visited entry
    pub ignore_patterns: Vec<String>,
    pub follow_symlinks: bool,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            checksum: false,
            mime: true,
            archives: false,
            ignore_patterns: Vec::new(),
            follow_symlinks: false,
        }
    }
}

/// Outcome of one indexing pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexReport {
    /// Filesystem entries created or refreshed
    pub entries: u64,
    /// Archive members attached
    pub archived: u64,
    /// Subtrees removed because they vanished from disk
    pub pruned: u64,
    /// Aggregate size of the storage after the pass
    pub size: u64,
    /// Leaf count of the storage after the pass
    pub files: u64,
}

pub struct Walker {
    config: WalkerConfig,
    ignores: Vec<Pattern>,
    adapter: Box<dyn ArchiveAdapter>,
}

impl Walker {
    pub fn new(config: WalkerConfig) -> Result<Self, IndexError> {
        let ignores = config
            .ignore_patterns
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|e| IndexError::InvalidPattern {
                    pattern: p.clone(),
                    message: e.msg.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            config,
            ignores,
            adapter: Box::new(DefaultArchiveAdapter),
        })
    }

    pub fn with_adapter(mut self, adapter: Box<dyn ArchiveAdapter>) -> Self {
        self.adapter = adapter;
        self
    }

    /// Reconcile `storage` against the directory at `source`.
    ///
    /// Only an invalid source or an unreadable top-level listing is fatal;
    /// every other per-entry failure is logged and skipped.
    pub fn index(
        &self,
        storage: &mut StorageNode,
        source: &Path,
    ) -> Result<IndexReport, IndexError> {
        if !source.is_dir() {
            return Err(IndexError::InvalidSource(source.to_path_buf()));
        }
        info!(storage = %storage.name, source = %source.display(), "Indexing storage");

        storage.reset_seen();
        let mut report = IndexReport::default();
        let storage_id = storage.id;
        let mut ancestors =
            vec![dunce::canonicalize(source).unwrap_or_else(|_| source.to_path_buf())];
        self.walk_dir(
            source,
            "",
            storage_id,
            &mut storage.children,
            &mut report,
            &mut ancestors,
        )?;

        report.pruned = prune_unseen(storage);
        let (size, files) = storage.recompute_sizes();
        report.size = size;
        report.files = files;

        info!(
            storage = %storage.name,
            entries = report.entries,
            archived = report.archived,
            pruned = report.pruned,
            "Indexing complete"
        );
        Ok(report)
    }

    fn walk_dir(
        &self,
        dir: &Path,
        parent_relpath: &str,
        storage_id: StorageId,
        children: &mut Vec<FileNode>,
        report: &mut IndexReport,
        ancestors: &mut Vec<PathBuf>,
    ) -> Result<(), IndexError> {
        let top = ancestors.len() == 1;
        let listing = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name();

        let mut by_name: HashMap<String, usize> = children
            .iter()
            .enumerate()
            .map(|(index, child)| (child.name.clone(), index))
            .collect();

        for entry in listing {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if top && e.depth() == 0 => {
                    return Err(IndexError::ListFailed {
                        path: dir.to_path_buf(),
                        source: e,
                    });
                }
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "Skipping unreadable entry");
                    continue;
                }
            };

            let path = entry.path();
            if self.must_ignore(path) {
                info!(path = %path.display(), "Ignoring");
                continue;
            }
            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Cannot read metadata");
                    continue;
                }
            };

            let name: String = entry.file_name().to_string_lossy().nfc().collect();
            let relpath = if parent_relpath.is_empty() {
                name.clone()
            } else {
                format!("{}/{}", parent_relpath, name)
            };
            let kind = if metadata.is_dir() {
                FileKind::Directory
            } else {
                FileKind::File
            };

            let node = match by_name.get(&name).copied() {
                Some(index) => {
                    debug!(path = %relpath, "Updating node");
                    let node = &mut children[index];
                    refresh(node, &metadata, kind);
                    node
                }
                None => {
                    debug!(path = %relpath, "Creating node");
                    let mut node = FileNode::new(name.clone(), kind, relpath.clone(), storage_id);
                    refresh(&mut node, &metadata, kind);
                    by_name.insert(name, children.len());
                    children.push(node);
                    let last = children.len() - 1;
                    &mut children[last]
                }
            };
            report.entries += 1;

            if kind == FileKind::Directory {
                let real = if self.config.follow_symlinks {
                    match dunce::canonicalize(path) {
                        Ok(real) => real,
                        Err(e) => {
                            warn!(path = %path.display(), error = %e, "Cannot resolve directory");
                            continue;
                        }
                    }
                } else {
                    path.to_path_buf()
                };
                if ancestors.contains(&real) {
                    warn!(
                        path = %path.display(),
                        target = %real.display(),
                        "Skipping symlink loop"
                    );
                    continue;
                }
                ancestors.push(real);
                let walked =
                    self.walk_dir(path, &relpath, storage_id, &mut node.children, report, ancestors);
                ancestors.pop();
                walked?;
                continue;
            }
            if metadata.file_type().is_symlink() {
                continue;
            }
            self.enrich(path, node, report);
        }
        Ok(())
    }

    /// Mime, checksum and archive expansion for a regular file
    fn enrich(&self, path: &Path, node: &mut FileNode, report: &mut IndexReport) {
        if self.config.mime {
            node.mime = mime::detect(path);
        }
        if self.config.checksum {
            match hasher::checksum_file(path) {
                Ok(sum) => node.checksum = Some(sum),
                Err(e) => warn!(path = %path.display(), error = %e, "Checksum failed"),
            }
        }
        if self.config.archives && self.adapter.is_archive(path) {
            report.archived += self.expand_archive(path, node);
        }
    }

    /// Attach archive members flat under `node`; returns how many were attached
    fn expand_archive(&self, path: &Path, node: &mut FileNode) -> u64 {
        let entries = match self.adapter.list_entries(path) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cannot list archive");
                return 0;
            }
        };

        let mut names = HashSet::new();
        let mut attached = 0;
        for entry in entries {
            if entry.is_dir {
                continue;
            }
            let name: String = entry.name.nfc().collect();
            if !names.insert(name.clone()) {
                warn!(archive = %path.display(), member = %name, "Dropping duplicate archive member");
                continue;
            }
            let mode = entry
                .mode
                .map(|bits| permission_string('-', bits))
                .unwrap_or_default();
            match node.child_mut(&name) {
                Some(existing) => {
                    existing.kind = FileKind::Archived;
                    existing.size = entry.size;
                    existing.maccess = entry.modified.unwrap_or(0);
                    existing.mode = mode;
                    existing.indexed_at = crate::types::now();
                    existing.seen = true;
                }
                None => {
                    let mut member = FileNode::archived(
                        name,
                        node.relpath.clone(),
                        entry.size,
                        entry.modified,
                        node.storage_id,
                    );
                    member.mode = mode;
                    node.add_child(member);
                }
            }
            attached += 1;
        }

        if attached > 0 {
            node.kind = FileKind::Archive;
        }
        debug!(archive = %path.display(), members = attached, "Archive expanded");
        attached
    }

    fn must_ignore(&self, path: &Path) -> bool {
        self.ignores
            .iter()
            .any(|p| p.matches_path_with(path, MatchOptions::new()))
    }
}

/// Refresh filesystem attributes in place and mark the node seen
fn refresh(node: &mut FileNode, metadata: &Metadata, kind: FileKind) {
    // expansion turns a file back into an archive when it still lists members
    node.kind = kind;
    node.size = if kind == FileKind::Directory { 0 } else { metadata.len() };
    node.maccess = modified(metadata);
    node.mode = mode_string(metadata);
    node.indexed_at = crate::types::now();
    node.seen = true;
}

/// Collect unseen nodes through the traversal engine, then remove them
fn prune_unseen(storage: &mut StorageNode) -> u64 {
    let mut unseen: Vec<(Option<String>, String)> = Vec::new();
    traverse::walk_children(NodeRef::Storage(storage), true, None, &mut |node, _, parent| {
        let Some(file) = node.as_file() else {
            return true;
        };
        if file.seen {
            return true;
        }
        let parent_relpath = parent.as_file().map(|p| p.relpath.clone());
        unseen.push((parent_relpath, file.name.clone()));
        false
    });

    let mut pruned = 0;
    for (parent, name) in unseen {
        let removed = match parent {
            None => storage.remove_child(&name),
            Some(relpath) => storage
                .node_at_mut(&relpath)
                .and_then(|p| p.remove_child(&name)),
        };
        if removed.is_some() {
            debug!(name = %name, "Pruned vanished node");
            pruned += 1;
        }
    }
    pruned
}

fn modified(metadata: &Metadata) -> Timestamp {
    metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .and_then(|d| Timestamp::try_from(d.as_secs()).ok())
        .unwrap_or(0)
}

/// `ls -l` style permission string
pub fn permission_string(kind: char, mode: u32) -> String {
    let mut out = String::with_capacity(10);
    out.push(kind);
    for shift in [6, 3, 0] {
        let bits = (mode >> shift) & 0o7;
        out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        out.push(if bits & 0o1 != 0 { 'x' } else { '-' });
    }
    out
}

fn type_char(metadata: &Metadata) -> char {
    if metadata.is_dir() {
        'd'
    } else if metadata.file_type().is_symlink() {
        'L'
    } else {
        '-'
    }
}

#[cfg(unix)]
fn mode_string(metadata: &Metadata) -> String {
    use std::os::unix::fs::PermissionsExt;
    permission_string(type_char(metadata), metadata.permissions().mode())
}

#[cfg(not(unix))]
fn mode_string(metadata: &Metadata) -> String {
    let bits = if metadata.permissions().readonly() { 0o444 } else { 0o644 };
    permission_string(type_char(metadata), bits)
}
