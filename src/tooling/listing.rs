//! Start-path resolution, name matching and listing drivers shared by the commands.

use crate::error::ApiError;
use crate::render::Renderer;
use crate::tree::catalog::CatalogTree;
use crate::tree::node::NodeRef;
use crate::tree::resolve::{has_wildcard, resolve, split_path};
use crate::tree::traverse::{walk_children, MaxDepth};
use glob::{MatchOptions, Pattern};
use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

const FIND_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Prepend the only storage's name to a bare path
pub fn adjust_start_path(tree: &CatalogTree, path: &str) -> String {
    let [storage] = tree.storages.as_slice() else {
        return path.to_string();
    };
    if has_wildcard(path) || split_path(path).first() == Some(&storage.name.as_str()) {
        return path.to_string();
    }
    let rest = path.trim_start_matches('/');
    if rest.is_empty() {
        storage.name.clone()
    } else {
        format!("{}/{}", storage.name, rest)
    }
}

/// Nodes a command starts from: every storage without a path, the resolved matches otherwise
pub fn start_nodes<'a>(
    tree: &'a CatalogTree,
    path: Option<&str>,
) -> Result<Vec<NodeRef<'a>>, ApiError> {
    let Some(path) = path.filter(|p| !p.is_empty()) else {
        return Ok(tree.storage_refs());
    };
    let adjusted = adjust_start_path(tree, path);
    debug!(path, adjusted = %adjusted, "Resolving start path");
    let nodes = resolve(tree, &adjusted);
    if nodes.is_empty() {
        return Err(ApiError::NotFound(format!("no such start path: \"{}\"", path)));
    }
    Ok(nodes)
}

/// Name filter for `find`: glob when the pattern has metacharacters, substring otherwise
#[derive(Debug)]
pub enum NameMatcher {
    Substring(String),
    Glob(Pattern),
}

impl NameMatcher {
    pub fn new(pattern: &str) -> Result<Self, ApiError> {
        if !has_wildcard(pattern) {
            return Ok(NameMatcher::Substring(pattern.to_lowercase()));
        }
        Pattern::new(pattern)
            .map(NameMatcher::Glob)
            .map_err(|e| ApiError::InvalidArgument(format!("bad pattern \"{}\": {}", pattern, e.msg)))
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            NameMatcher::Substring(needle) => name.to_lowercase().contains(needle.as_str()),
            NameMatcher::Glob(pattern) => pattern.matches_with(name, FIND_OPTIONS),
        }
    }
}

/// Render `start` at depth 0 followed by its descendants when `with_children`
pub fn list_print(
    tree: &CatalogTree,
    start: NodeRef<'_>,
    renderer: &mut dyn Renderer,
    out: &mut String,
    hidden_too: bool,
    max_depth: MaxDepth,
    with_children: bool,
) {
    renderer.render(tree, start, 0, out);
    if !with_children || !start.may_have_children() {
        return;
    }
    walk_children(start, hidden_too, max_depth, &mut |node, depth, _| {
        renderer.render(tree, node, depth + 1, out);
        true
    });
}

/// Descendants of `start` matching `matcher`
pub fn find_matches<'a>(
    start: NodeRef<'a>,
    matcher: &NameMatcher,
    max_depth: MaxDepth,
) -> Vec<NodeRef<'a>> {
    let mut found = Vec::new();
    walk_children(start, true, max_depth, &mut |node, _, _| {
        if matcher.matches(node.name()) {
            found.push(node);
        }
        true
    });
    found
}

/// Directory-like descendants of `start`, optionally sorted by ascending size
pub fn du_nodes<'a>(start: NodeRef<'a>, max_depth: MaxDepth, sort: bool) -> Vec<NodeRef<'a>> {
    let mut dirs = Vec::new();
    walk_children(start, true, max_depth, &mut |node, _, _| {
        if node.may_have_children() {
            dirs.push(node);
        }
        true
    });
    if sort {
        dirs.sort_by_key(|n| n.size());
    }
    dirs
}

/// Recreate `start` and its subtree under `dest` with empty files; returns the entry count.
///
/// Only a failure on the top entry is returned; names that would leave the
/// destination and per-entry creation failures are logged and skipped.
pub fn materialize(start: NodeRef<'_>, dest: &Path) -> io::Result<u64> {
    let root = contained(start.name()).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("unsafe entry name \"{}\"", start.name()),
        )
    })?;
    let base = dest.join(root);
    create_entry(&base, start.is_projected_dir())?;
    let mut created = 1;

    let mut stack: Vec<&Path> = Vec::new();
    walk_children(start, true, None, &mut |node, depth, _| {
        let Some(part) = contained(node.name()) else {
            warn!(name = node.name(), "Skipping entry outside the destination");
            return false;
        };
        stack.truncate(depth);
        stack.push(part);
        let target: PathBuf = stack.iter().fold(base.clone(), |acc, part| acc.join(part));
        match create_entry(&target, node.is_projected_dir()) {
            Ok(()) => created += 1,
            Err(e) => warn!(path = %target.display(), error = %e, "Cannot create entry"),
        }
        true
    });
    Ok(created)
}

/// `name` as a relative path made only of normal components
fn contained(name: &str) -> Option<&Path> {
    let path = Path::new(name);
    let normal = path.components().all(|c| matches!(c, Component::Normal(_)));
    (normal && !name.is_empty()).then_some(path)
}

fn create_entry(path: &Path, dir: bool) -> io::Result<()> {
    if dir {
        return fs::create_dir_all(path);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    if !path.exists() {
        File::create(path)?;
    }
    Ok(())
}
