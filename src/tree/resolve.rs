//! Wildcard path resolution
//!
//! `storage/dir/*.txt` style paths, one shell-glob pattern per segment.

use crate::tree::catalog::CatalogTree;
use crate::tree::node::{FileKind, NodeRef};
use glob::{MatchOptions, Pattern};
use tracing::debug;

const SEGMENT_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Split on `/`, dropping empty segments
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Whether the string holds any glob metacharacter
pub fn has_wildcard(s: &str) -> bool {
    s.contains(['*', '?', '['])
}

/// Shell-glob match of one name against one segment; a malformed pattern
/// only matches itself literally
pub fn segment_matches(pattern: &str, name: &str) -> bool {
    match Pattern::new(pattern) {
        Ok(p) => p.matches_with(name, SEGMENT_OPTIONS),
        Err(_) => pattern == name,
    }
}

/// Resolve a path to every matching node.
///
/// The first segment selects storages. When the path has a single segment,
/// or the descent matches nothing, the storage-level matches are returned.
pub fn resolve<'a>(tree: &'a CatalogTree, path: &str) -> Vec<NodeRef<'a>> {
    let segments = split_path(path);
    let Some((first, rest)) = segments.split_first() else {
        return Vec::new();
    };

    let tops: Vec<NodeRef<'a>> = tree
        .storages
        .iter()
        .filter(|s| segment_matches(first, &s.name))
        .map(NodeRef::Storage)
        .collect();
    debug!(path, storages = tops.len(), "Resolving path");

    if rest.is_empty() {
        return tops;
    }

    let mut found = Vec::new();
    for top in &tops {
        descend(*top, rest, &mut found);
    }
    if found.is_empty() {
        return tops;
    }
    found
}

fn descend<'a>(current: NodeRef<'a>, segments: &[&str], found: &mut Vec<NodeRef<'a>>) {
    let Some((segment, rest)) = segments.split_first() else {
        found.push(current);
        return;
    };
    if !current.may_have_children() {
        return;
    }

    // archived entries keep their in-archive path as their name
    let joined = segments.join("/");
    let is_archive = current.as_file().is_some_and(|f| f.kind == FileKind::Archive);

    for child in current.children() {
        if segment_matches(segment, &child.name) {
            descend(NodeRef::File(child), rest, found);
        } else if is_archive && !rest.is_empty() && segment_matches(&joined, &child.name) {
            found.push(NodeRef::File(child));
        }
    }
}
