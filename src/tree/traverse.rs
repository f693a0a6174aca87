//! Depth-first traversal over the catalog tree
//!
//! Children are visited in case-insensitive name order. The start node is
//! never reported; depth 0 is its direct children.

use crate::tree::node::{FileNode, NodeRef};
use tracing::trace;

/// Maximum depth to descend; `None` is unbounded
pub type MaxDepth = Option<usize>;

/// Map a command-line depth where any negative value means unbounded
pub fn max_depth_from_flag(depth: i64) -> MaxDepth {
    usize::try_from(depth).ok()
}

/// Children ordered by lowercase name, ties broken by the exact name
pub fn sorted_children(children: &[FileNode]) -> Vec<&FileNode> {
    let mut sorted: Vec<&FileNode> = children.iter().collect();
    sorted.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
    sorted
}

/// Visit every descendant of `start`.
///
/// The callback gets `(node, depth, parent)`; returning `false` skips that
/// node's children while its siblings are still visited.
pub fn walk_children<'a>(
    start: NodeRef<'a>,
    hidden_too: bool,
    max_depth: MaxDepth,
    callback: &mut dyn FnMut(NodeRef<'a>, usize, NodeRef<'a>) -> bool,
) {
    trace!(start = start.name(), hidden_too, "Walking children");
    walk(start, 0, hidden_too, max_depth, callback);
}

fn walk<'a>(
    node: NodeRef<'a>,
    depth: usize,
    hidden_too: bool,
    max_depth: MaxDepth,
    callback: &mut dyn FnMut(NodeRef<'a>, usize, NodeRef<'a>) -> bool,
) {
    if max_depth.is_some_and(|max| depth > max) {
        return;
    }
    for child in sorted_children(node.children()) {
        if !hidden_too && child.is_hidden() {
            continue;
        }
        let child = NodeRef::File(child);
        if !callback(child, depth, node) {
            continue;
        }
        walk(child, depth + 1, hidden_too, max_depth, callback);
    }
}

/// Descendants of `start` in traversal order
pub fn collect_children<'a>(
    start: NodeRef<'a>,
    hidden_too: bool,
    max_depth: MaxDepth,
) -> Vec<NodeRef<'a>> {
    let mut visited = Vec::new();
    walk_children(start, hidden_too, max_depth, &mut |node, _, _| {
        visited.push(node);
        true
    });
    visited
}

/// Run `callback` over the descendants of `start`, or collect them when no
/// callback is given. The returned list is empty whenever a callback is used.
pub fn process_children<'a>(
    start: NodeRef<'a>,
    hidden_too: bool,
    callback: Option<&mut dyn FnMut(NodeRef<'a>, usize, NodeRef<'a>) -> bool>,
    max_depth: MaxDepth,
) -> Vec<NodeRef<'a>> {
    match callback {
        Some(callback) => {
            walk_children(start, hidden_too, max_depth, callback);
            Vec::new()
        }
        None => collect_children(start, hidden_too, max_depth),
    }
}
