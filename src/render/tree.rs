//! Indented tree with box-drawing connectors
//!
//! Lines are buffered per start node because a connector depends on whether a
//! later sibling follows.

use crate::render::{attrs_to_string, Palette, PrintMode, Renderer};
use crate::tree::catalog::CatalogTree;
use crate::tree::node::NodeRef;

const BRANCH: &str = "├── ";
const LAST: &str = "└── ";
const PIPE: &str = "│   ";
const BLANK: &str = "    ";

#[derive(Default)]
struct Group {
    header: Option<String>,
    items: Vec<(usize, String)>,
}

pub struct TreeRenderer {
    mode: PrintMode,
    palette: Palette,
    groups: Vec<Group>,
}

impl TreeRenderer {
    pub fn new(mode: PrintMode) -> Self {
        let palette = Palette::new(mode.color);
        Self {
            mode,
            palette,
            groups: Vec::new(),
        }
    }

    fn label(&self, node: NodeRef<'_>) -> String {
        let name = match node {
            NodeRef::Storage(s) => self.palette.storage_name(&s.name),
            NodeRef::File(f) => self.palette.by_type(&f.name, node),
        };
        let attrs = attrs_to_string(
            &node.attributes(self.mode.raw_size, self.mode.long),
            &self.mode,
            node.node_type(),
        );
        if attrs.is_empty() {
            name
        } else {
            format!("{} {}", name, attrs)
        }
    }
}

/// No later item at the same level before the level closes
fn is_last(rest: &[(usize, String)], level: usize) -> bool {
    for (other, _) in rest {
        if *other < level {
            return true;
        }
        if *other == level {
            return false;
        }
    }
    true
}

fn flush(group: &Group, out: &mut String) {
    if let Some(header) = &group.header {
        out.push_str(header);
        out.push('\n');
    }
    // open[k] is true while the ancestor at level k still has siblings below
    let mut open: Vec<bool> = Vec::new();
    for (index, (level, line)) in group.items.iter().enumerate() {
        let last = is_last(&group.items[index + 1..], *level);
        open.truncate(*level);
        open.resize(*level, false);
        for more in &open {
            out.push_str(if *more { PIPE } else { BLANK });
        }
        out.push_str(if last { LAST } else { BRANCH });
        out.push_str(line);
        out.push('\n');
        open.push(!last);
    }
}

impl Renderer for TreeRenderer {
    /// Depth 0 opens a new block headed by the node; deeper nodes become items
    fn render(&mut self, _tree: &CatalogTree, node: NodeRef<'_>, depth: usize, _out: &mut String) {
        let line = self.label(node);
        if depth == 0 {
            self.groups.push(Group {
                header: Some(line),
                items: Vec::new(),
            });
            return;
        }
        if self.groups.is_empty() {
            self.groups.push(Group::default());
        }
        if let Some(group) = self.groups.last_mut() {
            group.items.push((depth - 1, line));
        }
    }

    fn suffix(&mut self, out: &mut String) {
        for group in self.groups.drain(..) {
            flush(&group, out);
        }
    }
}
