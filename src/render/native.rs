//! Default human-readable listing

use crate::render::{attrs_to_string, full_path, Palette, PrintMode, Renderer};
use crate::tree::catalog::CatalogTree;
use crate::tree::node::NodeRef;

const INDENT: &str = "  ";

pub struct NativeRenderer {
    mode: PrintMode,
    palette: Palette,
}

impl NativeRenderer {
    pub fn new(mode: PrintMode) -> Self {
        let palette = Palette::new(mode.color);
        Self { mode, palette }
    }

    fn line(&self, tree: &CatalogTree, node: NodeRef<'_>) -> String {
        let attrs = attrs_to_string(
            &node.attributes(self.mode.raw_size, self.mode.long),
            &self.mode,
            node.node_type(),
        );
        let head = match node {
            NodeRef::Storage(s) => format!(
                "{} {}",
                self.palette.storage_label(),
                self.palette.storage_name(&format!("{:<20}", s.name))
            ),
            NodeRef::File(f) => {
                let label = if self.mode.full_path {
                    format!("{:<50}", full_path(tree, node))
                } else {
                    format!("{:<30}", f.name)
                };
                self.palette.by_type(&label, node)
            }
        };
        if attrs.is_empty() {
            head.trim_end().to_string()
        } else {
            format!("{} {}", head, attrs)
        }
    }
}

impl Renderer for NativeRenderer {
    fn render(&mut self, tree: &CatalogTree, node: NodeRef<'_>, depth: usize, out: &mut String) {
        out.push_str(&INDENT.repeat(depth));
        out.push_str(&self.line(tree, node));
        out.push('\n');
    }
}
