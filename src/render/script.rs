//! Shell one-liner over the listed paths

use crate::render::Renderer;
use crate::tree::catalog::CatalogTree;
use crate::tree::node::{NodeRef, NodeType};

pub const SCRIPT_PREFIX: &str = "op=file; source=/media/mnt; ${op} ";

pub struct ScriptRenderer;

impl Renderer for ScriptRenderer {
    fn prefix(&mut self, out: &mut String) {
        out.push_str(SCRIPT_PREFIX);
    }

    fn render(&mut self, _tree: &CatalogTree, node: NodeRef<'_>, _depth: usize, out: &mut String) {
        if matches!(node.node_type(), NodeType::Storage | NodeType::Archived) {
            return;
        }
        out.push_str(&format!("\"${{source}}/{}\" ", node.path()));
    }

    fn suffix(&mut self, out: &mut String) {
        out.push('\n');
    }
}
