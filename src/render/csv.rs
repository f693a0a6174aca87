//! Delimited output, one row per node

use crate::render::{PrintMode, Renderer};
use crate::tree::catalog::CatalogTree;
use crate::tree::node::NodeRef;
use crate::units;

pub const HEADER: [&str; 12] = [
    "name",
    "type",
    "path",
    "size",
    "indexed_at",
    "maccess",
    "checksum",
    "nbfiles",
    "free_space",
    "total_space",
    "meta",
    "storage",
];

pub struct CsvRenderer {
    mode: PrintMode,
    header: bool,
}

impl CsvRenderer {
    pub fn new(mode: PrintMode, header: bool) -> Self {
        Self { mode, header }
    }

    fn row(&self, fields: Vec<String>) -> String {
        let sep = self.mode.separator.as_str();
        fields
            .iter()
            .map(|f| quote(f, sep))
            .collect::<Vec<_>>()
            .join(sep)
    }
}

/// Quote a field that contains the separator, a quote or a newline
fn quote(field: &str, sep: &str) -> String {
    let needs = (!sep.is_empty() && field.contains(sep))
        || field.contains('"')
        || field.contains('\n');
    if needs {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

impl Renderer for CsvRenderer {
    fn prefix(&mut self, out: &mut String) {
        if self.header {
            let header = HEADER.iter().map(|h| h.to_string()).collect();
            out.push_str(&self.row(header));
            out.push('\n');
        }
    }

    fn render(&mut self, tree: &CatalogTree, node: NodeRef<'_>, _depth: usize, out: &mut String) {
        let raw = self.mode.raw_size;
        let fields = match node {
            NodeRef::Storage(s) => vec![
                s.name.clone(),
                node.node_type().as_str().to_string(),
                s.path.display().to_string(),
                units::size_to_string(s.size, raw),
                units::date_to_string(s.indexed_at),
                String::new(),
                String::new(),
                s.total_files.to_string(),
                units::size_to_string(s.free, raw),
                units::size_to_string(s.total, raw),
                s.meta.clone(),
                s.name.clone(),
            ],
            NodeRef::File(f) => vec![
                f.name.clone(),
                f.kind.as_str().to_string(),
                f.path(),
                units::size_to_string(f.size, raw),
                units::date_to_string(f.indexed_at),
                units::date_to_string(f.maccess),
                f.checksum.clone().unwrap_or_default(),
                f.children.len().to_string(),
                String::new(),
                String::new(),
                String::new(),
                tree.owning_storage(node)
                    .map(|s| s.name.clone())
                    .unwrap_or_default(),
            ],
        };
        out.push_str(&self.row(fields));
        out.push('\n');
    }
}
