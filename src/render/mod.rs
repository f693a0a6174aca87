//! Presentation renderers
//!
//! Every renderer appends to a `String`: `prefix` once, `render` per node,
//! `suffix` once. Depth is the display depth chosen by the caller.

pub mod csv;
pub mod du;
pub mod native;
pub mod script;
pub mod table;
pub mod tree;

use crate::tree::catalog::CatalogTree;
use crate::tree::node::{NodeRef, NodeType};
use owo_colors::{OwoColorize, Style};
use std::collections::BTreeMap;
use std::fmt;

/// How nodes are printed
#[derive(Debug, Clone)]
pub struct PrintMode {
    /// Print `storage/relative/path` instead of the bare name
    pub full_path: bool,
    /// Include attributes
    pub long: bool,
    pub raw_size: bool,
    pub color: bool,
    /// Field separator for csv
    pub separator: String,
}

impl Default for PrintMode {
    fn default() -> Self {
        Self {
            full_path: false,
            long: false,
            raw_size: false,
            color: true,
            separator: ",".to_string(),
        }
    }
}

/// Output formats for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Native,
    Csv,
    CsvWithHeader,
    Script,
    Tree,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Native => "native",
            OutputFormat::Csv => "csv",
            OutputFormat::CsvWithHeader => "csv-with-header",
            OutputFormat::Script => "script",
            OutputFormat::Tree => "tree",
        };
        f.write_str(name)
    }
}

pub trait Renderer {
    fn prefix(&mut self, _out: &mut String) {}
    fn render(&mut self, tree: &CatalogTree, node: NodeRef<'_>, depth: usize, out: &mut String);
    fn suffix(&mut self, _out: &mut String) {}
}

pub fn renderer_for(format: OutputFormat, mode: &PrintMode) -> Box<dyn Renderer> {
    match format {
        OutputFormat::Native => Box::new(native::NativeRenderer::new(mode.clone())),
        OutputFormat::Csv => Box::new(csv::CsvRenderer::new(mode.clone(), false)),
        OutputFormat::CsvWithHeader => Box::new(csv::CsvRenderer::new(mode.clone(), true)),
        OutputFormat::Script => Box::new(script::ScriptRenderer),
        OutputFormat::Tree => Box::new(tree::TreeRenderer::new(mode.clone())),
    }
}

/// Optional ANSI styling
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn paint(&self, text: &str, style: Style) -> String {
        if self.enabled {
            text.style(style).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn gray(&self, text: &str) -> String {
        self.paint(text, Style::new().bright_black())
    }

    /// Name colored by node type: dirs blue, archives red, archived entries yellow, executables green
    pub fn by_type(&self, text: &str, node: NodeRef<'_>) -> String {
        match node.node_type() {
            NodeType::Directory => self.paint(text, Style::new().blue()),
            NodeType::Archive => self.paint(text, Style::new().red()),
            NodeType::Archived => self.paint(text, Style::new().yellow()),
            NodeType::File if node.as_file().is_some_and(|f| f.is_exec()) => {
                self.paint(text, Style::new().green())
            }
            NodeType::File | NodeType::Storage => text.to_string(),
        }
    }

    /// The underlined `storage` label
    pub fn storage_label(&self) -> String {
        self.paint("storage", Style::new().bright_black().underline())
    }

    pub fn storage_name(&self, text: &str) -> String {
        self.paint(text, Style::new().purple())
    }
}

const TOP_ATTRS: [&str; 4] = ["mode", "type", "size", "maccess"];
const EXTRA_ATTRS: [&str; 3] = ["indexed", "children", "checksum"];

/// Render attributes as `value value key:value ...`; empty unless `long`.
///
/// Top attributes come first as bare colored values, then the extra ones and
/// finally the remaining keys in sorted order.
pub fn attrs_to_string(
    attrs: &BTreeMap<String, String>,
    mode: &PrintMode,
    node_type: NodeType,
) -> String {
    if !mode.long {
        return String::new();
    }
    let palette = Palette::new(mode.color);
    let skip_children = matches!(
        node_type,
        NodeType::File | NodeType::Archive | NodeType::Archived
    );
    let mut outs = Vec::new();

    for key in TOP_ATTRS {
        let Some(value) = attrs.get(key).filter(|v| !v.is_empty()) else {
            continue;
        };
        let line = match key {
            "maccess" => palette.paint(value, Style::new().blue()),
            "mode" => palette.paint(value, Style::new().yellow()),
            "size" => palette.paint(&format!("{:>6}", value), Style::new().green()),
            "type" => palette.paint(&format!("{:<4}", value), Style::new().red()),
            _ => palette.gray(value),
        };
        outs.push(line);
    }

    let rest = EXTRA_ATTRS.iter().copied().chain(
        attrs
            .keys()
            .map(String::as_str)
            .filter(|k| !TOP_ATTRS.contains(k) && !EXTRA_ATTRS.contains(k)),
    );
    for key in rest {
        if key == "children" && skip_children {
            continue;
        }
        let Some(value) = attrs.get(key).filter(|v| !v.is_empty()) else {
            continue;
        };
        outs.push(format!("{}:{}", palette.gray(key), value));
    }
    outs.join(" ")
}

/// `storage/relpath` for a file node, the storage name for a storage
pub fn full_path(tree: &CatalogTree, node: NodeRef<'_>) -> String {
    match node {
        NodeRef::Storage(s) => s.name.clone(),
        NodeRef::File(f) => match tree.owning_storage(node) {
            Some(storage) => format!("{}/{}", storage.name, f.path()),
            None => f.path(),
        },
    }
}
