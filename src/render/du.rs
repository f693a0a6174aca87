//! Disk-usage lines: size column then `storage/path`

use crate::render::full_path;
use crate::tree::catalog::CatalogTree;
use crate::tree::node::NodeRef;
use crate::units;

pub fn du_line(tree: &CatalogTree, node: NodeRef<'_>, raw_size: bool) -> String {
    let size = units::size_to_string(node.size(), raw_size);
    let path = full_path(tree, node);
    if raw_size {
        format!("{:<10}    {}", size, path)
    } else {
        format!("{:<6}    {}", size, path)
    }
}
