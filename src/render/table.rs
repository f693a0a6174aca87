//! Format storage listings and catalog information as text.

use crate::render::Palette;
use crate::tree::catalog::CatalogTree;
use crate::units;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::Style;
use std::path::Path;

/// Section heading with bold/underline
pub fn format_section_heading(title: &str, color: bool) -> String {
    Palette::new(color).paint(title, Style::new().bold().underline())
}

/// One row per storage
pub fn format_storage_table(tree: &CatalogTree, raw_size: bool, color: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", format_section_heading("Storages", color)));
    if tree.storages.is_empty() {
        out.push_str("  No storage indexed\n");
        return out;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec![
        "Name", "Id", "Source", "Files", "Size", "Free", "Total", "Indexed", "Tags", "Meta",
    ]);
    for storage in &tree.storages {
        let tags: Vec<&str> = storage.tags.iter().map(String::as_str).collect();
        table.add_row(vec![
            storage.name.clone(),
            storage.id.to_string(),
            storage.path.display().to_string(),
            storage.total_files.to_string(),
            units::size_to_string(storage.size, raw_size),
            units::size_to_string(storage.free, raw_size),
            units::size_to_string(storage.total, raw_size),
            units::date_to_string(storage.indexed_at),
            tags.join(","),
            storage.meta.clone(),
        ]);
    }
    out.push_str(&format!("{}\n", table));
    out
}

/// Catalog header fields and totals
pub fn format_catalog_info(tree: &CatalogTree, path: &Path, color: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", format_section_heading("Catalog", color)));
    out.push_str(&format!("  Path: {}\n", path.display()));
    out.push_str(&format!("  Tool: {} {}\n", tree.tool, tree.version));
    out.push_str(&format!("  Created: {}\n", units::date_to_string(tree.created)));
    out.push_str(&format!("  Updated: {}\n", units::date_to_string(tree.updated)));
    if !tree.note.is_empty() {
        out.push_str(&format!("  Note: {}\n", tree.note));
    }
    let files: u64 = tree.storages.iter().map(|s| s.total_files).sum();
    let size: u64 = tree.storages.iter().map(|s| s.size).sum();
    out.push_str(&format!("  Storages: {}\n", tree.storages.len()));
    out.push_str(&format!("  Files: {}\n", files));
    out.push_str(&format!("  Size: {}\n", units::size_to_human(size)));
    out
}
