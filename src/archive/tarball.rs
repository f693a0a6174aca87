//! Tar listing over any decompressed stream

use crate::archive::{normalize_member_name, ArchiveEntry};
use crate::error::ArchiveError;
use std::io::Read;
use tracing::debug;

/// Walk tar headers; member data is skipped, not extracted
pub fn list<R: Read>(reader: R) -> Result<Vec<ArchiveEntry>, ArchiveError> {
    let mut archive = tar::Archive::new(reader);
    let mut entries = Vec::new();
    for entry in archive.entries()? {
        let entry = entry?;
        let header = entry.header();
        let raw = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
        let Some(name) = normalize_member_name(&raw) else {
            debug!(member = %raw, "Skipping member without a usable name");
            continue;
        };
        entries.push(ArchiveEntry {
            name,
            size: header.size()?,
            modified: header.mtime().ok().and_then(|m| i64::try_from(m).ok()),
            is_dir: header.entry_type().is_dir(),
            mode: header.mode().ok(),
        });
    }
    Ok(entries)
}
