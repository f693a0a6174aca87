//! Zip listing from the central directory

use crate::archive::{normalize_member_name, ArchiveEntry};
use crate::error::ArchiveError;
use crate::types::Timestamp;
use chrono::NaiveDate;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

pub fn list(path: &Path) -> Result<Vec<ArchiveEntry>, ArchiveError> {
    let mut archive = zip::ZipArchive::new(BufReader::new(File::open(path)?))?;
    let mut entries = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        // raw access reads headers only, no decompression
        let file = archive.by_index_raw(index)?;
        let Some(name) = normalize_member_name(file.name()) else {
            debug!(member = %file.name(), "Skipping member without a usable name");
            continue;
        };
        entries.push(ArchiveEntry {
            name,
            size: file.size(),
            modified: file.last_modified().and_then(to_timestamp),
            is_dir: file.is_dir(),
            mode: file.unix_mode(),
        });
    }
    Ok(entries)
}

/// MS-DOS timestamps carry no zone; read them as UTC
fn to_timestamp(dt: zip::DateTime) -> Option<Timestamp> {
    NaiveDate::from_ymd_opt(dt.year().into(), dt.month().into(), dt.day().into())?
        .and_hms_opt(dt.hour().into(), dt.minute().into(), dt.second().into())
        .map(|naive| naive.and_utc().timestamp())
}
