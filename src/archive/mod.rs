//! Archive Adapter
//!
//! Identifies archive files and lists their members from headers only; member
//! bytes are never extracted.

pub mod tarball;
pub mod zipfile;

use crate::error::ArchiveError;
use crate::types::Timestamp;
use std::fs::File;
use std::io::Read;
use std::path::{Component, Path};
use tracing::debug;

/// Bytes read for magic-number sniffing (one tar header block)
const SNIFF_LEN: usize = 512;

/// One member listed from an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Full path inside the archive
    pub name: String,
    pub size: u64,
    pub modified: Option<Timestamp>,
    pub is_dir: bool,
    pub mode: Option<u32>,
}

/// Archive identification and listing
pub trait ArchiveAdapter {
    fn is_archive(&self, path: &Path) -> bool;
    fn list_entries(&self, path: &Path) -> Result<Vec<ArchiveEntry>, ArchiveError>;
}

/// Member name reduced to its normal components joined with `/`.
///
/// Root, prefix, `.` and `..` components are dropped; `None` when nothing remains.
pub fn normalize_member_name(raw: &str) -> Option<String> {
    let parts: Vec<&str> = Path::new(raw)
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Supported container formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    Tar,
    TarGz,
    TarZst,
}

impl ArchiveFormat {
    /// Format implied by the file name, if any
    pub fn from_name(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.to_ascii_lowercase();
        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(ArchiveFormat::TarGz)
        } else if name.ends_with(".tar.zst") || name.ends_with(".tzst") {
            Some(ArchiveFormat::TarZst)
        } else if name.ends_with(".tar") {
            Some(ArchiveFormat::Tar)
        } else if name.ends_with(".zip") || name.ends_with(".jar") {
            Some(ArchiveFormat::Zip)
        } else {
            None
        }
    }

    /// Format from leading magic bytes; only uncompressed containers are recognized
    pub fn sniff(path: &Path) -> Option<Self> {
        let mut head = Vec::with_capacity(SNIFF_LEN);
        let file = File::open(path).ok()?;
        file.take(SNIFF_LEN as u64).read_to_end(&mut head).ok()?;
        if infer::archive::is_zip(&head) {
            Some(ArchiveFormat::Zip)
        } else if infer::archive::is_tar(&head) {
            Some(ArchiveFormat::Tar)
        } else {
            None
        }
    }

    pub fn detect(path: &Path) -> Option<Self> {
        Self::from_name(path).or_else(|| Self::sniff(path))
    }
}

/// Adapter covering zip, tar, tar.gz and tar.zst
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultArchiveAdapter;

impl ArchiveAdapter for DefaultArchiveAdapter {
    fn is_archive(&self, path: &Path) -> bool {
        ArchiveFormat::detect(path).is_some()
    }

    fn list_entries(&self, path: &Path) -> Result<Vec<ArchiveEntry>, ArchiveError> {
        let format = ArchiveFormat::detect(path)
            .ok_or_else(|| ArchiveError::Unsupported(path.to_path_buf()))?;
        debug!(path = %path.display(), ?format, "listing archive");
        let entries = match format {
            ArchiveFormat::Zip => zipfile::list(path)?,
            ArchiveFormat::Tar => tarball::list(File::open(path)?)?,
            ArchiveFormat::TarGz => {
                tarball::list(flate2::read::GzDecoder::new(File::open(path)?))?
            }
            ArchiveFormat::TarZst => tarball::list(zstd::Decoder::new(File::open(path)?)?)?,
        };
        debug!(path = %path.display(), entries = entries.len(), "Archive listed");
        Ok(entries)
    }
}
