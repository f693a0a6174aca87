//! Content checksums for indexed files

use std::fs::File;
use std::io;
use std::path::Path;

/// Hex-encoded BLAKE3 digest of the file contents
pub fn checksum_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = blake3::Hasher::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize().as_bytes()))
}
