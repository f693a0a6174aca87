//! Magic-byte MIME detection

use std::path::Path;
use tracing::debug;

/// MIME type from the file header; `None` when unknown or unreadable
pub fn detect(path: &Path) -> Option<String> {
    match infer::get_from_path(path) {
        Ok(Some(kind)) => Some(kind.mime_type().to_string()),
        Ok(None) => None,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "MIME detection failed");
            None
        }
    }
}
