//! Core types shared across the catalog.

/// StorageId: numeric identifier of a storage root, derived from its name and creation time
pub type StorageId = u32;

/// Timestamp: seconds since the Unix epoch
pub type Timestamp = i64;

/// Current time as a Unix timestamp
pub fn now() -> Timestamp {
    chrono::Utc::now().timestamp()
}
