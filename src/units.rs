//! Human readable sizes and dates

use crate::types::Timestamp;
use chrono::{Local, TimeZone};

const SIZE_SUFFIXES: [&str; 7] = ["B", "kB", "MB", "GB", "TB", "PB", "EB"];

/// Format a byte count with SI (base 1000) units and no separating space, e.g. `1.5kB`
pub fn size_to_human(bytes: u64) -> String {
    if bytes < 10 {
        return format!("{}B", bytes);
    }
    let mut exp = 0usize;
    let mut scale = 1u64;
    while exp + 1 < SIZE_SUFFIXES.len() && bytes / scale >= 1000 {
        scale *= 1000;
        exp += 1;
    }
    let val = ((bytes as f64 / scale as f64) * 10.0 + 0.5).floor() / 10.0;
    if val < 10.0 {
        format!("{:.1}{}", val, SIZE_SUFFIXES[exp])
    } else {
        format!("{:.0}{}", val, SIZE_SUFFIXES[exp])
    }
}

/// Size as either raw bytes or human form
pub fn size_to_string(bytes: u64, raw: bool) -> String {
    if raw {
        bytes.to_string()
    } else {
        size_to_human(bytes)
    }
}

/// Local `YYYY-MM-DD HH:MM:SS` rendering of a Unix timestamp
pub fn date_to_string(ts: Timestamp) -> String {
    match Local.timestamp_opt(ts, 0).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => String::from("??"),
    }
}
