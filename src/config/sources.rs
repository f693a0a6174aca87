//! Configuration sources

pub mod environment;
pub mod explicit_file;
pub mod global_file;
