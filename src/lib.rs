//! Offcat: Offline Catalog
//!
//! Indexes filesystem hierarchies, including the contents of archives, into a
//! single serializable catalog tree that can be browsed, searched and measured
//! without the original media attached.

pub mod archive;
pub mod config;
pub mod error;
pub mod logging;
pub mod render;
pub mod store;
pub mod tooling;
pub mod tree;
pub mod types;
pub mod units;
