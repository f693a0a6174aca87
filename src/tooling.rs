//! Tooling & Integration Layer
//!
//! Command-line surface over the catalog: argument parsing, command dispatch
//! and the listing helpers the commands share.

pub mod cli;
pub mod listing;

pub use cli::{Cli, CliContext, Commands, StorageCommands};
