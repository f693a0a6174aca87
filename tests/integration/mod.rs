//! End-to-end command tests driving `CliContext` against temporary directories

mod archive_flow;
mod index_flow;
mod listing_commands;
mod parse_matrix;
mod storage_commands;
mod support;
