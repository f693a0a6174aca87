//! Catalog tree: node model, traversal, path resolution and indexing

pub mod catalog;
pub mod hasher;
pub mod mime;
pub mod node;
pub mod resolve;
pub mod storage;
pub mod traverse;
pub mod walker;

pub use catalog::CatalogTree;
pub use node::{FileKind, FileNode, NodeRef, NodeType};
pub use storage::StorageNode;
