//! DOM Module - Arena-based node tree
//!
//! Implements the tree the traversal engine walks:
//! - Arena allocation for nodes
//! - NodeId (u32) indices for cache-friendly traversal
//! - String interning for tag names, attributes and payloads
//! - Shareable `Node` handles over an `Arc<Document>`

pub mod document;
pub mod handle;
pub mod node;
pub mod strings;

pub use document::{Document, DocumentBuilder, Walk};
pub use handle::{Attribute, Node};
pub use node::{AttributeRecord, NodeId, NodeKind, NodeRecord, DOCUMENT_ID};
pub use strings::StringPool;
