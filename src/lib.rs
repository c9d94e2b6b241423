//! RustySoup - lazy, cancelable queries over parsed markup trees
//!
//! Layers:
//! - dom: arena node tree with parent/child/sibling links and `Node` handles
//! - markup: lenient reader building a tree from HTML-style text
//! - stream: traversal engine, pipeline stages, cancellation
//! - query: children/descendants queries and predicate strategies
//! - metadata: charset lookup built on the queries
//! - strategy: parallel (rayon) subtree collection
//!
//! Streams produce nodes on a background thread into a bounded buffer.
//! Drain a stream, or close it (dropping it closes it too) when stopping
//! early:
//!
//! ```
//! use rustysoup::Document;
//!
//! let doc = Document::parse("<ul><li>a</li><li>b</li><li>c</li></ul>");
//! let mut items = doc.root().descendants_by_tag("li");
//! let first = items.next().unwrap();
//! items.close();
//! assert_eq!(first.first_child().unwrap().data(), "a");
//! ```
//!
//! The tree must not change while a stream over it is alive; documents are
//! immutable once built, which the `Arc<Document>` sharing enforces.

pub mod config;
pub mod dom;
pub mod error;
pub mod markup;
pub mod metadata;
pub mod query;
pub mod strategy;
pub mod stream;

pub use config::TraversalConfig;
pub use dom::{Attribute, Document, DocumentBuilder, Node, NodeId, NodeKind};
pub use error::{Result, SoupError};
pub use metadata::{charset, content_type};
pub use query::{
    children, children_matching, descendants, descendants_matching, AttrContains, NodePredicate,
    NonBlank, TagPredicate,
};
pub use stream::{normalize, CancelToken, NodeStream};
