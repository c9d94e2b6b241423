//! Query surface
//!
//! Children and descendants queries, optionally filtered by a predicate.
//! The `by_tag` and `by_attr_containing` helpers are a predicate composed
//! with the matching query, nothing more.

pub mod predicate;

pub use predicate::{AttrContains, NodePredicate, NonBlank, TagPredicate};

use crate::config::TraversalConfig;
use crate::dom::Node;
use crate::error::Result;
use crate::stream::{traverse, traverse_from, NodeStream};

/// Stream the direct children of `root`
pub fn children(root: Option<&Node>) -> Result<NodeStream> {
    traverse(root, false, &TraversalConfig::default())
}

/// Stream every descendant of `root` in document order
pub fn descendants(root: Option<&Node>) -> Result<NodeStream> {
    traverse(root, true, &TraversalConfig::default())
}

/// Stream the direct children of `root` matching `predicate`
pub fn children_matching<P: NodePredicate>(root: Option<&Node>, predicate: P) -> Result<NodeStream> {
    Ok(children(root)?.filter(predicate))
}

/// Stream the descendants of `root` matching `predicate`
pub fn descendants_matching<P: NodePredicate>(
    root: Option<&Node>,
    predicate: P,
) -> Result<NodeStream> {
    Ok(descendants(root)?.filter(predicate))
}

impl Node {
    /// Stream the nodes under this one with an explicit configuration
    pub fn traverse(&self, recursive: bool, config: &TraversalConfig) -> NodeStream {
        traverse_from(self, recursive, config)
    }

    /// Stream the direct children of this node
    pub fn children(&self) -> NodeStream {
        self.traverse(false, &TraversalConfig::default())
    }

    /// Stream every descendant of this node in document order
    pub fn descendants(&self) -> NodeStream {
        self.traverse(true, &TraversalConfig::default())
    }

    pub fn children_matching<P: NodePredicate>(&self, predicate: P) -> NodeStream {
        self.children().filter(predicate)
    }

    pub fn descendants_matching<P: NodePredicate>(&self, predicate: P) -> NodeStream {
        self.descendants().filter(predicate)
    }

    pub fn children_by_tag(&self, name: &str) -> NodeStream {
        self.children_matching(TagPredicate::new(name))
    }

    pub fn descendants_by_tag(&self, name: &str) -> NodeStream {
        self.descendants_matching(TagPredicate::new(name))
    }

    pub fn children_by_attr_containing(&self, key: &str, needle: &str) -> NodeStream {
        self.children_matching(AttrContains::new(key, needle))
    }

    pub fn descendants_by_attr_containing(&self, key: &str, needle: &str) -> NodeStream {
        self.descendants_matching(AttrContains::new(key, needle))
    }
}
