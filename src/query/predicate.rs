//! Node predicates
//!
//! Predicates are plain values handed to a query: any `FnMut(&Node) -> bool`
//! closure, or one of the named strategies below.

use crate::dom::Node;

/// Decides whether a node belongs in a filtered stream.
///
/// Runs on the stage's producer thread, hence `Send + 'static`.
pub trait NodePredicate: Send + 'static {
    fn matches(&mut self, node: &Node) -> bool;
}

impl<F> NodePredicate for F
where
    F: FnMut(&Node) -> bool + Send + 'static,
{
    #[inline]
    fn matches(&mut self, node: &Node) -> bool {
        self(node)
    }
}

/// Elements with the given tag name
#[derive(Debug, Clone)]
pub struct TagPredicate {
    name: String,
}

impl TagPredicate {
    pub fn new(name: impl Into<String>) -> Self {
        TagPredicate { name: name.into() }
    }
}

impl NodePredicate for TagPredicate {
    fn matches(&mut self, node: &Node) -> bool {
        node.is_tag(&self.name)
    }
}

/// Nodes whose attribute `key` has a value containing `needle`
#[derive(Debug, Clone)]
pub struct AttrContains {
    key: String,
    needle: String,
}

impl AttrContains {
    pub fn new(key: impl Into<String>, needle: impl Into<String>) -> Self {
        AttrContains {
            key: key.into(),
            needle: needle.into(),
        }
    }
}

impl NodePredicate for AttrContains {
    fn matches(&mut self, node: &Node) -> bool {
        node.has_attr_containing(&self.key, &self.needle)
    }
}

/// Everything except text nodes made only of whitespace
#[derive(Debug, Clone, Copy, Default)]
pub struct NonBlank;

impl NodePredicate for NonBlank {
    fn matches(&mut self, node: &Node) -> bool {
        !node.is_text() || !node.raw_data().trim().is_empty()
    }
}
