//! Node handles
//!
//! A `Node` pairs a shared document with a node id. Handles are cheap to
//! clone and `Send`, which lets streams hand them across threads.

use std::fmt;
use std::sync::Arc;

use memchr::memmem;

use super::document::Document;
use super::node::{NodeId, NodeKind};
use crate::error::{Result, SoupError};

/// One element, text run, comment, doctype or document node.
#[derive(Clone)]
pub struct Node {
    doc: Arc<Document>,
    id: NodeId,
    normalized: bool,
}

/// A key/value attribute pair borrowed from the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

impl Node {
    pub(crate) fn new(doc: Arc<Document>, id: NodeId) -> Self {
        Node {
            doc,
            id,
            normalized: false,
        }
    }

    fn at(&self, id: Option<NodeId>) -> Option<Node> {
        id.map(|id| Node::new(Arc::clone(&self.doc), id))
    }

    /// The document this node belongs to
    pub fn document(&self) -> &Arc<Document> {
        &self.doc
    }

    /// Arena id of this node
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.doc.record(self.id).kind
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        self.doc.record(self.id).is_element()
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        self.doc.record(self.id).is_text()
    }

    /// Tag name for elements, payload for everything else.
    ///
    /// On a normalized handle, text payloads come back with surrounding
    /// whitespace trimmed. The stored tree is never modified.
    pub fn data(&self) -> &str {
        let raw = self.raw_data();
        if self.normalized && self.is_text() {
            raw.trim()
        } else {
            raw
        }
    }

    /// Payload exactly as stored
    pub fn raw_data(&self) -> &str {
        self.doc.data(self.id)
    }

    /// Whether this handle trims text payloads on read
    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    /// Return a handle whose text payload reads trimmed.
    ///
    /// Idempotent, and a no-op for anything but text nodes.
    pub fn normalized(self) -> Node {
        if self.is_text() {
            Node {
                normalized: true,
                ..self
            }
        } else {
            self
        }
    }

    /// Namespace of this node, empty for the default namespace
    pub fn namespace(&self) -> &str {
        self.doc.namespace(self.id)
    }

    /// Depth below the document node
    pub fn depth(&self) -> u32 {
        self.doc.record(self.id).depth
    }

    pub fn parent(&self) -> Option<Node> {
        self.at(self.doc.record(self.id).parent)
    }

    pub fn first_child(&self) -> Option<Node> {
        self.at(self.doc.record(self.id).first_child)
    }

    pub fn last_child(&self) -> Option<Node> {
        self.at(self.doc.record(self.id).last_child)
    }

    pub fn prev_sibling(&self) -> Option<Node> {
        self.at(self.doc.record(self.id).prev_sibling)
    }

    pub fn next_sibling(&self) -> Option<Node> {
        self.at(self.doc.record(self.id).next_sibling)
    }

    /// The document node at the top of this node's tree
    pub fn root(&self) -> Node {
        self.doc.root()
    }

    /// Attributes in source order. Keys may repeat.
    pub fn attributes(&self) -> impl Iterator<Item = Attribute<'_>> + '_ {
        let strings = &self.doc.strings;
        self.doc.attributes(self.id).iter().map(move |attr| Attribute {
            key: strings.get(attr.key_id),
            value: strings.get(attr.value_id),
        })
    }

    /// Whether this node has the given attribute
    pub fn has_attr(&self, key: &str) -> bool {
        self.doc.get_attribute(self.id, key).is_some()
    }

    /// Value of the first attribute with the given key
    pub fn attr(&self, key: &str) -> Result<&str> {
        self.doc
            .get_attribute(self.id, key)
            .ok_or_else(|| SoupError::attribute_not_found(key))
    }

    /// Value of the given attribute, or `default` when it is absent
    pub fn attr_or_default<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.doc.get_attribute(self.id, key).unwrap_or(default)
    }

    /// Whether the given attribute exists and its value contains `needle`
    pub fn has_attr_containing(&self, key: &str, needle: &str) -> bool {
        match self.doc.get_attribute(self.id, key) {
            Some(value) => memmem::find(value.as_bytes(), needle.as_bytes()).is_some(),
            None => false,
        }
    }

    /// Whether this node is an element with the given tag name
    pub fn is_tag(&self, name: &str) -> bool {
        self.is_element() && self.raw_data() == name
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.doc, &other.doc) && self.id == other.id
    }
}

impl Eq for Node {}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("data", &self.data())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::DocumentBuilder;

    fn link() -> Node {
        let mut b = DocumentBuilder::new();
        b.start_element(
            "a",
            [("href", "http://example.com"), ("rel", "nofollow"), ("rel", "noopener")],
        );
        b.text("  Link Name \n");
        b.end_element();
        b.finish().node(1).unwrap()
    }

    #[test]
    fn test_attr_lookup() {
        let a = link();
        assert!(a.has_attr("href"));
        assert!(!a.has_attr("id"));
        assert_eq!(a.attr("href").unwrap(), "http://example.com");
        assert_eq!(a.attr("rel").unwrap(), "nofollow");
        assert_eq!(a.attributes().count(), 3);
    }

    #[test]
    fn test_attr_missing_is_error() {
        let a = link();
        match a.attr("id") {
            Err(SoupError::AttributeNotFound { key }) => assert_eq!(key, "id"),
            other => panic!("expected AttributeNotFound, got {:?}", other),
        }
        assert_eq!(a.attr_or_default("id", "none"), "none");
        assert_eq!(a.attr_or_default("rel", "none"), "nofollow");
    }

    #[test]
    fn test_attr_containing() {
        let a = link();
        assert!(a.has_attr_containing("href", "example"));
        assert!(!a.has_attr_containing("href", "missing"));
        assert!(!a.has_attr_containing("id", ""));
    }

    #[test]
    fn test_is_tag() {
        let a = link();
        assert!(a.is_tag("a"));
        assert!(!a.is_tag("p"));
        let text = a.first_child().unwrap();
        assert!(!text.is_tag("  Link Name \n"));
    }

    #[test]
    fn test_normalization_is_read_time() {
        let text = link().first_child().unwrap();
        assert_eq!(text.data(), "  Link Name \n");

        let trimmed = text.clone().normalized();
        assert_eq!(trimmed.data(), "Link Name");
        assert_eq!(trimmed.raw_data(), "  Link Name \n");
        assert_eq!(text.data(), "  Link Name \n");
    }

    #[test]
    fn test_normalization_idempotent() {
        let text = link().first_child().unwrap();
        let once = text.clone().normalized();
        let twice = once.clone().normalized();
        assert_eq!(once.data(), twice.data());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalization_skips_elements() {
        let a = link();
        assert!(!a.clone().normalized().is_normalized());
    }

    #[test]
    fn test_navigation() {
        let a = link();
        let text = a.first_child().unwrap();
        assert_eq!(text.parent(), Some(a.clone()));
        assert_eq!(a.last_child(), Some(text.clone()));
        assert!(text.next_sibling().is_none());
        assert!(text.prev_sibling().is_none());
        assert_eq!(text.root().kind(), NodeKind::Document);
        assert_eq!(a.parent(), Some(a.root()));
        assert_eq!(text.depth(), 2);
    }
}
