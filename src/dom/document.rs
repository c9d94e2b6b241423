//! Document - Arena-based node tree
//!
//! Storage for a parsed tree with:
//! - Arena allocation for nodes and attributes
//! - NodeId indices for traversal
//! - String interning for names and payloads
//!
//! A document is immutable once built and is shared behind an `Arc`, so any
//! number of streams can walk it from background threads at once.

use std::io::Read;
use std::sync::Arc;

use super::handle::Node;
use super::node::{AttributeRecord, NodeId, NodeKind, NodeRecord, DOCUMENT_ID};
use super::strings::StringPool;
use crate::error::{Result, SoupError};
use crate::stream::NodeStream;

/// A parsed document stored in arena format
#[derive(Debug)]
pub struct Document {
    /// Arena of nodes, the document node at index 0
    nodes: Vec<NodeRecord>,
    /// Arena of attributes
    attributes: Vec<AttributeRecord>,
    /// Interned strings
    pub strings: StringPool,
}

impl Document {
    /// Parse markup leniently. Never fails: malformed markup degrades into
    /// text or `Error` nodes.
    pub fn parse(input: &str) -> Arc<Document> {
        crate::markup::parse(input)
    }

    /// Read the whole source and parse it. The input is assumed to be UTF-8.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Arc<Document>> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        Ok(Self::parse(&input))
    }

    /// Get node count, document node included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get a node record by ID
    pub fn get_node(&self, id: NodeId) -> Option<&NodeRecord> {
        self.nodes.get(id as usize)
    }

    /// Get a node record for an id handed out by this document
    #[inline]
    pub(crate) fn record(&self, id: NodeId) -> &NodeRecord {
        &self.nodes[id as usize]
    }

    /// Tag name of an element, or raw payload of a text, comment or doctype
    pub fn data(&self, id: NodeId) -> &str {
        self.get_node(id)
            .map(|node| self.strings.get(node.data_id))
            .unwrap_or("")
    }

    /// Namespace of a node, empty for the default namespace
    pub fn namespace(&self, id: NodeId) -> &str {
        self.get_node(id)
            .map(|node| self.strings.get(node.namespace_id))
            .unwrap_or("")
    }

    /// Get attributes for a node, in source order
    pub fn attributes(&self, id: NodeId) -> &[AttributeRecord] {
        if let Some(node) = self.get_node(id) {
            let start = node.attr_start as usize;
            let end = start + node.attr_count as usize;
            self.attributes.get(start..end).unwrap_or(&[])
        } else {
            &[]
        }
    }

    /// Get the first attribute value with the given key
    pub fn get_attribute(&self, id: NodeId, key: &str) -> Option<&str> {
        self.attributes(id)
            .iter()
            .find(|attr| self.strings.get(attr.key_id) == key)
            .map(|attr| self.strings.get(attr.value_id))
    }

    /// Walk the subtree under `root` in pre-order, `root` excluded.
    /// With `recursive == false` only direct children are produced.
    pub fn walk(&self, root: NodeId, recursive: bool) -> Walk<'_> {
        let next = self.get_node(root).and_then(|n| n.first_child);
        Walk {
            doc: self,
            root,
            recursive,
            next,
        }
    }

    /// Handle on the document node
    pub fn root(self: &Arc<Self>) -> Node {
        Node::new(Arc::clone(self), DOCUMENT_ID)
    }

    /// Handle on the node with the given id
    pub fn node(self: &Arc<Self>, id: NodeId) -> Result<Node> {
        if (id as usize) < self.nodes.len() {
            Ok(Node::new(Arc::clone(self), id))
        } else {
            Err(SoupError::invalid_argument(format!(
                "node {} is not part of this document",
                id
            )))
        }
    }

    /// Stream the direct children of the node with the given id
    pub fn children(self: &Arc<Self>, id: NodeId) -> Result<NodeStream> {
        Ok(self.node(id)?.children())
    }

    /// Stream all descendants of the node with the given id
    pub fn descendants(self: &Arc<Self>, id: NodeId) -> Result<NodeStream> {
        Ok(self.node(id)?.descendants())
    }
}

/// Pre-order walk over a subtree
///
/// Holds a single cursor and climbs parent links to find the next sibling,
/// so memory use is constant regardless of tree size or depth. The tree is
/// assumed acyclic; a cyclic sibling chain never terminates.
pub struct Walk<'a> {
    doc: &'a Document,
    root: NodeId,
    recursive: bool,
    next: Option<NodeId>,
}

impl Walk<'_> {
    fn advance(&self, current: NodeId) -> Option<NodeId> {
        let node = self.doc.record(current);
        if self.recursive {
            if let Some(child) = node.first_child {
                return Some(child);
            }
        }

        let mut cursor = node;
        loop {
            if let Some(sibling) = cursor.next_sibling {
                return Some(sibling);
            }
            match cursor.parent {
                Some(parent) if parent != self.root => cursor = self.doc.record(parent),
                _ => return None,
            }
        }
    }
}

impl Iterator for Walk<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.advance(current);
        Some(current)
    }
}

/// Incremental tree construction
///
/// Keeps a stack of open elements; every appended node becomes the new last
/// child of the innermost open element, with sibling links fixed up.
pub struct DocumentBuilder {
    nodes: Vec<NodeRecord>,
    attributes: Vec<AttributeRecord>,
    strings: StringPool,
    stack: Vec<NodeId>,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentBuilder {
    /// Create a builder holding only the document node
    pub fn new() -> Self {
        let mut nodes = Vec::with_capacity(256);
        nodes.push(NodeRecord::document());
        DocumentBuilder {
            nodes,
            attributes: Vec::with_capacity(128),
            strings: StringPool::new(),
            stack: vec![DOCUMENT_ID],
        }
    }

    /// Id of the innermost open element (the document node when none is open)
    pub fn current(&self) -> NodeId {
        *self.stack.last().unwrap_or(&DOCUMENT_ID)
    }

    /// Number of open elements
    pub fn open_count(&self) -> usize {
        self.stack.len() - 1
    }

    /// Open an element in the default namespace
    pub fn start_element<I, K, V>(&mut self, name: &str, attrs: I) -> NodeId
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.start_element_ns("", name, attrs)
    }

    /// Open an element in the given namespace
    pub fn start_element_ns<I, K, V>(&mut self, namespace: &str, name: &str, attrs: I) -> NodeId
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let attr_start = self.attributes.len() as u32;
        for (key, value) in attrs {
            let key_id = self.strings.intern(key.as_ref());
            let value_id = self.strings.intern(value.as_ref());
            self.attributes.push(AttributeRecord { key_id, value_id });
        }
        let attr_count = self.attributes.len() as u32 - attr_start;

        let id = self.append(NodeKind::Element, name);
        let node = &mut self.nodes[id as usize];
        node.namespace_id = self.strings.intern(namespace);
        node.attr_start = attr_start;
        node.attr_count = attr_count;

        self.stack.push(id);
        id
    }

    /// Close the innermost open element. The document node is never closed.
    pub fn end_element(&mut self) -> Option<NodeId> {
        if self.stack.len() > 1 {
            self.stack.pop()
        } else {
            None
        }
    }

    /// Append a text run
    pub fn text(&mut self, content: &str) -> NodeId {
        self.append(NodeKind::Text, content)
    }

    /// Append a comment
    pub fn comment(&mut self, content: &str) -> NodeId {
        self.append(NodeKind::Comment, content)
    }

    /// Append a doctype declaration
    pub fn doctype(&mut self, content: &str) -> NodeId {
        self.append(NodeKind::Doctype, content)
    }

    /// Append an error node carrying the raw markup
    pub fn error(&mut self, raw: &str) -> NodeId {
        self.append(NodeKind::Error, raw)
    }

    /// Freeze the tree. Elements still open are implicitly closed.
    pub fn finish(self) -> Arc<Document> {
        Arc::new(Document {
            nodes: self.nodes,
            attributes: self.attributes,
            strings: self.strings,
        })
    }

    fn append(&mut self, kind: NodeKind, data: &str) -> NodeId {
        let parent_id = self.current();
        let depth = self.stack.len() as u32;
        let data_id = self.strings.intern(data);

        let node_id = self.nodes.len() as NodeId;
        self.nodes
            .push(NodeRecord::new(kind, data_id, Some(parent_id), depth));
        self.link_child(parent_id, node_id);
        node_id
    }

    /// Link a child node to its parent
    fn link_child(&mut self, parent_id: NodeId, child_id: NodeId) {
        let last_child_opt = self.nodes[parent_id as usize].last_child;

        if let Some(last_child_id) = last_child_opt {
            self.nodes[child_id as usize].prev_sibling = Some(last_child_id);
            self.nodes[last_child_id as usize].next_sibling = Some(child_id);
        } else {
            self.nodes[parent_id as usize].first_child = Some(child_id);
        }
        self.nodes[parent_id as usize].last_child = Some(child_id);
    }
}
