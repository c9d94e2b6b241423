//! Node records
//!
//! Uses NodeId (u32) for compact, cache-friendly node references. Links are
//! arena indices: the arena owns every node, `parent` never does.

/// Compact node identifier (index into arena)
pub type NodeId = u32;

/// Id of the document node in every arena
pub const DOCUMENT_ID: NodeId = 0;

/// Type of a parsed node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Document root
    Document,
    /// Element node
    Element,
    /// Text run
    Text,
    /// Comment
    Comment,
    /// Doctype declaration
    Doctype,
    /// Markup the reader could not make sense of
    Error,
}

/// A node in the arena
#[derive(Debug, Clone)]
pub struct NodeRecord {
    /// Type of this node
    pub kind: NodeKind,
    /// Parent node (None for document root)
    pub parent: Option<NodeId>,
    /// First child node
    pub first_child: Option<NodeId>,
    /// Last child node
    pub last_child: Option<NodeId>,
    /// Previous sibling
    pub prev_sibling: Option<NodeId>,
    /// Next sibling
    pub next_sibling: Option<NodeId>,
    /// String pool id of the tag name (elements) or payload (text, comment, doctype)
    pub data_id: u32,
    /// String pool id of the namespace, 0 for the default namespace
    pub namespace_id: u32,
    /// Start of attributes in attribute arena (for elements)
    pub attr_start: u32,
    /// Number of attributes
    pub attr_count: u32,
    /// Depth in document tree
    pub depth: u32,
}

impl NodeRecord {
    /// Create the document root node
    pub fn document() -> Self {
        Self::new(NodeKind::Document, 0, None, 0)
    }

    /// Create a node of the given kind under `parent`
    pub fn new(kind: NodeKind, data_id: u32, parent: Option<NodeId>, depth: u32) -> Self {
        NodeRecord {
            kind,
            parent,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            data_id,
            namespace_id: 0,
            attr_start: 0,
            attr_count: 0,
            depth,
        }
    }

    /// Check if this is an element node
    #[inline]
    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    /// Check if this is a text node
    #[inline]
    pub fn is_text(&self) -> bool {
        self.kind == NodeKind::Text
    }
}

/// Stored attribute. Keys are not required to be unique on a node.
#[derive(Debug, Clone, Copy)]
pub struct AttributeRecord {
    /// String pool id of the attribute key
    pub key_id: u32,
    /// String pool id of the attribute value
    pub value_id: u32,
}
