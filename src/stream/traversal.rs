//! Traversal engine
//!
//! Produces the nodes under a root in document pre-order on a single
//! background thread. The walk is sequential, so the delivery order depends
//! only on the tree shape. Before every hand-off the producer checks the
//! stream's cancellation flag and stops without visiting the remaining
//! siblings or descendants once it has fired.

use std::sync::Arc;

use tracing::{debug, trace};

use super::cancel::CancelToken;
use super::node_stream::{deliver, NodeStream};
use crate::config::TraversalConfig;
use crate::dom::Node;
use crate::error::{Result, SoupError};

/// Text normalization transform: trims the payload of text nodes on read.
///
/// Pure and idempotent; other node kinds pass through unchanged.
pub fn normalize(node: Node) -> Node {
    node.normalized()
}

/// Stream the nodes under `root`: all descendants when `recursive`, the
/// direct children otherwise.
///
/// Fails with `InvalidArgument` when no root is given.
pub fn traverse(root: Option<&Node>, recursive: bool, config: &TraversalConfig) -> Result<NodeStream> {
    let root = root.ok_or_else(|| SoupError::invalid_argument("traversal requires a root node"))?;
    Ok(traverse_from(root, recursive, config))
}

/// Stream the nodes under a root that is known to exist
pub fn traverse_from(root: &Node, recursive: bool, config: &TraversalConfig) -> NodeStream {
    let doc = Arc::clone(root.document());
    let root_id = root.id();
    let normalize_text = config.normalize_text;
    debug!(root = root_id, recursive, "starting traversal");

    NodeStream::spawn(
        config.buffer_size,
        config.stage_buffer_size,
        CancelToken::new(),
        move |out, token| {
            let mut delivered = 0usize;
            for id in doc.walk(root_id, recursive) {
                let mut node = Node::new(Arc::clone(&doc), id);
                if normalize_text {
                    node = normalize(node);
                }
                if !deliver(&out, node, &token) {
                    trace!(root = root_id, delivered, "traversal cancelled");
                    return;
                }
                delivered += 1;
            }
            trace!(root = root_id, delivered, "traversal exhausted");
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, DocumentBuilder, NodeKind};
    use pretty_assertions::assert_eq;

    const NO_ATTRS: [(&str, &str); 0] = [];

    fn sample() -> Arc<Document> {
        Document::parse("<html><head><title>T</title></head><body><p>hi</p></body></html>")
    }

    fn data(stream: NodeStream) -> Vec<String> {
        stream.map(normalize).all().iter().map(|n| n.data().to_string()).collect()
    }

    /// Binary tree of the given depth, elements named by their path
    fn binary(depth: usize) -> Arc<Document> {
        fn grow(b: &mut DocumentBuilder, path: &str, depth: usize) {
            b.start_element(path, NO_ATTRS);
            if depth > 0 {
                grow(b, &format!("{}0", path), depth - 1);
                grow(b, &format!("{}1", path), depth - 1);
            }
            b.end_element();
        }
        let mut b = DocumentBuilder::new();
        grow(&mut b, "n", depth);
        b.finish()
    }

    #[test]
    fn test_descendants_preorder() {
        let doc = sample();
        let stream = traverse_from(&doc.root(), true, &TraversalConfig::default());
        assert_eq!(data(stream), vec!["html", "head", "title", "T", "body", "p", "hi"]);
    }

    #[test]
    fn test_children_only() {
        let doc = sample();
        let html = doc.root().first_child().unwrap();
        let stream = traverse_from(&html, false, &TraversalConfig::default());
        assert_eq!(data(stream), vec!["head", "body"]);
    }

    #[test]
    fn test_null_root() {
        let result = traverse(None, true, &TraversalConfig::default());
        assert!(matches!(result, Err(SoupError::InvalidArgument(_))));
    }

    #[test]
    fn test_order_matches_sequential_walk() {
        let doc = binary(8);
        let expected: Vec<_> = doc.walk(0, true).collect();
        for buffer_size in [0, 1, 20] {
            let config = TraversalConfig::default().buffer_size(buffer_size);
            let ids: Vec<_> = traverse_from(&doc.root(), true, &config)
                .all()
                .iter()
                .map(|n| n.id())
                .collect();
            assert_eq!(ids, expected);
        }
    }

    #[test]
    fn test_every_node_exactly_once() {
        let doc = binary(6);
        let mut ids: Vec<_> = traverse_from(&doc.root(), true, &TraversalConfig::default())
            .all()
            .iter()
            .map(|n| n.id())
            .collect();
        assert_eq!(ids.len(), doc.node_count() - 1);
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), doc.node_count() - 1);
    }

    #[test]
    fn test_children_subsequence_of_descendants() {
        let doc = binary(4);
        let top = doc.root().first_child().unwrap();
        let config = TraversalConfig::default();
        let children: Vec<_> = traverse_from(&top, false, &config).all();
        let descendants: Vec<_> = traverse_from(&top, true, &config).all();

        let mut rest = descendants.iter();
        for child in &children {
            assert!(rest.any(|d| d == child));
            assert_eq!(child.parent().as_ref(), Some(&top));
        }
        assert_eq!(children.len(), 2);
    }

    #[test]
    fn test_text_normalized_on_yield() {
        let doc = Document::parse("<p>  padded  </p>");
        let text = traverse_from(&doc.root(), true, &TraversalConfig::default())
            .find(|n| n.kind() == NodeKind::Text)
            .unwrap();
        assert_eq!(text.data(), "padded");
        assert_eq!(text.raw_data(), "  padded  ");

        let raw = traverse_from(&doc.root(), true, &TraversalConfig::default().normalize_text(false))
            .find(|n| n.kind() == NodeKind::Text)
            .unwrap();
        assert_eq!(raw.data(), "  padded  ");
    }

    #[test]
    fn test_normalize_idempotent() {
        let doc = Document::parse("<p> x </p>");
        let text = doc.root().first_child().unwrap().first_child().unwrap();
        assert_eq!(normalize(normalize(text.clone())).data(), normalize(text).data());
    }
}
