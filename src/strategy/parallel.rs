//! Parallel subtree collection
//!
//! Uses Rayon to fan out one task per child subtree of the root. Each task
//! walks its subtree sequentially, and results are fanned back in by child
//! position, so the output is in document pre-order exactly like a
//! sequential walk. Materializes a `Vec`; for lazy, cancelable reads use
//! the stream queries instead.

use std::sync::Arc;

use rayon::prelude::*;

use crate::dom::{Document, Node, NodeId};

/// `child` followed by its descendants
fn subtree(doc: &Document, child: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    std::iter::once(child).chain(doc.walk(child, true))
}

/// Collect the descendants of `root` matching `predicate`, in document order
pub fn descendants_parallel<P>(root: &Node, predicate: P) -> Vec<Node>
where
    P: Fn(&Node) -> bool + Sync + Send,
{
    let doc = root.document();
    let children: Vec<NodeId> = doc.walk(root.id(), false).collect();

    children
        .par_iter()
        .flat_map_iter(|&child| {
            subtree(doc, child)
                .map(|id| Node::new(Arc::clone(doc), id).normalized())
                .filter(|node| predicate(node))
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Count the descendants of `root` matching `predicate`
pub fn count_parallel<P>(root: &Node, predicate: P) -> usize
where
    P: Fn(&Node) -> bool + Sync + Send,
{
    let doc = root.document();
    let children: Vec<NodeId> = doc.walk(root.id(), false).collect();

    children
        .par_iter()
        .map(|&child| {
            subtree(doc, child)
                .filter(|&id| predicate(&Node::new(Arc::clone(doc), id).normalized()))
                .count()
        })
        .sum()
}
