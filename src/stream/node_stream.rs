//! Node streams
//!
//! A `NodeStream` is the read side of a bounded buffer filled by one
//! background producer thread. Pipeline stages (`filter`, `map`, `limit`)
//! each wrap a stream in a new stream with its own producer thread and its
//! own bounded buffer, so a pipeline of k stages holds k+1 buffers no matter
//! how large the tree is.
//!
//! Producers only hand over a node through [`deliver`], which checks the
//! cancellation flag first and then waits on either buffer space or the
//! cancellation signal. Closing a stream therefore never leaves a producer
//! blocked on a value nobody will read.

use std::thread::{self, JoinHandle};

use crossbeam_channel::{select, Receiver, Sender};
use tracing::{debug, trace, warn};

use super::cancel::CancelToken;
use crate::dom::Node;
use crate::query::NodePredicate;

/// Single-use, lazily produced sequence of nodes.
///
/// Iterating to the end closes the stream implicitly. A consumer that stops
/// early should call [`NodeStream::close`]; dropping the stream does the same.
pub struct NodeStream {
    nodes: Receiver<Node>,
    token: CancelToken,
    worker: Option<JoinHandle<()>>,
    closed: bool,
    stage_buffer_size: usize,
}

/// Hand `node` to the consumer unless the stream was cancelled.
///
/// Returns false when the consumer is gone or cancellation fired, in which
/// case the producer must stop.
pub(crate) fn deliver(out: &Sender<Node>, node: Node, token: &CancelToken) -> bool {
    if token.is_cancelled() {
        return false;
    }
    select! {
        send(out, node) -> res => res.is_ok(),
        recv(token.signal()) -> _ => false,
    }
}

impl NodeStream {
    /// Start `produce` on a background thread, writing into a buffer of
    /// `buffer_size` nodes.
    pub(crate) fn spawn<F>(
        buffer_size: usize,
        stage_buffer_size: usize,
        token: CancelToken,
        produce: F,
    ) -> NodeStream
    where
        F: FnOnce(Sender<Node>, CancelToken) + Send + 'static,
    {
        let (out, nodes) = crossbeam_channel::bounded(buffer_size);
        let worker_token = token.clone();
        let worker = thread::spawn(move || produce(out, worker_token));
        NodeStream {
            nodes,
            token,
            worker: Some(worker),
            closed: false,
            stage_buffer_size,
        }
    }

    /// Whether the stream was closed, explicitly or by running dry
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Stop reading from this stream.
    ///
    /// Cancels this stream and every stage upstream of it, then waits for the
    /// producer to finish. Idempotent; a no-op on a drained stream.
    pub fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.token.cancel();
            debug!("node stream closed by consumer");
        }
        self.reap();
    }

    fn reap(&mut self) {
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("node stream producer panicked");
            }
        }
    }

    fn drained(&mut self) {
        self.closed = true;
        self.reap();
    }

    /// Next node from upstream, or `None` once upstream ends or `token`
    /// is cancelled. Used by stage producers reading their input stream.
    fn recv_or_cancel(&mut self, token: &CancelToken) -> Option<Node> {
        if self.closed {
            return None;
        }
        let msg = select! {
            recv(self.nodes) -> msg => Some(msg),
            recv(token.signal()) -> _ => None,
        };
        match msg {
            Some(Ok(node)) => Some(node),
            Some(Err(_)) => {
                self.drained();
                None
            }
            None => None,
        }
    }

    /// Wrap this stream in a stage running `run` on its own thread.
    fn stage<F>(self, run: F) -> NodeStream
    where
        F: FnOnce(NodeStream, Sender<Node>, CancelToken) + Send + 'static,
    {
        let token = self.token.downstream();
        let buffer_size = self.stage_buffer_size;
        NodeStream::spawn(buffer_size, buffer_size, token, move |out, token| {
            run(self, out, token)
        })
    }

    /// Keep only the nodes matching `predicate`, in order.
    pub fn filter<P: NodePredicate>(self, mut predicate: P) -> NodeStream {
        self.stage(move |mut upstream, out, token| {
            while let Some(node) = upstream.recv_or_cancel(&token) {
                if predicate.matches(&node) && !deliver(&out, node, &token) {
                    break;
                }
            }
        })
    }

    /// Replace every node with `transform(node)`, in order.
    pub fn map<F>(self, mut transform: F) -> NodeStream
    where
        F: FnMut(Node) -> Node + Send + 'static,
    {
        self.stage(move |mut upstream, out, token| {
            while let Some(node) = upstream.recv_or_cancel(&token) {
                if !deliver(&out, transform(node), &token) {
                    break;
                }
            }
        })
    }

    /// Yield exactly the first `max` nodes (fewer if the input runs out),
    /// then cancel everything upstream.
    pub fn limit(self, max: usize) -> NodeStream {
        self.stage(move |mut upstream, out, token| {
            let mut delivered = 0;
            while delivered < max {
                let Some(node) = upstream.recv_or_cancel(&token) else {
                    break;
                };
                if !deliver(&out, node, &token) {
                    break;
                }
                delivered += 1;
            }
            if delivered == max {
                trace!(max, "limit reached, closing upstream");
            }
            upstream.close();
        })
    }

    /// First node of the stream, closing the rest of it
    pub fn first(mut self) -> Option<Node> {
        let node = self.next();
        self.close();
        node
    }

    /// Drain the stream into a vector, in delivery order
    pub fn all(self) -> Vec<Node> {
        self.collect()
    }

    /// Call `f` on every node, in delivery order
    pub fn apply<F: FnMut(Node)>(self, f: F) {
        self.for_each(f)
    }
}

impl Iterator for NodeStream {
    type Item = Node;

    fn next(&mut self) -> Option<Node> {
        if self.closed {
            return None;
        }
        match self.nodes.recv() {
            Ok(node) => Some(node),
            Err(_) => {
                self.drained();
                None
            }
        }
    }
}

impl Drop for NodeStream {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, DocumentBuilder};
    use crate::stream::traverse_from;
    use crate::TraversalConfig;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const NO_ATTRS: [(&str, &str); 0] = [];

    /// A flat document with `n` sibling elements named by their index
    fn wide(n: usize) -> Arc<Document> {
        let mut b = DocumentBuilder::new();
        b.start_element("root", NO_ATTRS);
        for i in 0..n {
            b.start_element(&i.to_string(), NO_ATTRS);
            b.end_element();
        }
        b.end_element();
        b.finish()
    }

    fn names(nodes: Vec<Node>) -> Vec<String> {
        nodes.iter().map(|n| n.data().to_string()).collect()
    }

    fn counted(n: usize, config: &TraversalConfig) -> (NodeStream, Arc<AtomicUsize>) {
        let doc = wide(n);
        let root = doc.root().first_child().unwrap();
        let produced = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&produced);
        let stream = traverse_from(&root, true, config).map(move |node| {
            counter.fetch_add(1, Ordering::SeqCst);
            node
        });
        (stream, produced)
    }

    #[test]
    fn test_drain_closes_implicitly() {
        let doc = wide(3);
        let mut stream = doc.descendants(1).unwrap();
        assert_eq!(stream.by_ref().count(), 3);
        assert!(stream.is_closed());
        assert!(stream.next().is_none());
        stream.close();
        assert!(stream.is_closed());
    }

    #[test]
    fn test_close_twice() {
        let doc = wide(100);
        let mut stream = doc.descendants(1).unwrap();
        assert!(stream.next().is_some());
        stream.close();
        stream.close();
        assert!(stream.is_closed());
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_close_hides_buffered_nodes() {
        let doc = wide(50);
        let mut stream = doc.descendants(1).unwrap();
        assert!(stream.next().is_some());
        // the producer has most likely buffered more nodes by now
        stream.close();
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_close_stops_production() {
        let (mut stream, produced) = counted(10_000, &TraversalConfig::default());
        for _ in 0..5 {
            assert!(stream.next().is_some());
        }
        stream.close();
        let after_close = produced.load(Ordering::SeqCst);
        assert!(after_close < 10_000);

        std::thread::sleep(std::time::Duration::from_millis(20));
        assert_eq!(produced.load(Ordering::SeqCst), after_close);
    }

    #[test]
    fn test_drop_stops_production() {
        let (mut stream, produced) = counted(10_000, &TraversalConfig::default());
        assert!(stream.next().is_some());
        drop(stream);
        let after_drop = produced.load(Ordering::SeqCst);
        std::thread::sleep(std::time::Duration::from_millis(20));
        assert_eq!(produced.load(Ordering::SeqCst), after_drop);
        assert!(after_drop < 10_000);
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(7)]
    #[case(20)]
    fn test_limit_yields_exactly(#[case] max: usize) {
        let doc = wide(20);
        let nodes = doc.descendants(1).unwrap().limit(max).all();
        assert_eq!(nodes.len(), max);
        let expected: Vec<String> = (0..max).map(|i| i.to_string()).collect();
        assert_eq!(names(nodes), expected);
    }

    #[test]
    fn test_limit_past_end() {
        let doc = wide(3);
        assert_eq!(doc.descendants(1).unwrap().limit(10).all().len(), 3);
    }

    #[test]
    fn test_limit_does_not_run_traversal_to_completion() {
        let config = TraversalConfig::default().buffer_size(1);
        let (stream, produced) = counted(100_000, &config);
        let nodes = stream.limit(5).all();
        assert_eq!(nodes.len(), 5);
        assert!(produced.load(Ordering::SeqCst) < 100);
    }

    #[test]
    fn test_stage_after_limit_keeps_last_node() {
        let doc = wide(10);
        let nodes = doc
            .descendants(1)
            .unwrap()
            .limit(3)
            .filter(|_: &Node| true)
            .all();
        assert_eq!(names(nodes), vec!["0", "1", "2"]);
    }

    #[test]
    fn test_filter_and_map_preserve_order() {
        let doc = wide(10);
        let nodes = doc
            .descendants(1)
            .unwrap()
            .filter(|n: &Node| n.data().parse::<usize>().unwrap() % 2 == 0)
            .map(|n| n.next_sibling().unwrap_or(n))
            .all();
        assert_eq!(names(nodes), vec!["1", "3", "5", "7", "9"]);
    }

    #[test]
    fn test_close_derived_stream() {
        let (stream, produced) = counted(10_000, &TraversalConfig::default());
        let mut filtered = stream.filter(|_: &Node| true);
        assert!(filtered.next().is_some());
        filtered.close();
        let after_close = produced.load(Ordering::SeqCst);
        std::thread::sleep(std::time::Duration::from_millis(20));
        assert_eq!(produced.load(Ordering::SeqCst), after_close);
    }

    #[test]
    fn test_first() {
        let doc = wide(1000);
        let first = doc.descendants(1).unwrap().first();
        assert_eq!(first.map(|n| n.data().to_string()), Some("0".to_string()));
    }

    #[test]
    fn test_first_on_empty() {
        let doc = wide(0);
        assert!(doc.descendants(1).unwrap().first().is_none());
    }

    #[test]
    fn test_apply() {
        let doc = wide(4);
        let mut seen = Vec::new();
        doc.descendants(1)
            .unwrap()
            .apply(|n| seen.push(n.data().to_string()));
        assert_eq!(seen, vec!["0", "1", "2", "3"]);
    }

    #[test]
    fn test_panicking_stage_ends_stream() {
        let doc = wide(5);
        let nodes = doc
            .descendants(1)
            .unwrap()
            .map(|n| {
                if n.data() == "2" {
                    panic!("boom");
                }
                n
            })
            .all();
        assert_eq!(names(nodes), vec!["0", "1"]);
    }

    #[test]
    fn test_deliver_refuses_after_cancel() {
        let doc = wide(1);
        let (out, rx) = crossbeam_channel::bounded(1);
        let token = CancelToken::new();
        token.cancel();
        assert!(!deliver(&out, doc.root(), &token));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_deliver_unblocks_on_cancel() {
        let doc = wide(1);
        let (out, _rx) = crossbeam_channel::bounded(0);
        let token = CancelToken::new();
        let canceller = token.clone();
        let root = doc.root();
        let handle = std::thread::spawn(move || deliver(&out, root, &token));
        std::thread::sleep(std::time::Duration::from_millis(10));
        canceller.cancel();
        assert!(!handle.join().unwrap());
    }
}
