//! Stream Module - lazy, cancelable node streams
//!
//! - Traversal: sequential pre-order walk on one background thread
//! - NodeStream: bounded buffer read side, pipeline stages, terminal consumers
//! - CancelToken: shared flag + broadcast signal, chained upstream

pub mod cancel;
pub mod node_stream;
pub mod traversal;

pub use cancel::CancelToken;
pub use node_stream::NodeStream;
pub use traversal::{normalize, traverse, traverse_from};
