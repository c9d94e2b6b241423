//! Collection strategies
//!
//! - Streaming (default): the lazy, cancelable queries in `query`
//! - Parallel: rayon fan-out over child subtrees, materialized in document order

pub mod parallel;

pub use parallel::{count_parallel, descendants_parallel};
