//! Traversal configuration
//!
//! Buffer sizing and read-time normalization for node streams.

/// Default capacity of the buffer between a traversal and its first reader.
pub const DEFAULT_BUFFER_SIZE: usize = 20;

/// Configuration for node streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalConfig {
    /// Capacity of the bounded buffer filled by the traversal producer.
    /// Default: 20
    pub buffer_size: usize,
    /// Capacity of the buffer each pipeline stage (filter, map, limit) adds.
    /// Default: 0 (rendezvous hand-off)
    pub stage_buffer_size: usize,
    /// Whether text nodes are yielded with surrounding whitespace trimmed.
    /// Default: true
    pub normalize_text: bool,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            stage_buffer_size: 0,
            normalize_text: true,
        }
    }
}

impl TraversalConfig {
    /// Creates a new `TraversalConfig` with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the traversal buffer capacity.
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Sets the per-stage buffer capacity.
    pub fn stage_buffer_size(mut self, size: usize) -> Self {
        self.stage_buffer_size = size;
        self
    }

    /// Enables or disables text normalization.
    pub fn normalize_text(mut self, yes: bool) -> Self {
        self.normalize_text = yes;
        self
    }
}
