//! String Interning Pool
//!
//! Deduplicated storage for tag names, attribute keys and values, and text
//! payloads. Every string lives once in a shared buffer and is addressed by
//! a `u32` id, so node records stay small and `Copy`.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use tracing::warn;

/// (offset, length) of a string inside the pool buffer
#[derive(Debug, Clone, Copy)]
struct StringEntry {
    offset: u32,
    len: u32,
}

/// String interning pool
///
/// Memory layout:
/// - `entries`: offset/length for each interned string ID
/// - `data`: one buffer holding every distinct string back to back
/// - `hash_index`: hash -> list of IDs (handles rare collisions)
///
/// Offsets and lengths are `u32`, so a pool holds at most
/// [`StringPool::MAX_BYTES`] bytes of string data. Interning past that limit
/// is refused and resolves to the empty string.
#[derive(Debug)]
pub struct StringPool {
    entries: Vec<StringEntry>,
    data: String,
    hash_index: HashMap<u64, Vec<u32>>,
}

impl Default for StringPool {
    fn default() -> Self {
        Self::new()
    }
}

impl StringPool {
    /// Upper bound on stored string data
    pub const MAX_BYTES: usize = u32::MAX as usize;

    /// Create a new empty string pool
    pub fn new() -> Self {
        let mut pool = StringPool {
            entries: Vec::with_capacity(256),
            data: String::with_capacity(4096),
            hash_index: HashMap::new(),
        };
        // Entry 0 is reserved for the empty string
        pool.entries.push(StringEntry { offset: 0, len: 0 });
        pool
    }

    #[inline]
    fn compute_hash(s: &str) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        let mut hasher = DefaultHasher::new();
        s.hash(&mut hasher);
        hasher.finish()
    }

    /// Intern a string, returning its ID. Equal strings share one ID.
    pub fn intern(&mut self, s: &str) -> u32 {
        if s.is_empty() {
            return 0;
        }

        let hash = Self::compute_hash(s);
        if let Some(ids) = self.hash_index.get(&hash) {
            for &id in ids {
                if self.get(id) == s {
                    return id;
                }
            }
        }

        if !Self::within_limit(self.data.len(), s.len()) {
            warn!(len = s.len(), "string pool full, string dropped");
            return 0;
        }
        let entry = StringEntry {
            offset: self.data.len() as u32,
            len: s.len() as u32,
        };
        self.data.push_str(s);

        let id = self.entries.len() as u32;
        self.entries.push(entry);
        self.hash_index.entry(hash).or_default().push(id);
        id
    }

    /// Whether `len` more bytes fit after `used` bytes of string data
    #[inline]
    fn within_limit(used: usize, len: usize) -> bool {
        used.checked_add(len).is_some_and(|end| end <= Self::MAX_BYTES)
    }

    /// Get a string by ID. Unknown IDs resolve to the empty string.
    pub fn get(&self, id: u32) -> &str {
        match self.entries.get(id as usize) {
            Some(entry) => {
                let start = entry.offset as usize;
                let end = start + entry.len as usize;
                self.data.get(start..end).unwrap_or("")
            }
            None => "",
        }
    }

    /// Get the number of unique strings stored
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the pool is empty
    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1 // Entry 0 is reserved
    }

    /// Get total bytes used for string storage
    pub fn bytes_used(&self) -> usize {
        self.data.len()
    }
}
