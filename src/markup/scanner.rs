//! Markup scanning using memchr
//!
//! Delimiter search is SIMD-accelerated by the memchr crate. Every
//! delimiter the reader splits on is ASCII, so positions returned here are
//! always valid `str` boundaries.

use memchr::{memchr, memmem};

/// Cursor over markup input
pub struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    #[inline]
    pub fn new(input: &'a str) -> Self {
        Scanner { input, pos: 0 }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos.min(self.input.len());
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Input from the current position on
    #[inline]
    pub fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    #[inline]
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.input[start..end]
    }

    /// Byte at offset from current position
    #[inline]
    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.as_bytes().get(self.pos + offset).copied()
    }

    /// Find next '<' (tag start)
    #[inline]
    pub fn find_tag_start(&self) -> Option<usize> {
        memchr(b'<', self.remaining().as_bytes()).map(|i| self.pos + i)
    }

    /// Find next occurrence of `needle`
    #[inline]
    pub fn find(&self, needle: &str) -> Option<usize> {
        memmem::find(self.remaining().as_bytes(), needle.as_bytes()).map(|i| self.pos + i)
    }

    /// Find the '>' closing the current tag, skipping quoted attribute values.
    ///
    /// A quote only opens a value when it is the first non-whitespace byte
    /// after '='; quotes inside unquoted values are plain characters.
    pub fn find_tag_end_quoted(&self) -> Option<usize> {
        let bytes = self.input.as_bytes();
        let mut pos = self.pos;
        let mut quote: Option<u8> = None;
        let mut after_eq = false;

        while pos < bytes.len() {
            let b = bytes[pos];
            match quote {
                Some(q) if b == q => quote = None,
                Some(_) => {}
                None => match b {
                    b'"' | b'\'' if after_eq => quote = Some(b),
                    b'>' => return Some(pos),
                    _ => {}
                },
            }
            if quote.is_none() && !is_whitespace(b) {
                after_eq = b == b'=';
            }
            pos += 1;
        }
        None
    }

    /// Find `</name` (ASCII case-insensitive), the end of a raw-text element
    pub fn find_end_tag(&self, name: &str) -> Option<usize> {
        let finder = memmem::Finder::new("</");
        let bytes = self.remaining().as_bytes();
        finder.find_iter(bytes).find_map(|i| {
            let candidate = bytes.get(i + 2..i + 2 + name.len())?;
            let after = bytes.get(i + 2 + name.len()).copied();
            let terminated = matches!(after, None | Some(b'>' | b'/' | b' ' | b'\t' | b'\n' | b'\r'));
            (candidate.eq_ignore_ascii_case(name.as_bytes()) && terminated).then_some(self.pos + i)
        })
    }

    /// Check if input at current position starts with `prefix`, ignoring ASCII case
    #[inline]
    pub fn starts_with_ignore_case(&self, prefix: &str) -> bool {
        self.remaining()
            .as_bytes()
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix.as_bytes()))
    }
}

#[inline]
fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0C')
}
