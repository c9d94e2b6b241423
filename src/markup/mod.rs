//! Markup Reader - lenient HTML-style tree construction
//!
//! Turns markup text into a `Document` in one pass:
//! - Text runs between tags, with character references decoded
//! - Start, end and self-closing tags; HTML void elements never take children
//! - Comments, doctype declarations
//! - Raw-text elements (`script`, `style`) whose content is not scanned for tags
//!
//! The reader never fails. An end tag closes the nearest open element with
//! the same name (and everything opened inside it) or is ignored; a tag cut
//! off by the end of input becomes an `Error` node holding the raw text.

pub mod attributes;
pub mod entities;
pub mod scanner;

use std::sync::Arc;

use tracing::debug;

use crate::dom::{Document, DocumentBuilder};
use attributes::parse_attributes;
use entities::decode_text;
use scanner::Scanner;

/// Elements that never have content
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements whose content is raw text
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Parse markup into a document
pub fn parse(input: &str) -> Arc<Document> {
    let mut reader = MarkupReader::new(input);
    reader.run();
    let doc = reader.builder.finish();
    debug!(nodes = doc.node_count(), bytes = input.len(), "parsed markup");
    doc
}

struct MarkupReader<'a> {
    scanner: Scanner<'a>,
    builder: DocumentBuilder,
    /// Names of the open elements, innermost last
    open: Vec<String>,
    /// Text accumulated since the last non-text node
    pending_text: String,
}

impl<'a> MarkupReader<'a> {
    fn new(input: &'a str) -> Self {
        MarkupReader {
            scanner: Scanner::new(input),
            builder: DocumentBuilder::new(),
            open: Vec::new(),
            pending_text: String::new(),
        }
    }

    fn run(&mut self) {
        while !self.scanner.is_eof() {
            let start = self.scanner.position();
            match self.scanner.find_tag_start() {
                Some(lt) => {
                    self.push_text(self.scanner.slice(start, lt));
                    self.scanner.set_position(lt);
                    self.read_markup();
                }
                None => {
                    self.push_text(self.scanner.remaining());
                    break;
                }
            }
        }
        self.flush_text();
    }

    fn push_text(&mut self, raw: &str) {
        if !raw.is_empty() {
            self.pending_text.push_str(&decode_text(raw));
        }
    }

    fn flush_text(&mut self) {
        if !self.pending_text.is_empty() {
            self.builder.text(&self.pending_text);
            self.pending_text.clear();
        }
    }

    /// Read the construct starting at the current '<'
    fn read_markup(&mut self) {
        if self.scanner.starts_with_ignore_case("<!--") {
            self.read_comment();
        } else if self.scanner.starts_with_ignore_case("<!doctype") {
            self.read_doctype();
        } else if self.scanner.starts_with_ignore_case("</") {
            self.read_end_tag();
        } else if self.scanner.peek_at(1).is_some_and(|b| b.is_ascii_alphabetic()) {
            self.read_start_tag();
        } else {
            // a '<' that opens nothing is just text
            self.push_text("<");
            self.scanner.set_position(self.scanner.position() + 1);
        }
    }

    fn read_comment(&mut self) {
        self.flush_text();
        let body_start = self.scanner.position() + 4;
        self.scanner.set_position(body_start);
        match self.scanner.find("-->") {
            Some(end) => {
                self.builder.comment(self.scanner.slice(body_start, end));
                self.scanner.set_position(end + 3);
            }
            None => {
                self.builder.comment(self.scanner.remaining());
                self.scanner.set_position(usize::MAX);
            }
        }
    }

    fn read_doctype(&mut self) {
        self.flush_text();
        let start = self.scanner.position();
        match self.scanner.find_tag_end_quoted() {
            Some(gt) => {
                let content = self.scanner.slice(start + "<!doctype".len(), gt).trim();
                self.builder.doctype(content);
                self.scanner.set_position(gt + 1);
            }
            None => self.read_truncated(),
        }
    }

    fn read_end_tag(&mut self) {
        let start = self.scanner.position();
        let Some(gt) = self.scanner.find_tag_end_quoted() else {
            self.flush_text();
            self.read_truncated();
            return;
        };
        let inner = self.scanner.slice(start + 2, gt);
        self.scanner.set_position(gt + 1);

        let name = tag_name(inner).to_ascii_lowercase();
        if name.is_empty() {
            self.flush_text();
            self.builder.error(self.scanner.slice(start, gt + 1));
            return;
        }
        self.close_element(&name);
    }

    fn read_start_tag(&mut self) {
        self.flush_text();
        let start = self.scanner.position();
        let Some(gt) = self.scanner.find_tag_end_quoted() else {
            self.read_truncated();
            return;
        };
        let inner = self.scanner.slice(start + 1, gt);
        self.scanner.set_position(gt + 1);

        let raw_name = tag_name(inner);
        let name = raw_name.to_ascii_lowercase();
        let self_closing = inner.trim_end().ends_with('/');
        let attrs = parse_attributes(&inner[raw_name.len()..]);

        self.builder.start_element(&name, attrs);
        if self_closing || VOID_ELEMENTS.contains(&name.as_str()) {
            self.builder.end_element();
            return;
        }

        if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
            self.read_raw_text(&name);
            self.builder.end_element();
            return;
        }
        self.open.push(name);
    }

    /// Content of a raw-text element up to its end tag, taken verbatim
    fn read_raw_text(&mut self, name: &str) {
        let start = self.scanner.position();
        let end = self.scanner.find_end_tag(name);
        let content = match end {
            Some(end) => self.scanner.slice(start, end),
            None => self.scanner.remaining(),
        };
        if !content.is_empty() {
            self.builder.text(content);
        }

        match end {
            Some(end) => {
                self.scanner.set_position(end);
                match self.scanner.find_tag_end_quoted() {
                    Some(gt) => self.scanner.set_position(gt + 1),
                    None => self.scanner.set_position(usize::MAX),
                }
            }
            None => self.scanner.set_position(usize::MAX),
        }
    }

    /// Close the nearest open element called `name`, if there is one
    fn close_element(&mut self, name: &str) {
        let Some(index) = self.open.iter().rposition(|open| open == name) else {
            return;
        };
        self.flush_text();
        for _ in index..self.open.len() {
            self.builder.end_element();
        }
        self.open.truncate(index);
    }

    /// A construct cut off by the end of input
    fn read_truncated(&mut self) {
        self.builder.error(self.scanner.remaining());
        self.scanner.set_position(usize::MAX);
    }
}

/// Tag name at the start of a tag's inner text
fn tag_name(inner: &str) -> &str {
    let end = inner
        .bytes()
        .position(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0C' | b'/'))
        .unwrap_or(inner.len());
    &inner[..end]
}
