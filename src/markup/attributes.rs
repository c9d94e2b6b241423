//! Attribute Parsing
//!
//! Parses attributes from the inside of a start tag. Lenient the way HTML
//! readers are: values may be double-quoted, single-quoted, unquoted, or
//! missing entirely (`<input disabled>`), and names are ASCII-lowercased.

use super::entities::decode_text;

/// Parse attributes from raw tag content (after the element name)
pub fn parse_attributes(input: &str) -> Vec<(String, String)> {
    let bytes = input.as_bytes();
    let mut attrs = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        while pos < bytes.len() && (is_whitespace(bytes[pos]) || bytes[pos] == b'/') {
            pos += 1;
        }
        if pos >= bytes.len() {
            break;
        }

        let name_start = pos;
        while pos < bytes.len() && !is_name_end(bytes[pos]) {
            pos += 1;
        }
        if pos == name_start {
            // stray '=' with no name
            pos += 1;
            continue;
        }
        let name = input[name_start..pos].to_ascii_lowercase();

        while pos < bytes.len() && is_whitespace(bytes[pos]) {
            pos += 1;
        }
        if pos >= bytes.len() || bytes[pos] != b'=' {
            attrs.push((name, String::new()));
            continue;
        }
        pos += 1; // Skip '='

        while pos < bytes.len() && is_whitespace(bytes[pos]) {
            pos += 1;
        }
        if pos >= bytes.len() {
            attrs.push((name, String::new()));
            break;
        }

        let value = match bytes[pos] {
            quote @ (b'"' | b'\'') => {
                let value_start = pos + 1;
                pos = value_start;
                while pos < bytes.len() && bytes[pos] != quote {
                    pos += 1;
                }
                let value = &input[value_start..pos];
                pos = (pos + 1).min(bytes.len()); // Skip closing quote
                value
            }
            _ => {
                let value_start = pos;
                while pos < bytes.len() && !is_whitespace(bytes[pos]) {
                    pos += 1;
                }
                &input[value_start..pos]
            }
        };
        attrs.push((name, decode_text(value).into_owned()));
    }

    attrs
}

#[inline]
fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'\x0C')
}

#[inline]
fn is_name_end(b: u8) -> bool {
    is_whitespace(b) || matches!(b, b'=' | b'/' | b'>')
}
