//! Character reference decoding
//!
//! Handles named references (`&lt;`, `&amp;`, `&nbsp;` and a few common
//! HTML ones) and numeric references (`&#123;`, `&#x7B;`). Unknown or
//! unterminated references are kept verbatim.
//!
//! Uses Cow for zero-copy when no references are present.

use memchr::memchr;
use std::borrow::Cow;

/// Longest reference body searched for its ';', '&' included
const MAX_REFERENCE_LEN: usize = 32;

/// Decode character references in text or attribute values
#[inline]
pub fn decode_text(input: &str) -> Cow<'_, str> {
    if memchr(b'&', input.as_bytes()).is_none() {
        return Cow::Borrowed(input);
    }
    Cow::Owned(decode_entities(input))
}

fn decode_entities(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = memchr(b'&', rest.as_bytes()) {
        result.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let window = &rest.as_bytes()[..rest.len().min(MAX_REFERENCE_LEN)];
        let decoded = memchr(b';', window)
            .and_then(|semi| decode_entity(&rest[1..semi]).map(|c| (c, semi)));
        match decoded {
            Some((c, semi)) => {
                result.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                result.push('&');
                rest = &rest[1..];
            }
        }
    }
    result.push_str(rest);
    result
}

/// Decode a single reference (without & and ;)
fn decode_entity(entity: &str) -> Option<char> {
    if let Some(numeric) = entity.strip_prefix('#') {
        return decode_numeric_entity(numeric);
    }

    match entity {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{00A0}'),
        "copy" => Some('\u{00A9}'),
        "reg" => Some('\u{00AE}'),
        "mdash" => Some('\u{2014}'),
        "ndash" => Some('\u{2013}'),
        "hellip" => Some('\u{2026}'),
        _ => None,
    }
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    let codepoint = match entity.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => entity.parse::<u32>().ok()?,
    };
    char::from_u32(codepoint)
}
