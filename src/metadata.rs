//! Document metadata lookups built on the query surface.

use memchr::memmem;

use crate::dom::Node;
use crate::error::{Result, SoupError};

const CHARSET_MARKER: &str = "charset=";

/// The `content` value of the first meta declaration under `head` that
/// carries a charset, e.g. `text/html; charset=ISO-8859-1`.
pub fn content_type(node: &Node) -> Result<String> {
    let head = find_head(node)?;
    let meta = head
        .descendants_by_attr_containing("content", CHARSET_MARKER)
        .first()
        .ok_or(SoupError::MetadataNotFound("meta"))?;
    Ok(meta.attr("content")?.to_string())
}

/// The declared character encoding of the document containing `node`.
///
/// Prefers an HTML5 `<meta charset="...">` under `head`, then falls back to
/// the charset parameter of a content-type declaration.
pub fn charset(node: &Node) -> Result<String> {
    let head = find_head(node)?;
    if let Some(meta) = head
        .descendants_matching(|n: &Node| n.is_tag("meta") && n.has_attr("charset"))
        .first()
    {
        return Ok(meta.attr("charset")?.trim().to_string());
    }

    let content = content_type(node)?;
    parse_charset(&content)
        .map(str::to_string)
        .ok_or(SoupError::MetadataNotFound("charset"))
}

/// Charset parameter of a content-type value: the text after the first
/// `charset=`, cut at the first `;` and then at the first space.
pub fn parse_charset(content: &str) -> Option<&str> {
    let start = memmem::find(content.as_bytes(), CHARSET_MARKER.as_bytes())? + CHARSET_MARKER.len();
    let rest = &content[start..];
    let rest = rest.split(';').next().unwrap_or(rest);
    Some(rest.split(' ').next().unwrap_or(rest))
}

fn find_head(node: &Node) -> Result<Node> {
    node.root()
        .descendants_by_tag("head")
        .first()
        .ok_or(SoupError::MetadataNotFound("head"))
}
