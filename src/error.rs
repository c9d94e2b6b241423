//! Error types for tree queries.
//!
//! Errors are ordinary return values and never travel through a node stream:
//! a stream only ever yields nodes.

use thiserror::Error;

/// Errors raised by the query surface and its helpers.
#[derive(Debug, Error)]
pub enum SoupError {
    /// A traversal was requested without a root node, or with a node id
    /// that does not belong to the document.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A required attribute is absent from the node.
    #[error("No such attribute '{key}'")]
    AttributeNotFound { key: String },

    /// A derived metadata lookup found no matching node.
    #[error("Metadata not found: {0}")]
    MetadataNotFound(&'static str),

    /// Reading the markup source failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SoupError {
    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Creates an attribute-not-found error.
    pub fn attribute_not_found(key: impl Into<String>) -> Self {
        Self::AttributeNotFound { key: key.into() }
    }
}

/// Crate result alias.
pub type Result<T> = std::result::Result<T, SoupError>;
