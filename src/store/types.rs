//! Catalog entities and the errors shared by every store backend.

use mongodb::bson::{oid::ObjectId, serde_helpers::serialize_object_id_as_hex_string};
use serde::Serialize;
use thiserror::Error;

/// Errors returned while talking to a catalog store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Identifier could not be parsed into the store's key format.
    #[error("Invalid identifier: {0}")]
    InvalidId(String),
    /// The backing database failed or could not be reached.
    #[error("Document store request failed during {operation}: {source}")]
    Unavailable {
        /// Store operation that was in flight.
        operation: &'static str,
        /// Driver error explaining the failure.
        #[source]
        source: anyhow::Error,
    },
}

impl StoreError {
    /// Wrap a backend failure, tagging it with the operation that produced it.
    pub fn unavailable<E>(operation: &'static str, source: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Self::Unavailable {
            operation,
            source: source.into(),
        }
    }
}

/// Parse a 24-character hex identifier.
pub fn parse_object_id(raw: &str) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(raw).map_err(|_| StoreError::InvalidId(raw.to_string()))
}

/// An author record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Author {
    /// Store-generated identifier.
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    /// Display name.
    pub name: String,
}

/// A book record as stored, holding a bare reference to its author.
///
/// The reference is not checked: it may point at an author that no longer exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    /// Store-generated identifier.
    pub id: ObjectId,
    /// Book title.
    pub title: String,
    /// Identifier of the author, if any.
    pub author: Option<ObjectId>,
}

/// A book with its author reference resolved to the full record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookWithAuthor {
    /// Store-generated identifier.
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    /// Book title.
    pub title: String,
    /// Resolved author; `None` when the reference is missing or dangling.
    pub author: Option<Author>,
}

impl BookWithAuthor {
    /// Attach an already-resolved author to a stored book.
    pub fn new(book: Book, author: Option<Author>) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author,
        }
    }
}
