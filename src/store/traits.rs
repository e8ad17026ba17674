//! The catalog store trait.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::store::types::{Author, Book, BookWithAuthor, StoreError};

/// Abstraction over the document store used by the HTTP surface and the seeder.
///
/// Implementations own their connection handle; callers share one instance through an
/// `Arc` for the lifetime of the server and call [`CatalogStore::close`] on shutdown.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Every author, in no guaranteed order.
    async fn list_authors(&self) -> Result<Vec<Author>, StoreError>;

    /// Look up a single author. `Ok(None)` means the id is well-formed but unknown.
    async fn find_author(&self, id: ObjectId) -> Result<Option<Author>, StoreError>;

    /// Books whose author reference equals `author_id`, unexpanded.
    async fn books_by_author(&self, author_id: ObjectId) -> Result<Vec<Book>, StoreError>;

    /// Every book with its author reference resolved.
    async fn list_books_with_authors(&self) -> Result<Vec<BookWithAuthor>, StoreError>;

    /// Delete all authors and all books.
    async fn clear(&self) -> Result<(), StoreError>;

    /// Insert an author and return it with its generated identifier.
    async fn insert_author(&self, name: &str) -> Result<Author, StoreError>;

    /// Insert a book referencing `author`.
    async fn insert_book(&self, title: &str, author: Option<ObjectId>)
    -> Result<Book, StoreError>;

    /// Release the connection handle.
    async fn close(&self) {}
}
