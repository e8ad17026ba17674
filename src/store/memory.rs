//! Process-local catalog store.
//!
//! Keeps authors and books in insertion order behind an async lock. Used when no MongoDB
//! deployment is available and as the backing store for router tests.

use crate::store::{
    traits::CatalogStore,
    types::{Author, Book, BookWithAuthor, StoreError},
};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Collections {
    authors: Vec<Author>,
    books: Vec<Book>,
}

/// In-memory implementation of [`CatalogStore`].
#[derive(Debug, Default)]
pub struct InMemoryStore {
    collections: RwLock<Collections>,
}

impl InMemoryStore {
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored authors and books.
    pub async fn counts(&self) -> (usize, usize) {
        let guard = self.collections.read().await;
        (guard.authors.len(), guard.books.len())
    }
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn list_authors(&self) -> Result<Vec<Author>, StoreError> {
        Ok(self.collections.read().await.authors.clone())
    }

    async fn find_author(&self, id: ObjectId) -> Result<Option<Author>, StoreError> {
        let guard = self.collections.read().await;
        Ok(guard.authors.iter().find(|author| author.id == id).cloned())
    }

    async fn books_by_author(&self, author_id: ObjectId) -> Result<Vec<Book>, StoreError> {
        let guard = self.collections.read().await;
        Ok(guard
            .books
            .iter()
            .filter(|book| book.author == Some(author_id))
            .cloned()
            .collect())
    }

    async fn list_books_with_authors(&self) -> Result<Vec<BookWithAuthor>, StoreError> {
        let guard = self.collections.read().await;
        Ok(guard
            .books
            .iter()
            .map(|book| {
                let author = book
                    .author
                    .and_then(|id| guard.authors.iter().find(|author| author.id == id))
                    .cloned();
                BookWithAuthor::new(book.clone(), author)
            })
            .collect())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let mut guard = self.collections.write().await;
        guard.authors.clear();
        guard.books.clear();
        Ok(())
    }

    async fn insert_author(&self, name: &str) -> Result<Author, StoreError> {
        let author = Author {
            id: ObjectId::new(),
            name: name.to_string(),
        };
        self.collections.write().await.authors.push(author.clone());
        Ok(author)
    }

    async fn insert_book(
        &self,
        title: &str,
        author: Option<ObjectId>,
    ) -> Result<Book, StoreError> {
        let book = Book {
            id: ObjectId::new(),
            title: title.to_string(),
            author,
        };
        self.collections.write().await.books.push(book.clone());
        Ok(book)
    }
}
