//! MongoDB backend built on the official async driver.

use crate::store::{
    traits::CatalogStore,
    types::{Author, Book, BookWithAuthor, StoreError},
};
use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Client, Collection, Database,
    bson::{Document, doc, oid::ObjectId},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Database used when the connection string does not name one.
pub const DEFAULT_DATABASE: &str = "books";
/// Collection holding author documents.
pub const AUTHORS_COLLECTION: &str = "authors";
/// Collection holding book documents.
pub const BOOKS_COLLECTION: &str = "books";

#[derive(Debug, Serialize, Deserialize)]
struct AuthorRecord {
    #[serde(rename = "_id")]
    id: ObjectId,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct BookRecord {
    #[serde(rename = "_id")]
    id: ObjectId,
    #[serde(default)]
    title: String,
    #[serde(default)]
    author: Option<ObjectId>,
}

impl From<AuthorRecord> for Author {
    fn from(record: AuthorRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
        }
    }
}

impl From<BookRecord> for Book {
    fn from(record: BookRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            author: record.author,
        }
    }
}

/// Catalog store backed by the `authors` and `books` collections.
pub struct MongoStore {
    client: Client,
    database: Database,
    authors: Collection<AuthorRecord>,
    books: Collection<BookRecord>,
}

impl MongoStore {
    /// Connect using a `mongodb://` connection string and verify the server answers.
    ///
    /// The database is taken from the URL path and falls back to [`DEFAULT_DATABASE`].
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(url)
            .await
            .map_err(|err| StoreError::unavailable("connect", err))?;
        let database = client
            .default_database()
            .unwrap_or_else(|| client.database(DEFAULT_DATABASE));

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|err| StoreError::unavailable("ping", err))?;
        tracing::debug!(database = database.name(), "Connected to MongoDB");

        Ok(Self {
            authors: database.collection(AUTHORS_COLLECTION),
            books: database.collection(BOOKS_COLLECTION),
            client,
            database,
        })
    }

    /// Name of the database holding the catalog collections.
    pub fn database_name(&self) -> &str {
        self.database.name()
    }

    async fn find_authors(&self, filter: Document) -> Result<Vec<Author>, StoreError> {
        let records: Vec<AuthorRecord> = self
            .authors
            .find(filter)
            .await
            .map_err(|err| StoreError::unavailable("find authors", err))?
            .try_collect()
            .await
            .map_err(|err| StoreError::unavailable("read authors", err))?;
        Ok(records.into_iter().map(Author::from).collect())
    }

    async fn find_books(&self, filter: Document) -> Result<Vec<Book>, StoreError> {
        let records: Vec<BookRecord> = self
            .books
            .find(filter)
            .await
            .map_err(|err| StoreError::unavailable("find books", err))?
            .try_collect()
            .await
            .map_err(|err| StoreError::unavailable("read books", err))?;
        Ok(records.into_iter().map(Book::from).collect())
    }
}

#[async_trait]
impl CatalogStore for MongoStore {
    async fn list_authors(&self) -> Result<Vec<Author>, StoreError> {
        self.find_authors(doc! {}).await
    }

    async fn find_author(&self, id: ObjectId) -> Result<Option<Author>, StoreError> {
        let record = self
            .authors
            .find_one(doc! { "_id": id })
            .await
            .map_err(|err| StoreError::unavailable("find author", err))?;
        Ok(record.map(Author::from))
    }

    async fn books_by_author(&self, author_id: ObjectId) -> Result<Vec<Book>, StoreError> {
        self.find_books(doc! { "author": author_id }).await
    }

    async fn list_books_with_authors(&self) -> Result<Vec<BookWithAuthor>, StoreError> {
        let books = self.find_books(doc! {}).await?;
        let referenced: Vec<ObjectId> = books
            .iter()
            .filter_map(|book| book.author)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let authors: HashMap<ObjectId, Author> = if referenced.is_empty() {
            HashMap::new()
        } else {
            self.find_authors(doc! { "_id": { "$in": referenced } })
                .await?
                .into_iter()
                .map(|author| (author.id, author))
                .collect()
        };

        Ok(books
            .into_iter()
            .map(|book| {
                let author = book.author.and_then(|id| authors.get(&id).cloned());
                BookWithAuthor::new(book, author)
            })
            .collect())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let authors = self
            .authors
            .delete_many(doc! {})
            .await
            .map_err(|err| StoreError::unavailable("delete authors", err))?;
        let books = self
            .books
            .delete_many(doc! {})
            .await
            .map_err(|err| StoreError::unavailable("delete books", err))?;
        tracing::debug!(
            authors = authors.deleted_count,
            books = books.deleted_count,
            "Cleared catalog collections"
        );
        Ok(())
    }

    async fn insert_author(&self, name: &str) -> Result<Author, StoreError> {
        let record = AuthorRecord {
            id: ObjectId::new(),
            name: name.to_string(),
        };
        self.authors
            .insert_one(&record)
            .await
            .map_err(|err| StoreError::unavailable("insert author", err))?;
        Ok(record.into())
    }

    async fn insert_book(
        &self,
        title: &str,
        author: Option<ObjectId>,
    ) -> Result<Book, StoreError> {
        let record = BookRecord {
            id: ObjectId::new(),
            title: title.to_string(),
            author,
        };
        self.books
            .insert_one(&record)
            .await
            .map_err(|err| StoreError::unavailable("insert book", err))?;
        Ok(record.into())
    }

    async fn close(&self) {
        self.client.clone().shutdown().await;
        tracing::debug!("MongoDB client shut down");
    }
}
