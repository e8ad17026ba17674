//! Database reset routine.
//!
//! Seeding wipes both collections and inserts a fixed demo catalog. Inserts run one at a
//! time so each book can reference the identifier generated for its author.

use crate::store::{CatalogStore, StoreError};

const TOLKIEN: usize = 0;
const ROWLING: usize = 1;

/// Authors inserted on reset, in insertion order.
pub const SEED_AUTHORS: &[&str] = &["J.R.R. Tolkien", "J.K. Rowling"];

/// Books inserted on reset, in insertion order, each with an index into [`SEED_AUTHORS`].
pub const SEED_BOOKS: &[(&str, usize)] = &[
    ("Harry Potter and the Philosopher's Stone", ROWLING),
    ("Harry Potter and the Chamber of Secrets", ROWLING),
    ("Harry Potter and the Prisoner of Azkaban", ROWLING),
    ("The Lord of the Rings", TOLKIEN),
    ("The Hobbit", TOLKIEN),
];

/// Counts of records written by [`seed_database`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    /// Authors inserted.
    pub authors: usize,
    /// Books inserted.
    pub books: usize,
}

/// Clear both collections and insert the demo catalog.
///
/// Authors are written before any book. A failure stops the run and leaves whatever was
/// already written in place.
pub async fn seed_database<S>(store: &S) -> Result<SeedSummary, StoreError>
where
    S: CatalogStore + ?Sized,
{
    tracing::info!("Resetting database");
    store.clear().await?;

    let mut authors = Vec::with_capacity(SEED_AUTHORS.len());
    for name in SEED_AUTHORS {
        authors.push(store.insert_author(name).await?);
    }

    for (title, author) in SEED_BOOKS {
        store.insert_book(title, Some(authors[*author].id)).await?;
    }

    let summary = SeedSummary {
        authors: authors.len(),
        books: SEED_BOOKS.len(),
    };
    tracing::info!(
        authors = summary.authors,
        books = summary.books,
        "Database seeded"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryStore, StoreError, testing::BookRejectingStore};

    #[tokio::test]
    async fn seeds_two_authors_and_five_books() {
        let store = InMemoryStore::new();
        let summary = seed_database(&store).await.unwrap();

        assert_eq!(summary, SeedSummary { authors: 2, books: 5 });
        let names: Vec<String> = store
            .list_authors()
            .await
            .unwrap()
            .into_iter()
            .map(|author| author.name)
            .collect();
        assert_eq!(names, vec!["J.R.R. Tolkien", "J.K. Rowling"]);
    }

    #[tokio::test]
    async fn books_are_written_rowling_first() {
        let store = InMemoryStore::new();
        seed_database(&store).await.unwrap();

        let books = store.list_books_with_authors().await.unwrap();
        let listed: Vec<(&str, &str)> = books
            .iter()
            .map(|book| {
                let author = book.author.as_ref().expect("seeded author");
                (book.title.as_str(), author.name.as_str())
            })
            .collect();
        assert_eq!(
            listed,
            vec![
                ("Harry Potter and the Philosopher's Stone", "J.K. Rowling"),
                ("Harry Potter and the Chamber of Secrets", "J.K. Rowling"),
                ("Harry Potter and the Prisoner of Azkaban", "J.K. Rowling"),
                ("The Lord of the Rings", "J.R.R. Tolkien"),
                ("The Hobbit", "J.R.R. Tolkien"),
            ]
        );
    }

    #[tokio::test]
    async fn reseeding_replaces_previous_contents() {
        let store = InMemoryStore::new();
        let stray = store.insert_author("Stray Author").await.unwrap();
        store.insert_book("Stray Book", Some(stray.id)).await.unwrap();

        seed_database(&store).await.unwrap();
        seed_database(&store).await.unwrap();

        assert_eq!(store.counts().await, (2, 5));
        assert!(store.find_author(stray.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn failed_book_insert_stops_and_keeps_written_authors() {
        let store = BookRejectingStore::default();
        store.inner.insert_author("Stray Author").await.unwrap();

        let err = seed_database(&store).await.unwrap_err();

        assert!(matches!(
            err,
            StoreError::Unavailable {
                operation: "insert book",
                ..
            }
        ));
        assert_eq!(store.inner.counts().await, (2, 0));
        let names: Vec<String> = store
            .inner
            .list_authors()
            .await
            .unwrap()
            .into_iter()
            .map(|author| author.name)
            .collect();
        assert_eq!(names, vec!["J.R.R. Tolkien", "J.K. Rowling"]);
    }
}
