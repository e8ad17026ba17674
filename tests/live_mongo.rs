use std::env;

use bookshelf::{
    config::DEFAULT_MONGO_URL,
    seed::seed_database,
    store::{CatalogStore, MongoStore},
};
use mongodb::bson::oid::ObjectId;

fn mongo_url() -> String {
    env::var("MONGO_URL")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_MONGO_URL.to_string())
}

#[tokio::test]
#[ignore = "Requires live MongoDB"]
async fn live_seed_and_expand_roundtrip() {
    let store = MongoStore::connect(&mongo_url())
        .await
        .expect("MongoDB should be reachable");

    let summary = seed_database(&store).await.expect("seed catalog");
    assert_eq!((summary.authors, summary.books), (2, 5));

    let authors = store.list_authors().await.expect("list authors");
    assert_eq!(authors.len(), 2);

    let books = store.list_books_with_authors().await.expect("list books");
    assert_eq!(books.len(), 5);
    assert!(books.iter().all(|book| book.author.is_some()));

    let rowling = authors
        .iter()
        .find(|author| author.name == "J.K. Rowling")
        .expect("Rowling seeded");
    let found = store.find_author(rowling.id).await.expect("find author");
    assert_eq!(found.as_ref(), Some(rowling));
    let rowling_books = store.books_by_author(rowling.id).await.expect("books");
    assert_eq!(rowling_books.len(), 3);

    let orphan = store
        .insert_book("Orphaned Manuscript", Some(ObjectId::new()))
        .await
        .expect("insert dangling book");
    let books = store.list_books_with_authors().await.expect("list books");
    assert_eq!(books.len(), 6);
    let listed = books
        .iter()
        .find(|book| book.id == orphan.id)
        .expect("dangling book listed");
    assert!(listed.author.is_none());
    assert!(
        books
            .iter()
            .filter(|book| book.id != orphan.id)
            .all(|book| book.author.is_some())
    );

    store.close().await;
}

#[tokio::test]
#[ignore = "Requires no listener on 127.0.0.1:1 and driver server-selection timing"]
async fn live_unreachable_server_fails_at_connect() {
    let err = MongoStore::connect("mongodb://127.0.0.1:1/books?serverSelectionTimeoutMS=500")
        .await
        .err()
        .expect("connection should fail");
    assert!(err.to_string().contains("ping"), "{err}");
}
