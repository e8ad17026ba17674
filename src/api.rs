//! HTTP surface for Bookshelf.
//!
//! This module exposes a compact Axum router over the catalog store:
//!
//! - `GET /` – Fixed greeting text.
//! - `GET /authors` – Every author.
//! - `GET /authors/:id` – One author, `404` when unknown.
//! - `GET /authors/:id/books` – Books written by one author, each with the author embedded.
//! - `GET /books` – Every book with its author resolved (`null` for dangling references).
//!
//! Every failure is classified: unknown author → `404`, malformed id → `400`, store failure
//! → `503`. Error bodies are `{"error": "<message>"}`. Cross-origin requests are allowed from
//! any origin.

use crate::store::{Author, BookWithAuthor, CatalogStore, StoreError, parse_object_id};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Body returned by `GET /`.
pub const GREETING: &str = "Hello Technigo!";

/// Build the HTTP router with the store injected as shared state.
pub fn create_router<S>(store: Arc<S>) -> Router
where
    S: CatalogStore + 'static,
{
    Router::new()
        .route("/", get(greeting))
        .route("/authors", get(list_authors::<S>))
        .route("/authors/:id", get(get_author::<S>))
        .route("/authors/:id/books", get(list_author_books::<S>))
        .route("/books", get(list_books::<S>))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(store)
}

async fn greeting() -> &'static str {
    GREETING
}

async fn list_authors<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<Author>>, AppError>
where
    S: CatalogStore,
{
    Ok(Json(store.list_authors().await?))
}

async fn get_author<S>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
) -> Result<Json<Author>, AppError>
where
    S: CatalogStore,
{
    Ok(Json(find_author(store.as_ref(), &id).await?))
}

/// List one author's books.
///
/// The author is fetched first so an unknown id yields `404` rather than an empty list,
/// and the fetched record is embedded in each book to match `GET /books`.
async fn list_author_books<S>(
    State(store): State<Arc<S>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<BookWithAuthor>>, AppError>
where
    S: CatalogStore,
{
    let author = find_author(store.as_ref(), &id).await?;
    let books = store.books_by_author(author.id).await?;
    tracing::debug!(author = %author.id, books = books.len(), "Resolved author books");
    Ok(Json(
        books
            .into_iter()
            .map(|book| BookWithAuthor::new(book, Some(author.clone())))
            .collect(),
    ))
}

async fn list_books<S>(
    State(store): State<Arc<S>>,
) -> Result<Json<Vec<BookWithAuthor>>, AppError>
where
    S: CatalogStore,
{
    Ok(Json(store.list_books_with_authors().await?))
}

async fn find_author<S>(store: &S, raw_id: &str) -> Result<Author, AppError>
where
    S: CatalogStore,
{
    let id = parse_object_id(raw_id)?;
    store
        .find_author(id)
        .await?
        .ok_or(AppError::AuthorNotFound)
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
}

enum AppError {
    AuthorNotFound,
    Store(StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::AuthorNotFound => (StatusCode::NOT_FOUND, "Author not found"),
            Self::Store(StoreError::InvalidId(raw)) => {
                tracing::debug!(id = %raw, "Rejected malformed author id");
                (StatusCode::BAD_REQUEST, "Invalid author id")
            }
            Self::Store(error @ StoreError::Unavailable { .. }) => {
                tracing::error!(error = ?error, "Document store request failed");
                (StatusCode::SERVICE_UNAVAILABLE, "Document store unavailable")
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(inner: StoreError) -> Self {
        Self::Store(inner)
    }
}
