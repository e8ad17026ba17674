//! Document store abstraction with MongoDB and in-memory backends.

pub mod memory;
pub mod mongo;
pub mod traits;
pub mod types;

pub use memory::InMemoryStore;
pub use mongo::MongoStore;
pub use traits::CatalogStore;
pub use types::{Author, Book, BookWithAuthor, StoreError, parse_object_id};
