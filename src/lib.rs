#![deny(missing_docs)]

//! Core library for the Bookshelf catalog server.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Structured logging and tracing setup.
pub mod logging;
/// Fixed demo catalog and the database reset routine.
pub mod seed;
/// Sequenced server startup and shutdown.
pub mod server;
/// Document store abstraction and backends.
pub mod store;
