use anyhow::{Context, Result};
use bookshelf::{
    config::{self, Cli, StoreBackend},
    logging,
    server::{self, shutdown_signal},
    store::{InMemoryStore, MongoStore},
};
use clap::Parser;
use std::net::Ipv4Addr;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::init_config(Cli::parse()).context("failed to load configuration")?;
    logging::init_tracing();

    let port = config.port;
    let bind = move || TcpListener::bind((Ipv4Addr::UNSPECIFIED, port));

    match config.store_backend {
        StoreBackend::Mongo => {
            let store = MongoStore::connect(&config.mongo_url)
                .await
                .context("failed to connect to MongoDB")?;
            tracing::info!(database = store.database_name(), "Connected to document store");
            server::run(Arc::new(store), config.reset_database, bind, shutdown_signal()).await
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on exit");
            server::run(
                Arc::new(InMemoryStore::new()),
                config.reset_database,
                bind,
                shutdown_signal(),
            )
            .await
        }
    }
}
