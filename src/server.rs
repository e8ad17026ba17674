//! Sequenced startup and shutdown of the HTTP server.
//!
//! Startup order is fixed: seed (when requested), bind, serve until the shutdown future
//! resolves, close the store. A failed seed returns before the listener is created, so no
//! client ever observes a half-written catalog.

use crate::{api, seed, store::CatalogStore};
use anyhow::{Context, Result};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Run the server lifecycle against an injected store.
///
/// `bind` is invoked only after seeding succeeded; `shutdown` ends the serve loop gracefully.
/// The store is closed once serving stops, whether or not serving failed.
pub async fn run<S, B, Fut, Sh>(
    store: Arc<S>,
    reset_database: bool,
    bind: B,
    shutdown: Sh,
) -> Result<()>
where
    S: CatalogStore + 'static,
    B: FnOnce() -> Fut,
    Fut: Future<Output = std::io::Result<TcpListener>>,
    Sh: Future<Output = ()> + Send + 'static,
{
    if reset_database {
        seed::seed_database(store.as_ref())
            .await
            .context("failed to seed the database")?;
    }

    let listener = bind().await.context("failed to bind listener")?;
    let port = listener.local_addr().context("listener has no address")?.port();
    tracing::info!("Server running on http://localhost:{port}");

    let served = axum::serve(listener, api::create_router(store.clone()))
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server terminated unexpectedly");

    tracing::info!("Shutting down");
    store.close().await;
    served
}

/// Resolve on Ctrl-C or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::run;
    use crate::store::{CatalogStore, InMemoryStore, testing::BookRejectingStore};
    use std::net::Ipv4Addr;
    use std::sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    };
    use tokio::net::TcpListener;

    async fn bind_loopback() -> std::io::Result<TcpListener> {
        TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await
    }

    #[tokio::test]
    async fn failed_seed_aborts_before_binding() {
        let store = Arc::new(BookRejectingStore::default());
        let bound = Arc::new(AtomicBool::new(false));

        let result = run(
            store.clone(),
            true,
            {
                let bound = bound.clone();
                move || {
                    bound.store(true, Ordering::SeqCst);
                    bind_loopback()
                }
            },
            async {},
        )
        .await;

        let err = result.expect_err("seeding failure must abort startup");
        assert!(format!("{err:#}").contains("failed to seed the database"));
        assert!(!bound.load(Ordering::SeqCst));
        assert_eq!(store.inner.counts().await, (2, 0));
    }

    #[tokio::test]
    async fn seeding_completes_before_the_listener_binds() {
        let store = Arc::new(InMemoryStore::new());
        let seen_at_bind = Arc::new(tokio::sync::Mutex::new(None));

        run(
            store.clone(),
            true,
            {
                let store = store.clone();
                let seen_at_bind = seen_at_bind.clone();
                move || async move {
                    *seen_at_bind.lock().await = Some(store.counts().await);
                    bind_loopback().await
                }
            },
            async {},
        )
        .await
        .expect("server runs and shuts down");

        assert_eq!(*seen_at_bind.lock().await, Some((2, 5)));
    }

    #[tokio::test]
    async fn skips_seeding_when_not_requested() {
        let store = Arc::new(InMemoryStore::new());
        store.insert_author("Existing Author").await.unwrap();

        run(store.clone(), false, bind_loopback, async {})
            .await
            .expect("server runs and shuts down");

        assert_eq!(store.counts().await, (1, 0));
    }

    #[tokio::test]
    async fn bind_failure_is_reported() {
        let occupied = bind_loopback().await.unwrap();
        let port = occupied.local_addr().unwrap().port();

        let err = run(
            Arc::new(InMemoryStore::new()),
            false,
            move || TcpListener::bind((Ipv4Addr::LOCALHOST, port)),
            async {},
        )
        .await
        .expect_err("port already in use");
        assert!(format!("{err:#}").contains("failed to bind listener"));
    }
}
