//! Tracing configuration and log routing.
//!
//! Bookshelf emits three kinds of events: startup lifecycle (store connection, reset
//! progress, the listening address, shutdown), one span per HTTP request from the router's
//! `TraceLayer`, and store failures that the API answers with `503`. All of them go to stdout
//! in compact form and are mirrored, without ANSI colors, into a log file.
//!
//! `init_tracing` runs after configuration is loaded, so `RUST_LOG` and `CATALOG_LOG_FILE`
//! may come from `.env`. `RUST_LOG=tower_http=debug` shows per-request latency and status.
use std::path::PathBuf;
use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_DIR: &str = "logs";
const LOG_FILE_NAME: &str = "catalog.log";
const LOG_FILE_VAR: &str = "CATALOG_LOG_FILE";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Where the file layer writes.
#[derive(Debug, PartialEq, Eq)]
enum LogTarget {
    /// Explicit path from `CATALOG_LOG_FILE`, opened in append mode.
    File(PathBuf),
    /// `logs/catalog.log` under the working directory.
    DefaultDir,
}

fn log_target(configured: Option<String>) -> LogTarget {
    match configured.filter(|value| !value.trim().is_empty()) {
        Some(path) => LogTarget::File(PathBuf::from(path.trim())),
        None => LogTarget::DefaultDir,
    }
}

/// Install the stdout and file subscribers. Call once, before the store is opened.
///
/// Filtering follows `RUST_LOG` and defaults to `info`. If the log file cannot be opened the
/// server keeps running with stdout logging only.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_target(false).compact();

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer);

    match configure_file_writer(log_target(std::env::var(LOG_FILE_VAR).ok())) {
        Some(writer) => {
            let file_layer = fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_ansi(false)
                .compact();
            registry.with(file_layer).init();
        }
        None => registry.init(),
    }
}

fn configure_file_writer(target: LogTarget) -> Option<NonBlocking> {
    match target {
        LogTarget::File(path) => match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
        {
            Ok(file) => Some(install_writer(file)),
            Err(err) => {
                eprintln!("Failed to open log file {}: {err}", path.display());
                None
            }
        },
        LogTarget::DefaultDir => {
            if let Err(err) = std::fs::create_dir_all(LOG_DIR) {
                eprintln!("Failed to create logs directory: {err}");
                return None;
            }
            Some(install_writer(tracing_appender::rolling::never(
                LOG_DIR,
                LOG_FILE_NAME,
            )))
        }
    }
}

/// The guard is parked in a static so buffered lines are flushed at process exit.
fn install_writer<W>(writer: W) -> NonBlocking
where
    W: std::io::Write + Send + 'static,
{
    let (non_blocking, guard) = tracing_appender::non_blocking(writer);
    let _ = LOG_GUARD.set(guard);
    non_blocking
}
