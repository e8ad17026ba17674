use clap::Parser;
use std::env;
use thiserror::Error;

/// Connection string used when `MONGO_URL` is not provided.
pub const DEFAULT_MONGO_URL: &str = "mongodb://localhost/books";
/// Port used when `PORT` is not provided.
pub const DEFAULT_PORT: u16 = 8080;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the Bookshelf server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Connection string of the MongoDB deployment holding the catalog.
    pub mongo_url: String,
    /// Port the HTTP server listens on.
    pub port: u16,
    /// Clear and reseed both collections before accepting connections.
    pub reset_database: bool,
    /// Storage backend serving the catalog.
    pub store_backend: StoreBackend,
}

/// Supported storage backends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum StoreBackend {
    /// MongoDB through the official driver.
    #[default]
    Mongo,
    /// Process-local store; contents vanish on exit.
    Memory,
}

/// Command-line overrides layered on top of the environment.
#[derive(Debug, Default, Parser)]
#[command(name = "bookshelf", about = "Serve the author and book catalog over HTTP")]
pub struct Cli {
    /// Override `MONGO_URL`.
    #[arg(long)]
    pub mongo_url: Option<String>,
    /// Override `PORT`.
    #[arg(long)]
    pub port: Option<u16>,
    /// Reset and seed the database before serving (same as `RESET_DATABASE=true`).
    #[arg(long)]
    pub reset_database: bool,
    /// Override `STORE_BACKEND`.
    #[arg(long, value_enum)]
    pub store: Option<StoreBackend>,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(load_env_optional)
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Blank values are treated as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        Ok(Self {
            mongo_url: var("MONGO_URL").unwrap_or_else(|| DEFAULT_MONGO_URL.to_string()),
            port: var("PORT")
                .map(|value| {
                    value
                        .trim()
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("PORT".into()))
                })
                .transpose()?
                .unwrap_or(DEFAULT_PORT),
            reset_database: var("RESET_DATABASE")
                .map(|value| {
                    parse_flag(&value)
                        .ok_or_else(|| ConfigError::InvalidValue("RESET_DATABASE".into()))
                })
                .transpose()?
                .unwrap_or(false),
            store_backend: var("STORE_BACKEND")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|()| ConfigError::InvalidValue("STORE_BACKEND".into()))
                })
                .transpose()?
                .unwrap_or_default(),
        })
    }

    /// Apply command-line overrides. A `--reset-database` flag can only enable seeding.
    pub fn apply_cli(mut self, cli: Cli) -> Self {
        if let Some(url) = cli.mongo_url {
            self.mongo_url = url;
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
        if cli.reset_database {
            self.reset_database = true;
        }
        if let Some(store) = cli.store {
            self.store_backend = store;
        }
        self
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(Self::Mongo),
            "memory" => Ok(Self::Memory),
            _ => Err(()),
        }
    }
}

/// Load `.env`, read the environment, and layer the command-line overrides on top.
pub fn init_config(cli: Cli) -> Result<Config, ConfigError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?.apply_cli(cli);
    tracing::debug!(
        port = config.port,
        reset_database = config.reset_database,
        store_backend = ?config.store_backend,
        "Loaded configuration"
    );
    Ok(config)
}
