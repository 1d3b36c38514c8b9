//! Cardstock: a polite card-catalog crawler
//!
//! This crate crawls a trading-card product catalog site, caches every fetched
//! HTML page on disk, parses card detail pages into typed records, inserts
//! newly discovered records into SQLite, and serves card images through a
//! disk-caching proxy.

pub mod cache;
pub mod card;
pub mod config;
pub mod crawler;
pub mod proxy;
pub mod storage;

use thiserror::Error;

/// Main error type for Cardstock operations
#[derive(Debug, Error)]
pub enum CardstockError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Unexpected HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Could not parse item count from listing page {url}")]
    ItemCount { url: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Store(#[from] storage::StoreError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Cardstock operations
pub type Result<T> = std::result::Result<T, CardstockError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use cache::{CacheStore, RequestDescriptor};
pub use card::{CardRecord, ParseOutcome};
pub use config::Config;
pub use storage::{CardStore, SqliteCardStore};
