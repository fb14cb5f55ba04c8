//! Sitemap-Harvest: sitemap-to-CSV extraction
//!
//! This crate fetches `sitemap.xml` documents for a list of base URLs, extracts
//! every `<url><loc>` entry and writes the discovered locations to a flat
//! two-column CSV file.

pub mod config;
pub mod crawler;
pub mod output;
pub mod source;
pub mod store;

use std::path::PathBuf;
use thiserror::Error;

pub use crawler::{FetchFailure, ParseFailure};
pub use output::OutputError;
pub use store::StoreError;

/// Main error type for Sitemap-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchFailure),

    #[error("Sitemap parse error: {0}")]
    Parse(#[from] ParseFailure),

    #[error("Record store error: {0}")]
    Store(#[from] StoreError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
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

/// Errors raised while reading the base URL input file
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to open input file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed CSV input: {0}")]
    Csv(#[from] csv::Error),

    #[error("Input file {} has no '{column}' column", .path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("Row on line {line} has no value for column '{column}'")]
    MissingField { line: u64, column: String },
}

/// Result type alias for Sitemap-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for input operations
pub type InputResult<T> = std::result::Result<T, InputError>;

// Re-export commonly used types
pub use config::{Config, RootCheck};
pub use crawler::{Harvester, HttpClient, HttpResponse, ReqwestClient, SitemapFetcher, SitemapParser};
pub use output::{CsvWriter, RunStatistics};
pub use source::UrlSource;
pub use store::RecordStore;
