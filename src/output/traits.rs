//! Output handler trait and error types

use crate::store::RecordStore;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for output handlers
///
/// A handler persists the complete contents of the record store. It is
/// called after every processed site, so each call must replace whatever an
/// earlier call wrote rather than add to it.
pub trait OutputHandler {
    /// Writes every record currently in `store`
    fn write(&self, store: &RecordStore) -> OutputResult<()>;
}
