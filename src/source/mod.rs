//! Base URL source
//!
//! Reads the ordered list of base URLs from a CSV file with a header row.
//! Values are taken verbatim from the configured column, in file order.

use crate::{InputError, InputResult};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Produces the base URLs for a run
#[derive(Debug, Clone)]
pub enum UrlSource {
    /// Base URLs listed inline (configuration or tests)
    List(Vec<String>),

    /// A CSV file with a header row containing `column`
    Csv { path: PathBuf, column: String },
}

impl UrlSource {
    /// Creates a source backed by a CSV file
    pub fn csv(path: impl Into<PathBuf>, column: impl Into<String>) -> Self {
        Self::Csv {
            path: path.into(),
            column: column.into(),
        }
    }

    /// Loads every base URL, preserving order
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<String>)` - The base URLs (possibly empty)
    /// * `Err(InputError)` - The file is missing, malformed, or lacks the column
    pub fn load(&self) -> InputResult<Vec<String>> {
        match self {
            Self::List(urls) => Ok(urls.clone()),
            Self::Csv { path, column } => read_base_urls(path, column),
        }
    }
}

/// Reads the `column` values of a CSV file at `path`
pub fn read_base_urls(path: &Path, column: &str) -> InputResult<Vec<String>> {
    let file = std::fs::File::open(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    read_base_urls_from(file, column).map_err(|e| match e {
        InputError::MissingColumn { column, .. } => InputError::MissingColumn {
            path: path.to_path_buf(),
            column,
        },
        other => other,
    })
}

/// Reads base URLs from any CSV reader
///
/// An input with no header row at all yields no URLs; a header row without
/// `column` is an error.
pub fn read_base_urls_from<R: Read>(reader: R, column: &str) -> InputResult<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Ok(Vec::new());
    }

    let index = headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| InputError::MissingColumn {
            path: PathBuf::new(),
            column: column.to_string(),
        })?;

    let mut urls = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let url = record.get(index).ok_or_else(|| InputError::MissingField {
            line,
            column: column.to_string(),
        })?;

        tracing::info!("Loaded base URL: {}", url);
        urls.push(url.to_string());
    }

    Ok(urls)
}
