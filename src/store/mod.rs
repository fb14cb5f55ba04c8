//! In-memory record store
//!
//! Accumulates discovered locations grouped by base URL. Keys keep the order
//! in which they were first ensured; each key's locations keep insertion order.

use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur while mutating the record store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No entry for site {0}; ensure() must be called before append()")]
    UnknownSite(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// One flattened output row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRecord<'a> {
    pub site: &'a str,
    pub url: &'a str,
}

/// Mapping from base URL to the locations discovered for it
#[derive(Debug, Default, Clone)]
pub struct RecordStore {
    entries: Vec<(String, Vec<String>)>,
    index: HashMap<String, usize>,
}

impl RecordStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty location list for `base_url` if it has none yet
    pub fn ensure(&mut self, base_url: &str) {
        if self.index.contains_key(base_url) {
            return;
        }

        self.index.insert(base_url.to_string(), self.entries.len());
        self.entries.push((base_url.to_string(), Vec::new()));
    }

    /// Appends one location to the end of `base_url`'s list
    ///
    /// # Returns
    ///
    /// * `Err(StoreError::UnknownSite)` - `ensure` was never called for `base_url`
    pub fn append(&mut self, base_url: &str, location: impl Into<String>) -> StoreResult<()> {
        let slot = *self
            .index
            .get(base_url)
            .ok_or_else(|| StoreError::UnknownSite(base_url.to_string()))?;

        self.entries[slot].1.push(location.into());
        Ok(())
    }

    /// Returns every site with its locations, in first-seen order
    pub fn snapshot(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(site, locations)| (site.as_str(), locations.as_slice()))
    }

    /// Flattens the store into one record per (site, location) pair
    pub fn records(&self) -> impl Iterator<Item = CsvRecord<'_>> {
        self.snapshot().flat_map(|(site, locations)| {
            locations
                .iter()
                .map(move |url| CsvRecord { site, url: url.as_str() })
        })
    }

    /// Locations discovered for `base_url`, if it has been ensured
    pub fn locations(&self, base_url: &str) -> Option<&[String]> {
        self.index
            .get(base_url)
            .map(|&slot| self.entries[slot].1.as_slice())
    }

    /// Number of sites in the store
    pub fn site_count(&self) -> usize {
        self.entries.len()
    }

    /// Total number of locations across all sites
    pub fn location_count(&self) -> usize {
        self.entries.iter().map(|(_, locations)| locations.len()).sum()
    }
}
