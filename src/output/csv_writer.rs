//! CSV output
//!
//! Serializes the record store as a `site,url` table. The whole file is
//! rewritten on every flush.

use crate::config::OutputConfig;
use crate::output::traits::{OutputHandler, OutputResult};
use crate::store::RecordStore;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Header row of every output file
pub const HEADER: [&str; 2] = ["site", "url"];

/// Writes the record store to a two-column CSV file
#[derive(Debug, Clone)]
pub struct CsvWriter {
    path: PathBuf,
    quote: u8,
    atomic: bool,
}

impl CsvWriter {
    /// Creates a writer targeting `path` with `"` quoting and atomic replacement
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            quote: b'"',
            atomic: true,
        }
    }

    /// Creates a writer from the output configuration
    ///
    /// The quote character is expected to have passed config validation;
    /// a non-ASCII one falls back to `"`.
    pub fn from_config(config: &OutputConfig) -> Self {
        let quote = u8::try_from(config.quote_char)
            .ok()
            .filter(u8::is_ascii)
            .unwrap_or(b'"');

        Self::new(&config.path)
            .with_quote(quote)
            .with_atomic_write(config.atomic_write)
    }

    pub fn with_quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }

    pub fn with_atomic_write(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }

    /// Destination of the output file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `store` to `path`, truncating any existing file
    pub fn write_to(&self, store: &RecordStore, path: &Path) -> OutputResult<()> {
        let mut writer = WriterBuilder::new()
            .delimiter(b',')
            .quote(self.quote)
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::Any(b'\n'))
            .from_path(path)?;

        writer.write_record(HEADER)?;
        for record in store.records() {
            writer.write_record([record.site, record.url])?;
        }
        writer.flush()?;

        Ok(())
    }
}

impl OutputHandler for CsvWriter {
    /// Replaces the output file with the current contents of `store`
    ///
    /// With atomic writes enabled the table goes to a sibling `.tmp` file
    /// that is then renamed over the destination, so readers never observe a
    /// half-written file.
    fn write(&self, store: &RecordStore) -> OutputResult<()> {
        if !self.atomic {
            return self.write_to(store, &self.path);
        }

        let staging = staging_path(&self.path);
        self.write_to(store, &staging)?;
        std::fs::rename(&staging, &self.path)?;

        tracing::debug!(
            "Flushed {} rows to {}",
            store.location_count(),
            self.path.display()
        );
        Ok(())
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}
