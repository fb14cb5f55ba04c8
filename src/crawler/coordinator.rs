//! Harvest coordinator - main orchestration logic
//!
//! Walks the base URL list strictly in order: for each site the sitemap is
//! fetched, parsed, appended to the record store, and the output file is
//! rewritten. Fetch and parse failures only affect the site they occur on.

use crate::config::Config;
use crate::crawler::fetcher::{HttpClient, ReqwestClient, SitemapFetcher};
use crate::crawler::parser::SitemapParser;
use crate::output::{CsvWriter, OutputHandler, RunStatistics};
use crate::source::UrlSource;
use crate::store::RecordStore;
use crate::HarvestError;

/// Main harvest coordinator
///
/// Every collaborator is constructed by the caller and handed in, so tests
/// can substitute the HTTP client or the output handler.
pub struct Harvester<C, W> {
    source: UrlSource,
    fetcher: SitemapFetcher<C>,
    parser: SitemapParser,
    store: RecordStore,
    writer: W,
}

impl Harvester<ReqwestClient, CsvWriter> {
    /// Builds a harvester with the reqwest client and CSV writer described by
    /// `config`
    ///
    /// Inline `sites` take precedence over the input file.
    pub fn from_config(config: &Config) -> Result<Self, HarvestError> {
        let source = if config.sites.is_empty() {
            UrlSource::csv(&config.input.path, &config.input.column)
        } else {
            UrlSource::List(config.sites.clone())
        };

        let client = ReqwestClient::from_config(&config.http)?;

        Ok(Self::new(
            source,
            SitemapFetcher::new(client, &config.sitemap.path),
            SitemapParser::new(config.sitemap.root_check),
            RecordStore::new(),
            CsvWriter::from_config(&config.output),
        ))
    }
}

impl<C: HttpClient, W: OutputHandler> Harvester<C, W> {
    pub fn new(
        source: UrlSource,
        fetcher: SitemapFetcher<C>,
        parser: SitemapParser,
        store: RecordStore,
        writer: W,
    ) -> Self {
        Self {
            source,
            fetcher,
            parser,
            store,
            writer,
        }
    }

    /// Runs the harvest over every base URL
    ///
    /// # Returns
    ///
    /// * `Ok(RunStatistics)` - Every base URL was processed
    /// * `Err(HarvestError)` - The input could not be read, or the output
    ///   could not be written
    pub async fn run(&mut self) -> Result<RunStatistics, HarvestError> {
        let base_urls = self.source.load()?;
        let mut stats = RunStatistics::start();

        tracing::info!("Starting harvest of {} sites", base_urls.len());

        for base_url in &base_urls {
            self.process_site(base_url, &mut stats).await?;
            self.flush(&mut stats)?;
        }

        // An empty run still leaves a header-only file behind
        if base_urls.is_empty() {
            self.flush(&mut stats)?;
        }

        stats.locations = self.store.location_count() as u64;
        stats.finish();

        tracing::info!(
            "Harvest completed: {} sites, {} locations",
            stats.sites_processed,
            stats.locations
        );

        Ok(stats)
    }

    /// Fetches, parses and records one site
    ///
    /// The store entry for `base_url` is created before the fetch, so a
    /// failed site still has an (empty) entry.
    async fn process_site(
        &mut self,
        base_url: &str,
        stats: &mut RunStatistics,
    ) -> Result<(), HarvestError> {
        stats.sites_processed += 1;
        self.store.ensure(base_url);

        let raw = match self.fetcher.fetch(base_url).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("{}", e);
                stats.fetch_failures += 1;
                return Ok(());
            }
        };

        let locations = match self.parser.parse(&raw.body) {
            Ok(locations) => locations,
            Err(e) => {
                tracing::warn!("Failed to parse sitemap {}: {}", raw.url, e);
                stats.parse_failures += 1;
                return Ok(());
            }
        };

        tracing::info!("Found {} locations in {}", locations.len(), raw.url);

        for location in locations {
            self.store.append(base_url, location)?;
        }

        Ok(())
    }

    fn flush(&self, stats: &mut RunStatistics) -> Result<(), HarvestError> {
        self.writer.write(&self.store)?;
        stats.flushes += 1;
        Ok(())
    }

    /// The records gathered so far
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Consumes the harvester, returning its record store
    pub fn into_store(self) -> RecordStore {
        self.store
    }
}

/// Runs a complete harvest described by `config`
///
/// This is the entry point used by the binary: it builds every collaborator
/// from the configuration and drives them to completion.
pub async fn run_harvest(config: &Config) -> Result<RunStatistics, HarvestError> {
    let mut harvester = Harvester::from_config(config)?;
    harvester.run().await
}
