//! Run statistics
//!
//! Counters collected by the harvester while it walks the base URL list,
//! and a plain-text report of them.

use chrono::{DateTime, Utc};

/// Summary of one harvest run
#[derive(Debug, Clone)]
pub struct RunStatistics {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run finished (None while running)
    pub finished_at: Option<DateTime<Utc>>,

    /// Base URLs submitted for processing
    pub sites_processed: u64,

    /// Base URLs whose sitemap could not be fetched
    pub fetch_failures: u64,

    /// Base URLs whose sitemap was not well-formed XML
    pub parse_failures: u64,

    /// Locations written across all sites
    pub locations: u64,

    /// Number of times the output file was rewritten
    pub flushes: u64,
}

impl RunStatistics {
    /// Starts a new set of counters stamped with the current time
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            sites_processed: 0,
            fetch_failures: 0,
            parse_failures: 0,
            locations: 0,
            flushes: 0,
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Sites that contributed a parsed sitemap (possibly empty)
    pub fn sites_succeeded(&self) -> u64 {
        self.sites_processed - self.fetch_failures - self.parse_failures
    }

    /// Wall-clock duration, if the run has finished
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.finished_at.map(|finished| finished - self.started_at)
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &RunStatistics) {
    println!("=== Harvest Statistics ===\n");

    println!("Run:");
    println!("  Started: {}", stats.started_at.to_rfc3339());
    if let Some(finished) = stats.finished_at {
        println!("  Finished: {}", finished.to_rfc3339());
    }
    if let Some(duration) = stats.duration() {
        println!(
            "  Duration: {:.2}s",
            duration.num_milliseconds() as f64 / 1000.0
        );
    }
    println!();

    println!("Sites:");
    println!("  Processed: {}", stats.sites_processed);
    println!("  Succeeded: {}", stats.sites_succeeded());
    println!("  Fetch failures: {}", stats.fetch_failures);
    println!("  Parse failures: {}", stats.parse_failures);
    println!();

    println!("Locations written: {}", stats.locations);
    println!("Output flushes: {}", stats.flushes);
}
