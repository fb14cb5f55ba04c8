//! Crawler module for sitemap fetching and processing
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching of `{base_url}{sitemap_path}`
//! - Sitemap XML parsing and `<loc>` extraction
//! - Overall run coordination

mod coordinator;
mod fetcher;
mod parser;

pub use coordinator::{run_harvest, Harvester};
pub use fetcher::{
    build_http_client, FetchFailure, HttpClient, HttpResponse, RawSitemap, ReqwestClient,
    SitemapFetcher,
};
pub use parser::{ParseFailure, ParseResult, SitemapParser};
