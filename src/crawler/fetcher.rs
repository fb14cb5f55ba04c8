//! Sitemap fetcher
//!
//! This module handles the single HTTP GET issued per base URL:
//! - The `HttpClient` capability the fetcher is written against
//! - A reqwest-backed implementation of it
//! - Classification of the response into a raw sitemap or a fetch failure

use crate::config::HttpConfig;
use reqwest::{redirect::Policy, Client, StatusCode};
use std::future::Future;
use thiserror::Error;

/// Reasons a sitemap could not be retrieved
#[derive(Debug, Error)]
pub enum FetchFailure {
    /// The server answered with something other than 200
    #[error("Expecting a 200 status from {url}, got {status}")]
    Status { url: String, status: u16 },

    /// No usable response (connection, timeout, body decoding)
    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },
}

impl FetchFailure {
    /// The request URL the failure refers to
    pub fn url(&self) -> &str {
        match self {
            Self::Status { url, .. } | Self::Transport { url, .. } => url,
        }
    }
}

/// Status and body of an HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// The HTTP capability required by the fetcher
pub trait HttpClient {
    /// Issues one GET request to `url`
    ///
    /// Any response that arrives, whatever its status, is `Ok`. Only transport
    /// problems are reported as [`FetchFailure::Transport`].
    fn get(&self, url: &str) -> impl Future<Output = Result<HttpResponse, FetchFailure>> + Send;
}

/// `HttpClient` backed by a `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    /// Wraps an already configured client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client from the HTTP configuration
    pub fn from_config(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        build_http_client(config).map(Self::new)
    }
}

impl HttpClient for ReqwestClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchFailure> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_failure(url, &e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| transport_failure(url, &e))?;

        Ok(HttpResponse { status, body })
    }
}

/// Builds an HTTP client with the configured user agent and timeout
///
/// Redirects are not followed unless `follow_redirects` is set, so a 3xx
/// answer surfaces as a status failure. Without `timeout_secs` the client
/// keeps reqwest's default of no timeout.
///
/// # Example
///
/// ```no_run
/// use sitemap_harvest::config::HttpConfig;
/// use sitemap_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let redirect = if config.follow_redirects {
        Policy::default()
    } else {
        Policy::none()
    };

    let mut builder = Client::builder()
        .user_agent(config.user_agent.as_str())
        .redirect(redirect)
        .gzip(true)
        .brotli(true);

    if let Some(timeout) = config.timeout() {
        builder = builder.timeout(timeout);
    }

    builder.build()
}

fn transport_failure(url: &str, error: &reqwest::Error) -> FetchFailure {
    let message = if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        "Connection refused".to_string()
    } else {
        error.to_string()
    };

    FetchFailure::Transport {
        url: url.to_string(),
        message,
    }
}

/// A sitemap body received with status 200
#[derive(Debug, Clone)]
pub struct RawSitemap {
    /// The request URL
    pub url: String,
    /// Response body as text
    pub body: String,
}

/// Fetches `{base_url}{sitemap_path}` for each base URL
#[derive(Debug, Clone)]
pub struct SitemapFetcher<C> {
    client: C,
    sitemap_path: String,
}

impl<C: HttpClient> SitemapFetcher<C> {
    pub fn new(client: C, sitemap_path: impl Into<String>) -> Self {
        Self {
            client,
            sitemap_path: sitemap_path.into(),
        }
    }

    /// Request URL for `base_url`, formed by plain concatenation
    pub fn sitemap_url(&self, base_url: &str) -> String {
        format!("{}{}", base_url, self.sitemap_path)
    }

    /// Fetches the sitemap of `base_url`
    ///
    /// Exactly one request is made. Only status 200 counts as success.
    pub async fn fetch(&self, base_url: &str) -> Result<RawSitemap, FetchFailure> {
        let url = self.sitemap_url(base_url);
        tracing::debug!("Fetching sitemap: {}", url);

        let response = self.client.get(&url).await?;

        if response.status != StatusCode::OK.as_u16() {
            return Err(FetchFailure::Status {
                url,
                status: response.status,
            });
        }

        Ok(RawSitemap {
            url,
            body: response.body,
        })
    }
}
