use crate::config::types::{Config, HttpConfig, InputConfig, OutputConfig, SitemapConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_sites(&config.sites)?;
    validate_input_config(&config.input)?;
    validate_sitemap_config(&config.sitemap)?;
    validate_http_config(&config.http)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates inline base URLs
///
/// Base URLs read from the input file are taken verbatim; only the ones
/// written into the configuration are checked here.
fn validate_sites(sites: &[String]) -> Result<(), ConfigError> {
    for site in sites {
        let url = Url::parse(site)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid site '{}': {}", site, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "Site '{}' must use the http or https scheme",
                site
            )));
        }
    }

    Ok(())
}

fn validate_input_config(config: &InputConfig) -> Result<(), ConfigError> {
    if config.path.is_empty() {
        return Err(ConfigError::Validation(
            "input path cannot be empty".to_string(),
        ));
    }

    if config.column.is_empty() {
        return Err(ConfigError::Validation(
            "input column cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_sitemap_config(config: &SitemapConfig) -> Result<(), ConfigError> {
    if config.path.is_empty() {
        return Err(ConfigError::Validation(
            "sitemap path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.path.is_empty() {
        return Err(ConfigError::Validation(
            "output path cannot be empty".to_string(),
        ));
    }

    validate_quote_char(config.quote_char)
}

/// The quote character must be a single ASCII byte distinct from the
/// delimiter and the record terminator
fn validate_quote_char(quote: char) -> Result<(), ConfigError> {
    if !quote.is_ascii() {
        return Err(ConfigError::Validation(format!(
            "quote-char must be an ASCII character, got '{}'",
            quote
        )));
    }

    if matches!(quote, ',' | '\r' | '\n') {
        return Err(ConfigError::Validation(format!(
            "quote-char cannot be {:?}",
            quote
        )));
    }

    Ok(())
}
