use crate::config::ScraperConfig;
use anyhow::{Context, Result};
use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue, REFERER};
use std::time::Duration;

/// Build the shared client for one category: browser-like headers, fixed timeout.
pub fn build_client(config: &ScraperConfig) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_str(&config.accept_language).context("Invalid Accept-Language header")?,
    );
    headers.insert(
        REFERER,
        HeaderValue::from_str(&config.referer).context("Invalid Referer header")?,
    );

    reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .gzip(true)
        // Accept cookies so consent-gated pages work
        .cookie_store(true)
        .build()
        .context("Failed to build HTTP client")
}
