//! HTTP client for catalog product and search pages.

mod origin;

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};

use crate::error::ScraperError;
use crate::rate_limit::retry_with_backoff;

pub use origin::extract_origin;
pub(crate) use origin::same_site;
// Re-export for test visibility via `use super::*`
#[cfg(test)]
use origin::extract_domain;

pub(crate) const BROWSER_FALLBACK_UA: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Seconds to wait on a 429 that carries no usable `Retry-After` header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// A successfully fetched document.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects; relative image paths resolve against it.
    pub url: String,
    pub body: String,
}

/// HTTP client shared across every row of a batch.
///
/// Maps 429, 404 and any other non-200 status to typed errors. Transient
/// errors (429, network failures) are retried with exponential backoff up to
/// `max_retries` additional attempts. A 403 served to the configured agent is
/// retried once with a desktop browser agent.
pub struct CatalogClient {
    client: Client,
    user_agent: String,
    /// Maximum number of retry attempts after the first failure.
    max_retries: u32,
    /// Base delay in seconds for exponential backoff: `backoff_base_secs * 2^attempt`.
    backoff_base_secs: u64,
}

impl CatalogClient {
    /// Creates a `CatalogClient` with configured timeout, `User-Agent`, and retry policy.
    ///
    /// `max_retries` is the number of additional attempts after the first failure for
    /// retriable errors (429, network errors). `0` disables retries.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            user_agent: user_agent.to_owned(),
            max_retries,
            backoff_base_secs,
        })
    }

    /// Builds a client from the scraper settings in [`imgscout_core::AppConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the `reqwest::Client` cannot be built.
    pub fn from_config(config: &imgscout_core::AppConfig) -> Result<Self, ScraperError> {
        Self::new(
            config.scraper_request_timeout_secs,
            &config.scraper_user_agent,
            config.scraper_max_retries,
            config.scraper_retry_backoff_base_secs,
        )
    }

    /// Fetches a page and returns its body along with the post-redirect URL.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`]: `url` is not an absolute http(s) URL.
    /// - [`ScraperError::RateLimited`]: HTTP 429 after all retries exhausted.
    /// - [`ScraperError::NotFound`]: HTTP 404 (not retried).
    /// - [`ScraperError::UnexpectedStatus`]: any other status than 200 (not retried).
    /// - [`ScraperError::Http`]: network or TLS failure after all retries exhausted.
    pub async fn fetch_page(&self, url: &str) -> Result<FetchedPage, ScraperError> {
        let url = validate_url(url)?;
        match self.fetch_page_with_user_agent(&url, None).await {
            Err(ScraperError::UnexpectedStatus { status: 403, .. })
                if self.user_agent != BROWSER_FALLBACK_UA =>
            {
                tracing::debug!(url, "403 with configured agent, retrying as browser");
                self.fetch_page_with_user_agent(&url, Some(BROWSER_FALLBACK_UA))
                    .await
            }
            other => other,
        }
    }

    async fn fetch_page_with_user_agent(
        &self,
        url: &str,
        user_agent_override: Option<&str>,
    ) -> Result<FetchedPage, ScraperError> {
        let referer = extract_origin(url);

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.to_owned();
            let referer = referer.clone();
            async move {
                let mut request = self
                    .client
                    .get(&url)
                    .header(
                        reqwest::header::ACCEPT,
                        "text/html,application/xhtml+xml,application/json;q=0.9,*/*;q=0.8",
                    )
                    .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
                    .header(reqwest::header::REFERER, &referer);

                if let Some(ua) = user_agent_override {
                    request = request.header(reqwest::header::USER_AGENT, ua);
                }

                let response = request.send().await?;
                let status = response.status();

                if status == StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.trim().parse::<u64>().ok())
                        .unwrap_or(DEFAULT_RETRY_AFTER_SECS);

                    return Err(ScraperError::RateLimited {
                        domain: origin::extract_domain(&url),
                        retry_after_secs,
                    });
                }

                if status == StatusCode::NOT_FOUND {
                    return Err(ScraperError::NotFound { url });
                }

                if status != StatusCode::OK {
                    return Err(ScraperError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                let final_url = response.url().to_string();
                let body = response.text().await?;
                tracing::debug!(url, final_url, bytes = body.len(), "fetched page");

                Ok(FetchedPage {
                    url: final_url,
                    body,
                })
            }
        })
        .await
    }
}

/// Checks that `url` is an absolute http(s) URL and returns it normalized.
fn validate_url(url: &str) -> Result<String, ScraperError> {
    let parsed = Url::parse(url.trim()).map_err(|e| ScraperError::InvalidUrl {
        url: url.to_owned(),
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ScraperError::InvalidUrl {
            url: url.to_owned(),
            reason: format!("unsupported scheme \"{}\"", parsed.scheme()),
        });
    }
    Ok(parsed.to_string())
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
