//! Headless-browser page rendering for catalogs that build their gallery
//! client-side.
//!
//! Only functional when the crate is built with the `render-js` feature and a
//! Chrome or Chromium binary is installed. Without the feature every render
//! fails with [`ScraperError::Render`], which the harvester records as an
//! empty image set.

use std::time::Duration;

use crate::client::FetchedPage;
use crate::error::ScraperError;

/// Loads pages in a headless Chrome tab and returns the DOM after scripts ran.
///
/// Each call launches its own browser, so renders never share cookies or
/// state between rows of a batch.
#[derive(Debug, Clone)]
pub struct PageRenderer {
    #[cfg_attr(not(feature = "render-js"), allow(dead_code))]
    user_agent: String,
    #[cfg_attr(not(feature = "render-js"), allow(dead_code))]
    timeout: Duration,
}

impl PageRenderer {
    #[must_use]
    pub fn new(user_agent: &str, timeout_secs: u64) -> Self {
        Self {
            user_agent: user_agent.to_owned(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    #[must_use]
    pub fn from_config(config: &imgscout_core::AppConfig) -> Self {
        Self::new(
            &config.scraper_user_agent,
            config.scraper_request_timeout_secs,
        )
    }

    /// Whether this build can actually drive a browser.
    #[must_use]
    pub const fn is_available() -> bool {
        cfg!(feature = "render-js")
    }

    /// Navigates to `url`, waits for the load to settle, and returns the
    /// rendered markup with the final URL.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Render`] when the browser cannot be launched,
    /// navigation fails or times out, or the crate was built without the
    /// `render-js` feature.
    #[cfg(feature = "render-js")]
    pub async fn render(&self, url: &str) -> Result<FetchedPage, ScraperError> {
        let owned_url = url.to_owned();
        let user_agent = self.user_agent.clone();
        let timeout = self.timeout;
        let page = tokio::task::spawn_blocking(move || {
            render_blocking(&owned_url, &user_agent, timeout)
        })
        .await
        .map_err(|e| render_error(url, &e))??;
        tracing::debug!(url, final_url = %page.url, bytes = page.body.len(), "rendered page");
        Ok(page)
    }

    /// # Errors
    ///
    /// Always returns [`ScraperError::Render`]: this build has no browser
    /// support.
    #[cfg(not(feature = "render-js"))]
    #[allow(clippy::unused_async)]
    pub async fn render(&self, url: &str) -> Result<FetchedPage, ScraperError> {
        Err(render_error(url, &"built without the render-js feature"))
    }
}

#[cfg(feature = "render-js")]
fn render_blocking(
    url: &str,
    user_agent: &str,
    timeout: Duration,
) -> Result<FetchedPage, ScraperError> {
    use headless_chrome::{Browser, LaunchOptions};

    let options = LaunchOptions::default_builder()
        .headless(true)
        .sandbox(false)
        .idle_browser_timeout(timeout + Duration::from_secs(30))
        .build()
        .map_err(|e| render_error(url, &e))?;
    let browser = Browser::new(options).map_err(|e| render_error(url, &e))?;
    let tab = browser.new_tab().map_err(|e| render_error(url, &e))?;
    tab.set_default_timeout(timeout);
    tab.set_user_agent(user_agent, Some("en-US,en;q=0.9"), None)
        .map_err(|e| render_error(url, &e))?;
    tab.navigate_to(url)
        .and_then(|tab| tab.wait_until_navigated())
        .map_err(|e| render_error(url, &e))?;
    let body = tab.get_content().map_err(|e| render_error(url, &e))?;

    Ok(FetchedPage {
        url: tab.get_url(),
        body,
    })
}

fn render_error(url: &str, reason: &dyn std::fmt::Display) -> ScraperError {
    ScraperError::Render {
        url: url.to_owned(),
        reason: reason.to_string(),
    }
}
