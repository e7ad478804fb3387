//! Target catalog site profile, loaded from YAML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const QUERY_PLACEHOLDER: &str = "{query}";
const ID_PLACEHOLDER: &str = "{id}";

/// Describes the catalog site being scraped: where to search, where the
/// internal product endpoint lives, and which links are product pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteProfile {
    pub name: String,
    /// Absolute origin of the site, e.g. `"https://www.jumia.com.ng"`.
    pub base_url: String,
    /// Path (and query) of the search page; must contain `{query}`.
    pub search_path: String,
    /// Path of the internal product data endpoint; must contain `{id}`.
    #[serde(default)]
    pub product_api_path: Option<String>,
    /// Regex matched against the path of candidate product links on a search page.
    pub product_link_pattern: String,
    /// Extra lowercase tokens marking non-product images on this site.
    #[serde(default)]
    pub extra_chrome_tokens: Vec<String>,
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self {
            name: "jumia-ng".to_string(),
            base_url: "https://www.jumia.com.ng".to_string(),
            search_path: "/catalog/?q={query}".to_string(),
            product_api_path: Some("/catalog/productspecifications/sku/{id}/".to_string()),
            product_link_pattern: r"-\d+\.html$".to_string(),
            extra_chrome_tokens: Vec::new(),
        }
    }
}

impl SiteProfile {
    /// Base URL without a trailing slash, ready for path concatenation.
    #[must_use]
    pub fn origin(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Search page URL for an already percent-encoded query.
    #[must_use]
    pub fn search_url(&self, encoded_query: &str) -> String {
        format!(
            "{}{}",
            self.origin(),
            self.search_path.replace(QUERY_PLACEHOLDER, encoded_query)
        )
    }

    /// Internal product endpoint URL for an already percent-encoded identifier.
    ///
    /// Returns `None` when the profile has no product endpoint.
    #[must_use]
    pub fn product_api_url(&self, encoded_id: &str) -> Option<String> {
        self.product_api_path
            .as_deref()
            .map(|path| format!("{}{}", self.origin(), path.replace(ID_PLACEHOLDER, encoded_id)))
    }
}

/// Load and validate a site profile from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_site_profile(path: &Path) -> Result<SiteProfile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SiteFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_site_profile(&content)
}

/// Parse and validate a site profile from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_site_profile(content: &str) -> Result<SiteProfile, ConfigError> {
    let profile: SiteProfile = serde_yaml::from_str(content)?;
    validate_site_profile(&profile)?;
    Ok(profile)
}

fn validate_site_profile(profile: &SiteProfile) -> Result<(), ConfigError> {
    if profile.name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "site name must be non-empty".to_string(),
        ));
    }

    let host = profile
        .base_url
        .strip_prefix("https://")
        .or_else(|| profile.base_url.strip_prefix("http://"))
        .map(|rest| rest.split('/').next().unwrap_or_default());
    if host.is_none_or(str::is_empty) {
        return Err(ConfigError::Validation(format!(
            "site '{}' has invalid base_url '{}'; expected an absolute http(s) URL",
            profile.name, profile.base_url
        )));
    }

    if !profile.search_path.contains(QUERY_PLACEHOLDER) {
        return Err(ConfigError::Validation(format!(
            "site '{}' search_path must contain {QUERY_PLACEHOLDER}",
            profile.name
        )));
    }

    if let Some(api_path) = &profile.product_api_path {
        if !api_path.contains(ID_PLACEHOLDER) {
            return Err(ConfigError::Validation(format!(
                "site '{}' product_api_path must contain {ID_PLACEHOLDER}",
                profile.name
            )));
        }
    }

    if let Err(e) = regex::Regex::new(&profile.product_link_pattern) {
        return Err(ConfigError::Validation(format!(
            "site '{}' has invalid product_link_pattern: {e}",
            profile.name
        )));
    }

    Ok(())
}

#[cfg(test)]
#[path = "site_test.rs"]
mod tests;
