//! Exclusion of page chrome (logos, icons, social badges, placeholders).

/// Lowercase substrings that mark a URL as non-product imagery.
pub const DEFAULT_CHROME_TOKENS: [&str; 17] = [
    "logo",
    "icon",
    "favicon",
    "sprite",
    "placeholder",
    "facebook",
    "twitter",
    "instagram",
    "pinterest",
    "linkedin",
    "youtube",
    "whatsapp",
    "apple-touch",
    "blank.gif",
    "spacer",
    ".svg",
    "data:image",
];

/// Substring blocklist applied to candidate image URLs.
#[derive(Debug, Clone)]
pub struct ChromeFilter {
    tokens: Vec<String>,
}

impl Default for ChromeFilter {
    fn default() -> Self {
        Self {
            tokens: DEFAULT_CHROME_TOKENS
                .iter()
                .map(|t| (*t).to_string())
                .collect(),
        }
    }
}

impl ChromeFilter {
    /// Built-in tokens plus site-specific `extra` tokens (blank entries ignored).
    #[must_use]
    pub fn with_extra_tokens<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut filter = Self::default();
        for token in extra {
            let token = token.as_ref().trim().to_ascii_lowercase();
            if !token.is_empty() && !filter.tokens.contains(&token) {
                filter.tokens.push(token);
            }
        }
        filter
    }

    /// Filter configured from a site profile's `extra_chrome_tokens`.
    #[must_use]
    pub fn for_site(site: &imgscout_core::SiteProfile) -> Self {
        Self::with_extra_tokens(&site.extra_chrome_tokens)
    }

    /// Returns `true` when `url` contains any chrome token (case-insensitive).
    #[must_use]
    pub fn is_chrome(&self, url: &str) -> bool {
        let lower = url.to_ascii_lowercase();
        self.tokens.iter().any(|t| lower.contains(t.as_str()))
    }

    #[must_use]
    pub fn allows(&self, url: &str) -> bool {
        !self.is_chrome(url)
    }
}
