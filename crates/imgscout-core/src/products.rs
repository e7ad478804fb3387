use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Minimum and maximum length of a token treated as a SKU.
const SKU_LEN: std::ops::RangeInclusive<usize> = 6..=40;

/// What an input row refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    Url,
    Sku,
    Search,
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferenceKind::Url => write!(f, "url"),
            ReferenceKind::Sku => write!(f, "sku"),
            ReferenceKind::Search => write!(f, "search"),
        }
    }
}

/// One input row: a product URL, a merchant SKU, or a free-text search term.
///
/// The held string is trimmed. URLs are always absolute (`//host` and
/// `www.host` forms are upgraded to `https://`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductReference {
    Url(String),
    Sku(String),
    Search(String),
}

impl ProductReference {
    /// Infer the reference kind from the raw cell text.
    #[must_use]
    pub fn classify(raw: &str) -> Self {
        let trimmed = raw.trim();
        if looks_like_url(trimmed) {
            Self::Url(absolutize_reference_url(trimmed))
        } else if looks_like_sku(trimmed) {
            Self::Sku(trimmed.to_string())
        } else {
            Self::Search(trimmed.to_string())
        }
    }

    /// Build a reference of a caller-chosen kind, skipping classification.
    #[must_use]
    pub fn with_kind(raw: &str, kind: ReferenceKind) -> Self {
        let trimmed = raw.trim();
        match kind {
            ReferenceKind::Url => Self::Url(absolutize_reference_url(trimmed)),
            ReferenceKind::Sku => Self::Sku(trimmed.to_string()),
            ReferenceKind::Search => Self::Search(trimmed.to_string()),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ReferenceKind {
        match self {
            Self::Url(_) => ReferenceKind::Url,
            Self::Sku(_) => ReferenceKind::Sku,
            Self::Search(_) => ReferenceKind::Search,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Url(s) | Self::Sku(s) | Self::Search(s) => s,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }
}

impl std::fmt::Display for ProductReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn looks_like_url(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    lower.starts_with("http://")
        || lower.starts_with("https://")
        || lower.starts_with("//")
        || lower.starts_with("www.")
}

fn absolutize_reference_url(s: &str) -> String {
    let lower = s.to_ascii_lowercase();
    if s.is_empty() || lower.starts_with("http://") || lower.starts_with("https://") {
        s.to_string()
    } else if let Some(rest) = s.strip_prefix("//") {
        format!("https://{rest}")
    } else {
        format!("https://{s}")
    }
}

/// Merchant SKUs are single uppercase alphanumeric tokens with at least one
/// digit, e.g. `GE779EA0ABCDNAFAMZ` or `SA948MP-1A2B`.
fn looks_like_sku(s: &str) -> bool {
    SKU_LEN.contains(&s.len())
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        && s.chars().any(|c| c.is_ascii_digit())
        && s.chars().any(|c| c.is_ascii_uppercase())
        && !s.chars().any(|c| c.is_ascii_lowercase())
}

/// Ordered, deduplicated product image URLs discovered for one reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ImageSet {
    urls: Vec<String>,
}

impl ImageSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `url` unless it is already present. Returns `true` when added.
    pub fn push(&mut self, url: String) -> bool {
        if self.urls.contains(&url) {
            return false;
        }
        self.urls.push(url);
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    #[must_use]
    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    #[must_use]
    pub fn into_urls(self) -> Vec<String> {
        self.urls
    }
}

impl FromIterator<String> for ImageSet {
    /// Collects URLs in iteration order, keeping the first occurrence of each.
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut seen = HashSet::new();
        let urls = iter
            .into_iter()
            .filter(|url| seen.insert(url.clone()))
            .collect();
        Self { urls }
    }
}
