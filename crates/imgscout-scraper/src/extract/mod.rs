//! Prioritized product image extraction from a fetched document.
//!
//! Strategies run in a fixed order and the first one that yields at least
//! one image wins:
//!
//! 1. [`Strategy::StructuredData`]: image fields in embedded JSON metadata
//!    (`ld+json`, `application/json`) or in a bare JSON payload.
//! 2. [`Strategy::ImageElements`]: `<img>`/`<source>` tags, lazy-load
//!    attributes before `src`.
//! 3. [`Strategy::TextScan`]: any absolute or protocol-relative URL with an
//!    image extension anywhere in the text.
//!
//! The fourth strategy (the site's internal product endpoint) needs the
//! network and is driven by [`crate::harvest::ImageHarvester`].
//!
//! Every candidate goes through [`normalize_image_url`] and the
//! [`ChromeFilter`] before it is kept, and results are deduplicated in
//! first-seen order.

mod elements;
mod structured;
mod text_scan;

use imgscout_core::ImageSet;

use crate::filter::ChromeFilter;
use crate::normalize::normalize_image_url;

pub(crate) use text_scan::raw_image_urls;

/// Which extraction strategy produced an [`ImageSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    StructuredData,
    ImageElements,
    TextScan,
    ProductEndpoint,
}

impl Strategy {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::StructuredData => "structured_data",
            Strategy::ImageElements => "image_elements",
            Strategy::TextScan => "text_scan",
            Strategy::ProductEndpoint => "product_endpoint",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extracts product image URLs from `document`, fetched from `page_url`.
///
/// Returns an empty set when no offline strategy finds anything.
#[must_use]
pub fn extract_product_images(document: &str, page_url: &str, filter: &ChromeFilter) -> ImageSet {
    extract_with_strategy(document, page_url, filter)
        .map(|(_, images)| images)
        .unwrap_or_default()
}

/// Like [`extract_product_images`], also reporting the winning strategy.
#[must_use]
pub fn extract_with_strategy(
    document: &str,
    page_url: &str,
    filter: &ChromeFilter,
) -> Option<(Strategy, ImageSet)> {
    let structured = clean_candidates(
        structured::structured_image_candidates(document),
        page_url,
        filter,
    );
    if !structured.is_empty() {
        return Some((Strategy::StructuredData, structured));
    }

    let elements = elements::element_images(document, page_url, filter);
    if !elements.is_empty() {
        return Some((Strategy::ImageElements, elements));
    }

    let scanned = clean_candidates(raw_image_urls(document), page_url, filter);
    if !scanned.is_empty() {
        return Some((Strategy::TextScan, scanned));
    }

    None
}

/// Images in a JSON payload that is already parsed, such as a product
/// endpoint response.
///
/// Image fields are walked first; without any, string values are text
/// scanned, which covers endpoints returning rendered HTML fragments inside
/// JSON.
pub(crate) fn images_from_json(
    value: &serde_json::Value,
    page_url: &str,
    filter: &ChromeFilter,
) -> ImageSet {
    let structured = clean_candidates(structured::value_image_candidates(value), page_url, filter);
    if !structured.is_empty() {
        return structured;
    }

    let mut scanned = Vec::new();
    structured::visit_strings(value, &mut |text| scanned.extend(raw_image_urls(text)));
    clean_candidates(scanned, page_url, filter)
}

/// Normalizes, filters and deduplicates raw candidates, keeping first-seen order.
fn clean_candidates(raw: Vec<String>, page_url: &str, filter: &ChromeFilter) -> ImageSet {
    raw.into_iter()
        .filter_map(|candidate| normalize_image_url(&candidate, page_url))
        .filter(|url| filter.allows(url))
        .collect()
}

#[cfg(test)]
#[path = "../extract_test.rs"]
mod tests;
