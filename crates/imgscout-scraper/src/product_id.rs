//! Product identifier discovery for the internal product endpoint.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Url;

use crate::extract::raw_image_urls;

/// Quoted identifiers may be alphanumeric; unquoted ones must be numbers, so
/// JSON literals (`null`, `true`) never match.
static ID_FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)["'](?:simpleSku|sku|productId|product_id)["']\s*:\s*(?:["']([A-Za-z0-9_-]{3,64})["']|(\d{3,64})\b)"#,
    )
    .expect("valid id field regex")
});
static ID_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bdata-(?:sku|product-id)\s*=\s*["']([A-Za-z0-9_-]{3,64})["']"#)
        .expect("valid id attribute regex")
});

/// Shortest all-digit path segment treated as a catalog id.
const MIN_NUMERIC_ID_LEN: usize = 5;

/// Derives a product identifier from a fetched document.
///
/// Preference order: an embedded identifier field (`"sku"`, `"productId"`,
/// `"product_id"`, `"simpleSku"`), a `data-sku` / `data-product-id`
/// attribute, then the first all-digit path segment of at least five digits
/// in any image-looking URL in the text.
#[must_use]
pub fn derive_product_id(document: &str) -> Option<String> {
    let from_field = || {
        ID_FIELD_RE
            .captures(document)
            .and_then(|c| c.get(1).or_else(|| c.get(2)))
            .map(|m| m.as_str().to_string())
    };
    let from_attr = || {
        ID_ATTR_RE
            .captures(document)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    };

    from_field()
        .or_else(from_attr)
        .or_else(|| raw_image_urls(document).iter().find_map(|u| numeric_path_id(u)))
}

/// `https://ng.jumia.is/product/45/123456/1.jpg` → `"123456"`.
fn numeric_path_id(raw_url: &str) -> Option<String> {
    let absolute = if raw_url.starts_with("//") {
        format!("https:{raw_url}")
    } else {
        raw_url.to_string()
    };
    let url = Url::parse(&absolute).ok()?;
    url.path_segments()?
        .find(|seg| seg.len() >= MIN_NUMERIC_ID_LEN && seg.bytes().all(|b| b.is_ascii_digit()))
        .map(str::to_string)
}
