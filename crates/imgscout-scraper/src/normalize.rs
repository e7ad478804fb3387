//! Image URL normalization: absolute `https://` form, trackers stripped.

use reqwest::Url;

use crate::html::decode_entities;

const REJECTED_SCHEMES: [&str; 5] = ["data:", "javascript:", "blob:", "about:", "mailto:"];

/// Normalizes a raw image reference found on `page_url` to an absolute URL.
///
/// - `//cdn/a.jpg` becomes `https://cdn/a.jpg`;
/// - `/a.jpg` and other relative paths resolve against `page_url`;
/// - the query string and fragment are dropped;
/// - inline (`data:`), script and non-http(s) references yield `None`.
#[must_use]
pub fn normalize_image_url(raw: &str, page_url: &str) -> Option<String> {
    let decoded = decode_entities(raw.trim());
    let candidate = decoded.trim();
    if candidate.is_empty() {
        return None;
    }

    let lower = candidate.to_ascii_lowercase();
    if REJECTED_SCHEMES.iter().any(|s| lower.starts_with(s)) {
        return None;
    }

    let mut url = if candidate.starts_with("//") {
        Url::parse(&format!("https:{candidate}")).ok()?
    } else {
        match Url::parse(candidate) {
            Ok(url) => url,
            Err(_) => Url::parse(page_url).ok()?.join(candidate).ok()?,
        }
    };

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return None;
    }

    url.set_query(None);
    url.set_fragment(None);
    Some(url.to_string())
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
