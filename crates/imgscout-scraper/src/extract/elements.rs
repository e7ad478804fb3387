//! Strategy 2: `<img>` / `<source>` elements, lazy-load attributes first.

use imgscout_core::ImageSet;

use crate::filter::ChromeFilter;
use crate::html::{image_tags, TagAttrs};
use crate::normalize::normalize_image_url;

/// Attributes consulted per element, in preference order. Lazy-loading
/// themes park the real image in a `data-*` attribute and put a placeholder
/// in `src`.
const SOURCE_ATTRS: [&str; 7] = [
    "data-src",
    "data-original",
    "data-lazy",
    "data-lazy-src",
    "data-image",
    "data-zoom-image",
    "src",
];
const SRCSET_ATTRS: [&str; 2] = ["data-srcset", "srcset"];
/// Extensions that let a bare relative value (`img/1.jpg`) count as an image.
const IMAGE_EXTENSIONS: [&str; 6] = [".jpg", ".jpeg", ".png", ".webp", ".gif", ".avif"];

/// At most one URL per element: the first attribute whose normalized value
/// survives the chrome filter.
pub(super) fn element_images(html: &str, page_url: &str, filter: &ChromeFilter) -> ImageSet {
    let mut images = ImageSet::new();
    for attrs in image_tags(html) {
        if let Some(url) = pick_element_url(&attrs, page_url, filter) {
            images.push(url);
        }
    }
    images
}

fn pick_element_url(attrs: &TagAttrs, page_url: &str, filter: &ChromeFilter) -> Option<String> {
    let plain = SOURCE_ATTRS.iter().filter_map(|name| attrs.get(name));
    let srcset = SRCSET_ATTRS
        .iter()
        .filter_map(|name| attrs.get(name))
        .filter_map(first_srcset_url);

    plain
        .chain(srcset)
        .filter(|raw| is_image_reference(raw))
        .filter_map(|raw| normalize_image_url(raw, page_url))
        .find(|url| filter.allows(url))
}

/// Absolute http(s), protocol-relative and root-relative values, or bare
/// relative paths ending in an image extension. Flag values such as
/// `data-lazy="true"` and unrendered template placeholders are rejected.
fn is_image_reference(raw: &str) -> bool {
    const TEMPLATE_MARKERS: [&str; 4] = ["{{", "{%", "${", "<%"];

    let value = raw.trim();
    if value.is_empty() || TEMPLATE_MARKERS.iter().any(|m| value.contains(m)) {
        return false;
    }
    let lower = value.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with('/') {
        return true;
    }
    let path = lower.split(['?', '#']).next().unwrap_or_default();
    IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// First URL of a `srcset` list (`"a.jpg 1x, b.jpg 2x"` → `"a.jpg"`).
fn first_srcset_url(srcset: &str) -> Option<&str> {
    srcset
        .split(',')
        .next()
        .and_then(|entry| entry.split_whitespace().next())
}
