//! Product link discovery on catalog search result pages.

use regex::Regex;
use reqwest::Url;

use crate::client::same_site;
use crate::html::anchor_tags;

/// First anchor on `html` that points at a product page of the same site.
///
/// `href`s are resolved against `page_url`; a link qualifies when it stays on
/// the page's host and its path matches `product_link`. The returned URL has
/// no fragment.
pub(crate) fn find_product_link(html: &str, page_url: &str, product_link: &Regex) -> Option<String> {
    let base = Url::parse(page_url).ok()?;
    anchor_tags(html).find_map(|attrs| {
        let href = attrs.get("href")?;
        let mut resolved = base.join(href).ok()?;
        if !matches!(resolved.scheme(), "http" | "https") {
            return None;
        }
        resolved.set_fragment(None);
        let path_matches = product_link.is_match(resolved.path());
        let resolved = resolved.to_string();
        (path_matches && same_site(page_url, &resolved)).then_some(resolved)
    })
}
