//! URL origin and host helpers for the catalog client.

use reqwest::Url;

/// Extracts the scheme+host origin from a page URL.
///
/// Given `"https://www.jumia.com.ng/catalog/?q=phone"`, returns
/// `"https://www.jumia.com.ng"`. Falls back to the input without its path
/// when the URL does not parse.
#[must_use]
pub fn extract_origin(page_url: &str) -> String {
    Url::parse(page_url).map_or_else(
        |e| {
            tracing::debug!(
                page_url,
                error = %e,
                "could not parse page URL, falling back to string split for origin"
            );
            page_url
                .trim_end_matches('/')
                .splitn(4, '/')
                .take(3)
                .collect::<Vec<_>>()
                .join("/")
        },
        |u| u.origin().ascii_serialization(),
    )
}

/// Extracts the hostname from a URL for use in error messages.
///
/// Falls back to the full URL string if parsing fails.
pub(crate) fn extract_domain(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| url.to_owned())
}

/// Returns `true` when both URLs parse and share a host, ignoring a leading
/// `www.` on either side.
pub(crate) fn same_site(a: &str, b: &str) -> bool {
    let host = |raw: &str| {
        Url::parse(raw).ok().and_then(|u| {
            u.host_str()
                .map(|h| h.trim_start_matches("www.").to_ascii_lowercase())
        })
    };
    match (host(a), host(b)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}
