//! Strategy 3: regex scan of the raw text for image-looking URLs.

use std::sync::LazyLock;

use regex::Regex;

use crate::html::decode_entities;

/// Absolute or protocol-relative URL token, up to the next quote, bracket,
/// angle bracket or whitespace.
static URL_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:https?:)?//[^\s'"<>\[\]{}\\]+"#).expect("valid URL token regex")
});

const IMAGE_EXTENSIONS: [&str; 5] = [".png", ".jpg", ".jpeg", ".webp", ".gif"];

/// Image-looking URLs in `document`, in order of appearance, unfiltered and
/// not normalized. JSON slash escapes (`\/` and `\u002F`) and HTML entities
/// are undone first.
///
/// A token counts as an image when its path, without query or fragment, ends
/// in a known image extension. Dots elsewhere in the host or path do not end
/// the match.
pub(crate) fn raw_image_urls(document: &str) -> Vec<String> {
    let unescaped = decode_entities(&unescape_json_slashes(document));
    URL_TOKEN_RE
        .find_iter(&unescaped)
        .map(|m| m.as_str().trim_end_matches([')', ',', ';', '.', '!']))
        .filter(|token| has_image_path(token))
        .map(str::to_string)
        .collect()
}

fn has_image_path(token: &str) -> bool {
    let path = token
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

fn unescape_json_slashes(document: &str) -> String {
    if !document.contains('\\') {
        return document.to_string();
    }
    document
        .replace("\\/", "/")
        .replace("\\u002F", "/")
        .replace("\\u002f", "/")
}
