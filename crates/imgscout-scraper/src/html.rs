//! Regex-level markup scanning shared by the extraction strategies.
//!
//! Catalog pages are scanned as text rather than parsed into a DOM: the
//! markup is third-party, often malformed, and only a handful of tags matter.

use std::sync::LazyLock;

use regex::Regex;

static IMAGE_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(?:img|source)\b[^>]*>").expect("valid image tag regex"));
static ANCHOR_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<a\b[^>]*>").expect("valid anchor regex"));
static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b([^>]*)>(.*?)</script\s*>").expect("valid script regex")
});
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#)
        .expect("valid attribute regex")
});

/// Attributes of one start tag, names lowercased, values entity-decoded.
#[derive(Debug, Clone, Default)]
pub(crate) struct TagAttrs(Vec<(String, String)>);

impl TagAttrs {
    pub(crate) fn parse(tag: &str) -> Self {
        let attrs = ATTR_RE
            .captures_iter(tag)
            .filter_map(|cap| {
                let name = cap.get(1)?.as_str().to_ascii_lowercase();
                let value = cap.get(2).or_else(|| cap.get(3)).or_else(|| cap.get(4))?;
                Some((name, decode_entities(value.as_str().trim())))
            })
            .collect();
        Self(attrs)
    }

    /// First value of `name`, if present and non-empty.
    pub(crate) fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, v)| n == name && !v.is_empty())
            .map(|(_, v)| v.as_str())
    }
}

/// Every `<img>` and `<source>` start tag, in document order.
pub(crate) fn image_tags(html: &str) -> impl Iterator<Item = TagAttrs> + '_ {
    IMAGE_TAG_RE
        .find_iter(html)
        .map(|m| TagAttrs::parse(m.as_str()))
}

/// Every `<a>` start tag, in document order.
pub(crate) fn anchor_tags(html: &str) -> impl Iterator<Item = TagAttrs> + '_ {
    ANCHOR_TAG_RE
        .find_iter(html)
        .map(|m| TagAttrs::parse(m.as_str()))
}

/// Bodies of `<script>` elements whose `type` is a JSON media type
/// (`application/ld+json`, `application/json`).
pub(crate) fn json_script_bodies(html: &str) -> impl Iterator<Item = &str> + '_ {
    SCRIPT_RE.captures_iter(html).filter_map(|cap| {
        let attrs = TagAttrs::parse(cap.get(1)?.as_str());
        let script_type = attrs.get("type")?.to_ascii_lowercase();
        if script_type == "application/ld+json" || script_type == "application/json" {
            let body = cap.get(2)?.as_str().trim();
            (!body.is_empty()).then_some(body)
        } else {
            None
        }
    })
}

/// Decodes the handful of entities that show up inside URL attributes.
pub(crate) fn decode_entities(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }
    value
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&#x2F;", "/")
        .replace("&#47;", "/")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
