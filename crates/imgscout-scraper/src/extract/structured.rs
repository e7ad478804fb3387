//! Strategy 1: image fields in embedded JSON metadata.

use serde_json::Value;

use crate::html::json_script_bodies;

/// Keys whose values hold product image references.
const IMAGE_KEYS: [&str; 3] = ["image", "images", "contentUrl"];
/// Keys inside an image object (`ImageObject` and friends) that carry the URL.
const IMAGE_OBJECT_URL_KEYS: [&str; 3] = ["contentUrl", "url", "src"];

/// Raw image references from the document's JSON blocks, in walk order.
///
/// A document that is itself JSON (an API payload) is walked directly;
/// otherwise every `ld+json` / `application/json` script block is parsed.
/// Blocks that fail to parse are skipped.
pub(super) fn structured_image_candidates(document: &str) -> Vec<String> {
    let trimmed = document.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
            return value_image_candidates(&value);
        }
    }

    let mut out = Vec::new();
    for body in json_script_bodies(document) {
        match serde_json::from_str::<Value>(body) {
            Ok(value) => collect_from_value(&value, Scope::Open, &mut out),
            Err(e) => {
                tracing::debug!(error = %e, "skipping unparseable JSON metadata block");
            }
        }
    }

    out
}

/// Raw image references from an already parsed JSON value.
pub(super) fn value_image_candidates(value: &Value) -> Vec<String> {
    let mut out = Vec::new();
    collect_from_value(value, Scope::Open, &mut out);
    out
}

/// Calls `visit` with every string value in `value`, depth first.
pub(super) fn visit_strings(value: &Value, visit: &mut impl FnMut(&str)) {
    match value {
        Value::String(text) => visit(text),
        Value::Array(items) => {
            for item in items {
                visit_strings(item, &mut *visit);
            }
        }
        Value::Object(map) => {
            for child in map.values() {
                visit_strings(child, &mut *visit);
            }
        }
        _ => {}
    }
}

/// Whether image keys are honoured at the current depth of the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// No typed entity above, or the nearest one is a product.
    Open,
    /// Inside a typed non-product entity (`WebSite`, `Organization`, ...).
    Foreign,
}

/// Walks objects and arrays (including `@graph` containers) collecting the
/// values of [`IMAGE_KEYS`].
///
/// Objects carrying an `@type` only contribute when that type is a product;
/// untyped objects inherit the scope of the nearest typed ancestor.
fn collect_from_value(value: &Value, scope: Scope, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            let scope = match map.get("@type") {
                Some(kind) if is_product_type(kind) => Scope::Open,
                Some(_) => Scope::Foreign,
                None => scope,
            };
            if scope == Scope::Open {
                for key in IMAGE_KEYS {
                    if let Some(field) = map.get(key) {
                        collect_image_field(field, out);
                    }
                }
            }
            for child in map.values() {
                if child.is_object() || child.is_array() {
                    collect_from_value(child, scope, out);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_from_value(item, scope, out);
            }
        }
        _ => {}
    }
}

/// `Product`, `ProductGroup`, `IndividualProduct`, `schema:Product`, or an
/// array containing one of them.
fn is_product_type(kind: &Value) -> bool {
    match kind {
        Value::String(name) => {
            let local = name.rsplit(['/', ':', '#']).next().unwrap_or(name);
            local.starts_with("Product") || local.ends_with("Product")
        }
        Value::Array(kinds) => kinds.iter().any(is_product_type),
        _ => false,
    }
}

/// An image field is a URL string, an image object, or a list of either.
fn collect_image_field(field: &Value, out: &mut Vec<String>) {
    match field {
        Value::String(s) => {
            if looks_like_url_reference(s) {
                out.push(s.clone());
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_image_field(item, out);
            }
        }
        Value::Object(map) => {
            if let Some(url) = IMAGE_OBJECT_URL_KEYS
                .iter()
                .find_map(|k| map.get(*k).and_then(Value::as_str))
            {
                if looks_like_url_reference(url) {
                    out.push(url.to_string());
                }
            }
        }
        _ => {}
    }
}

/// JSON strings are only trusted as image references when they are absolute,
/// protocol-relative, or root-relative.
fn looks_like_url_reference(s: &str) -> bool {
    let s = s.trim();
    let lower = s.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || s.starts_with('/')
}
