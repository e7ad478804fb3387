use std::path::Path;

use super::*;

const VALID_YAML: &str = r#"
name: jumia-ke
base_url: https://www.jumia.co.ke/
search_path: /catalog/?q={query}
product_api_path: /api/product/{id}
product_link_pattern: '-\d+\.html$'
extra_chrome_tokens:
  - badge
  - banner
"#;

#[test]
fn parses_valid_profile() {
    let profile = parse_site_profile(VALID_YAML).expect("valid profile");
    assert_eq!(profile.name, "jumia-ke");
    assert_eq!(profile.origin(), "https://www.jumia.co.ke");
    assert_eq!(profile.extra_chrome_tokens, vec!["badge", "banner"]);
}

#[test]
fn search_url_substitutes_query() {
    let profile = parse_site_profile(VALID_YAML).unwrap();
    assert_eq!(
        profile.search_url("red%20shoes"),
        "https://www.jumia.co.ke/catalog/?q=red%20shoes"
    );
}

#[test]
fn product_api_url_substitutes_id() {
    let profile = parse_site_profile(VALID_YAML).unwrap();
    assert_eq!(
        profile.product_api_url("GE779EA0ABCD").as_deref(),
        Some("https://www.jumia.co.ke/api/product/GE779EA0ABCD")
    );
}

#[test]
fn product_api_url_absent_without_endpoint() {
    let yaml = r#"
name: plain
base_url: https://shop.example.com
search_path: /search?q={query}
product_link_pattern: '^/p/'
"#;
    let profile = parse_site_profile(yaml).unwrap();
    assert!(profile.product_api_path.is_none());
    assert!(profile.product_api_url("123").is_none());
    assert!(profile.extra_chrome_tokens.is_empty());
}

#[test]
fn default_profile_passes_validation() {
    let profile = SiteProfile::default();
    assert!(validate_site_profile(&profile).is_ok());
}

#[test]
fn rejects_empty_name() {
    let yaml = VALID_YAML.replace("name: jumia-ke", "name: '  '");
    let err = parse_site_profile(&yaml).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(ref msg) if msg.contains("non-empty")));
}

#[test]
fn rejects_relative_base_url() {
    let yaml = VALID_YAML.replace("https://www.jumia.co.ke/", "www.jumia.co.ke");
    let err = parse_site_profile(&yaml).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(ref msg) if msg.contains("base_url")));
}

#[test]
fn rejects_search_path_without_placeholder() {
    let yaml = VALID_YAML.replace("/catalog/?q={query}", "/catalog/");
    let err = parse_site_profile(&yaml).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(ref msg) if msg.contains("search_path")));
}

#[test]
fn rejects_api_path_without_placeholder() {
    let yaml = VALID_YAML.replace("/api/product/{id}", "/api/product/");
    let err = parse_site_profile(&yaml).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(ref msg) if msg.contains("product_api_path")));
}

#[test]
fn rejects_invalid_link_pattern() {
    let yaml = VALID_YAML.replace(r"'-\d+\.html$'", "'(unclosed'");
    let err = parse_site_profile(&yaml).unwrap_err();
    assert!(
        matches!(err, ConfigError::Validation(ref msg) if msg.contains("product_link_pattern"))
    );
}

#[test]
fn malformed_yaml_is_parse_error() {
    let err = parse_site_profile("name: [unterminated").unwrap_err();
    assert!(matches!(err, ConfigError::SiteFileParse(_)));
}

#[test]
fn missing_file_is_io_error() {
    let err = load_site_profile(Path::new("/nonexistent/imgscout/site.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::SiteFileIo { .. }));
}

#[test]
fn bundled_sample_profile_is_valid() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/site.yaml");
    let profile = load_site_profile(&path).expect("bundled config/site.yaml should validate");
    assert_eq!(profile, SiteProfile::default());
}
