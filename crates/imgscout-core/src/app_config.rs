use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    /// YAML site profile; the built-in default profile is used when unset.
    pub site_path: Option<PathBuf>,
    pub scraper_request_timeout_secs: u64,
    pub scraper_user_agent: String,
    /// Pause between consecutive rows of a batch.
    pub scraper_inter_request_delay_ms: u64,
    pub scraper_max_retries: u32,
    pub scraper_retry_backoff_base_secs: u64,
    /// Fetch pages through a headless browser instead of plain HTTP.
    pub scraper_render_js: bool,
}
