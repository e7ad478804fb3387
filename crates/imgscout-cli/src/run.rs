//! Command handlers for `run`, `fetch`, and `extract`.
//!
//! Called from `main` once config is loaded and tracing is initialized.
//! Per-row harvest failures never reach this layer: the harvester degrades
//! them to empty image sets, so only setup errors abort a run.

use std::path::Path;
use std::time::Duration;

use imgscout_core::{
    load_site_profile, AppConfig, ProductReference, ReferenceKind, ReportTable, ResultRow,
    SiteProfile,
};
use imgscout_scraper::{
    extract_with_strategy, CatalogClient, ChromeFilter, ImageHarvester, PageRenderer,
};

use crate::{input, output};

/// Arguments of the `run` subcommand.
#[derive(Debug)]
pub(crate) struct RunOptions<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    pub column: &'a str,
    pub kind: Option<ReferenceKind>,
    pub limit: Option<usize>,
    pub render_js: bool,
}

/// Aggregate counts printed at the end of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RunSummary {
    pub rows: usize,
    pub rows_with_images: usize,
    pub max_images: usize,
}

impl RunSummary {
    pub(crate) fn from_rows(rows: &[ResultRow]) -> Self {
        Self {
            rows: rows.len(),
            rows_with_images: rows.iter().filter(|r| r.image_count() > 0).count(),
            max_images: rows.iter().map(ResultRow::image_count).max().unwrap_or(0),
        }
    }
}

/// Load the site profile from `path`, or fall back to the built-in default.
pub(crate) fn resolve_site(path: Option<&Path>) -> anyhow::Result<SiteProfile> {
    let Some(path) = path else {
        return Ok(SiteProfile::default());
    };
    let site = load_site_profile(path)?;
    tracing::info!(site = %site.name, path = %path.display(), "loaded site profile");
    Ok(site)
}

fn build_harvester(
    config: &AppConfig,
    site: SiteProfile,
    render_js: bool,
) -> anyhow::Result<ImageHarvester> {
    let client = CatalogClient::from_config(config)?;
    let harvester = ImageHarvester::new(client, site)?;
    if !render_js {
        return Ok(harvester);
    }
    if !PageRenderer::is_available() {
        tracing::warn!(
            "JavaScript rendering requested but this build lacks the render-js feature; \
             every page will yield zero images"
        );
    }
    Ok(harvester.with_renderer(PageRenderer::from_config(config)))
}

fn to_reference(raw: &str, kind: Option<ReferenceKind>) -> ProductReference {
    match kind {
        Some(kind) => ProductReference::with_kind(raw, kind),
        None => ProductReference::classify(raw),
    }
}

/// Harvest every reference in the input table and write the report.
///
/// # Errors
///
/// Returns an error if the input cannot be read, the column is missing, the
/// HTTP client cannot be built, or the report cannot be written.
pub(crate) async fn run_batch(
    config: &AppConfig,
    site: SiteProfile,
    options: &RunOptions<'_>,
) -> anyhow::Result<RunSummary> {
    let mut references = input::read_references(options.input, options.column)?;
    if let Some(limit) = options.limit {
        references.truncate(limit);
    }

    let harvester = build_harvester(config, site, options.render_js)?;
    let delay = Duration::from_millis(config.scraper_inter_request_delay_ms);
    let total = references.len();
    tracing::info!(
        input = %options.input.display(),
        site = %harvester.site().name,
        total,
        "starting image harvest"
    );

    let mut rows = Vec::with_capacity(total);
    for (i, raw) in references.iter().enumerate() {
        let reference = to_reference(raw, options.kind);
        tracing::info!(
            reference = %reference,
            kind = %reference.kind(),
            "processing {}/{total}",
            i + 1
        );

        let images = harvester.harvest(&reference).await;
        if images.is_empty() {
            tracing::warn!(reference = %reference, "no images found");
        } else {
            tracing::info!(reference = %reference, count = images.len(), "found images");
        }
        rows.push(ResultRow::new(raw.as_str(), images));

        if i + 1 < total && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    let table = ReportTable::from_rows(&rows);
    output::write_report(options.output, &table)?;

    let summary = RunSummary::from_rows(&rows);
    tracing::info!(
        rows = summary.rows,
        rows_with_images = summary.rows_with_images,
        max_images = summary.max_images,
        "image harvest complete"
    );
    println!(
        "processed {} rows: {} with images, max {} images per row; report written to {}",
        summary.rows,
        summary.rows_with_images,
        summary.max_images,
        options.output.display()
    );
    Ok(summary)
}

/// Harvest a single reference and print its image URLs.
///
/// # Errors
///
/// Returns an error if the reference is blank or the HTTP client cannot be
/// built.
pub(crate) async fn run_fetch(
    config: &AppConfig,
    site: SiteProfile,
    raw: &str,
    kind: Option<ReferenceKind>,
    render_js: bool,
) -> anyhow::Result<()> {
    let reference = to_reference(raw, kind);
    if reference.is_empty() {
        anyhow::bail!("reference must be non-empty");
    }

    let harvester = build_harvester(config, site, render_js)?;
    let images = harvester.harvest(&reference).await;
    println!("{reference} ({}): {} images", reference.kind(), images.len());
    for url in images.urls() {
        println!("{url}");
    }
    Ok(())
}

/// Run the offline strategies over a saved document and print the result.
///
/// # Errors
///
/// Returns an error if `page_url` is not an absolute http(s) URL or the file
/// cannot be read.
pub(crate) fn run_extract(site: &SiteProfile, file: &Path, page_url: &str) -> anyhow::Result<()> {
    if !(page_url.starts_with("http://") || page_url.starts_with("https://")) {
        anyhow::bail!("--page-url must be an absolute http(s) URL, got '{page_url}'");
    }
    let document = std::fs::read_to_string(file)
        .map_err(|e| anyhow::anyhow!("failed to read '{}': {e}", file.display()))?;

    let filter = ChromeFilter::for_site(site);
    match extract_with_strategy(&document, page_url, &filter) {
        Some((strategy, images)) => {
            println!("{} images ({strategy})", images.len());
            for url in images.urls() {
                println!("{url}");
            }
        }
        None => println!("0 images"),
    }
    Ok(())
}

#[cfg(test)]
#[path = "run_test.rs"]
mod tests;
