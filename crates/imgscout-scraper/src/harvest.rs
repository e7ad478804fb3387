//! Per-reference image harvesting: resolve, fetch, extract, degrade to empty.

use imgscout_core::{ImageSet, ProductReference, SiteProfile};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use regex::Regex;

use crate::client::{CatalogClient, FetchedPage};
use crate::error::ScraperError;
use crate::extract::{extract_with_strategy, images_from_json, Strategy};
use crate::filter::ChromeFilter;
use crate::product_id::derive_product_id;
use crate::render::PageRenderer;
use crate::search::find_product_link;

/// Turns one [`ProductReference`] into an [`ImageSet`].
///
/// Owns the shared [`CatalogClient`] so every row of a batch reuses the same
/// connection pool.
pub struct ImageHarvester {
    client: CatalogClient,
    site: SiteProfile,
    filter: ChromeFilter,
    product_link: Regex,
    renderer: Option<PageRenderer>,
}

impl ImageHarvester {
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidPattern`] if the site's
    /// `product_link_pattern` is not a valid regex.
    pub fn new(client: CatalogClient, site: SiteProfile) -> Result<Self, ScraperError> {
        let product_link =
            Regex::new(&site.product_link_pattern).map_err(|e| ScraperError::InvalidPattern {
                pattern: site.product_link_pattern.clone(),
                source: e,
            })?;
        let filter = ChromeFilter::for_site(&site);
        Ok(Self {
            client,
            site,
            filter,
            product_link,
            renderer: None,
        })
    }

    /// Fetch product and search pages through `renderer` instead of plain
    /// HTTP. The product endpoint is still queried over HTTP.
    #[must_use]
    pub fn with_renderer(mut self, renderer: PageRenderer) -> Self {
        self.renderer = Some(renderer);
        self
    }

    #[must_use]
    pub fn site(&self) -> &SiteProfile {
        &self.site
    }

    #[must_use]
    pub fn filter(&self) -> &ChromeFilter {
        &self.filter
    }

    /// Harvests images for `reference`. Never fails: any fetch, status or
    /// parse error is logged and yields an empty set.
    pub async fn harvest(&self, reference: &ProductReference) -> ImageSet {
        if reference.is_empty() {
            tracing::warn!("empty reference, skipping fetch");
            return ImageSet::new();
        }

        match self.try_harvest(reference).await {
            Ok(images) => images,
            Err(e) => {
                tracing::warn!(
                    reference = %reference,
                    kind = %reference.kind(),
                    error = %e,
                    "image harvest failed, recording zero images"
                );
                ImageSet::new()
            }
        }
    }

    /// Fallible core of [`Self::harvest`].
    ///
    /// # Errors
    ///
    /// Propagates [`CatalogClient::fetch_page`] errors for the product page,
    /// the search page, or the product endpoint,
    /// [`ScraperError::Render`] when a configured renderer fails, and
    /// [`ScraperError::Deserialize`] when the product endpoint does not
    /// return JSON.
    pub async fn try_harvest(&self, reference: &ProductReference) -> Result<ImageSet, ScraperError> {
        let page = match reference {
            ProductReference::Url(url) => self.fetch_document(url).await?,
            ProductReference::Sku(query) | ProductReference::Search(query) => {
                self.resolve_search(query).await?
            }
        };
        self.images_from_page(&page).await
    }

    /// Fetches the search page for `query` and follows the first product link
    /// on it; without one, the search page itself is returned.
    async fn resolve_search(&self, query: &str) -> Result<FetchedPage, ScraperError> {
        let encoded = utf8_percent_encode(query, NON_ALPHANUMERIC).to_string();
        let search_url = self.site.search_url(&encoded);
        let search_page = self.fetch_document(&search_url).await?;

        if let Some(product_url) =
            find_product_link(&search_page.body, &search_page.url, &self.product_link)
        {
            tracing::debug!(query, product_url, "following first search result");
            return self.fetch_document(&product_url).await;
        }

        tracing::debug!(
            query,
            search_url = %search_page.url,
            "no product link on search page, extracting from results page"
        );
        Ok(search_page)
    }

    async fn fetch_document(&self, url: &str) -> Result<FetchedPage, ScraperError> {
        match &self.renderer {
            Some(renderer) => renderer.render(url).await,
            None => self.client.fetch_page(url).await,
        }
    }

    async fn images_from_page(&self, page: &FetchedPage) -> Result<ImageSet, ScraperError> {
        if let Some((strategy, images)) = extract_with_strategy(&page.body, &page.url, &self.filter)
        {
            tracing::debug!(
                url = %page.url,
                strategy = %strategy,
                count = images.len(),
                "extracted images"
            );
            return Ok(images);
        }

        self.query_product_endpoint(page).await
    }

    /// Last-resort strategy: ask the site's internal endpoint for the images
    /// of the product identified on `page`.
    async fn query_product_endpoint(&self, page: &FetchedPage) -> Result<ImageSet, ScraperError> {
        let Some(product_id) = derive_product_id(&page.body) else {
            tracing::debug!(url = %page.url, "no images and no product id on page");
            return Ok(ImageSet::new());
        };
        let encoded = utf8_percent_encode(&product_id, NON_ALPHANUMERIC).to_string();
        let Some(api_url) = self.site.product_api_url(&encoded) else {
            tracing::debug!(product_id, "site has no product endpoint configured");
            return Ok(ImageSet::new());
        };

        let response = self.client.fetch_page(&api_url).await?;
        let payload: serde_json::Value =
            serde_json::from_str(&response.body).map_err(|e| ScraperError::Deserialize {
                context: format!("product endpoint response for {product_id}"),
                source: e,
            })?;

        let images = images_from_json(&payload, &response.url, &self.filter);
        tracing::debug!(
            product_id,
            api_url,
            strategy = %Strategy::ProductEndpoint,
            count = images.len(),
            "queried product endpoint"
        );
        Ok(images)
    }
}
