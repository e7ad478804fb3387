pub mod client;
pub mod error;
pub mod extract;
pub mod filter;
pub mod harvest;
pub(crate) mod html;
pub mod normalize;
pub mod product_id;
pub(crate) mod rate_limit;
pub mod render;
pub(crate) mod search;

pub use client::{CatalogClient, FetchedPage};
pub use error::ScraperError;
pub use extract::{extract_product_images, extract_with_strategy, Strategy};
pub use filter::ChromeFilter;
pub use harvest::ImageHarvester;
pub use normalize::normalize_image_url;
pub use product_id::derive_product_id;
pub use render::PageRenderer;
