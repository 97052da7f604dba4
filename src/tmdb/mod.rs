pub mod client;
pub mod types;

pub use client::{image_url, TmdbClient, TmdbError};
pub use types::{CatalogItem, CatalogPage, DateRange, ImageSize};
