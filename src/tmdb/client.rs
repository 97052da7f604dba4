use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::types::{CatalogItem, CatalogPage, ImageSize};
use crate::config::TmdbConfig;

#[derive(Debug, Clone)]
pub struct TmdbClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    image_base_url: String,
    language: Option<String>,
}

impl TmdbClient {
    pub fn new(config: &TmdbConfig) -> Result<Self, TmdbError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(|e| TmdbError::Network(e.without_url()))?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            image_base_url: config.image_base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
        })
    }

    pub async fn now_playing(&self) -> Result<CatalogPage, TmdbError> {
        self.get("/movie/now_playing").await
    }

    pub async fn popular(&self) -> Result<CatalogPage, TmdbError> {
        self.get("/movie/popular").await
    }

    pub async fn upcoming(&self) -> Result<CatalogPage, TmdbError> {
        self.get("/movie/upcoming").await
    }

    pub async fn top_rated(&self) -> Result<CatalogPage, TmdbError> {
        self.get("/movie/top_rated").await
    }

    /// The most recently added movie. Unlike the list endpoints this
    /// returns a single item.
    pub async fn latest(&self) -> Result<CatalogItem, TmdbError> {
        self.get("/movie/latest").await
    }

    pub async fn movie(&self, id: u64) -> Result<CatalogItem, TmdbError> {
        self.get(&format!("/movie/{}", id)).await
    }

    pub fn image_url(&self, path: &str, size: ImageSize) -> String {
        image_url(&self.image_base_url, path, size)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, TmdbError> {
        let url = format!("{}{}", self.base_url, path);
        let mut query = vec![("api_key", self.api_key.as_str())];
        if let Some(ref language) = self.language {
            query.push(("language", language.as_str()));
        }

        debug!(url = %url, "Fetching from catalog service");

        // Errors are stripped of their URL so the api key never ends up in logs.
        let response = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| TmdbError::Network(e.without_url()))?;

        let body = response
            .bytes()
            .await
            .map_err(|e| TmdbError::Network(e.without_url()))?;

        Ok(serde_json::from_slice(&body)?)
    }
}

pub fn image_url(image_base_url: &str, path: &str, size: ImageSize) -> String {
    let path = path.trim_start_matches('/');
    format!("{}/{}/{}", image_base_url, size.as_str(), path)
}

#[derive(Debug, thiserror::Error)]
pub enum TmdbError {
    #[error("Request failed: {0}")]
    Network(reqwest::Error),
    #[error("Failed to decode response: {0}")]
    Parse(#[from] serde_json::Error),
}
