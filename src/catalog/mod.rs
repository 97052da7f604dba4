pub mod cache;
pub mod category;

pub use cache::CachedQuery;
pub use category::Category;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

use crate::tmdb::{CatalogItem, CatalogPage, ImageSize, TmdbClient, TmdbError};

#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn page(&self, category: Category) -> Result<CatalogPage, TmdbError>;
    async fn latest(&self) -> Result<CatalogItem, TmdbError>;
    async fn movie(&self, id: u64) -> Result<CatalogItem, TmdbError>;
    fn image_url(&self, path: &str, size: ImageSize) -> String;
}

#[async_trait]
impl CatalogSource for TmdbClient {
    async fn page(&self, category: Category) -> Result<CatalogPage, TmdbError> {
        match category {
            Category::NowPlaying => self.now_playing().await,
            Category::Popular => self.popular().await,
            Category::Upcoming => self.upcoming().await,
            Category::TopRated => self.top_rated().await,
        }
    }

    async fn latest(&self) -> Result<CatalogItem, TmdbError> {
        TmdbClient::latest(self).await
    }

    async fn movie(&self, id: u64) -> Result<CatalogItem, TmdbError> {
        TmdbClient::movie(self, id).await
    }

    fn image_url(&self, path: &str, size: ImageSize) -> String {
        TmdbClient::image_url(self, path, size)
    }
}

/// Per-query caches in front of a [`CatalogSource`].
pub struct Catalog {
    source: Arc<dyn CatalogSource>,
    ttl: Duration,
    lists: [CachedQuery<CatalogPage>; 4],
    latest: CachedQuery<CatalogItem>,
    details: RwLock<HashMap<u64, Arc<CachedQuery<CatalogItem>>>>,
}

impl Catalog {
    pub fn new(source: Arc<dyn CatalogSource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            lists: Category::ALL.map(|c| CachedQuery::new(c.query_name(), ttl)),
            latest: CachedQuery::new("movies/latest", ttl),
            details: RwLock::new(HashMap::new()),
        }
    }

    pub async fn page(&self, category: Category) -> Result<Arc<CatalogPage>, TmdbError> {
        self.lists[category.index()]
            .get_or_fetch(|| self.source.page(category))
            .await
    }

    pub async fn home_pages(&self) -> Vec<(Category, Result<Arc<CatalogPage>, TmdbError>)> {
        let [a, b, c, d] = Category::HOME;
        let (ra, rb, rc, rd) = tokio::join!(self.page(a), self.page(b), self.page(c), self.page(d));
        vec![(a, ra), (b, rb), (c, rc), (d, rd)]
    }

    pub async fn latest(&self) -> Result<Arc<CatalogItem>, TmdbError> {
        self.latest.get_or_fetch(|| self.source.latest()).await
    }

    pub async fn movie(&self, id: u64) -> Result<Arc<CatalogItem>, TmdbError> {
        let query = {
            let details = self.details.read().await;
            details.get(&id).cloned()
        };
        let query = match query {
            Some(query) => query,
            None => {
                let mut details = self.details.write().await;
                details
                    .entry(id)
                    .or_insert_with(|| {
                        Arc::new(CachedQuery::new(format!("movies/detail/{}", id), self.ttl))
                    })
                    .clone()
            }
        };
        query.get_or_fetch(|| self.source.movie(id)).await
    }

    pub async fn prune(&self) -> usize {
        let mut details = self.details.write().await;
        let before = details.len();
        details.retain(|_, query| !query.is_stale());
        let removed = before - details.len();
        if removed > 0 {
            debug!("Pruned {} stale detail queries", removed);
        }
        removed
    }

    pub fn image_url(&self, path: &str, size: ImageSize) -> String {
        self.source.image_url(path, size)
    }

    pub fn start_background_prune(self: Arc<Self>, interval_secs: u64) {
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(tokio::time::Duration::from_secs(interval_secs.max(1)));
            loop {
                interval.tick().await;
                self.prune().await;
            }
        });
    }
}
