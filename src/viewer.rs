use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::carousel::{CarouselState, Direction};
use crate::catalog::Category;

#[derive(Debug, Clone)]
pub struct Viewer {
    carousels: HashMap<Category, CarouselState>,
    last_seen: Instant,
}

impl Viewer {
    fn new() -> Self {
        Self {
            carousels: Category::ALL
                .into_iter()
                .map(|c| (c, CarouselState::new()))
                .collect(),
            last_seen: Instant::now(),
        }
    }

    fn carousel(&mut self, category: Category) -> &mut CarouselState {
        self.last_seen = Instant::now();
        self.carousels.entry(category).or_default()
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct AdvanceOutcome {
    /// False when the request was ignored (transition in flight, or
    /// nowhere to go).
    pub accepted: bool,
    pub state: CarouselState,
}

pub struct ViewerRegistry {
    viewers: RwLock<HashMap<Uuid, Viewer>>,
    idle_timeout: Duration,
}

impl ViewerRegistry {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            viewers: RwLock::new(HashMap::new()),
            idle_timeout,
        }
    }

    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        let mut viewers = self.viewers.write().await;
        viewers.insert(id, Viewer::new());
        info!(viewer = %id, "Viewer created");
        id
    }

    pub async fn state(
        &self,
        id: Uuid,
        category: Category,
        item_count: usize,
    ) -> Option<CarouselState> {
        let mut viewers = self.viewers.write().await;
        let carousel = viewers.get_mut(&id)?.carousel(category);
        carousel.clamp(item_count);
        Some(*carousel)
    }

    pub async fn advance(
        &self,
        id: Uuid,
        category: Category,
        direction: Direction,
        item_count: usize,
    ) -> Option<AdvanceOutcome> {
        let mut viewers = self.viewers.write().await;
        let carousel = viewers.get_mut(&id)?.carousel(category);
        let accepted = carousel.advance(direction, item_count);
        Some(AdvanceOutcome {
            accepted,
            state: *carousel,
        })
    }

    pub async fn exit_complete(&self, id: Uuid, category: Category) -> Option<CarouselState> {
        let mut viewers = self.viewers.write().await;
        let carousel = viewers.get_mut(&id)?.carousel(category);
        carousel.exit_complete();
        Some(*carousel)
    }

    pub async fn expire(&self) -> usize {
        let mut viewers = self.viewers.write().await;
        let before = viewers.len();
        let timeout = self.idle_timeout;
        viewers.retain(|_, v| v.last_seen.elapsed() < timeout);
        let removed = before - viewers.len();
        if removed > 0 {
            info!("Expired {} idle viewers", removed);
        }
        removed
    }

    pub fn start_background_expiry(self: Arc<Self>, interval_secs: u64) {
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(tokio::time::Duration::from_secs(interval_secs.max(1)));
            loop {
                interval.tick().await;
                self.expire().await;
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_viewers_are_independent() {
        let registry = ViewerRegistry::new(Duration::from_secs(60));
        let a = registry.create().await;
        let b = registry.create().await;

        let outcome = registry
            .advance(a, Category::Popular, Direction::Forward, 13)
            .await
            .unwrap();
        assert!(outcome.accepted);
        assert_eq!(outcome.state.index(), 1);

        let other = registry.state(b, Category::Popular, 13).await.unwrap();
        assert_eq!(other.index(), 0);
        let same_viewer = registry.state(a, Category::Upcoming, 13).await.unwrap();
        assert_eq!(same_viewer.index(), 0);
    }

    #[tokio::test]
    async fn test_advance_waits_for_exit() {
        let registry = ViewerRegistry::new(Duration::from_secs(60));
        let id = registry.create().await;

        let first = registry
            .advance(id, Category::NowPlaying, Direction::Forward, 20)
            .await
            .unwrap();
        assert!(first.accepted);
        assert!(first.state.is_transitioning());

        let blocked = registry
            .advance(id, Category::NowPlaying, Direction::Forward, 20)
            .await
            .unwrap();
        assert!(!blocked.accepted);
        assert_eq!(blocked.state.index(), 1);

        let state = registry.exit_complete(id, Category::NowPlaying).await.unwrap();
        assert!(!state.is_transitioning());

        let second = registry
            .advance(id, Category::NowPlaying, Direction::Backward, 20)
            .await
            .unwrap();
        assert!(second.accepted);
        assert_eq!(second.state.index(), 0);
    }

    #[tokio::test]
    async fn test_unknown_viewer() {
        let registry = ViewerRegistry::new(Duration::from_secs(60));
        let id = Uuid::new_v4();
        assert!(registry.state(id, Category::Popular, 13).await.is_none());
        assert!(registry
            .advance(id, Category::Popular, Direction::Forward, 13)
            .await
            .is_none());
        assert!(registry.exit_complete(id, Category::Popular).await.is_none());
    }

    #[tokio::test]
    async fn test_idle_viewers_expire() {
        let registry = ViewerRegistry::new(Duration::from_millis(20));
        registry.create().await;
        assert_eq!(registry.expire().await, 0);

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(registry.expire().await, 1);
        assert_eq!(registry.expire().await, 0);
    }

    #[tokio::test]
    async fn test_shrunk_list_keeps_index_during_transition() {
        let registry = ViewerRegistry::new(Duration::from_secs(60));
        let id = registry.create().await;

        let outcome = registry
            .advance(id, Category::Popular, Direction::Forward, 13)
            .await
            .unwrap();
        assert!(outcome.accepted);

        let during = registry.state(id, Category::Popular, 7).await.unwrap();
        assert_eq!(during.index(), 1);
        assert!(during.is_transitioning());

        registry.exit_complete(id, Category::Popular).await.unwrap();
        let after = registry.state(id, Category::Popular, 7).await.unwrap();
        assert_eq!(after.index(), 0);
        assert!(!after.is_transitioning());
    }
}
