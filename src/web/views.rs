use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::carousel::{self, CarouselState, Direction};
use crate::catalog::{Catalog, Category};
use crate::tmdb::{CatalogItem, CatalogPage, ImageSize};

#[derive(Debug, Clone, Serialize)]
pub struct ItemView {
    pub id: u64,
    pub title: String,
    pub image: Option<String>,
}

impl ItemView {
    fn new(item: &CatalogItem, catalog: &Catalog) -> Self {
        Self {
            id: item.id,
            title: item.title.clone(),
            image: item
                .backdrop_path
                .as_deref()
                .map(|p| catalog.image_url(p, ImageSize::W500)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BannerView {
    pub title: String,
    pub overview: String,
    pub image: Option<String>,
}

impl BannerView {
    pub fn new(page: &CatalogPage, catalog: &Catalog) -> Option<Self> {
        let item = page.results.first()?;
        Some(Self {
            title: item.title.clone(),
            overview: item.overview.clone(),
            image: item
                .backdrop_path
                .as_deref()
                .map(|p| catalog.image_url(p, ImageSize::Original)),
        })
    }
}

#[derive(Debug, Clone)]
pub struct OverlayView {
    pub title: String,
    pub overview: String,
    pub image: Option<String>,
}

impl OverlayView {
    pub fn new(item: &CatalogItem, catalog: &Catalog) -> Self {
        Self {
            title: item.title.clone(),
            overview: item.overview.clone(),
            image: item
                .backdrop_path
                .as_deref()
                .map(|p| catalog.image_url(p, ImageSize::W500)),
        }
    }
}

/// Slider indices carried in the query string, e.g. `?now_playing=1`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Positions {
    indices: BTreeMap<&'static str, usize>,
}

impl Positions {
    pub fn from_query(params: &HashMap<String, String>) -> Self {
        let indices = Category::ALL
            .into_iter()
            .filter_map(|c| {
                let index = params.get(c.slug())?.parse::<usize>().ok()?;
                Some((c.slug(), index))
            })
            .collect();
        Self { indices }
    }

    pub fn get(&self, category: Category) -> usize {
        self.indices.get(category.slug()).copied().unwrap_or(0)
    }

    pub fn with(&self, category: Category, index: usize) -> Self {
        let mut next = self.clone();
        next.indices.insert(category.slug(), index);
        next
    }

    pub fn query_string(&self) -> String {
        self.indices
            .iter()
            .filter(|(_, index)| **index != 0)
            .map(|(slug, index)| format!("{}={}", slug, index))
            .collect::<Vec<_>>()
            .join("&")
    }

    pub fn href(&self, path: &str) -> String {
        let query = self.query_string();
        if query.is_empty() {
            path.to_string()
        } else {
            format!("{}?{}", path, query)
        }
    }
}

#[derive(Debug, Clone)]
pub struct SliderView {
    pub slug: &'static str,
    pub title: &'static str,
    pub index: usize,
    pub page_count: usize,
    pub items: Vec<SliderItemView>,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SliderItemView {
    pub item: ItemView,
    pub href: String,
}

impl SliderView {
    pub fn new(
        category: Category,
        page: &CatalogPage,
        positions: &Positions,
        catalog: &Catalog,
    ) -> Self {
        let count = page.results.len();
        let requested = positions.get(category);
        let index = match carousel::max_index(count) {
            Some(max) if requested <= max => requested,
            _ => 0,
        };
        let positions = positions.with(category, index);

        let arrow = |direction| {
            carousel::step(index, direction, count)
                .filter(|&next| next != index)
                .map(|next| positions.with(category, next).href("/"))
        };

        let items = carousel::page_items(&page.results, index)
            .iter()
            .map(|item| SliderItemView {
                item: ItemView::new(item, catalog),
                href: positions.href(&format!("/movies/{}/{}", item.id, category.slug())),
            })
            .collect();

        Self {
            slug: category.slug(),
            title: category.title(),
            index,
            page_count: carousel::page_count(count),
            items,
            prev_href: arrow(Direction::Backward),
            next_href: arrow(Direction::Forward),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CarouselPageView {
    pub category: Category,
    pub index: usize,
    pub max_index: Option<usize>,
    pub page_count: usize,
    pub items: Vec<CatalogItem>,
}

impl CarouselPageView {
    pub fn new(category: Category, page: &CatalogPage, index: usize) -> Self {
        let count = page.results.len();
        Self {
            category,
            index,
            max_index: carousel::max_index(count),
            page_count: carousel::page_count(count),
            items: carousel::page_items(&page.results, index).to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewerSliderView {
    pub category: Category,
    pub index: usize,
    pub transitioning: bool,
    pub max_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted: Option<bool>,
    pub items: Vec<CatalogItem>,
}

impl ViewerSliderView {
    pub fn new(category: Category, page: &CatalogPage, state: &CarouselState) -> Self {
        Self {
            category,
            index: state.index(),
            transitioning: state.is_transitioning(),
            max_index: carousel::max_index(page.results.len()),
            accepted: None,
            items: state.visible(&page.results).to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::{page_of, FakeSource};
    use std::sync::Arc;
    use std::time::Duration;

    fn catalog() -> Catalog {
        Catalog::new(Arc::new(FakeSource::new(13)), Duration::ZERO)
    }

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_positions_from_query() {
        let positions = Positions::from_query(&query(&[
            ("popular", "2"),
            ("upcoming", "x"),
            ("other", "1"),
        ]));
        assert_eq!(positions.get(Category::Popular), 2);
        assert_eq!(positions.get(Category::Upcoming), 0);
        assert_eq!(positions.href("/"), "/?popular=2");

        let moved = positions.with(Category::NowPlaying, 1);
        assert_eq!(moved.href("/"), "/?now_playing=1&popular=2");
        assert_eq!(positions.with(Category::Popular, 0).href("/"), "/");
    }

    #[test]
    fn test_slider_first_page() {
        let catalog = catalog();
        let page = page_of(13);
        let slider = SliderView::new(Category::Popular, &page, &Positions::default(), &catalog);

        assert_eq!(slider.title, "Popular Movies");
        assert_eq!(slider.index, 0);
        assert_eq!(slider.page_count, 2);
        let ids: Vec<u64> = slider.items.iter().map(|i| i.item.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(slider.items[0].href, "/movies/1/popular");
        assert_eq!(
            slider.items[0].item.image.as_deref(),
            Some("http://img/w500/backdrop1.jpg")
        );
        assert_eq!(slider.next_href.as_deref(), Some("/?popular=1"));
        assert_eq!(slider.prev_href.as_deref(), Some("/?popular=1"));
    }

    #[test]
    fn test_slider_second_page() {
        let catalog = catalog();
        let page = page_of(13);
        let positions = Positions::from_query(&query(&[("popular", "1")]));
        let slider = SliderView::new(Category::Popular, &page, &positions, &catalog);

        let ids: Vec<u64> = slider.items.iter().map(|i| i.item.id).collect();
        assert_eq!(ids, vec![7, 8, 9, 10, 11, 12]);
        assert_eq!(slider.items[0].href, "/movies/7/popular?popular=1");
        assert_eq!(slider.next_href.as_deref(), Some("/"));
    }

    #[test]
    fn test_slider_out_of_range_index() {
        let catalog = catalog();
        let page = page_of(13);
        let positions = Positions::from_query(&query(&[("popular", "9")]));
        let slider = SliderView::new(Category::Popular, &page, &positions, &catalog);
        assert_eq!(slider.index, 0);
    }

    #[test]
    fn test_slider_without_arrows() {
        let catalog = catalog();
        let page = page_of(10);
        let slider = SliderView::new(Category::Upcoming, &page, &Positions::default(), &catalog);
        assert_eq!(slider.page_count, 1);
        assert_eq!(slider.items.len(), 6);
        assert!(slider.next_href.is_none());
        assert!(slider.prev_href.is_none());
    }

    #[test]
    fn test_carousel_page_view() {
        let view = CarouselPageView::new(Category::TopRated, &page_of(13), 1);
        assert_eq!(view.max_index, Some(1));
        assert_eq!(view.page_count, 2);
        assert_eq!(view.items.first().map(|i| i.id), Some(7));
    }
}
