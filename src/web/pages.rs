use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
};
use std::collections::HashMap;
use tracing::error;

use super::views::{BannerView, OverlayView, Positions, SliderView};
use crate::catalog::Category;
use crate::server::AppState;

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub banner: Option<BannerView>,
    pub sliders: Vec<SliderView>,
    pub overlay: Option<OverlaySection>,
}

pub struct OverlaySection {
    pub close_href: String,
    pub movie: Option<OverlayView>,
}

pub async fn home(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Html<String>, StatusCode> {
    let positions = Positions::from_query(&params);
    let page = build_home(&state, &positions, None).await;
    render(&page)
}

pub async fn movie_overlay(
    State(state): State<AppState>,
    Path((movie_id, slider)): Path<(u64, String)>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Html<String>, StatusCode> {
    Category::from_slug(&slider).ok_or(StatusCode::NOT_FOUND)?;
    let positions = Positions::from_query(&params);

    let movie = state
        .catalog
        .movie(movie_id)
        .await
        .ok()
        .map(|m| OverlayView::new(&m, &state.catalog));
    let overlay = OverlaySection {
        close_href: positions.href("/"),
        movie,
    };

    let page = build_home(&state, &positions, Some(overlay)).await;
    render(&page)
}

async fn build_home(
    state: &AppState,
    positions: &Positions,
    overlay: Option<OverlaySection>,
) -> HomeTemplate {
    let pages = state.catalog.home_pages().await;

    let banner = pages
        .iter()
        .find(|(c, _)| *c == Category::NowPlaying)
        .and_then(|(_, r)| r.as_ref().ok())
        .and_then(|page| BannerView::new(page, &state.catalog));

    // A slider whose query failed just isn't shown.
    let sliders = pages
        .iter()
        .filter_map(|(category, result)| {
            let page = result.as_ref().ok()?;
            Some(SliderView::new(*category, page, positions, &state.catalog))
        })
        .collect();

    HomeTemplate {
        banner,
        sliders,
        overlay,
    }
}

fn render(template: &HomeTemplate) -> Result<Html<String>, StatusCode> {
    template.render().map(Html).map_err(|e| {
        error!("Failed to render page: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}
