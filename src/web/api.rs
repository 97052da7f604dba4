use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::views::{CarouselPageView, ViewerSliderView};
use crate::carousel::Direction;
use crate::catalog::Category;
use crate::server::AppState;
use crate::tmdb::{CatalogItem, CatalogPage};

fn category(slug: &str) -> Result<Category, StatusCode> {
    Category::from_slug(slug).ok_or(StatusCode::NOT_FOUND)
}

async fn fetch_page(
    state: &AppState,
    category: Category,
) -> Result<std::sync::Arc<CatalogPage>, StatusCode> {
    state
        .catalog
        .page(category)
        .await
        .map_err(|_| StatusCode::BAD_GATEWAY)
}

pub async fn get_movies(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<CatalogPage>, StatusCode> {
    let page = fetch_page(&state, category(&slug)?).await?;
    Ok(Json(page.as_ref().clone()))
}

pub async fn get_carousel_page(
    State(state): State<AppState>,
    Path((slug, index)): Path<(String, usize)>,
) -> Result<Json<CarouselPageView>, StatusCode> {
    let category = category(&slug)?;
    let page = fetch_page(&state, category).await?;
    Ok(Json(CarouselPageView::new(category, &page, index)))
}

pub async fn get_latest(State(state): State<AppState>) -> Result<Json<CatalogItem>, StatusCode> {
    let item = state
        .catalog
        .latest()
        .await
        .map_err(|_| StatusCode::BAD_GATEWAY)?;
    Ok(Json(item.as_ref().clone()))
}

pub async fn get_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<u64>,
) -> Result<Json<CatalogItem>, StatusCode> {
    let item = state
        .catalog
        .movie(movie_id)
        .await
        .map_err(|_| StatusCode::BAD_GATEWAY)?;
    Ok(Json(item.as_ref().clone()))
}

#[derive(Debug, Serialize)]
pub struct ViewerCreated {
    pub id: Uuid,
}

pub async fn create_viewer(State(state): State<AppState>) -> (StatusCode, Json<ViewerCreated>) {
    let id = state.viewers.create().await;
    (StatusCode::CREATED, Json(ViewerCreated { id }))
}

pub async fn get_viewer_slider(
    State(state): State<AppState>,
    Path((viewer_id, slug)): Path<(Uuid, String)>,
) -> Result<Json<ViewerSliderView>, StatusCode> {
    let category = category(&slug)?;
    let page = fetch_page(&state, category).await?;
    let carousel = state
        .viewers
        .state(viewer_id, category, page.results.len())
        .await
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(ViewerSliderView::new(category, &page, &carousel)))
}

#[derive(Debug, Deserialize)]
pub struct AdvanceRequest {
    pub direction: Direction,
}

pub async fn advance_viewer_slider(
    State(state): State<AppState>,
    Path((viewer_id, slug)): Path<(Uuid, String)>,
    Json(request): Json<AdvanceRequest>,
) -> Result<Json<ViewerSliderView>, StatusCode> {
    let category = category(&slug)?;
    let page = fetch_page(&state, category).await?;
    let outcome = state
        .viewers
        .advance(viewer_id, category, request.direction, page.results.len())
        .await
        .ok_or(StatusCode::NOT_FOUND)?;

    let mut view = ViewerSliderView::new(category, &page, &outcome.state);
    view.accepted = Some(outcome.accepted);
    Ok(Json(view))
}

pub async fn exit_complete_viewer_slider(
    State(state): State<AppState>,
    Path((viewer_id, slug)): Path<(Uuid, String)>,
) -> Result<Json<ViewerSliderView>, StatusCode> {
    let category = category(&slug)?;
    let page = fetch_page(&state, category).await?;
    let carousel = state
        .viewers
        .exit_complete(viewer_id, category)
        .await
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(ViewerSliderView::new(category, &page, &carousel)))
}
