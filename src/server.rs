use axum::{
    extract::Request,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::catalog::Catalog;
use crate::config::Config;
use crate::viewer::ViewerRegistry;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Arc<Catalog>,
    pub viewers: Arc<ViewerRegistry>,
}

impl AppState {
    pub fn new(config: Config, catalog: Arc<Catalog>, viewers: Arc<ViewerRegistry>) -> Self {
        Self {
            config: Arc::new(config),
            catalog,
            viewers,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route("/", get(crate::web::home))
        .route("/movies/:movie_id/:slider", get(crate::web::movie_overlay));

    let api_routes = Router::new()
        .route("/api/movies/:category", get(crate::web::get_movies))
        .route(
            "/api/movies/:category/pages/:index",
            get(crate::web::get_carousel_page),
        )
        .route("/api/movie/latest", get(crate::web::get_latest))
        .route("/api/movie/:movie_id", get(crate::web::get_movie))
        .route("/api/viewers", post(crate::web::create_viewer))
        .route(
            "/api/viewers/:viewer_id/sliders/:category",
            get(crate::web::get_viewer_slider),
        )
        .route(
            "/api/viewers/:viewer_id/sliders/:category/advance",
            post(crate::web::advance_viewer_slider),
        )
        .route(
            "/api/viewers/:viewer_id/sliders/:category/exit-complete",
            post(crate::web::exit_complete_viewer_slider),
        );

    let mut router = Router::new()
        .route("/robots.txt", get(robots_txt_handler))
        .merge(page_routes)
        .merge(api_routes)
        .fallback(fallback_handler);

    if let Some(ref appdir) = state.config.appdir {
        router = router.fallback_service(ServeDir::new(appdir));
    }

    router
        .layer(axum::middleware::from_fn(crate::middleware::log_request))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn robots_txt_handler() -> &'static str {
    "User-agent: *\nDisallow: /\n"
}

async fn fallback_handler(req: Request<axum::body::Body>) -> impl IntoResponse {
    if req.method() == axum::http::Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    StatusCode::NOT_FOUND.into_response()
}
