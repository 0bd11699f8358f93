use axum::{Router, routing::{get, post}};
use std::sync::Arc;
use tower_http::cors::{CorsLayer, AllowOrigin};
use axum::http::Method;
use crate::AppState;
use crate::api::handlers;

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(vec![Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(vec![axum::http::header::CONTENT_TYPE, axum::http::header::ACCEPT]);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/categories", get(handlers::list_categories).post(handlers::create_category))
        .route("/categories/:id", axum::routing::delete(handlers::delete_category))
        .route("/categories/:id/images", get(handlers::list_category_images).post(handlers::add_image))
        .route("/categories/:id/images/:image_id", axum::routing::delete(handlers::delete_image))
        .route("/categories/:id/recount", post(handlers::recount_category))
        .route("/portfolio/filters", get(handlers::portfolio_filters))
        .route("/portfolio/images/query", post(handlers::query_images))
        .route("/portfolio/images/:category_id/:image_id/related", get(handlers::related_images))
        .route("/portfolio/before-after", get(handlers::before_after))
        .route("/cdn/url", get(handlers::cdn_url))
        .route("/cdn/config", get(handlers::get_cdn_config).put(handlers::update_cdn_config))
        .layer(cors)
        .with_state(state)
}
