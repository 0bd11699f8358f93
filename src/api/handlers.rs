use std::sync::Arc;
use axum::{extract::{State, Path, Query}, http::StatusCode, Json, response::IntoResponse};
use serde::Deserialize;
use rusqlite::Connection;
use crate::AppState;
use crate::cdn::{CdnConfig, CropMode, Quality, TransformationSpec};
use crate::cdn::presets::srcset;
use crate::db;
use crate::error::{ApiError, StoreError};
use crate::models::filter::FilterOptions;
use crate::models::image::{NewCategory, NewImage};

/// Run a blocking catalog operation on a pooled connection.
async fn with_conn<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&mut Connection) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let pool = state.pool.clone();
    let result = tokio::task::spawn_blocking(move || -> Result<T, StoreError> {
        let mut conn = pool.get()?;
        f(&mut *conn).map_err(StoreError::classify)
    })
    .await
    .map_err(StoreError::from)?;
    result.map_err(ApiError::from)
}

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let body = serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "database": "SQLite",
        "uptime_seconds": state.started_at.elapsed().as_secs(),
    });
    (StatusCode::OK, Json(body))
}

pub async fn list_categories(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let categories = with_conn(&state, |conn| db::query::list_categories(conn)).await?;
    Ok(Json(categories))
}

pub async fn create_category(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewCategory>,
) -> Result<impl IntoResponse, ApiError> {
    let category = with_conn(&state, move |conn| db::writer::create_category(conn, body)).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let lookup = id.clone();
    let deleted = with_conn(&state, move |conn| db::writer::delete_category(conn, &lookup)).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("category {} not found", id)));
    }
    Ok(Json(serde_json::json!({"success": true})))
}

pub async fn list_category_images(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let lookup = id.clone();
    let images = with_conn(&state, move |conn| {
        match db::query::get_category(conn, &lookup)? {
            Some(_) => Ok(Some(db::query::list_category_images(conn, &lookup)?)),
            None => Ok(None),
        }
    })
    .await?;
    images
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("category {} not found", id)))
}

pub async fn add_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<NewImage>,
) -> Result<impl IntoResponse, ApiError> {
    let image = with_conn(&state, move |conn| db::writer::insert_image(conn, &id, body)).await?;
    tracing::info!(image = %image.id, category = %image.category_id, "image added");
    Ok((StatusCode::CREATED, Json(image)))
}

pub async fn delete_image(
    State(state): State<Arc<AppState>>,
    Path((category_id, image_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let (cat, img) = (category_id.clone(), image_id.clone());
    let deleted = with_conn(&state, move |conn| db::writer::delete_image(conn, &cat, &img)).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("image {} not found in category {}", image_id, category_id)));
    }
    tracing::info!(image = %image_id, category = %category_id, "image deleted");
    Ok(Json(serde_json::json!({"success": true})))
}

pub async fn recount_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let count = with_conn(&state, move |conn| db::writer::recount_images(conn, &id)).await?;
    Ok(Json(serde_json::json!({"imageCount": count})))
}

pub async fn portfolio_filters(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.portfolio.get_filterable_attributes().await)
}

pub async fn query_images(
    State(state): State<Arc<AppState>>,
    Json(options): Json<FilterOptions>,
) -> impl IntoResponse {
    Json(state.portfolio.get_filtered_portfolio_images(options).await)
}

#[derive(Debug, Deserialize)]
pub struct RelatedParams {
    pub limit: Option<usize>,
}

pub async fn related_images(
    State(state): State<Arc<AppState>>,
    Path((category_id, image_id)): Path<(String, String)>,
    Query(params): Query<RelatedParams>,
) -> impl IntoResponse {
    let limit = params.limit.unwrap_or(state.config.related_limit);
    Json(state.portfolio.get_related_images(&image_id, &category_id, limit).await)
}

pub async fn before_after(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.portfolio.get_before_after_images().await)
}

#[derive(Debug, Deserialize)]
pub struct CdnUrlParams {
    pub src: String,
    pub preset: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub crop: Option<String>,
    pub quality: Option<u8>,
}

pub async fn cdn_url(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CdnUrlParams>,
) -> Result<impl IntoResponse, ApiError> {
    let transformer = state.transformer();
    let src = params.src.as_str();
    let body = match params.preset.as_deref().unwrap_or("optimized") {
        "optimized" => serde_json::json!({"url": transformer.optimized_url(src, params.width, params.height)}),
        "placeholder" => serde_json::json!({"url": transformer.placeholder_url(src)}),
        "watermark" => serde_json::json!({"url": transformer.watermarked_url(src, params.width)}),
        "social" => serde_json::json!({"url": transformer.social_share_url(src)}),
        "responsive" => {
            let sources = transformer.responsive_set(src, &TransformationSpec::default());
            serde_json::json!({"srcset": srcset(&sources), "sources": sources})
        }
        "custom" => {
            let crop = match params.crop.as_deref() {
                Some(c) => Some(CropMode::parse(c).ok_or_else(|| ApiError::BadRequest(format!("unknown crop mode {:?}", c)))?),
                None => None,
            };
            let spec = TransformationSpec {
                quality: params.quality.map(Quality::Fixed).unwrap_or_default(),
                ..TransformationSpec::sized(params.width, params.height, crop)
            };
            serde_json::json!({"url": transformer.to_delivery_url(src, &spec)})
        }
        other => return Err(ApiError::BadRequest(format!("unknown preset {:?}", other))),
    };
    Ok(Json(body))
}

pub async fn get_cdn_config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.transformer().config().clone())
}

pub async fn update_cdn_config(
    State(state): State<Arc<AppState>>,
    Json(config): Json<CdnConfig>,
) -> Result<impl IntoResponse, ApiError> {
    if config.cloud_name.trim().is_empty() || config.base_url.trim().is_empty() {
        return Err(ApiError::BadRequest("baseUrl and cloudName are required".into()));
    }
    state.update_cdn_config(config.clone());
    Ok(Json(config))
}
