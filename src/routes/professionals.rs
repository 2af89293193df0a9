//! Professional directory routes
//!
//! The listing endpoint applies the directory core (city -> category ->
//! free-text, then pagination) over the full professional set, which is
//! served from Redis when warm. The nearby endpoint ranks the
//! category-filtered set by great-circle distance from the caller.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::pagination::{Paginated, PaginationParams};
use crate::api::response::{ApiResponse, DataResponse};
use crate::app::AppState;
use crate::domain::catalog::{Language, CITY_ALL};
use crate::domain::directory::{self, Coordinates, DirectoryFilter};
use crate::domain::professionals::{NearbyProfessional, Professional};
use crate::error::ApiError;
use crate::services::cache::keys;

/// How many entries the nearby ranking returns
const NEARBY_LIMIT: usize = 5;

#[derive(Debug, Deserialize, Default)]
pub struct DirectoryQueryParams {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
}

impl DirectoryQueryParams {
    fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NearbyQueryParams {
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub category: Option<String>,
}

/// Load the full listing set, preferring the cache.
///
/// The set is small (a city directory, not a crawl index); filtering
/// happens in memory over the stable created_at ordering.
async fn load_professionals(state: &AppState) -> Result<Vec<Professional>, ApiError> {
    let key = keys::professionals();
    if let Some(cached) = state.cache.get::<Vec<Professional>>(&key).await {
        return Ok(cached);
    }

    let pros = sqlx::query_as::<_, Professional>(
        r#"
        SELECT id, name, service_id, service_cities, address, phone, rating, lat, lng, created_at
        FROM professionals
        ORDER BY created_at, id
        "#,
    )
    .fetch_all(&state.db)
    .await?;

    if let Err(e) = state.cache.set(&key, &pros).await {
        tracing::warn!(error = %e, "Failed to cache professional listing");
    }

    Ok(pros)
}

/// GET /professionals
///
/// Directory listing: city -> category -> free-text filtering in that
/// order, then fixed-size pagination over the filtered set. An empty
/// result is an empty page, not an error.
pub async fn list_professionals(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DirectoryQueryParams>,
) -> Result<impl IntoResponse, ApiError> {
    let lang = params
        .lang
        .as_deref()
        .and_then(Language::from_code)
        .unwrap_or_default();

    let filter = DirectoryFilter {
        category: params.category.clone(),
        city: params.city.clone().unwrap_or_else(|| CITY_ALL.to_string()),
        query: params.q.clone().unwrap_or_default(),
        lang,
    };

    let pagination = params.pagination();
    let pros = load_professionals(&state).await?;
    let filtered = filter.apply(&pros);
    let total = filtered.len() as u64;

    let page: Vec<Professional> =
        directory::page_slice(&filtered, pagination.page(), pagination.per_page())
            .iter()
            .map(|p| (*p).clone())
            .collect();

    Ok(Json(Paginated::new(page, &pagination, total)))
}

/// GET /professionals/nearby?lat=&lng=&category=
///
/// The closest professionals to the caller's coordinates, ascending by
/// haversine distance, within the selected category if one is given.
pub async fn nearby_professionals(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NearbyQueryParams>,
) -> Result<impl IntoResponse, ApiError> {
    if !(-90.0..=90.0).contains(&params.lat) || !(-180.0..=180.0).contains(&params.lng) {
        return Err(ApiError::bad_request("Coordinates out of range"));
    }

    let origin = Coordinates {
        lat: params.lat,
        lng: params.lng,
    };

    let pros = load_professionals(&state).await?;

    let scoped: Vec<Professional> = match params.category.as_deref() {
        Some(category) => pros
            .into_iter()
            .filter(|p| p.service_id == category)
            .collect(),
        None => pros,
    };

    let nearby: Vec<NearbyProfessional> = directory::nearest(origin, &scoped, NEARBY_LIMIT)
        .into_iter()
        .map(|(pro, distance_km)| NearbyProfessional {
            professional: pro.clone(),
            distance_km,
        })
        .collect();

    Ok(ApiResponse::with_meta(
        nearby,
        serde_json::json!({ "origin": { "lat": params.lat, "lng": params.lng } }),
    ))
}

/// GET /professionals/:pro_id
pub async fn get_professional(
    State(state): State<Arc<AppState>>,
    Path(pro_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let pro = sqlx::query_as::<_, Professional>(
        r#"
        SELECT id, name, service_id, service_cities, address, phone, rating, lat, lng, created_at
        FROM professionals
        WHERE id = $1
        "#,
    )
    .bind(pro_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| ApiError::not_found("Professional not found"))?;

    Ok(Json(DataResponse::new(pro)))
}
