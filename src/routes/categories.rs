//! Service catalog routes
//!
//! The catalog is static data; these endpoints expose it to clients and
//! host the search-box-to-category resolver. The client debounces its
//! calls here while the user types.

use axum::{extract::Query, Json};
use serde::{Deserialize, Serialize};

use crate::api::response::DataResponse;
use crate::domain::catalog::{self, CategoryInfo};

/// GET /categories
///
/// The full service catalog with localized display names.
pub async fn list_categories() -> DataResponse<Vec<CategoryInfo>> {
    DataResponse::new(catalog::CATEGORIES.iter().map(CategoryInfo::from).collect())
}

#[derive(Debug, Deserialize)]
pub struct MatchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    /// The resolved category, or null when the query is too short or
    /// matches nothing
    pub category: Option<CategoryInfo>,
}

/// GET /categories/match?q=
///
/// Resolve a free-text query to a category across all locales.
pub async fn match_category(Query(params): Query<MatchQuery>) -> Json<MatchResponse> {
    let category = catalog::match_query(&params.q).map(CategoryInfo::from);
    Json(MatchResponse { category })
}
