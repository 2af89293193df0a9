//! Provider onboarding routes
//!
//! A would-be provider submits an application; admins review it in the
//! back-office (see the admin routes for approval, which publishes the
//! actual directory listings).

use axum::{
    extract::State,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::api::response::{Created, DataResponse};
use crate::app::AppState;
use crate::auth::RequireAuth;
use crate::domain::catalog;
use crate::domain::onboarding::{CreateProviderRequest, ProviderRequest};
use crate::error::ApiError;

pub(crate) const REQUEST_COLUMNS: &str =
    "id, user_id, user_email, full_name, phone, company_name, services, cities, status, created_at";

fn validate_request(req: &CreateProviderRequest) -> Result<(), ApiError> {
    if req.full_name.trim().is_empty() || req.phone.trim().is_empty() {
        return Err(ApiError::bad_request("Full name and phone are required"));
    }
    if req.services.is_empty() {
        return Err(ApiError::bad_request("Select at least one service"));
    }
    if req.cities.is_empty() {
        return Err(ApiError::bad_request("Select at least one city"));
    }
    if let Some(unknown) = req.services.iter().find(|s| catalog::find(s).is_none()) {
        return Err(ApiError::bad_request(format!(
            "Unknown service category: {unknown}"
        )));
    }
    if let Some(unknown) = req.cities.iter().find(|c| !catalog::is_known_city(c)) {
        return Err(ApiError::bad_request(format!("Unknown city: {unknown}")));
    }
    Ok(())
}

/// POST /provider-requests
///
/// Submit an onboarding application for admin review.
pub async fn create_provider_request(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateProviderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_request(&req)?;

    let email = auth
        .email
        .clone()
        .ok_or_else(|| ApiError::bad_request("Token carries no email address"))?;

    let has_pending: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM provider_requests WHERE user_id = $1 AND status = 'pending')",
    )
    .bind(auth.user_id)
    .fetch_one(&state.db)
    .await?;

    if has_pending {
        return Err(ApiError::conflict(
            "You already have an application under review",
        ));
    }

    tracing::info!(
        user_id = %auth.user_id,
        services = ?req.services,
        cities = ?req.cities,
        "Creating provider request"
    );

    let request = sqlx::query_as::<_, ProviderRequest>(&format!(
        r#"
        INSERT INTO provider_requests (user_id, user_email, full_name, phone, company_name, services, cities, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending')
        RETURNING {REQUEST_COLUMNS}
        "#,
    ))
    .bind(auth.user_id)
    .bind(&email)
    .bind(req.full_name.trim())
    .bind(req.phone.trim())
    .bind(req.company_name.as_deref().map(str::trim).filter(|c| !c.is_empty()))
    .bind(&req.services)
    .bind(&req.cities)
    .fetch_one(&state.db)
    .await?;

    Ok(Created(DataResponse::new(request)))
}

/// GET /me/provider-request
///
/// The caller's latest application, for showing onboarding progress.
pub async fn my_provider_request(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let request = sqlx::query_as::<_, ProviderRequest>(&format!(
        r#"
        SELECT {REQUEST_COLUMNS}
        FROM provider_requests
        WHERE user_id = $1
        ORDER BY created_at DESC
        LIMIT 1
        "#,
    ))
    .bind(auth.user_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| ApiError::not_found("No application on file"))?;

    Ok(Json(DataResponse::new(request)))
}
