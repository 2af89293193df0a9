//! Job post routes
//!
//! Clients post work requests; providers browse the open board. Every
//! mutation checks ownership before touching the row.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::response::{Created, DataResponse, NoContent};
use crate::app::AppState;
use crate::auth::RequireAuth;
use crate::domain::catalog;
use crate::domain::jobs::{CreateJobRequest, JobBoardQuery, JobPost, JobStatus};
use crate::error::ApiError;

const JOB_COLUMNS: &str = "id, client_id, title, description, category_id, location_city, \
                           budget, budget_type, status, awarded_to_provider_id, created_at";

fn validate_job_request(req: &CreateJobRequest) -> Result<(), ApiError> {
    if req.title.trim().is_empty() || req.description.trim().is_empty() {
        return Err(ApiError::bad_request("Title and description are required"));
    }
    if catalog::find(&req.category_id).is_none() {
        return Err(ApiError::bad_request("Unknown service category"));
    }
    if !catalog::is_known_city(&req.location_city) {
        return Err(ApiError::bad_request("Unknown city"));
    }
    if req.budget <= Decimal::ZERO {
        return Err(ApiError::bad_request("Budget must be positive"));
    }
    Ok(())
}

/// POST /jobs
///
/// Create an open job post.
pub async fn create_job(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateJobRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_job_request(&req)?;

    tracing::info!(
        user_id = %auth.user_id,
        category_id = %req.category_id,
        city = %req.location_city,
        budget = %req.budget,
        "Creating job post"
    );

    let job = sqlx::query_as::<_, JobPost>(&format!(
        r#"
        INSERT INTO job_posts (client_id, title, description, category_id, location_city, budget, budget_type, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, 'open')
        RETURNING {JOB_COLUMNS}
        "#,
    ))
    .bind(auth.user_id)
    .bind(req.title.trim())
    .bind(req.description.trim())
    .bind(&req.category_id)
    .bind(&req.location_city)
    .bind(req.budget)
    .bind(req.budget_type.to_string())
    .fetch_one(&state.db)
    .await?;

    Ok(Created(DataResponse::new(job)))
}

/// GET /jobs?category=&city=
///
/// The open job board, newest first. `all` or an absent param means no
/// filter, mirroring the board's filter dropdowns.
pub async fn list_open_jobs(
    _auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Query(query): Query<JobBoardQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let jobs = sqlx::query_as::<_, JobPost>(&format!(
        r#"
        SELECT {JOB_COLUMNS}
        FROM job_posts
        WHERE status = 'open'
          AND ($1::text IS NULL OR category_id = $1)
          AND ($2::text IS NULL OR location_city = $2)
        ORDER BY created_at DESC
        "#,
    ))
    .bind(query.category_filter())
    .bind(query.city_filter())
    .fetch_all(&state.db)
    .await?;

    Ok(Json(DataResponse::new(jobs)))
}

/// GET /jobs/:job_id
pub async fn get_job(
    _auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let job = fetch_job(&state, job_id).await?;
    Ok(Json(DataResponse::new(job)))
}

/// DELETE /jobs/:job_id
///
/// Owner-only removal of a post and its offers.
pub async fn delete_job(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let job = fetch_job(&state, job_id).await?;
    if job.client_id != auth.user_id {
        return Err(ApiError::forbidden("Only the job owner can delete it"));
    }

    sqlx::query("DELETE FROM job_posts WHERE id = $1")
        .bind(job_id)
        .execute(&state.db)
        .await?;

    tracing::info!(user_id = %auth.user_id, job_id = %job_id, "Job post deleted");
    Ok(NoContent)
}

/// GET /me/jobs
///
/// The caller's own posts, newest first, any status.
pub async fn my_jobs(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let jobs = sqlx::query_as::<_, JobPost>(&format!(
        r#"
        SELECT {JOB_COLUMNS}
        FROM job_posts
        WHERE client_id = $1
        ORDER BY created_at DESC
        "#,
    ))
    .bind(auth.user_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(DataResponse::new(jobs)))
}

pub(crate) async fn fetch_job(state: &AppState, job_id: Uuid) -> Result<JobPost, ApiError> {
    sqlx::query_as::<_, JobPost>(&format!(
        "SELECT {JOB_COLUMNS} FROM job_posts WHERE id = $1",
    ))
    .bind(job_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| ApiError::not_found("Job not found"))
}

pub(crate) fn ensure_open(job: &JobPost) -> Result<(), ApiError> {
    if job.status != JobStatus::Open {
        return Err(ApiError::bad_request("Job is not accepting offers"));
    }
    Ok(())
}
