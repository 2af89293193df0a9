//! Job offer routes
//!
//! Providers bid on open posts; the job owner reviews offers and
//! accepts one. Acceptance is transactional: the winning offer, its
//! siblings, and the job status move together or not at all.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::response::{Created, DataResponse, MessageResponse};
use crate::app::AppState;
use crate::auth::RequireAuth;
use crate::domain::jobs::{BudgetType, JobPost, JobStatus};
use crate::domain::offers::{
    CreateOfferRequest, JobOffer, OfferStatus, OfferWithJob, OfferWithProvider,
};
use crate::error::ApiError;
use crate::routes::jobs::{ensure_open, fetch_job};
use crate::services::notifications;

const OFFER_COLUMNS: &str =
    "id, job_post_id, provider_id, offer_amount, message, status, created_at";

/// POST /jobs/:job_id/offers
///
/// Submit a pending offer against an open job.
pub async fn create_offer(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<Uuid>,
    Json(req): Json<CreateOfferRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.offer_amount <= Decimal::ZERO {
        return Err(ApiError::bad_request("Offer amount must be positive"));
    }

    let job = fetch_job(&state, job_id).await?;
    ensure_open(&job)?;

    if job.client_id == auth.user_id {
        return Err(ApiError::bad_request("You cannot bid on your own job"));
    }

    // One live offer per provider per job
    let already_bid: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM job_offers
            WHERE job_post_id = $1 AND provider_id = $2 AND status = 'pending'
        )
        "#,
    )
    .bind(job_id)
    .bind(auth.user_id)
    .fetch_one(&state.db)
    .await?;

    if already_bid {
        return Err(ApiError::conflict("You already have a pending offer on this job"));
    }

    tracing::info!(
        user_id = %auth.user_id,
        job_id = %job_id,
        offer_amount = %req.offer_amount,
        "Creating offer"
    );

    let offer = sqlx::query_as::<_, JobOffer>(&format!(
        r#"
        INSERT INTO job_offers (job_post_id, provider_id, offer_amount, message, status)
        VALUES ($1, $2, $3, $4, 'pending')
        RETURNING {OFFER_COLUMNS}
        "#,
    ))
    .bind(job_id)
    .bind(auth.user_id)
    .bind(req.offer_amount)
    .bind(req.message.as_deref().map(str::trim).filter(|m| !m.is_empty()))
    .fetch_one(&state.db)
    .await?;

    if let Err(e) = notifications::notify_offer_received(
        &state.db,
        job.client_id,
        job.id,
        &job.title,
        offer.offer_amount,
    )
    .await
    {
        tracing::warn!(error = %e, job_id = %job.id, "Failed to notify job owner");
    }

    Ok(Created(DataResponse::new(offer)))
}

/// Database row for an offer joined with the bidder's latest onboarding
/// application, the only place provider contact details live.
#[derive(Debug, sqlx::FromRow)]
struct OfferProviderRow {
    id: Uuid,
    job_post_id: Uuid,
    provider_id: Uuid,
    offer_amount: Decimal,
    message: Option<String>,
    status: OfferStatus,
    created_at: DateTime<Utc>,
    provider_name: Option<String>,
    provider_phone: Option<String>,
    provider_email: Option<String>,
}

impl From<OfferProviderRow> for OfferWithProvider {
    fn from(row: OfferProviderRow) -> Self {
        Self {
            offer: JobOffer {
                id: row.id,
                job_post_id: row.job_post_id,
                provider_id: row.provider_id,
                offer_amount: row.offer_amount,
                message: row.message,
                status: row.status,
                created_at: row.created_at,
            },
            provider_name: row
                .provider_name
                .unwrap_or_else(|| "Unknown provider".to_string()),
            provider_phone: row.provider_phone,
            provider_email: row.provider_email,
        }
    }
}

/// GET /jobs/:job_id/offers
///
/// Owner-only: offers for a job, cheapest first, with bidder contact
/// details.
pub async fn list_offers_for_job(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let job = fetch_job(&state, job_id).await?;
    if job.client_id != auth.user_id {
        return Err(ApiError::forbidden("Only the job owner can view offers"));
    }

    let rows = sqlx::query_as::<_, OfferProviderRow>(
        r#"
        SELECT o.id, o.job_post_id, o.provider_id, o.offer_amount, o.message, o.status, o.created_at,
               pr.full_name AS provider_name,
               pr.phone AS provider_phone,
               pr.user_email AS provider_email
        FROM job_offers o
        LEFT JOIN LATERAL (
            SELECT full_name, phone, user_email
            FROM provider_requests
            WHERE user_id = o.provider_id
            ORDER BY created_at DESC
            LIMIT 1
        ) pr ON TRUE
        WHERE o.job_post_id = $1
        ORDER BY o.offer_amount ASC, o.created_at ASC
        "#,
    )
    .bind(job_id)
    .fetch_all(&state.db)
    .await?;

    let offers: Vec<OfferWithProvider> = rows.into_iter().map(Into::into).collect();
    Ok(Json(DataResponse::new(offers)))
}

/// Database row for an offer with its (possibly deleted) parent job.
#[derive(Debug, sqlx::FromRow)]
struct OfferJobRow {
    id: Uuid,
    job_post_id: Uuid,
    provider_id: Uuid,
    offer_amount: Decimal,
    message: Option<String>,
    status: OfferStatus,
    created_at: DateTime<Utc>,
    job_id: Option<Uuid>,
    job_client_id: Option<Uuid>,
    job_title: Option<String>,
    job_description: Option<String>,
    job_category_id: Option<String>,
    job_location_city: Option<String>,
    job_budget: Option<Decimal>,
    job_budget_type: Option<String>,
    job_status: Option<String>,
    job_awarded_to: Option<Uuid>,
    job_created_at: Option<DateTime<Utc>>,
}

impl From<OfferJobRow> for OfferWithJob {
    fn from(row: OfferJobRow) -> Self {
        let job = match (row.job_id, row.job_client_id) {
            (Some(id), Some(client_id)) => Some(JobPost {
                id,
                client_id,
                title: row.job_title.unwrap_or_default(),
                description: row.job_description.unwrap_or_default(),
                category_id: row.job_category_id.unwrap_or_default(),
                location_city: row.job_location_city.unwrap_or_default(),
                budget: row.job_budget.unwrap_or_default(),
                budget_type: match row.job_budget_type.as_deref() {
                    Some("negotiable") => BudgetType::Negotiable,
                    _ => BudgetType::Fixed,
                },
                status: match row.job_status.as_deref() {
                    Some("in_progress") => JobStatus::InProgress,
                    Some("completed") => JobStatus::Completed,
                    Some("cancelled") => JobStatus::Cancelled,
                    _ => JobStatus::Open,
                },
                awarded_to_provider_id: row.job_awarded_to,
                created_at: row.job_created_at.unwrap_or_else(Utc::now),
            }),
            _ => None,
        };

        Self {
            offer: JobOffer {
                id: row.id,
                job_post_id: row.job_post_id,
                provider_id: row.provider_id,
                offer_amount: row.offer_amount,
                message: row.message,
                status: row.status,
                created_at: row.created_at,
            },
            job,
        }
    }
}

/// GET /me/offers
///
/// The caller's offers, newest first, each with its parent job when the
/// job still exists.
pub async fn my_offers(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = sqlx::query_as::<_, OfferJobRow>(
        r#"
        SELECT o.id, o.job_post_id, o.provider_id, o.offer_amount, o.message, o.status, o.created_at,
               j.id AS job_id,
               j.client_id AS job_client_id,
               j.title AS job_title,
               j.description AS job_description,
               j.category_id AS job_category_id,
               j.location_city AS job_location_city,
               j.budget AS job_budget,
               j.budget_type AS job_budget_type,
               j.status AS job_status,
               j.awarded_to_provider_id AS job_awarded_to,
               j.created_at AS job_created_at
        FROM job_offers o
        LEFT JOIN job_posts j ON j.id = o.job_post_id
        WHERE o.provider_id = $1
        ORDER BY o.created_at DESC
        "#,
    )
    .bind(auth.user_id)
    .fetch_all(&state.db)
    .await?;

    let offers: Vec<OfferWithJob> = rows.into_iter().map(Into::into).collect();
    Ok(Json(DataResponse::new(offers)))
}

/// POST /offers/:offer_id/accept
///
/// Owner-only acceptance: the chosen offer becomes `accepted`, every
/// other pending offer on the job becomes `rejected`, and the job moves
/// to `in_progress` with the winning provider recorded.
pub async fn accept_offer(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(offer_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = state.db.begin().await?;

    let offer = sqlx::query_as::<_, JobOffer>(&format!(
        "SELECT {OFFER_COLUMNS} FROM job_offers WHERE id = $1 FOR UPDATE",
    ))
    .bind(offer_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| ApiError::not_found("Offer not found"))?;

    if offer.status != OfferStatus::Pending {
        return Err(ApiError::conflict("Offer has already been decided"));
    }

    let job = sqlx::query_as::<_, JobPost>(
        r#"
        SELECT id, client_id, title, description, category_id, location_city,
               budget, budget_type, status, awarded_to_provider_id, created_at
        FROM job_posts WHERE id = $1 FOR UPDATE
        "#,
    )
    .bind(offer.job_post_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| ApiError::not_found("Job not found"))?;

    if job.client_id != auth.user_id {
        return Err(ApiError::forbidden("Only the job owner can accept offers"));
    }
    ensure_open(&job)?;

    sqlx::query("UPDATE job_offers SET status = 'accepted' WHERE id = $1")
        .bind(offer_id)
        .execute(&mut *tx)
        .await?;

    let rejected_providers: Vec<Uuid> = sqlx::query_scalar(
        r#"
        UPDATE job_offers SET status = 'rejected'
        WHERE job_post_id = $1 AND id <> $2 AND status = 'pending'
        RETURNING provider_id
        "#,
    )
    .bind(job.id)
    .bind(offer_id)
    .fetch_all(&mut *tx)
    .await?;

    sqlx::query(
        "UPDATE job_posts SET status = 'in_progress', awarded_to_provider_id = $2 WHERE id = $1",
    )
    .bind(job.id)
    .bind(offer.provider_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        user_id = %auth.user_id,
        job_id = %job.id,
        offer_id = %offer_id,
        provider_id = %offer.provider_id,
        rejected = rejected_providers.len(),
        "Offer accepted"
    );

    // Notifications are best-effort once the transaction is committed
    if let Err(e) =
        notifications::notify_offer_accepted(&state.db, offer.provider_id, job.id, &job.title).await
    {
        tracing::warn!(error = %e, "Failed to notify accepted provider");
    }
    for provider_id in rejected_providers {
        if let Err(e) =
            notifications::notify_offer_rejected(&state.db, provider_id, job.id, &job.title).await
        {
            tracing::warn!(error = %e, provider_id = %provider_id, "Failed to notify rejected provider");
        }
    }

    Ok(Json(MessageResponse::new("Offer accepted")))
}
