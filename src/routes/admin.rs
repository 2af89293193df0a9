//! Admin back-office routes
//!
//! Provider request review (approval publishes directory listings),
//! job moderation, support ticket management, and the contact inbox.
//! All routes require the caller's verified email to be on the
//! configured admin list.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path, Query, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::pagination::{Paginated, PaginationParams};
use crate::api::response::{DataResponse, MessageResponse, NoContent};
use crate::app::AppState;
use crate::auth::RequireAuth;
use crate::domain::jobs::JobPost;
use crate::domain::onboarding::{ProviderRequest, RequestStatus};
use crate::domain::support::{ContactMessage, MessageStatus, SupportTicket, TicketStatus, UpdateTicketRequest};
use crate::error::{ApiError, ErrorResponse};
use crate::routes::onboarding::REQUEST_COLUMNS;
use crate::routes::support::TICKET_COLUMNS;
use crate::services::cache::keys;
use crate::services::notifications;

// ============================================================================
// RequireAdmin Middleware
// ============================================================================

/// Extractor that requires admin privileges.
/// Uses RequireAuth internally and additionally checks the configured
/// admin email list against the verified token email.
#[derive(Debug, Clone)]
pub struct RequireAdmin {
    pub auth: RequireAuth,
}

impl RequireAdmin {
    pub fn user_id(&self) -> Uuid {
        self.auth.user_id
    }
}

#[derive(Debug)]
pub enum AdminAuthError {
    NotAuthenticated,
    NotAdmin,
}

impl IntoResponse for AdminAuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AdminAuthError::NotAuthenticated => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required",
            ),
            AdminAuthError::NotAdmin => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Admin privileges required",
            ),
        };

        let body = ErrorResponse {
            code: code.to_string(),
            message: message.to_string(),
            request_id: None,
        };

        (status, Json(body)).into_response()
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for RequireAdmin {
    type Rejection = AdminAuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        // First, require authentication
        let auth = RequireAuth::from_request_parts(parts, state)
            .await
            .map_err(|_| AdminAuthError::NotAuthenticated)?;

        let is_admin = auth
            .email
            .as_deref()
            .is_some_and(|e| state.settings.is_admin_email(e));

        if !is_admin {
            tracing::warn!(user_id = %auth.user_id, "Non-admin user attempted to access admin route");
            return Err(AdminAuthError::NotAdmin);
        }

        Ok(RequireAdmin { auth })
    }
}

// ============================================================================
// Provider Requests
// ============================================================================

#[derive(Debug, Deserialize, Default)]
pub struct RequestListQuery {
    #[serde(default)]
    pub status: Option<RequestStatus>,
}

/// GET /admin/provider-requests?status=
///
/// Applications in review order (oldest first). Defaults to pending.
pub async fn list_provider_requests(
    admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Query(query): Query<RequestListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let status = query.status.unwrap_or(RequestStatus::Pending);

    tracing::info!(admin_id = %admin.user_id(), status = %status, "Listing provider requests");

    let requests = sqlx::query_as::<_, ProviderRequest>(&format!(
        r#"
        SELECT {REQUEST_COLUMNS}
        FROM provider_requests
        WHERE status = $1
        ORDER BY created_at ASC
        "#,
    ))
    .bind(status)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(DataResponse::new(requests)))
}

/// POST /admin/provider-requests/:request_id/approve
///
/// Converts the application into one directory listing per requested
/// service, all carrying the applicant's cities and contact details.
pub async fn approve_provider_request(
    admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(request_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut tx = state.db.begin().await?;

    let request = sqlx::query_as::<_, ProviderRequest>(&format!(
        "SELECT {REQUEST_COLUMNS} FROM provider_requests WHERE id = $1 FOR UPDATE",
    ))
    .bind(request_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| ApiError::not_found("Provider request not found"))?;

    if request.status != RequestStatus::Pending {
        return Err(ApiError::conflict("Request has already been decided"));
    }

    for service_id in &request.services {
        sqlx::query(
            r#"
            INSERT INTO professionals (name, service_id, service_cities, phone, rating)
            VALUES ($1, $2, $3, $4, 0)
            "#,
        )
        .bind(&request.full_name)
        .bind(service_id)
        .bind(&request.cities)
        .bind(&request.phone)
        .execute(&mut *tx)
        .await?;
    }

    sqlx::query("UPDATE provider_requests SET status = 'approved' WHERE id = $1")
        .bind(request_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(
        admin_id = %admin.user_id(),
        request_id = %request_id,
        listings = request.services.len(),
        "Provider request approved"
    );

    // New listings must show up in the public directory
    if let Err(e) = state.cache.delete_pattern(&keys::professionals_pattern()).await {
        tracing::warn!(error = %e, "Failed to invalidate directory cache");
    }

    if let Err(e) = notifications::notify_request_approved(
        &state.db,
        request.user_id,
        request_id,
        request.services.len(),
    )
    .await
    {
        tracing::warn!(error = %e, "Failed to notify approved applicant");
    }

    Ok(Json(MessageResponse::new("Request approved")))
}

/// POST /admin/provider-requests/:request_id/reject
pub async fn reject_provider_request(
    admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(request_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let request = sqlx::query_as::<_, ProviderRequest>(&format!(
        r#"
        UPDATE provider_requests SET status = 'rejected'
        WHERE id = $1 AND status = 'pending'
        RETURNING {REQUEST_COLUMNS}
        "#,
    ))
    .bind(request_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| ApiError::not_found("No pending request with that id"))?;

    tracing::info!(
        admin_id = %admin.user_id(),
        request_id = %request_id,
        "Provider request rejected"
    );

    if let Err(e) =
        notifications::notify_request_rejected(&state.db, request.user_id, request_id).await
    {
        tracing::warn!(error = %e, "Failed to notify rejected applicant");
    }

    Ok(Json(MessageResponse::new("Request rejected")))
}

// ============================================================================
// Job Moderation
// ============================================================================

/// GET /admin/jobs
///
/// Every post, any status, newest first.
pub async fn list_all_jobs(
    admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::info!(admin_id = %admin.user_id(), "Listing all jobs");

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM job_posts")
        .fetch_one(&state.db)
        .await?;

    let jobs = sqlx::query_as::<_, JobPost>(
        r#"
        SELECT id, client_id, title, description, category_id, location_city,
               budget, budget_type, status, awarded_to_provider_id, created_at
        FROM job_posts
        ORDER BY created_at DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(pagination.limit() as i64)
    .bind(pagination.offset() as i64)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(Paginated::new(jobs, &pagination, total as u64)))
}

/// DELETE /admin/jobs/:job_id
pub async fn delete_job(
    admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = sqlx::query("DELETE FROM job_posts WHERE id = $1")
        .bind(job_id)
        .execute(&state.db)
        .await?;

    if deleted.rows_affected() == 0 {
        return Err(ApiError::not_found("Job not found"));
    }

    tracing::info!(admin_id = %admin.user_id(), job_id = %job_id, "Job post removed by admin");
    Ok(NoContent)
}

// ============================================================================
// Support Tickets
// ============================================================================

#[derive(Debug, Deserialize, Default)]
pub struct TicketListQuery {
    #[serde(default)]
    pub status: Option<TicketStatus>,
}

/// GET /admin/tickets?status=
///
/// Absent status means every ticket.
pub async fn list_tickets(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Query(query): Query<TicketListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let tickets = sqlx::query_as::<_, SupportTicket>(&format!(
        r#"
        SELECT {TICKET_COLUMNS}
        FROM support_tickets
        WHERE ($1::text IS NULL OR status = $1)
        ORDER BY created_at DESC
        "#,
    ))
    .bind(query.status.map(|s| s.to_string()))
    .fetch_all(&state.db)
    .await?;

    Ok(Json(DataResponse::new(tickets)))
}

/// PATCH /admin/tickets/:ticket_id
///
/// Move a ticket between open, in_progress, and closed.
pub async fn update_ticket(
    admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(ticket_id): Path<Uuid>,
    Json(req): Json<UpdateTicketRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let ticket = sqlx::query_as::<_, SupportTicket>(&format!(
        r#"
        UPDATE support_tickets SET status = $2
        WHERE id = $1
        RETURNING {TICKET_COLUMNS}
        "#,
    ))
    .bind(ticket_id)
    .bind(req.status)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| ApiError::not_found("Ticket not found"))?;

    tracing::info!(
        admin_id = %admin.user_id(),
        ticket_id = %ticket_id,
        status = %req.status,
        "Ticket status updated"
    );

    Ok(Json(DataResponse::new(ticket)))
}

// ============================================================================
// Contact Inbox
// ============================================================================

#[derive(Debug, Deserialize, Default)]
pub struct MessageListQuery {
    #[serde(default)]
    pub status: Option<MessageStatus>,
}

/// GET /admin/messages?status=
///
/// Defaults to the unread (`new`) inbox.
pub async fn list_messages(
    _admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Query(query): Query<MessageListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let status = query.status.unwrap_or(MessageStatus::New);

    let messages = sqlx::query_as::<_, ContactMessage>(
        r#"
        SELECT id, name, email, subject, message, status, created_at
        FROM contact_messages
        WHERE status = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(status)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(DataResponse::new(messages)))
}

/// POST /admin/messages/:message_id/archive
pub async fn archive_message(
    admin: RequireAdmin,
    State(state): State<Arc<AppState>>,
    Path(message_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let message = sqlx::query_as::<_, ContactMessage>(
        r#"
        UPDATE contact_messages SET status = 'archived'
        WHERE id = $1
        RETURNING id, name, email, subject, message, status, created_at
        "#,
    )
    .bind(message_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| ApiError::not_found("Message not found"))?;

    tracing::info!(admin_id = %admin.user_id(), message_id = %message_id, "Contact message archived");
    Ok(Json(DataResponse::new(message)))
}
