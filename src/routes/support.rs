//! Support and contact routes
//!
//! Ticketing for authenticated users (admins answer through the same
//! reply endpoint, flagged as such) and the public contact form.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::response::{Created, DataResponse};
use crate::app::AppState;
use crate::auth::RequireAuth;
use crate::domain::support::{
    ContactMessage, CreateContactRequest, CreateReplyRequest, CreateTicketRequest, SupportTicket,
    TicketReply, TicketStatus,
};
use crate::error::ApiError;

pub(crate) const TICKET_COLUMNS: &str =
    "id, user_id, user_email, subject, description, priority, status, created_at";

/// POST /tickets
pub async fn create_ticket(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTicketRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.subject.trim().is_empty() || req.description.trim().is_empty() {
        return Err(ApiError::bad_request("Subject and description are required"));
    }

    let email = auth
        .email
        .clone()
        .ok_or_else(|| ApiError::bad_request("Token carries no email address"))?;

    let ticket = sqlx::query_as::<_, SupportTicket>(&format!(
        r#"
        INSERT INTO support_tickets (user_id, user_email, subject, description, priority, status)
        VALUES ($1, $2, $3, $4, $5, 'open')
        RETURNING {TICKET_COLUMNS}
        "#,
    ))
    .bind(auth.user_id)
    .bind(&email)
    .bind(req.subject.trim())
    .bind(req.description.trim())
    .bind(req.priority)
    .fetch_one(&state.db)
    .await?;

    tracing::info!(user_id = %auth.user_id, ticket_id = %ticket.id, "Support ticket opened");
    Ok(Created(DataResponse::new(ticket)))
}

/// GET /me/tickets
pub async fn my_tickets(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let tickets = sqlx::query_as::<_, SupportTicket>(&format!(
        r#"
        SELECT {TICKET_COLUMNS}
        FROM support_tickets
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    ))
    .bind(auth.user_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(DataResponse::new(tickets)))
}

/// Fetch a ticket the caller may see: their own, or any if they are an
/// admin (admins answer tickets through these same endpoints).
async fn fetch_ticket_for(
    state: &AppState,
    auth: &RequireAuth,
    ticket_id: Uuid,
) -> Result<SupportTicket, ApiError> {
    let ticket = sqlx::query_as::<_, SupportTicket>(&format!(
        "SELECT {TICKET_COLUMNS} FROM support_tickets WHERE id = $1",
    ))
    .bind(ticket_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| ApiError::not_found("Ticket not found"))?;

    let is_admin = auth
        .email
        .as_deref()
        .is_some_and(|e| state.settings.is_admin_email(e));

    if ticket.user_id != auth.user_id && !is_admin {
        return Err(ApiError::forbidden("Not your ticket"));
    }

    Ok(ticket)
}

/// GET /tickets/:ticket_id
pub async fn get_ticket(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(ticket_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let ticket = fetch_ticket_for(&state, &auth, ticket_id).await?;
    Ok(Json(DataResponse::new(ticket)))
}

/// GET /tickets/:ticket_id/replies
///
/// The conversation, oldest first.
pub async fn list_replies(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(ticket_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    fetch_ticket_for(&state, &auth, ticket_id).await?;

    let replies = sqlx::query_as::<_, TicketReply>(
        r#"
        SELECT id, ticket_id, user_id, message, is_admin_reply, created_at
        FROM ticket_replies
        WHERE ticket_id = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(ticket_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(DataResponse::new(replies)))
}

/// POST /tickets/:ticket_id/replies
///
/// Closed tickets refuse new replies.
pub async fn create_reply(
    auth: RequireAuth,
    State(state): State<Arc<AppState>>,
    Path(ticket_id): Path<Uuid>,
    Json(req): Json<CreateReplyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.message.trim().is_empty() {
        return Err(ApiError::bad_request("Message is required"));
    }

    let ticket = fetch_ticket_for(&state, &auth, ticket_id).await?;
    if ticket.status == TicketStatus::Closed {
        return Err(ApiError::conflict("Ticket is closed"));
    }

    let is_admin = auth
        .email
        .as_deref()
        .is_some_and(|e| state.settings.is_admin_email(e));

    let reply = sqlx::query_as::<_, TicketReply>(
        r#"
        INSERT INTO ticket_replies (ticket_id, user_id, message, is_admin_reply)
        VALUES ($1, $2, $3, $4)
        RETURNING id, ticket_id, user_id, message, is_admin_reply, created_at
        "#,
    )
    .bind(ticket_id)
    .bind(auth.user_id)
    .bind(req.message.trim())
    .bind(is_admin)
    .fetch_one(&state.db)
    .await?;

    Ok(Created(DataResponse::new(reply)))
}

/// POST /contact
///
/// Public contact form; lands in the admin inbox as `new`.
pub async fn create_contact_message(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateContactRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.name.trim().is_empty()
        || req.email.trim().is_empty()
        || req.subject.trim().is_empty()
        || req.message.trim().is_empty()
    {
        return Err(ApiError::bad_request("All fields are required"));
    }
    if !req.email.contains('@') {
        return Err(ApiError::bad_request("Invalid email address"));
    }

    let message = sqlx::query_as::<_, ContactMessage>(
        r#"
        INSERT INTO contact_messages (name, email, subject, message, status)
        VALUES ($1, $2, $3, $4, 'new')
        RETURNING id, name, email, subject, message, status, created_at
        "#,
    )
    .bind(req.name.trim())
    .bind(req.email.trim())
    .bind(req.subject.trim())
    .bind(req.message.trim())
    .fetch_one(&state.db)
    .await?;

    tracing::info!(message_id = %message.id, "Contact message received");
    Ok(Created(DataResponse::new(message)))
}
