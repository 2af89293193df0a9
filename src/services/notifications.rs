//! Notification service
//!
//! Provides functions to create notifications from other parts of the
//! application. Routes call these when events occur that the affected
//! user should hear about.

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

/// Notification type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    OfferReceived,
    OfferAccepted,
    OfferRejected,
    RequestApproved,
    RequestRejected,
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationType::OfferReceived => write!(f, "offer_received"),
            NotificationType::OfferAccepted => write!(f, "offer_accepted"),
            NotificationType::OfferRejected => write!(f, "offer_rejected"),
            NotificationType::RequestApproved => write!(f, "request_approved"),
            NotificationType::RequestRejected => write!(f, "request_rejected"),
        }
    }
}

/// Create a notification for a user
pub async fn create_notification(
    db: &PgPool,
    user_id: Uuid,
    notification_type: NotificationType,
    title: &str,
    message: Option<&str>,
    data: Option<serde_json::Value>,
) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    let type_str = notification_type.to_string();
    let data = data.unwrap_or(serde_json::json!({}));

    sqlx::query(
        r#"
        INSERT INTO notifications (id, user_id, type, title, message, data)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(&type_str)
    .bind(title)
    .bind(message)
    .bind(&data)
    .execute(db)
    .await?;

    tracing::info!(
        user_id = %user_id,
        notification_type = %type_str,
        notification_id = %id,
        "Notification created"
    );

    Ok(id)
}

/// Notify a job owner that a provider submitted an offer
pub async fn notify_offer_received(
    db: &PgPool,
    client_id: Uuid,
    job_id: Uuid,
    job_title: &str,
    offer_amount: Decimal,
) -> Result<Uuid, sqlx::Error> {
    create_notification(
        db,
        client_id,
        NotificationType::OfferReceived,
        &format!("New offer on {}", job_title),
        Some(&format!("A provider offered {} MAD", offer_amount)),
        Some(serde_json::json!({
            "job_post_id": job_id,
            "job_title": job_title,
            "offer_amount": offer_amount,
        })),
    )
    .await
}

/// Notify a provider that their offer was accepted
pub async fn notify_offer_accepted(
    db: &PgPool,
    provider_id: Uuid,
    job_id: Uuid,
    job_title: &str,
) -> Result<Uuid, sqlx::Error> {
    create_notification(
        db,
        provider_id,
        NotificationType::OfferAccepted,
        "Your offer was accepted!",
        Some(&format!(
            "The client accepted your offer for '{}'. They will contact you shortly.",
            job_title
        )),
        Some(serde_json::json!({
            "job_post_id": job_id,
            "job_title": job_title,
        })),
    )
    .await
}

/// Notify a provider that their offer was not selected
pub async fn notify_offer_rejected(
    db: &PgPool,
    provider_id: Uuid,
    job_id: Uuid,
    job_title: &str,
) -> Result<Uuid, sqlx::Error> {
    create_notification(
        db,
        provider_id,
        NotificationType::OfferRejected,
        "Offer not selected",
        Some(&format!(
            "Your offer for '{}' was not selected. Keep bidding on other jobs!",
            job_title
        )),
        Some(serde_json::json!({
            "job_post_id": job_id,
            "job_title": job_title,
        })),
    )
    .await
}

/// Notify an applicant that their provider request was approved
pub async fn notify_request_approved(
    db: &PgPool,
    user_id: Uuid,
    request_id: Uuid,
    listings_created: usize,
) -> Result<Uuid, sqlx::Error> {
    create_notification(
        db,
        user_id,
        NotificationType::RequestApproved,
        "Your provider application was approved!",
        Some("Your listings are now live in the directory."),
        Some(serde_json::json!({
            "request_id": request_id,
            "listings_created": listings_created,
        })),
    )
    .await
}

/// Notify an applicant that their provider request was rejected
pub async fn notify_request_rejected(
    db: &PgPool,
    user_id: Uuid,
    request_id: Uuid,
) -> Result<Uuid, sqlx::Error> {
    create_notification(
        db,
        user_id,
        NotificationType::RequestRejected,
        "Provider application not approved",
        Some("Your application was not approved. You can update your details and reapply."),
        Some(serde_json::json!({
            "request_id": request_id,
        })),
    )
    .await
}
