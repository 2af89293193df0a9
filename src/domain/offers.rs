use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::jobs::JobPost;

/// Offer lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum OfferStatus {
    Pending,
    Accepted,
    Rejected,
}

impl std::fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OfferStatus::Pending => write!(f, "pending"),
            OfferStatus::Accepted => write!(f, "accepted"),
            OfferStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// A provider's bid against a job post
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct JobOffer {
    pub id: Uuid,
    pub job_post_id: Uuid,
    pub provider_id: Uuid,
    /// Offer amount in MAD
    pub offer_amount: Decimal,
    pub message: Option<String>,
    pub status: OfferStatus,
    pub created_at: DateTime<Utc>,
}

/// Request DTO for submitting an offer
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOfferRequest {
    pub offer_amount: Decimal,
    #[serde(default)]
    pub message: Option<String>,
}

/// Offer as the job owner sees it: bid plus bidder contact details,
/// joined from the provider's onboarding application.
#[derive(Debug, Clone, Serialize)]
pub struct OfferWithProvider {
    #[serde(flatten)]
    pub offer: JobOffer,
    pub provider_name: String,
    pub provider_phone: Option<String>,
    pub provider_email: Option<String>,
}

/// Offer as the bidding provider sees it: bid plus the parent job.
#[derive(Debug, Clone, Serialize)]
pub struct OfferWithJob {
    #[serde(flatten)]
    pub offer: JobOffer,
    pub job: Option<JobPost>,
}
