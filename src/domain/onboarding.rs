use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Onboarding application lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "pending"),
            RequestStatus::Approved => write!(f, "approved"),
            RequestStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// A provider's application, awaiting admin review.
///
/// Approval converts it into one professional listing per requested
/// service, carrying the applicant's cities and contact details.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProviderRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_email: String,
    pub full_name: String,
    pub phone: String,
    pub company_name: Option<String>,
    /// Requested service catalog ids
    pub services: Vec<String>,
    /// Cities the applicant operates in
    pub cities: Vec<String>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

/// Request DTO for submitting an onboarding application
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProviderRequest {
    pub full_name: String,
    pub phone: String,
    #[serde(default)]
    pub company_name: Option<String>,
    pub services: Vec<String>,
    pub cities: Vec<String>,
}
