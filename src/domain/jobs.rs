use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Job post lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum JobStatus {
    Open,
    InProgress,
    Completed,
    Cancelled,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Open => write!(f, "open"),
            JobStatus::InProgress => write!(f, "in_progress"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Whether the posted budget is firm or a starting point
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum BudgetType {
    Fixed,
    Negotiable,
}

impl std::fmt::Display for BudgetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BudgetType::Fixed => write!(f, "fixed"),
            BudgetType::Negotiable => write!(f, "negotiable"),
        }
    }
}

/// A client's work request
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct JobPost {
    pub id: Uuid,
    pub client_id: Uuid,
    pub title: String,
    pub description: String,
    pub category_id: String,
    pub location_city: String,
    /// Budget in MAD
    pub budget: Decimal,
    pub budget_type: BudgetType,
    pub status: JobStatus,
    pub awarded_to_provider_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Request DTO for posting a job
#[derive(Debug, Clone, Deserialize)]
pub struct CreateJobRequest {
    pub title: String,
    pub description: String,
    pub category_id: String,
    pub location_city: String,
    pub budget: Decimal,
    pub budget_type: BudgetType,
}

/// Job board filters; `all` / absent means no filter
#[derive(Debug, Clone, Deserialize, Default)]
pub struct JobBoardQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

impl JobBoardQuery {
    /// Normalizes the `all` sentinel away.
    pub fn category_filter(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| *c != "all")
    }

    pub fn city_filter(&self) -> Option<&str> {
        self.city.as_deref().filter(|c| *c != "all")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_query_treats_all_as_no_filter() {
        let q = JobBoardQuery {
            category: Some("all".to_string()),
            city: Some("Casablanca".to_string()),
        };
        assert_eq!(q.category_filter(), None);
        assert_eq!(q.city_filter(), Some("Casablanca"));

        let q = JobBoardQuery::default();
        assert_eq!(q.category_filter(), None);
        assert_eq!(q.city_filter(), None);
    }

    #[test]
    fn status_display_matches_storage_form() {
        assert_eq!(JobStatus::InProgress.to_string(), "in_progress");
        assert_eq!(BudgetType::Negotiable.to_string(), "negotiable");
    }
}
